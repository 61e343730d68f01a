use serde::{Deserialize, Serialize};

/// Lifecycle flag the backend attaches to a posting. Postings are never
/// removed from the feed; they only change status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Active,
    Expired,
    Closed,
    Other(String),
}

impl JobStatus {
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Expired => "expired",
            JobStatus::Closed => "closed",
            JobStatus::Other(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "active" => JobStatus::Active,
            "expired" => JobStatus::Expired,
            "closed" => JobStatus::Closed,
            _ => JobStatus::Other(value),
        }
    }
}

impl From<JobStatus> for String {
    fn from(value: JobStatus) -> Self {
        value.as_str().to_string()
    }
}

/// A job posting in the uniform in-memory shape produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: String,
    pub company_logo: Option<String>,
    pub location: String,
    pub salary: String,
    /// Always populated (possibly empty) so the type filters can rely on it.
    #[serde(rename = "type")]
    pub job_type: String,
    pub industry: Option<String>,
    pub skills: Vec<String>,
    /// Kept verbatim from the feed; parsed only when sorting or labelling.
    pub posted_date: Option<String>,
    pub status: Option<JobStatus>,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub is_remote: bool,
    pub is_applied: bool,
}
