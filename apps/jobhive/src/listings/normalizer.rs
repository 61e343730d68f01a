//! Coerces heterogeneous feed payloads into `Job`.
//!
//! Never fails: every coercion degrades to an empty string, empty list or
//! `None` instead of rejecting the record.

use serde_json::Value;

use crate::models::job::{Job, JobStatus};

/// Normalizes one raw job payload.
///
/// - `type` falls back to `job_type`, then to `""`.
/// - `posted_date` is kept verbatim; the detail payload spells it
///   `postedDate`.
/// - `skills` accepts a list or a comma-separated string.
/// - `company` falls back to `company_name`.
pub fn normalize_job(raw: &Value) -> Job {
    Job {
        id: raw.get("id").and_then(as_id).unwrap_or(0),
        title: text(raw, "title"),
        company: first_text(raw, &["company", "company_name"]),
        company_logo: optional_text(raw, "company_logo"),
        location: text(raw, "location"),
        salary: text(raw, "salary"),
        job_type: first_text(raw, &["type", "job_type"]),
        industry: optional_text(raw, "industry"),
        skills: normalize_skills(raw.get("skills")),
        posted_date: first_optional_text(raw, &["posted_date", "postedDate"]),
        status: optional_text(raw, "status").map(JobStatus::from),
        description: optional_text(raw, "description"),
        deadline: optional_text(raw, "deadline"),
        is_remote: raw.get("is_remote").and_then(Value::as_bool).unwrap_or(false),
        is_applied: raw.get("is_applied").and_then(Value::as_bool).unwrap_or(false),
    }
}

pub fn normalize_jobs(raw: &[Value]) -> Vec<Job> {
    raw.iter().map(normalize_job).collect()
}

/// List → kept as-is (string elements only); string → split on commas and
/// trimmed; anything else → empty.
pub fn normalize_skills(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => s.split(',').map(|p| p.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}

fn as_id(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn optional_text(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

fn first_optional_text(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| optional_text(raw, k))
}

fn text(raw: &Value, key: &str) -> String {
    optional_text(raw, key).unwrap_or_default()
}

/// First non-empty string among `keys`, else `""`.
fn first_text(raw: &Value, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| raw.get(*k).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}
