//! Pure narrowing predicates, combined with logical AND.
//!
//! Each categorical dimension is either its "all" sentinel (inactive) or one
//! concrete value. Comparisons lowercase and trim both sides.

use serde::{Deserialize, Serialize};

use crate::models::job::Job;

pub const ALL_LOCATIONS: &str = "all_locations";
pub const ALL_TYPES: &str = "all_types";
pub const ALL_LEVELS: &str = "all_levels";
pub const ALL_INDUSTRIES: &str = "all_industries";

/// The user's current search intent. Never sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub location: String,
    pub job_type: String,
    pub experience: String,
    pub industry: String,
    pub search: String,
    pub skills: Vec<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            location: ALL_LOCATIONS.to_string(),
            job_type: ALL_TYPES.to_string(),
            experience: ALL_LEVELS.to_string(),
            industry: ALL_INDUSTRIES.to_string(),
            search: String::new(),
            skills: Vec::new(),
        }
    }
}

/// Caller-supplied starting filters (e.g. a footer link preset to one
/// category). Missing or empty values mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDefaults {
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub experience: Option<String>,
    pub industry: Option<String>,
    pub search: Option<String>,
    pub skills: Option<Vec<String>>,
}

fn or_sentinel(value: &Option<String>, sentinel: &str) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .unwrap_or(sentinel)
        .to_string()
}

impl FilterState {
    pub fn from_defaults(defaults: &FilterDefaults) -> Self {
        Self {
            location: or_sentinel(&defaults.location, ALL_LOCATIONS),
            job_type: or_sentinel(&defaults.job_type, ALL_TYPES),
            experience: or_sentinel(&defaults.experience, ALL_LEVELS),
            industry: or_sentinel(&defaults.industry, ALL_INDUSTRIES),
            search: defaults.search.clone().unwrap_or_default(),
            skills: defaults.skills.clone().unwrap_or_default(),
        }
    }

    /// True when no dimension narrows the collection.
    pub fn is_inactive(&self) -> bool {
        *self == FilterState::default()
    }

    /// Replaces exactly one dimension.
    pub fn apply_update(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Location(v) => self.location = v,
            FilterUpdate::JobType(v) => self.job_type = v,
            FilterUpdate::Experience(v) => self.experience = v,
            FilterUpdate::Industry(v) => self.industry = v,
            FilterUpdate::Search(v) => self.search = v,
            FilterUpdate::Skills(v) => self.skills = v,
        }
    }
}

/// A change to a single named filter dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Location(String),
    JobType(String),
    Experience(String),
    Industry(String),
    Search(String),
    Skills(Vec<String>),
}

fn safe_lower(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Lowercases and maps every whitespace or underscore to a hyphen, so
/// "Full Time", "full_time" and "full-time" compare equal.
pub fn normalize_type(value: &str) -> String {
    safe_lower(value)
        .chars()
        .map(|c| if c.is_whitespace() || c == '_' { '-' } else { c })
        .collect()
}

pub fn matches_location(job: &Job, location: &str) -> bool {
    if location == ALL_LOCATIONS {
        return true;
    }
    safe_lower(&job.location).contains(&safe_lower(location))
}

pub fn matches_job_type(job: &Job, job_type: &str) -> bool {
    if job_type == ALL_TYPES {
        return true;
    }
    normalize_type(&job.job_type) == normalize_type(job_type)
}

/// Only `entry` and `internship` have a mapping onto the job type. Every
/// other level (e.g. "1-2", "3+") matches no job.
pub fn matches_experience(job: &Job, experience: &str) -> bool {
    if experience == ALL_LEVELS {
        return true;
    }
    let job_type = safe_lower(&job.job_type);
    match safe_lower(experience).as_str() {
        "entry" => job_type.contains("entry") || job_type.contains("internship"),
        "internship" => job_type.contains("internship"),
        _ => false,
    }
}

pub fn matches_industry(job: &Job, industry: &str) -> bool {
    if industry == ALL_INDUSTRIES || industry.is_empty() {
        return true;
    }
    safe_lower(job.industry.as_deref().unwrap_or("")) == safe_lower(industry)
}

pub fn matches_search(job: &Job, search: &str) -> bool {
    let needle = safe_lower(search);
    if needle.is_empty() {
        return true;
    }
    safe_lower(&job.title).contains(&needle)
        || safe_lower(&job.company).contains(&needle)
        || safe_lower(&job.location).contains(&needle)
        || job.skills.iter().any(|s| safe_lower(s).contains(&needle))
}

/// Conjunctive: every requested skill must equal (case-insensitively) at
/// least one of the job's skills.
pub fn matches_skills(job: &Job, skills: &[String]) -> bool {
    skills.iter().all(|wanted| {
        let wanted = safe_lower(wanted);
        job.skills.iter().any(|have| safe_lower(have) == wanted)
    })
}

pub fn matches(job: &Job, filters: &FilterState) -> bool {
    matches_location(job, &filters.location)
        && matches_job_type(job, &filters.job_type)
        && matches_experience(job, &filters.experience)
        && matches_industry(job, &filters.industry)
        && matches_search(job, &filters.search)
        && matches_skills(job, &filters.skills)
}

/// Returns the jobs satisfying every active predicate, in input order.
pub fn apply_filters(jobs: &[Job], filters: &FilterState) -> Vec<Job> {
    jobs.iter().filter(|j| matches(j, filters)).cloned().collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn job(id: i64, job_type: &str, skills: &[&str]) -> Job {
        Job {
            id,
            title: String::new(),
            company: String::new(),
            company_logo: None,
            location: String::new(),
            salary: String::new(),
            job_type: job_type.to_string(),
            industry: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            posted_date: None,
            status: None,
            description: None,
            deadline: None,
            is_remote: false,
            is_applied: false,
        }
    }

    fn ids(jobs: &[Job]) -> Vec<i64> {
        jobs.iter().map(|j| j.id).collect()
    }

    fn scenario_jobs() -> Vec<Job> {
        vec![
            job(1, "Full-time", &["React"]),
            job(2, "Internship", &["React", "Figma"]),
        ]
    }

    #[test]
    fn test_all_sentinels_return_everything() {
        let jobs = scenario_jobs();
        let filters = FilterState::default();
        assert!(filters.is_inactive());
        assert_eq!(apply_filters(&jobs, &filters), jobs);
    }

    #[test]
    fn test_job_type_internship_keeps_only_internship() {
        let filters = FilterState {
            job_type: "internship".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&scenario_jobs(), &filters)), vec![2]);
    }

    #[test]
    fn test_job_type_normalizes_spaces_and_underscores() {
        let j = job(1, "Full Time", &[]);
        assert!(matches_job_type(&j, "full-time"));
        assert!(matches_job_type(&j, "FULL_TIME"));
        assert!(!matches_job_type(&j, "part-time"));
    }

    #[test]
    fn test_search_matches_skills() {
        let filters = FilterState {
            search: "react".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&scenario_jobs(), &filters)), vec![1, 2]);
    }

    #[test]
    fn test_search_checks_title_company_location() {
        let mut j = job(1, "Contract", &[]);
        j.title = "Junior Backend Engineer".to_string();
        j.company = "Hive Labs".to_string();
        j.location = "Cairo, Egypt".to_string();
        assert!(matches_search(&j, "BACKEND"));
        assert!(matches_search(&j, "hive"));
        assert!(matches_search(&j, "cairo"));
        assert!(!matches_search(&j, "dubai"));
    }

    #[test]
    fn test_blank_search_is_inactive() {
        assert!(matches_search(&job(1, "", &[]), "   "));
    }

    #[test]
    fn test_experience_entry_matches_entry_level_only() {
        let jobs = vec![job(1, "Entry Level", &[]), job(2, "Mid-Level", &[])];
        let filters = FilterState {
            experience: "entry".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&jobs, &filters)), vec![1]);
    }

    #[test]
    fn test_experience_entry_also_matches_internships() {
        assert!(matches_experience(&job(1, "Internship", &[]), "entry"));
        assert!(matches_experience(&job(1, "Internship", &[]), "internship"));
        assert!(!matches_experience(&job(1, "Entry Level", &[]), "internship"));
    }

    #[test]
    fn test_unmapped_experience_levels_match_nothing() {
        let jobs = vec![job(1, "Entry Level", &[]), job(2, "Full-time", &[])];
        for level in ["1-2", "3+"] {
            let filters = FilterState {
                experience: level.to_string(),
                ..Default::default()
            };
            assert!(apply_filters(&jobs, &filters).is_empty(), "level {level}");
        }
    }

    #[test]
    fn test_location_is_case_insensitive_substring() {
        let mut j = job(1, "", &[]);
        j.location = "Dubai, UAE".to_string();
        assert!(matches_location(&j, "dubai"));
        assert!(!matches_location(&j, "riyadh"));
        assert!(matches_location(&j, ALL_LOCATIONS));
    }

    #[test]
    fn test_industry_exact_match_and_empty_bypass() {
        let mut j = job(1, "", &[]);
        j.industry = Some("Tech".to_string());
        assert!(matches_industry(&j, "tech"));
        assert!(!matches_industry(&j, "technology"));
        assert!(matches_industry(&j, ""));
        assert!(matches_industry(&job(2, "", &[]), ALL_INDUSTRIES));
        assert!(!matches_industry(&job(2, "", &[]), "tech"));
    }

    #[test]
    fn test_skills_filter_is_conjunctive() {
        let filters = FilterState {
            skills: vec!["react".to_string(), "FIGMA".to_string()],
            ..Default::default()
        };
        assert_eq!(ids(&apply_filters(&scenario_jobs(), &filters)), vec![2]);
    }

    #[test]
    fn test_skills_filter_is_exact_not_substring() {
        let j = job(1, "", &["React Native"]);
        assert!(!matches_skills(&j, &["React".to_string()]));
    }

    #[test]
    fn test_from_defaults_maps_empty_to_sentinel() {
        let defaults = FilterDefaults {
            location: Some(String::new()),
            industry: Some("finance".to_string()),
            ..Default::default()
        };
        let state = FilterState::from_defaults(&defaults);
        assert_eq!(state.location, ALL_LOCATIONS);
        assert_eq!(state.industry, "finance");
        assert_eq!(state.job_type, ALL_TYPES);
    }

    #[test]
    fn test_apply_update_touches_one_dimension() {
        let mut state = FilterState::default();
        state.apply_update(FilterUpdate::JobType("contract".to_string()));
        assert_eq!(state.job_type, "contract");
        assert_eq!(state.location, ALL_LOCATIONS);
        assert_eq!(state.search, "");
    }
}
