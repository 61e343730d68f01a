//! Newest postings first.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::job::Job;

const NAIVE_DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parses the feed's posting date. Accepts plain dates, naive date-times,
/// RFC 3339 and RFC 2822 (`Tue, 11 Feb 2025 00:00:00 GMT`). Naive values
/// are taken as UTC.
pub fn parse_posted_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn posted_at(job: &Job) -> Option<DateTime<Utc>> {
    job.posted_date.as_deref().and_then(parse_posted_date)
}

/// Sorts newest first. A pair where either date is missing or unparseable
/// compares equal, so such a pair never changes relative order: undated
/// jobs stay where they are and each run of dated jobs between them is
/// stably sorted on its own.
pub fn sort_by_recency(jobs: &mut [Job]) {
    let dated: Vec<bool> = jobs.iter().map(|j| posted_at(j).is_some()).collect();

    let mut start = 0;
    while start < jobs.len() {
        if !dated[start] {
            start += 1;
            continue;
        }
        let mut end = start;
        while end < jobs.len() && dated[end] {
            end += 1;
        }
        jobs[start..end].sort_by_key(|j| Reverse(posted_at(j)));
        start = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::filters::tests::job;

    fn dated(id: i64, date: Option<&str>) -> Job {
        let mut j = job(id, "Full-time", &[]);
        j.posted_date = date.map(str::to_string);
        j
    }

    fn ids(jobs: &[Job]) -> Vec<i64> {
        jobs.iter().map(|j| j.id).collect()
    }

    #[test]
    fn test_sorts_newest_first() {
        let mut jobs = vec![
            dated(1, Some("2025-01-01")),
            dated(2, Some("2025-03-01")),
            dated(3, Some("2025-02-01")),
        ];
        sort_by_recency(&mut jobs);
        assert_eq!(ids(&jobs), vec![2, 3, 1]);
    }

    #[test]
    fn test_equal_dates_keep_input_order() {
        let mut jobs = vec![
            dated(1, Some("2025-01-01")),
            dated(2, Some("2025-01-01")),
            dated(3, Some("2025-01-01")),
        ];
        sort_by_recency(&mut jobs);
        assert_eq!(ids(&jobs), vec![1, 2, 3]);
    }

    #[test]
    fn test_undated_jobs_keep_relative_order() {
        let mut jobs = vec![
            dated(1, Some("2024-01-01")),
            dated(2, Some("2025-01-01")),
            dated(3, None),
            dated(4, Some("2023-01-01")),
            dated(5, Some("2026-01-01")),
            dated(6, Some("not a date")),
        ];
        sort_by_recency(&mut jobs);
        assert_eq!(ids(&jobs), vec![2, 1, 3, 5, 4, 6]);

        // Every pair involving an undated job is still in input order.
        let pos = |id: i64| jobs.iter().position(|j| j.id == id).unwrap();
        for undated in [3, 6] {
            for other in 1..=6 {
                if other == undated {
                    continue;
                }
                assert_eq!(other < undated, pos(other) < pos(undated));
            }
        }
    }

    #[test]
    fn test_parse_accepts_backend_formats() {
        let day = parse_posted_date("2025-02-11").unwrap();
        assert_eq!(
            parse_posted_date("Tue, 11 Feb 2025 00:00:00 GMT").unwrap(),
            day
        );
        assert_eq!(parse_posted_date("2025-02-11T00:00:00Z").unwrap(), day);
        assert_eq!(parse_posted_date("2025-02-11 00:00:00").unwrap(), day);
        assert!(parse_posted_date("").is_none());
        assert!(parse_posted_date("yesterday").is_none());
    }
}
