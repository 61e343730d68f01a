//! Text rendering for job cards.

use chrono::{DateTime, Utc};

use crate::listings::overlay::JobView;
use crate::listings::sort::parse_posted_date;
use crate::models::job::JobStatus;

fn plural(n: i64) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

/// Relative "Posted ..." label. Missing or unreadable dates read as
/// "Recently posted"; future dates as "Posted just now".
pub fn posted_label(posted_date: Option<&str>, now: DateTime<Utc>) -> String {
    let Some(posted) = posted_date.and_then(parse_posted_date) else {
        return "Recently posted".to_string();
    };

    let elapsed = now - posted;
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Posted just now".to_string()
    } else if minutes < 60 {
        format!("Posted {minutes} minute{} ago", plural(minutes))
    } else if hours < 24 {
        format!("Posted {hours} hour{} ago", plural(hours))
    } else if days == 1 {
        "Posted yesterday".to_string()
    } else {
        format!("Posted {days} days ago")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn status_label(status: Option<&JobStatus>) -> String {
    let Some(status) = status else {
        return "Unknown".to_string();
    };
    match status.as_str().to_lowercase().as_str() {
        "active" | "approved" => "Active".to_string(),
        "pending" => "Pending".to_string(),
        "rejected" | "inactive" => "Inactive".to_string(),
        "expired" => "Expired".to_string(),
        // Only the first letter changes; the rest is shown as sent.
        _ => capitalize(status.as_str()),
    }
}

/// One line per job for the CLI listing.
pub fn render_line(view: &JobView, now: DateTime<Utc>) -> String {
    let job = &view.job;
    let mut parts = vec![job.title.clone()];
    for field in [&job.company, &job.location, &job.job_type, &job.salary] {
        if !field.is_empty() {
            parts.push(field.clone());
        }
    }
    parts.push(posted_label(job.posted_date.as_deref(), now));

    let mut line = format!("#{:<5} {}", job.id, parts.join(" · "));
    if matches!(job.status, Some(ref s) if *s != JobStatus::Active) {
        line.push_str(&format!(" [{}]", status_label(job.status.as_ref())));
    }
    if view.is_applied {
        line.push_str(" [applied]");
    }
    if view.is_saved {
        line.push_str(" [saved]");
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::listings::filters::tests::job;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    fn ago(d: Duration) -> String {
        (now() - d).to_rfc3339()
    }

    #[test]
    fn test_posted_label_buckets() {
        assert_eq!(posted_label(None, now()), "Recently posted");
        assert_eq!(posted_label(Some("soon"), now()), "Recently posted");
        assert_eq!(posted_label(Some(&ago(Duration::seconds(20))), now()), "Posted just now");
        assert_eq!(posted_label(Some(&ago(Duration::minutes(1))), now()), "Posted 1 minute ago");
        assert_eq!(posted_label(Some(&ago(Duration::minutes(45))), now()), "Posted 45 minutes ago");
        assert_eq!(posted_label(Some(&ago(Duration::hours(3))), now()), "Posted 3 hours ago");
        assert_eq!(posted_label(Some(&ago(Duration::hours(30))), now()), "Posted yesterday");
        assert_eq!(posted_label(Some("2025-03-01"), now()), "Posted 9 days ago");
    }

    #[test]
    fn test_future_date_is_just_now() {
        assert_eq!(posted_label(Some("2030-01-01"), now()), "Posted just now");
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(None), "Unknown");
        assert_eq!(status_label(Some(&JobStatus::Active)), "Active");
        assert_eq!(status_label(Some(&JobStatus::Expired)), "Expired");
        assert_eq!(status_label(Some(&JobStatus::Closed)), "Closed");
        assert_eq!(status_label(Some(&JobStatus::Other("pending".into()))), "Pending");
    }

    #[test]
    fn test_unknown_status_keeps_its_casing() {
        assert_eq!(status_label(Some(&JobStatus::Other("CLOSED_X".into()))), "CLOSED_X");
        assert_eq!(status_label(Some(&JobStatus::Other("on hold".into()))), "On hold");
        assert_eq!(status_label(Some(&JobStatus::Other("draftPending".into()))), "DraftPending");
    }

    #[test]
    fn test_render_line_marks_state() {
        let mut j = job(12, "Part-time", &[]);
        j.title = "Data Analyst".to_string();
        j.company = "Hive Labs".to_string();
        j.status = Some(JobStatus::Expired);
        let view = JobView {
            job: j,
            is_applied: true,
            is_saved: false,
        };

        let line = render_line(&view, now());
        assert!(line.starts_with("#12"));
        assert!(line.contains("Data Analyst · Hive Labs · Part-time"));
        assert!(line.ends_with("[Expired] [applied]"));
    }
}
