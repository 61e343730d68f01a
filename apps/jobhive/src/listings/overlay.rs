//! Per-user applied/saved annotation, joined onto jobs by id.
//!
//! The two id sets never affect which jobs are displayed, only how each one
//! is marked.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::job::Job;

/// A displayed job plus the signed-in user's state for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobView {
    pub job: Job,
    pub is_applied: bool,
    pub is_saved: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserJobState {
    applied: HashSet<i64>,
    saved: HashSet<i64>,
    /// False until the saved set has come from the server at least once.
    saved_known: bool,
}

impl UserJobState {
    pub fn new(applied: HashSet<i64>, saved: HashSet<i64>) -> Self {
        Self {
            applied,
            saved,
            saved_known: true,
        }
    }

    /// Whether `is_saved` reflects the server or is only a guess.
    pub fn saved_known(&self) -> bool {
        self.saved_known
    }

    pub fn is_applied(&self, job_id: i64) -> bool {
        self.applied.contains(&job_id)
    }

    pub fn is_saved(&self, job_id: i64) -> bool {
        self.saved.contains(&job_id)
    }

    pub fn set_applied(&mut self, ids: HashSet<i64>) {
        self.applied = ids;
    }

    pub fn set_saved(&mut self, ids: HashSet<i64>) {
        self.saved = ids;
        self.saved_known = true;
    }

    /// Optimistic: recorded on a successful apply, not re-fetched.
    pub fn record_applied(&mut self, job_id: i64) {
        self.applied.insert(job_id);
    }

    /// Flips saved membership and returns the new state.
    pub fn toggle_saved(&mut self, job_id: i64) -> bool {
        if self.saved.remove(&job_id) {
            false
        } else {
            self.saved.insert(job_id);
            true
        }
    }

    /// Drops all per-user state (logout, or a user without these lists).
    pub fn clear(&mut self) {
        self.applied.clear();
        self.saved.clear();
        self.saved_known = false;
    }

    pub fn annotate(&self, jobs: &[Job]) -> Vec<JobView> {
        jobs.iter()
            .map(|job| JobView {
                is_applied: self.is_applied(job.id),
                is_saved: self.is_saved(job.id),
                job: job.clone(),
            })
            .collect()
    }
}
