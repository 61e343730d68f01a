//! Owns the filter state and the derived displayed list.
//!
//! Any change to the filters or to the job collection recomputes
//! filter → sort → slice synchronously.

use tracing::debug;

use crate::listings::filters::{apply_filters, FilterDefaults, FilterState, FilterUpdate};
use crate::listings::paginate::{paginate, DisplayMode};
use crate::listings::sort::sort_by_recency;
use crate::models::job::Job;

#[derive(Debug, Clone)]
pub struct FilterController {
    defaults: FilterDefaults,
    filters: FilterState,
    jobs: Vec<Job>,
    mode: DisplayMode,
    /// Filtered and sorted, before slicing.
    matched: Vec<Job>,
}

impl FilterController {
    pub fn new(defaults: FilterDefaults, mode: DisplayMode) -> Self {
        let filters = FilterState::from_defaults(&defaults);
        Self {
            defaults,
            filters,
            jobs: Vec::new(),
            mode,
            matched: Vec::new(),
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Jobs to render: filtered, newest first, sliced for the display mode.
    pub fn displayed(&self) -> &[Job] {
        paginate(&self.matched, self.mode)
    }

    /// Total number of matches before slicing.
    pub fn match_count(&self) -> usize {
        self.matched.len()
    }

    /// Externally supplied defaults win over local edits: when they differ
    /// from the last ones seen, the filter state is reset to them.
    /// Returns whether a reset happened.
    pub fn set_defaults(&mut self, defaults: FilterDefaults) -> bool {
        if defaults == self.defaults {
            return false;
        }
        self.filters = FilterState::from_defaults(&defaults);
        self.defaults = defaults;
        self.recompute();
        true
    }

    /// Changes exactly one dimension.
    pub fn update(&mut self, update: FilterUpdate) {
        self.filters.apply_update(update);
        self.recompute();
    }

    /// Every dimension back to its "all" sentinel.
    pub fn reset(&mut self) {
        self.filters = FilterState::default();
        self.recompute();
    }

    pub fn set_jobs(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
        self.recompute();
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    /// Optimistic local flag after a successful apply.
    pub fn mark_applied(&mut self, job_id: i64) {
        for job in self.jobs.iter_mut().chain(self.matched.iter_mut()) {
            if job.id == job_id {
                job.is_applied = true;
            }
        }
    }

    fn recompute(&mut self) {
        let mut matched = apply_filters(&self.jobs, &self.filters);
        sort_by_recency(&mut matched);
        debug!(
            "Recomputed listings: {} of {} jobs match",
            matched.len(),
            self.jobs.len()
        );
        self.matched = matched;
    }
}
