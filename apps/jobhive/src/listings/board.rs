//! Wires the REST client, the filter controller and the
//! applied/saved overlay together.
//!
//! Reads run concurrently and degrade silently: a failed fetch is logged and
//! leaves its collection as it was. Writes are gated on auth and role before
//! any request goes out and are applied locally only after the server
//! accepts them. Local state is reconciled with the server on the next
//! `load`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{error, info, warn};

use crate::api_client::{ApiError, JobsApi};
use crate::errors::AppError;
use crate::listings::controller::FilterController;
use crate::listings::filters::{FilterDefaults, FilterUpdate};
use crate::listings::normalizer::{normalize_job, normalize_jobs};
use crate::listings::overlay::{JobView, UserJobState};
use crate::listings::paginate::DisplayMode;
use crate::listings::sort::sort_by_recency;
use crate::models::user::{User, UserRole};
use crate::notice::Notice;
use crate::session::Session;

/// Monotonic request generation. A response is applied only if no newer
/// generation started while it was in flight.
#[derive(Debug, Clone, Default)]
pub struct RequestGeneration(Arc<AtomicU64>);

impl RequestGeneration {
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    /// Starts a new generation, invalidating every older one.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }
}

/// Collapses a burst of search keystrokes into the last one.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    latest: RequestGeneration,
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: RequestGeneration::default(),
        }
    }

    /// Waits out the delay; yields `text` only if no newer input arrived
    /// in the meantime.
    pub async fn settle(&self, text: String) -> Option<String> {
        let ticket = self.latest.advance();
        tokio::time::sleep(self.delay).await;
        self.latest.is_current(ticket).then_some(text)
    }
}

/// The seeker's own job lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekerList {
    Applied,
    Saved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load or an explicit invalidation superseded this one.
    Stale,
}

pub struct JobBoard {
    api: Arc<dyn JobsApi>,
    session: Option<Session>,
    controller: FilterController,
    overlay: UserJobState,
    generation: RequestGeneration,
    debouncer: SearchDebouncer,
}

impl JobBoard {
    pub fn new(
        api: Arc<dyn JobsApi>,
        session: Option<Session>,
        defaults: FilterDefaults,
        mode: DisplayMode,
        search_debounce: Duration,
    ) -> Self {
        Self {
            api,
            session,
            controller: FilterController::new(defaults, mode),
            overlay: UserJobState::default(),
            generation: RequestGeneration::default(),
            debouncer: SearchDebouncer::new(search_debounce),
        }
    }

    pub fn controller(&self) -> &FilterController {
        &self.controller
    }

    pub fn overlay(&self) -> &UserJobState {
        &self.overlay
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Handle for invalidating in-flight reads from elsewhere.
    pub fn generation(&self) -> RequestGeneration {
        self.generation.clone()
    }

    pub fn debouncer(&self) -> SearchDebouncer {
        self.debouncer.clone()
    }

    /// Swaps the signed-in user. Per-user state from a different user is
    /// dropped and any in-flight read is invalidated.
    pub fn set_session(&mut self, session: Option<Session>) {
        let same_user = match (&self.session, &session) {
            (Some(a), Some(b)) => a.user.id == b.user.id,
            (None, None) => true,
            _ => false,
        };
        if !same_user {
            self.overlay.clear();
            self.invalidate();
        }
        self.session = session;
    }

    /// Makes every in-flight read stale.
    pub fn invalidate(&mut self) {
        self.generation.advance();
    }

    fn job_seeker(&self) -> Option<&User> {
        self.session
            .as_ref()
            .map(|s| &s.user)
            .filter(|u| u.is_role(UserRole::JobSeeker))
    }

    /// True when the signed-in user may save jobs.
    pub fn can_save(&self) -> bool {
        self.job_seeker().is_some()
    }

    /// Fetches the job feed and, for a job seeker, the applied and saved
    /// lists. The three requests are independent and may finish in any
    /// order; a failed one leaves its collection unchanged.
    pub async fn load(&mut self) -> LoadOutcome {
        let generation = self.generation.advance();
        let seeker_id = self.job_seeker().map(|u| u.id);
        let api = Arc::clone(&self.api);

        let (jobs, applied, saved) = tokio::join!(
            api.fetch_jobs(),
            async {
                match seeker_id {
                    Some(id) => Some(api.fetch_applied_job_ids(id).await),
                    None => None,
                }
            },
            async {
                match seeker_id {
                    Some(id) => Some(api.fetch_saved_job_ids(id).await),
                    None => None,
                }
            },
        );

        if !self.generation.is_current(generation) {
            warn!("Dropping stale listings response (generation {generation})");
            return LoadOutcome::Stale;
        }

        match jobs {
            Ok(raw) => {
                let jobs = normalize_jobs(&raw);
                info!("Loaded {} jobs", jobs.len());
                self.controller.set_jobs(jobs);
            }
            Err(e) => error!("Error fetching jobs: {e}"),
        }
        match applied {
            Some(Ok(ids)) => self.overlay.set_applied(ids),
            Some(Err(e)) => error!("Failed to load applied jobs: {e}"),
            None => {}
        }
        match saved {
            Some(Ok(ids)) => self.overlay.set_saved(ids),
            Some(Err(e)) => error!("Error loading saved jobs: {e}"),
            None => {}
        }

        LoadOutcome::Applied
    }

    pub fn set_defaults(&mut self, defaults: FilterDefaults) -> bool {
        self.controller.set_defaults(defaults)
    }

    pub fn update_filter(&mut self, update: FilterUpdate) {
        self.controller.update(update);
    }

    pub fn reset_filters(&mut self) {
        self.controller.reset();
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.controller.set_mode(mode);
    }

    /// Applies a search that already went through `debouncer().settle`.
    /// Settling borrows nothing from the board, so several keystrokes can
    /// wait concurrently and only the last one reaches here.
    pub fn apply_search(&mut self, text: String) {
        self.controller.update(FilterUpdate::Search(text));
    }

    /// The displayed jobs with applied/saved markers.
    pub fn view(&self) -> Vec<JobView> {
        self.overlay.annotate(self.controller.displayed())
    }

    /// Checks auth and role before any request is made.
    fn require_job_seeker(&self) -> Result<(i64, String), AppError> {
        let session = self.session.as_ref().ok_or(AppError::NotAuthenticated)?;
        if !session.user.is_role(UserRole::JobSeeker) {
            return Err(AppError::WrongRole {
                required: UserRole::JobSeeker,
            });
        }
        Ok((session.user.id, session.access_token.clone()))
    }

    /// Applies to `job_id` with the seeker's current resume.
    pub async fn apply(&mut self, job_id: i64) -> Result<Notice, AppError> {
        let (seeker_id, token) = self.require_job_seeker()?;

        let resume = self.api.fetch_resume(&token).await?;
        if is_empty_snapshot(&resume) {
            return Err(AppError::ResumeMissing);
        }

        let receipt = self.api.apply(seeker_id, job_id, &resume).await?;

        self.overlay.record_applied(job_id);
        self.controller.mark_applied(job_id);
        info!(
            "Applied to job {job_id} as seeker {seeker_id} (application {:?}, at {:?})",
            receipt.application_id, receipt.applied_at
        );

        Ok(Notice::info(
            "Application Submitted",
            receipt
                .message
                .unwrap_or_else(|| "Your application has been submitted successfully!".to_string()),
        ))
    }

    /// Saves the job, or unsaves it when it is already saved.
    pub async fn toggle_save(&mut self, job_id: i64) -> Result<Notice, AppError> {
        let (seeker_id, _) = self.require_job_seeker()?;

        // The endpoint depends on current membership; never guess it.
        if !self.overlay.saved_known() {
            let ids = self.api.fetch_saved_job_ids(seeker_id).await?;
            self.overlay.set_saved(ids);
        }

        let was_saved = self.overlay.is_saved(job_id);
        if was_saved {
            self.api.unsave_job(seeker_id, job_id).await?;
        } else {
            self.api.save_job(seeker_id, job_id).await?;
        }
        self.overlay.toggle_saved(job_id);
        info!(
            "Job {job_id} {} for seeker {seeker_id}",
            if was_saved { "unsaved" } else { "saved" }
        );

        Ok(if was_saved {
            Notice::info("Job Unsaved", "This job was removed from your saved list.")
        } else {
            Notice::info("Job Saved", "This job has been saved.")
        })
    }

    /// One job from the detail endpoint, marked for the signed-in seeker.
    /// The user's lists are best-effort; a missing job is `NotFound`.
    pub async fn show(&mut self, job_id: i64) -> Result<JobView, AppError> {
        let seeker_id = self.job_seeker().map(|u| u.id);
        let api = Arc::clone(&self.api);

        let (job, applied, saved) = tokio::join!(
            api.fetch_job(job_id),
            async {
                match seeker_id {
                    Some(id) => Some(api.fetch_applied_job_ids(id).await),
                    None => None,
                }
            },
            async {
                match seeker_id {
                    Some(id) => Some(api.fetch_saved_job_ids(id).await),
                    None => None,
                }
            },
        );

        let job = job.map_err(|e| not_found_or(e, "Job not found"))?;
        match applied {
            Some(Ok(ids)) => self.overlay.set_applied(ids),
            Some(Err(e)) => error!("Failed to load applied jobs: {e}"),
            None => {}
        }
        match saved {
            Some(Ok(ids)) => self.overlay.set_saved(ids),
            Some(Err(e)) => error!("Error loading saved jobs: {e}"),
            None => {}
        }

        let job = normalize_job(&job);
        Ok(JobView {
            is_applied: self.overlay.is_applied(job.id),
            is_saved: self.overlay.is_saved(job.id),
            job,
        })
    }

    /// The seeker's applied or saved jobs, newest first. Unlike `load`,
    /// a failed read is returned to the caller. The fetched list also
    /// replaces the matching overlay set.
    pub async fn seeker_jobs(&mut self, list: SeekerList) -> Result<Vec<JobView>, AppError> {
        let (seeker_id, _) = self.require_job_seeker()?;

        let raw = match list {
            SeekerList::Applied => self.api.fetch_applied_jobs(seeker_id).await?,
            SeekerList::Saved => self.api.fetch_saved_jobs(seeker_id).await?,
        };
        let mut jobs = normalize_jobs(&raw);
        sort_by_recency(&mut jobs);

        let ids = jobs.iter().map(|j| j.id).collect();
        match list {
            SeekerList::Applied => self.overlay.set_applied(ids),
            SeekerList::Saved => self.overlay.set_saved(ids),
        }
        info!("Loaded {} {:?} jobs for seeker {seeker_id}", jobs.len(), list);

        Ok(self.overlay.annotate(&jobs))
    }
}

fn not_found_or(e: ApiError, fallback: &str) -> AppError {
    match e.status() {
        Some(404) => AppError::NotFound(e.server_message().unwrap_or(fallback).to_string()),
        _ => AppError::Api(e),
    }
}

/// A resume that is null or has no keys counts as missing.
fn is_empty_snapshot(resume: &Value) -> bool {
    match resume {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
