//! JobHive REST client: the only module that talks HTTP to the backend.
//!
//! Reads (`GET`) retry on 429 and 5xx with exponential backoff. Writes
//! (`POST`) are sent exactly once; a retried apply or save could double up
//! on the server.
use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod wire;

#[cfg(test)]
pub(crate) mod fake;

pub use wire::{ApplyReceipt, LoginResponse, RegistrationRequest, SaveIdKey};

const MAX_RETRIES: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no details"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Gave up after {retries} retries")]
    RateLimited { retries: u32 },
}

impl ApiError {
    /// The backend's own explanation, when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Everything the client needs from the backend. `ApiClient` is the HTTP
/// implementation; tests swap in an in-memory one.
#[async_trait]
pub trait JobsApi: Send + Sync {
    /// Raw job payloads, exactly as the backend sends them.
    async fn fetch_jobs(&self) -> Result<Vec<Value>, ApiError>;

    /// A single job from the detail endpoint.
    async fn fetch_job(&self, job_id: i64) -> Result<Value, ApiError>;

    /// Full payloads of the jobs this seeker has applied to.
    async fn fetch_applied_jobs(&self, seeker_id: i64) -> Result<Vec<Value>, ApiError>;

    async fn fetch_saved_jobs(&self, seeker_id: i64) -> Result<Vec<Value>, ApiError>;

    async fn fetch_applied_job_ids(&self, seeker_id: i64) -> Result<HashSet<i64>, ApiError> {
        Ok(extract_job_ids(&self.fetch_applied_jobs(seeker_id).await?))
    }

    async fn fetch_saved_job_ids(&self, seeker_id: i64) -> Result<HashSet<i64>, ApiError> {
        Ok(extract_job_ids(&self.fetch_saved_jobs(seeker_id).await?))
    }

    async fn save_job(&self, seeker_id: i64, job_id: i64) -> Result<(), ApiError>;

    async fn unsave_job(&self, seeker_id: i64, job_id: i64) -> Result<(), ApiError>;

    async fn fetch_resume(&self, access_token: &str) -> Result<Value, ApiError>;

    async fn apply(
        &self,
        applicant_id: i64,
        job_id: i64,
        resume_snapshot: &Value,
    ) -> Result<ApplyReceipt, ApiError>;

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    async fn send_verification_code(
        &self,
        request: &RegistrationRequest<'_>,
    ) -> Result<(), ApiError>;

    async fn verify_email(&self, email: &str, code: &str) -> Result<LoginResponse, ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Pulls `error` (preferred) or `message` out of a JSON error body.
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.trim().is_empty())
}

/// Collects the `id` of every job object in a list response. Entries without
/// a numeric id are skipped.
fn extract_job_ids(jobs: &[Value]) -> HashSet<i64> {
    jobs.iter()
        .filter_map(|j| j.get("id").and_then(Value::as_i64))
        .collect()
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    save_id_key: SaveIdKey,
    retry_delay: Duration,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        save_id_key: SaveIdKey,
    ) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            save_id_key,
            retry_delay: DEFAULT_RETRY_DELAY,
        })
    }

    /// Overrides the first backoff step (later steps double it).
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET with retry on 429 / 5xx / transport errors.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let mut last_error: Option<ApiError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = self.retry_delay * (1 << (attempt - 1));
                warn!(
                    "GET {} attempt {} failed, retrying after {}ms...",
                    path,
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.get(&url);
            if let Some(token) = bearer {
                request = request.bearer_auth(token);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ApiError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("GET {} returned {}: {}", path, status, body);
                last_error = Some(ApiError::Api {
                    status: status.as_u16(),
                    message: extract_error_message(&body),
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::Api {
                    status: status.as_u16(),
                    message: extract_error_message(&body),
                });
            }

            let body = response.text().await?;
            debug!("GET {} succeeded ({} bytes)", path, body.len());
            return serde_json::from_str(&body).map_err(ApiError::Parse);
        }

        Err(last_error.unwrap_or(ApiError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Single-shot POST with a JSON body.
    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.client.post(self.url(path)).json(body);
        let body = send_once(request, path).await?;
        if body.trim().is_empty() {
            return serde_json::from_value(Value::Null).map_err(ApiError::Parse);
        }
        serde_json::from_str(&body).map_err(ApiError::Parse)
    }

    /// Single-shot POST where only the status counts. A 2xx is success
    /// whatever the body holds.
    async fn post_accepted<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let request = self.client.post(self.url(path)).json(body);
        send_once(request, path).await.map(|_| ())
    }
}

/// Sends without retry and returns the raw body of a 2xx response.
async fn send_once(request: RequestBuilder, path: &str) -> Result<String, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        warn!("POST {} returned {}: {}", path, status, body);
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: extract_error_message(&body),
        });
    }

    debug!("POST {} succeeded with {}", path, status);
    Ok(body)
}

#[async_trait]
impl JobsApi for ApiClient {
    async fn fetch_jobs(&self) -> Result<Vec<Value>, ApiError> {
        self.get_json("/api/jobs", None).await
    }

    async fn fetch_job(&self, job_id: i64) -> Result<Value, ApiError> {
        self.get_json(&format!("/api/jobs/{job_id}"), None).await
    }

    async fn fetch_applied_jobs(&self, seeker_id: i64) -> Result<Vec<Value>, ApiError> {
        self.get_json(&format!("/api/job-seeker/{seeker_id}/applied-jobs"), None)
            .await
    }

    async fn fetch_saved_jobs(&self, seeker_id: i64) -> Result<Vec<Value>, ApiError> {
        self.get_json(&format!("/api/job-seeker/{seeker_id}/saved-jobs"), None)
            .await
    }

    async fn save_job(&self, seeker_id: i64, job_id: i64) -> Result<(), ApiError> {
        let body = self.save_id_key.body(job_id, seeker_id);
        self.post_accepted("/api/save", &body).await
    }

    async fn unsave_job(&self, seeker_id: i64, job_id: i64) -> Result<(), ApiError> {
        let body = self.save_id_key.body(job_id, seeker_id);
        self.post_accepted("/api/unsave", &body).await
    }

    async fn fetch_resume(&self, access_token: &str) -> Result<Value, ApiError> {
        self.get_json("/api/resume", Some(access_token)).await
    }

    async fn apply(
        &self,
        applicant_id: i64,
        job_id: i64,
        resume_snapshot: &Value,
    ) -> Result<ApplyReceipt, ApiError> {
        let body = wire::ApplyRequest {
            applicant_id,
            job_id,
            resume_snapshot,
        };
        self.post_json("/api/apply", &body).await
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = wire::LoginRequest { email, password };
        self.post_json("/api/login", &body).await
    }

    async fn send_verification_code(
        &self,
        request: &RegistrationRequest<'_>,
    ) -> Result<(), ApiError> {
        self.post_accepted("/api/send-verification-code", request)
            .await
    }

    async fn verify_email(&self, email: &str, code: &str) -> Result<LoginResponse, ApiError> {
        let body = wire::VerifyEmailRequest { email, code };
        self.post_json("/api/verify-email", &body).await
    }
}
