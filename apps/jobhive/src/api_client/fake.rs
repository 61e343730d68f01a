//! In-memory `JobsApi` for tests. Records every call by name.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ApiError, ApplyReceipt, JobsApi, LoginResponse, RegistrationRequest};
use crate::listings::board::RequestGeneration;
use crate::models::user::User;

#[derive(Default)]
pub struct FakeApi {
    pub jobs: Vec<Value>,
    pub applied: HashSet<i64>,
    pub saved: Mutex<HashSet<i64>>,
    pub resume: Value,
    /// Every read fails with this status.
    pub fail_reads: Option<u16>,
    /// Every write fails with this status and message.
    pub fail_writes: Option<(u16, String)>,
    pub login_user: Option<User>,
    pub login_status: Option<u16>,
    /// The code `verify_email` accepts.
    pub verification_code: Option<String>,
    /// Advanced while the job feed is "in flight".
    pub advance_on_fetch: Option<RequestGeneration>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn read_failure(&self) -> Result<(), ApiError> {
        match self.fail_reads {
            Some(status) => Err(ApiError::Api {
                status,
                message: None,
            }),
            None => Ok(()),
        }
    }

    fn jobs_with_ids(&self, ids: &HashSet<i64>) -> Vec<Value> {
        self.jobs
            .iter()
            .filter(|j| j.get("id").and_then(Value::as_i64).is_some_and(|id| ids.contains(&id)))
            .cloned()
            .collect()
    }

    fn signed_in(&self) -> Result<LoginResponse, ApiError> {
        let user = self.login_user.clone().ok_or(ApiError::Api {
            status: 500,
            message: None,
        })?;
        Ok(LoginResponse {
            message: None,
            access_token: "fake-token".to_string(),
            user,
        })
    }

    fn write_failure(&self) -> Result<(), ApiError> {
        match &self.fail_writes {
            Some((status, message)) => Err(ApiError::Api {
                status: *status,
                message: Some(message.clone()),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl JobsApi for FakeApi {
    async fn fetch_jobs(&self) -> Result<Vec<Value>, ApiError> {
        self.record("fetch_jobs");
        if let Some(generation) = &self.advance_on_fetch {
            generation.advance();
        }
        self.read_failure()?;
        Ok(self.jobs.clone())
    }

    async fn fetch_job(&self, job_id: i64) -> Result<Value, ApiError> {
        self.record(format!("fetch_job:{job_id}"));
        self.read_failure()?;
        self.jobs
            .iter()
            .find(|j| j.get("id").and_then(Value::as_i64) == Some(job_id))
            .cloned()
            .ok_or(ApiError::Api {
                status: 404,
                message: Some("Job not found".to_string()),
            })
    }

    async fn fetch_applied_jobs(&self, seeker_id: i64) -> Result<Vec<Value>, ApiError> {
        self.record(format!("fetch_applied_jobs:{seeker_id}"));
        self.read_failure()?;
        Ok(self.jobs_with_ids(&self.applied))
    }

    async fn fetch_saved_jobs(&self, seeker_id: i64) -> Result<Vec<Value>, ApiError> {
        self.record(format!("fetch_saved_jobs:{seeker_id}"));
        self.read_failure()?;
        let saved = self.saved.lock().unwrap().clone();
        Ok(self.jobs_with_ids(&saved))
    }

    async fn fetch_applied_job_ids(&self, seeker_id: i64) -> Result<HashSet<i64>, ApiError> {
        self.record(format!("fetch_applied:{seeker_id}"));
        self.read_failure()?;
        Ok(self.applied.clone())
    }

    async fn fetch_saved_job_ids(&self, seeker_id: i64) -> Result<HashSet<i64>, ApiError> {
        self.record(format!("fetch_saved:{seeker_id}"));
        self.read_failure()?;
        Ok(self.saved.lock().unwrap().clone())
    }

    async fn save_job(&self, seeker_id: i64, job_id: i64) -> Result<(), ApiError> {
        self.record(format!("save:{seeker_id}:{job_id}"));
        self.write_failure()?;
        self.saved.lock().unwrap().insert(job_id);
        Ok(())
    }

    async fn unsave_job(&self, seeker_id: i64, job_id: i64) -> Result<(), ApiError> {
        self.record(format!("unsave:{seeker_id}:{job_id}"));
        self.write_failure()?;
        self.saved.lock().unwrap().remove(&job_id);
        Ok(())
    }

    async fn fetch_resume(&self, access_token: &str) -> Result<Value, ApiError> {
        self.record(format!("fetch_resume:{access_token}"));
        self.read_failure()?;
        Ok(self.resume.clone())
    }

    async fn apply(
        &self,
        applicant_id: i64,
        job_id: i64,
        _resume_snapshot: &Value,
    ) -> Result<ApplyReceipt, ApiError> {
        self.record(format!("apply:{applicant_id}:{job_id}"));
        self.write_failure()?;
        Ok(ApplyReceipt {
            message: Some("Application submitted successfully".to_string()),
            application_id: Some(1),
            applied_at: None,
        })
    }

    async fn login(&self, email: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        self.record(format!("login:{email}"));
        if let Some(status) = self.login_status {
            return Err(ApiError::Api {
                status,
                message: None,
            });
        }
        self.signed_in()
    }

    async fn send_verification_code(
        &self,
        request: &RegistrationRequest<'_>,
    ) -> Result<(), ApiError> {
        self.record(format!("register:{}:{}", request.email, request.role));
        self.write_failure()
    }

    async fn verify_email(&self, email: &str, code: &str) -> Result<LoginResponse, ApiError> {
        self.record(format!("verify:{email}"));
        if self.verification_code.as_deref() != Some(code) {
            return Err(ApiError::Api {
                status: 400,
                message: Some("Invalid verification code.".to_string()),
            });
        }
        self.signed_in()
    }
}
