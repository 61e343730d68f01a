//! Request and response bodies exchanged with the JobHive backend.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::user::User;

/// Which key carries the seeker id in save / unsave bodies.
///
/// Two shapes exist in the wild: `{job_id, seeker_id}` (what the backend
/// reads) and `{job_id, user_id}`. Both are kept selectable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveIdKey {
    #[default]
    SeekerId,
    UserId,
}

impl SaveIdKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveIdKey::SeekerId => "seeker_id",
            SaveIdKey::UserId => "user_id",
        }
    }

    pub fn body(&self, job_id: i64, seeker_id: i64) -> Value {
        let mut body = json!({ "job_id": job_id });
        body[self.as_str()] = json!(seeker_id);
        body
    }
}

impl FromStr for SaveIdKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "seeker_id" => Ok(SaveIdKey::SeekerId),
            "user_id" => Ok(SaveIdKey::UserId),
            other => Err(format!("unknown save id key '{other}' (expected seeker_id or user_id)")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApplyRequest<'a> {
    pub applicant_id: i64,
    pub job_id: i64,
    pub resume_snapshot: &'a Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplyReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub application_id: Option<i64>,
    #[serde(default)]
    pub applied_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Starts a registration; the backend mails a six-digit code.
#[derive(Debug, Serialize)]
pub struct RegistrationRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Serialize)]
pub struct VerifyEmailRequest<'a> {
    pub email: &'a str,
    pub code: &'a str,
}

/// Token and user from a successful login or email verification.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub access_token: String,
    pub user: User,
}
