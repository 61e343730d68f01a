//! Local auth session: the access token and signed-in user, persisted as a
//! small JSON file between CLI invocations.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api_client::{JobsApi, LoginResponse, RegistrationRequest};
use crate::errors::AppError;
use crate::models::user::{User, UserRole};
use crate::notice::Notice;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file → signed out. A corrupt file is logged, removed, and
    /// treated as signed out.
    pub async fn load(&self) -> Result<Option<Session>, AppError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::Session(e.to_string())),
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Discarding unreadable session {}: {e}", self.path.display());
                self.clear().await?;
                Ok(None)
            }
        }
    }

    pub async fn save(&self, session: &Session) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Session(e.to_string()))?;
        }
        let body = serde_json::to_string_pretty(session)
            .map_err(|e| AppError::Session(e.to_string()))?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| AppError::Session(e.to_string()))
    }

    pub async fn clear(&self) -> Result<(), AppError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Session(e.to_string())),
        }
    }
}

/// Exchanges credentials for a session and persists it.
/// 401 → invalid credentials, 403 → email not verified.
pub async fn login(
    api: &dyn JobsApi,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<Session, AppError> {
    let response = api.login(email, password).await.map_err(|e| match e.status() {
        Some(401) => AppError::InvalidCredentials,
        Some(403) => AppError::EmailNotVerified,
        _ => AppError::Api(e),
    })?;

    start_session(store, response).await
}

/// First half of sign-up: the backend holds the account as pending and
/// mails a six-digit code to `email`.
pub async fn register(
    api: &dyn JobsApi,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> Result<Notice, AppError> {
    let request = RegistrationRequest {
        name,
        email,
        password,
        role: role.as_str(),
    };
    api.send_verification_code(&request).await?;
    info!("Verification code requested for {email} as {}", role.as_str());

    Ok(Notice::info(
        "Verification Code Sent",
        format!("Check {email} for a six-digit code to verify your account."),
    ))
}

/// Second half of sign-up. A valid code creates the account and signs
/// the user in.
pub async fn verify_email(
    api: &dyn JobsApi,
    store: &SessionStore,
    email: &str,
    code: &str,
) -> Result<Session, AppError> {
    let response = api.verify_email(email, code.trim()).await?;
    start_session(store, response).await
}

async fn start_session(store: &SessionStore, response: LoginResponse) -> Result<Session, AppError> {
    let session = Session {
        access_token: response.access_token,
        user: response.user,
    };
    store.save(&session).await?;
    info!(
        "Signed in as user {} ({}), session at {}",
        session.user.id,
        session.user.role.as_str(),
        store.path().display()
    );
    Ok(session)
}
