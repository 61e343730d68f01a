use thiserror::Error;

use crate::api_client::ApiError;
use crate::models::user::UserRole;
use crate::notice::Notice;

pub const LOGIN_ROUTE: &str = "/login";

/// Application-level error type.
/// Every failure is caught at the operation boundary and turned into a
/// `Notice` (plus an optional redirect) by the caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Requires the {} role", required.as_str())]
    WrongRole { required: UserRole },

    #[error("Resume is missing or empty")]
    ResumeMissing,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email address is not verified")]
    EmailNotVerified,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Where the user should be sent after this failure, if anywhere.
    pub fn redirect(&self) -> Option<&'static str> {
        match self {
            AppError::NotAuthenticated => Some(LOGIN_ROUTE),
            _ => None,
        }
    }

    /// Maps the failure to the message shown to the user.
    pub fn notice(&self) -> Notice {
        match self {
            AppError::NotAuthenticated => {
                Notice::info("Authentication Required", "Please log in to continue.")
            }
            AppError::WrongRole { .. } => Notice::destructive(
                "Only students can do this",
                "Use a student account to apply for or save jobs.",
            ),
            AppError::ResumeMissing => Notice::info(
                "Resume Missing",
                "Please complete your resume before applying.",
            ),
            AppError::InvalidCredentials => {
                Notice::destructive("Login Failed", "Invalid email or password.")
            }
            AppError::EmailNotVerified => Notice::destructive(
                "Email Not Verified",
                "Please verify your email before logging in.",
            ),
            AppError::NotFound(msg) => Notice::destructive("Not Found", msg.clone()),
            AppError::Api(e) => {
                tracing::error!("API error: {e}");
                let description = e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| "Something went wrong. Please try again.".to_string());
                Notice::destructive("Error", description)
            }
            AppError::Session(msg) => {
                tracing::error!("Session error: {msg}");
                Notice::destructive("Error", "Your session could not be read or stored.")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                Notice::destructive("Error", "An internal error occurred.")
            }
        }
    }
}
