// API-facing error type
use crate::errors::internal::{CredentialError, InternalError, RecordError, StoreError};
use poem_openapi::{payload::Json, ApiResponse, Object};
use std::fmt;

/// Standardized error body returned by every endpoint
#[derive(Object, Debug, Clone)]
pub struct ErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Missing or malformed input, or a duplicate email
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Missing, invalid or expired token, or bad credentials
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Authenticated caller lacks the required role
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
    })
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::BadRequest(body("validation_error", message, 400))
    }

    pub fn duplicate_email() -> Self {
        ApiError::BadRequest(body("conflict", "User with this email already exists.", 400))
    }

    /// Profile update whose new email belongs to someone else
    pub fn email_in_use() -> Self {
        ApiError::BadRequest(body("conflict", "Email is already in use by another user.", 400))
    }

    pub fn invalid_credentials() -> Self {
        ApiError::Unauthorized(body("invalid_credentials", "Invalid credentials.", 401))
    }

    pub fn incorrect_password() -> Self {
        ApiError::Unauthorized(body("incorrect_password", "Kata sandi lama salah.", 401))
    }

    pub fn not_logged_in() -> Self {
        ApiError::Unauthorized(body(
            "not_logged_in",
            "You are not logged in! Please log in to get access.",
            401,
        ))
    }

    pub fn invalid_token() -> Self {
        ApiError::Unauthorized(body(
            "invalid_token",
            "Invalid token or session has expired.",
            401,
        ))
    }

    pub fn subject_gone() -> Self {
        ApiError::Unauthorized(body(
            "user_no_longer_exists",
            "The user belonging to this token does no longer exist.",
            401,
        ))
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden(body(
            "forbidden",
            "You do not have permission to perform this action.",
            403,
        ))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(body("not_found", message, 404))
    }

    pub fn record_not_found() -> Self {
        Self::not_found("Data tidak ditemukan.")
    }

    pub fn user_not_found() -> Self {
        Self::not_found("User not found.")
    }

    /// Convert InternalError to ApiError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Dependency failures are logged in full and surface as a generic 500.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Record(RecordError::Validation { message }) => {
                tracing::debug!("Validation failed: {}", message);
                Self::validation(message.clone())
            }
            InternalError::Record(RecordError::NotFound { table, id }) => {
                tracing::debug!("Record {} not found in {}", id, table);
                Self::record_not_found()
            }
            InternalError::Credential(CredentialError::DuplicateEmail(email)) => {
                tracing::warn!("Duplicate email attempt: {}", email);
                Self::duplicate_email()
            }
            InternalError::Credential(CredentialError::UserNotFound(id)) => {
                tracing::debug!("User {} not found", id);
                Self::user_not_found()
            }
            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::invalid_credentials()
            }
            InternalError::Credential(CredentialError::IncorrectPassword) => {
                tracing::debug!("Incorrect current password for password change");
                Self::incorrect_password()
            }
            InternalError::Credential(CredentialError::MissingToken) => Self::not_logged_in(),
            InternalError::Credential(CredentialError::InvalidToken { reason }) => {
                tracing::debug!("Invalid token: {}", reason);
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::ExpiredToken) => {
                tracing::debug!("Expired token");
                Self::invalid_token()
            }
            InternalError::Credential(CredentialError::SubjectGone { user_id }) => {
                tracing::debug!("Token subject {} no longer exists", user_id);
                Self::subject_gone()
            }
            InternalError::Credential(CredentialError::Forbidden { role }) => {
                tracing::debug!("Role {} denied", role);
                Self::forbidden()
            }
            InternalError::Store(StoreError::NotFound { target }) => {
                tracing::warn!("Tabular store target missing: {}", target);
                Self::record_not_found()
            }
            InternalError::Store(store_err) => {
                tracing::error!("Tabular store failure: {}", store_err);
                Self::internal_server_error()
            }
            _ => {
                tracing::error!("Unexpected internal error: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Generic 500 that never exposes internal details
    pub fn internal_server_error() -> Self {
        ApiError::InternalError(body("internal_error", "An internal error occurred", 500))
    }

    fn response(&self) -> &ErrorResponse {
        match self {
            ApiError::BadRequest(json)
            | ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }

    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
