use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_objects::enums::purchase_statuses::PurchaseStatus;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("you do not own this room")]
    Forbidden,
    #[error("Incorrect password")]
    InvalidCredentials,
    #[error("purchase cannot move from {from} to {to}")]
    InvalidTransition {
        from: PurchaseStatus,
        to: PurchaseStatus,
    },
    #[error("upstream service failed: {0}")]
    Upstream(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UseCaseError::Validation(_) => StatusCode::BAD_REQUEST,
            UseCaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UseCaseError::Forbidden => StatusCode::FORBIDDEN,
            UseCaseError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UseCaseError::InvalidTransition { .. } => StatusCode::CONFLICT,
            UseCaseError::Upstream(_) => StatusCode::BAD_GATEWAY,
            UseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UseCaseError>;

/// Parses a required id coming from a request body, query or path.
pub fn parse_id(raw: Option<&str>, field: &str) -> UseCaseResult<Uuid> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(UseCaseError::Validation(format!("{field} is required")));
    }
    Uuid::parse_str(raw).map_err(|_| UseCaseError::Validation(format!("{field} must be a UUID")))
}

/// Trimmed, non-empty value or a validation error naming `field`.
pub fn require_text(raw: Option<&str>, field: &str) -> UseCaseResult<String> {
    match raw.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(UseCaseError::Validation(format!("{field} is required"))),
    }
}
