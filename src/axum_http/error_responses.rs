use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::application::errors::UseCaseError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Upstream(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::AuthenticationRequired | AppError::InvalidCredentials(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UseCaseError> for AppError {
    fn from(err: UseCaseError) -> Self {
        let message = err.to_string();
        match err {
            UseCaseError::Validation(_) => AppError::Validation(message),
            UseCaseError::NotFound(_) => AppError::NotFound(capitalize(&message)),
            UseCaseError::Forbidden => AppError::Forbidden(message),
            UseCaseError::InvalidCredentials => AppError::InvalidCredentials(message),
            UseCaseError::InvalidTransition { .. } => AppError::Conflict(message),
            UseCaseError::Upstream(detail) => AppError::Upstream(detail),
            UseCaseError::Internal(err) => AppError::Internal(err),
        }
    }
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        // Internal detail is logged, never sent to the client.
        if let AppError::Internal(err) = &self {
            tracing::error!(error = ?err, "http: internal error");
        }
        let message = self.to_string();

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

/// Turns a JSON extraction failure into a 400 with the usual error body.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| {
            AppError::Validation(format!("Invalid JSON body: {}", rejection.body_text()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn use_case_errors_keep_their_status() {
        let cases = [
            (UseCaseError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (UseCaseError::NotFound("creator"), StatusCode::NOT_FOUND),
            (UseCaseError::Forbidden, StatusCode::FORBIDDEN),
            (UseCaseError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (UseCaseError::Upstream("x".into()), StatusCode::BAD_GATEWAY),
            (
                UseCaseError::Internal(anyhow::anyhow!("db")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(AppError::from(err).status_code(), status);
        }
    }

    #[test]
    fn not_found_message_is_capitalised() {
        let err = AppError::from(UseCaseError::NotFound("creator"));
        assert_eq!(err.to_string(), "Creator not found");
    }

    #[test]
    fn internal_detail_is_hidden() {
        let err = AppError::from(UseCaseError::Internal(anyhow::anyhow!("password=hunter2")));
        assert_eq!(err.to_string(), "Internal server error");
    }
}
