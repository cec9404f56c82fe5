use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid category")]
    InvalidCategory,

    #[error("Invalid form data: {0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Database connection failed: {0}")]
    DatabaseConnection(String),

    #[error("Failed to save report: {0}")]
    SaveFailed(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingFields(_)
            | AppError::InvalidEmail
            | AppError::InvalidCategory
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::DatabaseConnection(_) | AppError::SaveFailed(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::DatabaseConnection(ref detail) => {
                tracing::error!("Database connection error: {}", detail);
                self.to_string()
            }
            AppError::SaveFailed(ref detail) => {
                tracing::error!("Report insert failed: {}", detail);
                self.to_string()
            }
            AppError::Internal(ref detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            _ => {
                tracing::debug!("Rejected request: {}", self);
                self.to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
