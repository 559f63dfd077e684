//! Application error type and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::forms::FormError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),

    #[error("session middleware is not installed")]
    SessionMissing,

    #[error("invalid form submission: {0}")]
    BadForm(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadForm(_) => StatusCode::BAD_REQUEST,
            AppError::Form(_) | AppError::Template(_) | AppError::SessionMissing => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "Request failed");
            (status, "Internal Server Error").into_response()
        } else {
            tracing::warn!(error = %self, "Request rejected");
            (status, self.to_string()).into_response()
        }
    }
}
