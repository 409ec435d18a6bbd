use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::state::store::StoreError;

/// Errors a request handler can end with
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to render page: {0}")]
    Render(#[from] askama::Error),
}

impl AppError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        AppError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            AppError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}
