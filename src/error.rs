use axum::http::StatusCode;
use axum::response::{ IntoResponse, Response };
use axum::Json;
use log::error;
use thiserror::Error;

use crate::llm::gateway::GatewayError;
use crate::models::api::ErrorResponse;
use crate::store::StoreError;

/// Failures surfaced by the HTTP API. Every variant renders as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] GatewayError),

    #[error("{0}")]
    Upload(String),

    #[error("File upload failed: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::Provider(GatewayError::UnknownModel(_)) => StatusCode::BAD_REQUEST,
            ApiError::Provider(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, Json(ErrorResponse { detail: self.to_string() })).into_response()
    }
}
