use crate::error::TransferError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("Bad Request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Transfer(TransferError::Oversize { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Transfer(TransferError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            AppError::Transfer(TransferError::Staging(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Transfer(TransferError::Authorization(_))
            | AppError::Transfer(TransferError::Transmission(_)) => StatusCode::BAD_GATEWAY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Transfer(e) => e.code(),
            AppError::BadRequest(_) => "BAD_REQUEST",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Upload error: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}
