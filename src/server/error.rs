use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::RecapError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("Not Found")]
    NotFound,

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Service(#[from] RecapError),
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Multipart(err) => err.status(),
            Self::Service(RecapError::Transcript(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Service(RecapError::Llm(_)) => StatusCode::BAD_GATEWAY,
            Self::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Multipart(err) => err.body_text(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(status = %status.as_u16(), error = %message, "request_failed");
        } else {
            tracing::debug!(status = %status.as_u16(), error = %message, "request_rejected");
        }

        let body = Json(ErrorResponse {
            errors: vec![message],
        });

        (status, body).into_response()
    }
}
