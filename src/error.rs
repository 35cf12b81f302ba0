//! API error taxonomy and its uniform JSON envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("resource not found")]
    NotFound,
    #[error("unprocessable")]
    Unprocessable,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("internal server error")]
    Internal,
}

/// `{ success: false, error: <code>, message: <text> }`
#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn envelope(&self) -> ErrorOut {
        ErrorOut {
            success: false,
            error: self.status().as_u16(),
            message: self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        error!(target: "questions", error = %e, "Store call failed");
        ApiError::Unprocessable
    }
}
