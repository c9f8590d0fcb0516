use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{debug, error};

use super::dto::ErrorResponse;
use crate::sensors::{validate::ValidationError, StoreError};

pub const INSERT_FAILED: &str = "Failed to add sensor data due to a database error.";
pub const LIST_FAILED: &str = "Failed to retrieve sensor data due to a database error.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid query parameters")]
    InvalidQuery(#[source] QueryRejection),

    #[error("{}", INSERT_FAILED)]
    Insert(#[source] StoreError),

    #[error("{}", LIST_FAILED)]
    List(#[source] StoreError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            ApiError::Insert(_) | ApiError::List(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Storage detail goes to the log only.
        match &self {
            ApiError::Insert(e) => error!(error = %e, "Error inserting sensor data"),
            ApiError::List(e) => error!(error = %e, "Error fetching sensor data"),
            ApiError::Validation(e) => debug!(reason = %e, "Rejected sensor payload"),
            ApiError::InvalidQuery(e) => debug!(reason = %e, "Rejected query parameters"),
        }

        let body = Json(ErrorResponse {
            success: false,
            message: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}
