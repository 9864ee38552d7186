use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Everything a route can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The measurement table is empty, so there is no date to anchor on.
    #[error("no measurements available")]
    DataUnavailable,

    #[error("invalid {field} date `{value}`: expected YYYY-MM-DD")]
    InvalidDateFormat { field: &'static str, value: String },

    #[error("dataset query failed: {0:#}")]
    Store(#[from] anyhow::Error),

    #[error("query worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::DataUnavailable => StatusCode::NOT_FOUND,
            ApiError::InvalidDateFormat { .. } => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Worker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::debug!("rejecting request: {self}");
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
