use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::types::api_response::ApiResponse;

/// An enumeration of the ways a master-data operation can fail.
///
/// # Variants
/// - `InvalidQuery` - malformed page window (non-positive size, negative page)
/// - `Validation` - rejected entity payload, duplicate key on create, missing
///   key on update/delete
/// - `NotFound` - a read by key matched nothing
/// - `Store` - the database could not be reached or rejected the statement
#[derive(Debug, thiserror::Error)]
pub enum MasterErr {
    #[error("{0}")]
    InvalidQuery(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    Store(#[from] sqlx::Error),
}

impl MasterErr {
    pub fn status(&self) -> StatusCode {
        match self {
            MasterErr::InvalidQuery(_) | MasterErr::Validation(_) => StatusCode::BAD_REQUEST,
            MasterErr::NotFound(_) => StatusCode::NOT_FOUND,
            MasterErr::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            MasterErr::InvalidQuery(_) => "Invalid query",
            MasterErr::Validation(_) => "Validation failed",
            MasterErr::NotFound(_) => "Not found",
            MasterErr::Store(_) => "Internal Server Error",
        }
    }
}

/// Converts a `MasterErr` into an envelope-shaped HTTP response.
impl IntoResponse for MasterErr {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        }
        let body =
            ApiResponse::<()>::failure(status.as_u16(), self.message(), self.to_string());
        (status, Json(body)).into_response()
    }
}
