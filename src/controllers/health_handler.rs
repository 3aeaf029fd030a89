use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::types::api_response::ApiResponse;

/// Liveness payload returned by the health endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub service: String,
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = HealthStatus),
    ),
    tag = "Health",
)]
pub async fn health() -> Response {
    Json(ApiResponse::success(HealthStatus {
        status: String::from("UP"),
        service: String::from("stockroom"),
    }))
    .into_response()
}
