use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::MasterData;
use crate::models::location_model::{
    Location, location_add, location_delete, location_get, location_update, locations_by_warehouse,
    locations_page,
};
use crate::pagination::{PageQuery, PageResponse};
use crate::types::api_response::ApiResponse;
use axum::Json;
use axum::debug_handler;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WarehouseQuery {
    /// Warehouse code to look up, exact match
    #[serde(rename = "warehouseCode")]
    pub warehouse_code: String,
}

#[utoipa::path(
    get,
    path = "/api/locations",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of storage locations", body = PageResponse<Location>),
        (status = 400, description = "Invalid page query"),
    ),
    tag = "Locations",
)]
pub async fn locations(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Query(page_query): Query<PageQuery>,
) -> Response {
    let read_lock = db_pool.read().await;
    match locations_page(&read_lock.masters_db, &page_query).await {
        Ok(page) => Json(ApiResponse::success(page)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/locations/search",
    params(WarehouseQuery),
    responses(
        (status = 200, description = "Locations belonging to the warehouse", body = Vec<Location>),
    ),
    tag = "Locations",
)]
pub async fn search_locations(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Query(warehouse_query): Query<WarehouseQuery>,
) -> Response {
    let read_lock = db_pool.read().await;
    match locations_by_warehouse(&read_lock.masters_db, &warehouse_query.warehouse_code).await {
        Ok(locations) => Json(ApiResponse::success(locations)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    responses(
        (status = 200, description = "The location with this id", body = Location),
        (status = 404, description = "No location with this id"),
    ),
    tag = "Locations",
)]
pub async fn get_location(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Path(location_id): Path<String>,
) -> Response {
    let read_lock = db_pool.read().await;
    match location_get(&read_lock.masters_db, &location_id).await {
        Ok(location) => Json(ApiResponse::success(location)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/locations",
    request_body(
        content = Location,
        description = "Storage location to add"
    ),
    responses(
        (status = 201, description = "Added location", body = Location),
        (status = 400, description = "Rejected payload or duplicate id"),
    ),
    tag = "Locations",
)]
pub async fn post_location(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Json(location): Json<Location>,
) -> Response {
    tracing::info!("post location {}", location.location_id);
    let write_lock = db_pool.write().await;
    match location_add(&write_lock.masters_db, location).await {
        Ok(stored) => (
            StatusCode::CREATED,
            Json(ApiResponse::created(stored, "Location created successfully")),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/locations/{id}",
    request_body(
        content = Location,
        description = "New field values; the id in the path wins"
    ),
    responses(
        (status = 200, description = "Updated location", body = Location),
        (status = 400, description = "Rejected payload or unknown id"),
    ),
    tag = "Locations",
)]
#[debug_handler]
pub async fn update_location(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Path(location_id): Path<String>,
    Json(location): Json<Location>,
) -> Response {
    let write_lock = db_pool.write().await;
    match location_update(&write_lock.masters_db, &location_id, location).await {
        Ok(stored) => Json(ApiResponse::success_with_message(
            stored,
            "Location updated successfully",
        ))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/locations/{id}",
    responses(
        (status = 200, description = "Deleted location"),
        (status = 400, description = "Unknown id"),
    ),
    tag = "Locations",
)]
pub async fn delete_location(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Path(location_id): Path<String>,
) -> Response {
    tracing::info!("delete location {location_id}");
    let write_lock = db_pool.write().await;
    match location_delete(&write_lock.masters_db, &location_id).await {
        Ok(()) => Json(ApiResponse::<()>::message_only(
            "Location deleted successfully",
        ))
        .into_response(),
        Err(e) => e.into_response(),
    }
}
