use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::MasterData;
use crate::models::product_model::{
    Product, product_add, product_delete, product_get, product_update, products_page,
    products_search,
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
pub struct NameQuery {
    /// Name fragment to search for
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of products", body = PageResponse<Product>),
        (status = 400, description = "Invalid page query"),
    ),
    tag = "Products",
)]
pub async fn products(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Query(page_query): Query<PageQuery>,
) -> Response {
    let read_lock = db_pool.read().await;
    match products_page(&read_lock.masters_db, &page_query).await {
        Ok(page) => Json(ApiResponse::success(page)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/products/search",
    params(NameQuery),
    responses(
        (status = 200, description = "Products whose name contains the fragment", body = Vec<Product>),
    ),
    tag = "Products",
)]
pub async fn search_products(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Query(name_query): Query<NameQuery>,
) -> Response {
    let read_lock = db_pool.read().await;
    match products_search(&read_lock.masters_db, &name_query.name).await {
        Ok(products) => Json(ApiResponse::success(products)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    responses(
        (status = 200, description = "The product with this id", body = Product),
        (status = 404, description = "No product with this id"),
    ),
    tag = "Products",
)]
pub async fn get_product(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Path(product_id): Path<String>,
) -> Response {
    let read_lock = db_pool.read().await;
    match product_get(&read_lock.masters_db, &product_id).await {
        Ok(product) => Json(ApiResponse::success(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body(
        content = Product,
        description = "Product to add"
    ),
    responses(
        (status = 201, description = "Added product", body = Product),
        (status = 400, description = "Rejected payload or duplicate id"),
    ),
    tag = "Products",
)]
pub async fn post_product(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Json(product): Json<Product>,
) -> Response {
    tracing::info!("post product {}", product.product_id);
    let write_lock = db_pool.write().await;
    match product_add(&write_lock.masters_db, product).await {
        Ok(stored) => (
            StatusCode::CREATED,
            Json(ApiResponse::created(stored, "Product created successfully")),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    request_body(
        content = Product,
        description = "New field values; the id in the path wins"
    ),
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Rejected payload or unknown id"),
    ),
    tag = "Products",
)]
#[debug_handler]
pub async fn update_product(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Path(product_id): Path<String>,
    Json(product): Json<Product>,
) -> Response {
    let write_lock = db_pool.write().await;
    match product_update(&write_lock.masters_db, &product_id, product).await {
        Ok(stored) => Json(ApiResponse::success_with_message(
            stored,
            "Product updated successfully",
        ))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    responses(
        (status = 200, description = "Deleted product"),
        (status = 400, description = "Unknown id"),
    ),
    tag = "Products",
)]
pub async fn delete_product(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Path(product_id): Path<String>,
) -> Response {
    tracing::info!("delete product {product_id}");
    let write_lock = db_pool.write().await;
    match product_delete(&write_lock.masters_db, &product_id).await {
        Ok(()) => Json(ApiResponse::<()>::message_only(
            "Product deleted successfully",
        ))
        .into_response(),
        Err(e) => e.into_response(),
    }
}
