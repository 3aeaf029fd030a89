use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::MasterData;
use crate::models::customer_model::{
    Customer, customer_add, customer_delete, customer_get, customer_update, customers_page,
    customers_search,
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
    path = "/api/customers",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of customers", body = PageResponse<Customer>),
        (status = 400, description = "Invalid page query"),
    ),
    tag = "Customers",
)]
pub async fn customers(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Query(page_query): Query<PageQuery>,
) -> Response {
    let read_lock = db_pool.read().await;
    match customers_page(&read_lock.masters_db, &page_query).await {
        Ok(page) => Json(ApiResponse::success(page)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/customers/search",
    params(NameQuery),
    responses(
        (status = 200, description = "Customers whose name contains the fragment", body = Vec<Customer>),
    ),
    tag = "Customers",
)]
pub async fn search_customers(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Query(name_query): Query<NameQuery>,
) -> Response {
    let read_lock = db_pool.read().await;
    match customers_search(&read_lock.masters_db, &name_query.name).await {
        Ok(customers) => Json(ApiResponse::success(customers)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    responses(
        (status = 200, description = "The customer with this id", body = Customer),
        (status = 404, description = "No customer with this id"),
    ),
    tag = "Customers",
)]
pub async fn get_customer(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Path(customer_id): Path<String>,
) -> Response {
    let read_lock = db_pool.read().await;
    match customer_get(&read_lock.masters_db, &customer_id).await {
        Ok(customer) => Json(ApiResponse::success(customer)).into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body(
        content = Customer,
        description = "Customer to add"
    ),
    responses(
        (status = 201, description = "Added customer", body = Customer),
        (status = 400, description = "Rejected payload or duplicate id"),
    ),
    tag = "Customers",
)]
pub async fn post_customer(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Json(customer): Json<Customer>,
) -> Response {
    tracing::info!("post customer {}", customer.customer_id);
    let write_lock = db_pool.write().await;
    match customer_add(&write_lock.masters_db, customer).await {
        Ok(stored) => (
            StatusCode::CREATED,
            Json(ApiResponse::created(stored, "Customer created successfully")),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    request_body(
        content = Customer,
        description = "New field values; the id in the path wins"
    ),
    responses(
        (status = 200, description = "Updated customer", body = Customer),
        (status = 400, description = "Rejected payload or unknown id"),
    ),
    tag = "Customers",
)]
#[debug_handler]
pub async fn update_customer(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Path(customer_id): Path<String>,
    Json(customer): Json<Customer>,
) -> Response {
    let write_lock = db_pool.write().await;
    match customer_update(&write_lock.masters_db, &customer_id, customer).await {
        Ok(stored) => Json(ApiResponse::success_with_message(
            stored,
            "Customer updated successfully",
        ))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    responses(
        (status = 200, description = "Deleted customer"),
        (status = 400, description = "Unknown id"),
    ),
    tag = "Customers",
)]
pub async fn delete_customer(
    State(db_pool): State<Arc<RwLock<MasterData>>>,
    Path(customer_id): Path<String>,
) -> Response {
    tracing::info!("delete customer {customer_id}");
    let write_lock = db_pool.write().await;
    match customer_delete(&write_lock.masters_db, &customer_id).await {
        Ok(()) => Json(ApiResponse::<()>::message_only(
            "Customer deleted successfully",
        ))
        .into_response(),
        Err(e) => e.into_response(),
    }
}
