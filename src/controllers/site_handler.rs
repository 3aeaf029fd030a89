use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::MasterData;
use crate::models::customer_model::CUSTOMERS;
use crate::models::location_model::LOCATIONS;
use crate::models::product_model::PRODUCTS;
use crate::pagination::count_all;
use crate::types::error::MasterErr;
use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use sqlx::{Pool, Postgres};

/// Fall back handler
///
/// This function is a handler for requests that do not match any other route.
///
/// # Returns
/// `Response` with a status code of 404 Not Found.
pub async fn handler_404() -> Response {
    (StatusCode::NOT_FOUND, "404 Not Found").into_response()
}

#[derive(Template, Debug)]
#[template(path = "index.html")]
/// Dashboard template with one count per master table.
struct IndexTemplate {
    customers: i64,
    products: i64,
    locations: i64,
}

async fn master_counts(db_pool: &Pool<Postgres>) -> Result<IndexTemplate, MasterErr> {
    Ok(IndexTemplate {
        customers: count_all(db_pool, &CUSTOMERS).await?,
        products: count_all(db_pool, &PRODUCTS).await?,
        locations: count_all(db_pool, &LOCATIONS).await?,
    })
}

/// Index handler
///
/// Renders the dashboard page with the size of each master table.
///
/// # Returns
/// `Response` with the rendered HTML page or an error status code.
///
/// # Errors
/// If the counts cannot be read or the template fails to render, an internal
/// server error status code is returned.
pub async fn index_handler(State(db_pool): State<Arc<RwLock<MasterData>>>) -> Response {
    let read_lock = db_pool.read().await;
    match master_counts(&read_lock.masters_db).await {
        Ok(template) => match template.render() {
            Ok(html) => Html(html).into_response(),
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        },
        Err(e) => {
            tracing::error!("dashboard counts failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
