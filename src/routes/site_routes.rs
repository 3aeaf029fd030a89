use crate::config::MasterData;
use crate::controllers::site_handler::index_handler;
use axum::{Router, routing::get};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Creates a new router with the site routes
///
/// The dashboard page is served at `/`.
///
/// # Returns
/// A Router with the site routes
pub fn get_routes() -> Router<Arc<RwLock<MasterData>>> {
    Router::new().route("/", get(index_handler))
}
