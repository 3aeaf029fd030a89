use crate::config::MasterData;
use crate::controllers::{
    customers_handler::{
        customers, delete_customer, get_customer, post_customer, search_customers, update_customer,
    },
    health_handler::health,
    locations_handler::{
        delete_location, get_location, locations, post_location, search_locations, update_location,
    },
    products_handler::{
        delete_product, get_product, post_product, products, search_products, update_product,
    },
};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Returns a router with all the routes for the API
///
/// This function returns a router with all the routes for the API. It
/// includes the CRUD and search routes for customers, products, and storage
/// locations, plus the health probe.
///
/// # Returns
/// A router with all the routes for the API
pub fn get_routes() -> Router<Arc<RwLock<MasterData>>> {
    Router::new()
        .route("/customers", get(customers))
        .route("/customers", post(post_customer))
        .route("/customers/search", get(search_customers))
        .route("/customers/{id}", get(get_customer))
        .route("/customers/{id}", put(update_customer))
        .route("/customers/{id}", delete(delete_customer))
        .route("/products", get(products))
        .route("/products", post(post_product))
        .route("/products/search", get(search_products))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}", put(update_product))
        .route("/products/{id}", delete(delete_product))
        .route("/locations", get(locations))
        .route("/locations", post(post_location))
        .route("/locations/search", get(search_locations))
        .route("/locations/{id}", get(get_location))
        .route("/locations/{id}", put(update_location))
        .route("/locations/{id}", delete(delete_location))
        .route("/health", get(health))
}
