use crate::{
    controllers::{customers_handler, health_handler, locations_handler, products_handler},
    models::{customer_model::Customer, location_model::Location, product_model::Product},
    pagination::PageResponse,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Customers
        customers_handler::customers,
        customers_handler::search_customers,
        customers_handler::get_customer,
        customers_handler::post_customer,
        customers_handler::update_customer,
        customers_handler::delete_customer,
        // Products
        products_handler::products,
        products_handler::search_products,
        products_handler::get_product,
        products_handler::post_product,
        products_handler::update_product,
        products_handler::delete_product,
        // Locations
        locations_handler::locations,
        locations_handler::search_locations,
        locations_handler::get_location,
        locations_handler::post_location,
        locations_handler::update_location,
        locations_handler::delete_location,
        // Health
        health_handler::health,
    ),
    components(
        schemas(
            Customer,
            Product,
            Location,
            PageResponse<Customer>,
            PageResponse<Product>,
            PageResponse<Location>,
            health_handler::HealthStatus,
        )
    ),
    tags(
        (name = "Customers", description = "Customer master endpoints"),
        (name = "Products", description = "Product master endpoints"),
        (name = "Locations", description = "Storage location master endpoints"),
        (name = "Health", description = "Service health endpoints")
    )
)]
pub struct ApiDoc;
