pub mod customer_model;
pub mod location_model;
pub mod product_model;
