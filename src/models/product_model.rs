use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Pool, Postgres};
use utoipa::ToSchema;

use crate::pagination::{EntityDescriptor, PageQuery, PageResponse, fetch_page, like_pattern};
use crate::types::error::MasterErr;

/// Listing configuration for the product table.
pub const PRODUCTS: EntityDescriptor = EntityDescriptor {
    table: "product_master",
    key_column: "product_id",
    search_columns: &["product_name", "product_id"],
    sort_keys: &[
        ("productId", "product_id"),
        ("productName", "product_name"),
        ("safetyStock", "safety_stock"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
    default_sort: "created_at",
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
/// Struct representing a product.
///
/// # Fields
/// - `product_id` - The product's identifier (primary key)
/// - `product_name` - The product's display name
/// - `specification` - Free-form spec text (optional)
/// - `unit` - Unit of measure, e.g. "pcs" or "kg"
/// - `safety_stock` - Minimum stock level, 0 when omitted
/// - `created_at`/`updated_at` - Stamped by the server, never by clients
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub specification: Option<String>,
    pub unit: String,
    #[serde(default)]
    pub safety_stock: i32,
    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn validate_product(product: &Product) -> Result<(), MasterErr> {
    if product.product_id.trim().is_empty() {
        return Err(MasterErr::Validation(String::from("product id is required")));
    }
    if product.product_name.trim().is_empty() {
        return Err(MasterErr::Validation(String::from(
            "product name is required",
        )));
    }
    if product.unit.trim().is_empty() {
        return Err(MasterErr::Validation(String::from(
            "product unit is required",
        )));
    }
    if product.safety_stock < 0 {
        return Err(MasterErr::Validation(String::from(
            "safety stock cannot be negative",
        )));
    }
    Ok(())
}

/// Retrieves one page of products.
///
/// # Errors
/// `MasterErr::InvalidQuery` for a malformed page window, `MasterErr::Store`
/// when the query fails.
pub async fn products_page(
    db_pool: &Pool<Postgres>,
    query: &PageQuery,
) -> Result<PageResponse<Product>, MasterErr> {
    fetch_page(db_pool, &PRODUCTS, query).await
}

/// Retrieves a product by its id.
///
/// # Errors
/// `MasterErr::NotFound` when no product has this id, `MasterErr::Store`
/// when the query fails.
pub async fn product_get(db_pool: &Pool<Postgres>, product_id: &str) -> Result<Product, MasterErr> {
    sqlx::query_as::<_, Product>("SELECT * FROM product_master WHERE product_id = $1")
        .bind(product_id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| MasterErr::NotFound(format!("product {product_id} not found")))
}

pub async fn product_exists(db_pool: &Pool<Postgres>, product_id: &str) -> Result<bool, MasterErr> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM product_master WHERE product_id = $1)",
    )
    .bind(product_id)
    .fetch_one(db_pool)
    .await?;
    Ok(exists)
}

/// Searches products by name, case-insensitive substring match.
pub async fn products_search(
    db_pool: &Pool<Postgres>,
    name: &str,
) -> Result<Vec<Product>, MasterErr> {
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM product_master WHERE product_name ILIKE $1 ORDER BY created_at DESC",
    )
    .bind(like_pattern(name.trim()))
    .fetch_all(db_pool)
    .await?;
    Ok(products)
}

/// Adds a new product. Both timestamps are stamped by the database.
///
/// # Returns
/// The stored product, including its timestamps.
///
/// # Errors
/// `MasterErr::Validation` for a missing required field, a negative safety
/// stock, or an id that is already taken; `MasterErr::Store` when the insert
/// fails.
pub async fn product_add(db_pool: &Pool<Postgres>, product: Product) -> Result<Product, MasterErr> {
    validate_product(&product)?;
    if product_exists(db_pool, &product.product_id).await? {
        return Err(MasterErr::Validation(format!(
            "product {} already exists",
            product.product_id
        )));
    }

    let stored = sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO product_master (product_id, product_name, specification, unit, safety_stock, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, now(), now())
        RETURNING *
        "#,
    )
    .bind(&product.product_id)
    .bind(&product.product_name)
    .bind(&product.specification)
    .bind(&product.unit)
    .bind(product.safety_stock)
    .fetch_one(db_pool)
    .await?;

    tracing::info!("created product {}", stored.product_id);
    Ok(stored)
}

/// Updates a product by its id. The id from the path wins over whatever the
/// payload carries; `updated_at` is refreshed, `created_at` is left alone.
///
/// # Errors
/// `MasterErr::Validation` for a rejected payload or an id that does not
/// exist, `MasterErr::Store` when the update fails.
pub async fn product_update(
    db_pool: &Pool<Postgres>,
    product_id: &str,
    mut product: Product,
) -> Result<Product, MasterErr> {
    product.product_id = product_id.to_string();
    validate_product(&product)?;
    if !product_exists(db_pool, product_id).await? {
        return Err(MasterErr::Validation(format!(
            "product {product_id} does not exist"
        )));
    }

    let stored = sqlx::query_as::<_, Product>(
        r#"
        UPDATE product_master
        SET product_name = $2, specification = $3, unit = $4, safety_stock = $5, updated_at = now()
        WHERE product_id = $1
        RETURNING *
        "#,
    )
    .bind(product_id)
    .bind(&product.product_name)
    .bind(&product.specification)
    .bind(&product.unit)
    .bind(product.safety_stock)
    .fetch_one(db_pool)
    .await?;

    tracing::info!("updated product {product_id}");
    Ok(stored)
}

/// Removes a product by its id.
///
/// # Errors
/// `MasterErr::Validation` when no product has this id, `MasterErr::Store`
/// when the delete fails.
pub async fn product_delete(db_pool: &Pool<Postgres>, product_id: &str) -> Result<(), MasterErr> {
    if !product_exists(db_pool, product_id).await? {
        return Err(MasterErr::Validation(format!(
            "product {product_id} does not exist"
        )));
    }

    sqlx::query("DELETE FROM product_master WHERE product_id = $1")
        .bind(product_id)
        .execute(db_pool)
        .await?;

    tracing::info!("deleted product {product_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            product_id: String::from("P0001"),
            product_name: String::from("Pallet jack"),
            specification: Some(String::from("2.5t, 1150mm forks")),
            unit: String::from("pcs"),
            safety_stock: 4,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn a_complete_product_passes_validation() {
        assert!(validate_product(&sample()).is_ok());
    }

    #[test]
    fn id_name_and_unit_are_required() {
        for field in ["id", "name", "unit"] {
            let mut product = sample();
            match field {
                "id" => product.product_id = String::new(),
                "name" => product.product_name = String::from("  "),
                _ => product.unit = String::new(),
            }
            assert!(
                matches!(validate_product(&product), Err(MasterErr::Validation(_))),
                "blank {field} should be rejected"
            );
        }
    }

    #[test]
    fn negative_safety_stock_is_rejected() {
        let mut product = sample();
        product.safety_stock = -1;
        assert!(matches!(
            validate_product(&product),
            Err(MasterErr::Validation(_))
        ));
    }

    #[test]
    fn omitted_safety_stock_defaults_to_zero() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "productId": "P0002",
            "productName": "Stretch film",
            "unit": "roll"
        }))
        .expect("payload deserializes");
        assert_eq!(product.safety_stock, 0);
        assert!(validate_product(&product).is_ok());
    }

    #[test]
    fn safety_stock_is_a_sortable_key() {
        assert_eq!(PRODUCTS.resolve_sort("safetyStock"), "safety_stock");
        assert_eq!(PRODUCTS.resolve_sort("unit"), "created_at");
    }
}
