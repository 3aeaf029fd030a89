use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Pool, Postgres};
use utoipa::ToSchema;

use crate::pagination::{EntityDescriptor, PageQuery, PageResponse, fetch_page, like_pattern};
use crate::types::error::MasterErr;

/// Listing configuration for the customer table: the keyword matches name or
/// id, and the external sort keys map onto the columns below.
pub const CUSTOMERS: EntityDescriptor = EntityDescriptor {
    table: "customer_master",
    key_column: "customer_id",
    search_columns: &["customer_name", "customer_id"],
    sort_keys: &[
        ("customerId", "customer_id"),
        ("customerName", "customer_name"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
    default_sort: "created_at",
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
/// Struct representing a customer.
///
/// # Fields
/// - `customer_id` - The customer's identifier (primary key)
/// - `customer_name` - The customer's display name
/// - `address` - Postal address (optional)
/// - `phone` - Phone number (optional)
/// - `created_at`/`updated_at` - Stamped by the server, never by clients
pub struct Customer {
    pub customer_id: String,
    pub customer_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn validate_customer(customer: &Customer) -> Result<(), MasterErr> {
    if customer.customer_id.trim().is_empty() {
        return Err(MasterErr::Validation(String::from(
            "customer id is required",
        )));
    }
    if customer.customer_name.trim().is_empty() {
        return Err(MasterErr::Validation(String::from(
            "customer name is required",
        )));
    }
    Ok(())
}

/// Retrieves one page of customers.
///
/// # Parameters
/// - `db_pool`: The database connection pool
/// - `query`: The decoded page query
///
/// # Errors
/// `MasterErr::InvalidQuery` for a malformed page window, `MasterErr::Store`
/// when the query fails.
pub async fn customers_page(
    db_pool: &Pool<Postgres>,
    query: &PageQuery,
) -> Result<PageResponse<Customer>, MasterErr> {
    fetch_page(db_pool, &CUSTOMERS, query).await
}

/// Retrieves a customer by its id.
///
/// # Errors
/// `MasterErr::NotFound` when no customer has this id, `MasterErr::Store`
/// when the query fails.
pub async fn customer_get(
    db_pool: &Pool<Postgres>,
    customer_id: &str,
) -> Result<Customer, MasterErr> {
    sqlx::query_as::<_, Customer>("SELECT * FROM customer_master WHERE customer_id = $1")
        .bind(customer_id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| MasterErr::NotFound(format!("customer {customer_id} not found")))
}

pub async fn customer_exists(
    db_pool: &Pool<Postgres>,
    customer_id: &str,
) -> Result<bool, MasterErr> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM customer_master WHERE customer_id = $1)",
    )
    .bind(customer_id)
    .fetch_one(db_pool)
    .await?;
    Ok(exists)
}

/// Searches customers by name, case-insensitive substring match.
pub async fn customers_search(
    db_pool: &Pool<Postgres>,
    name: &str,
) -> Result<Vec<Customer>, MasterErr> {
    let customers = sqlx::query_as::<_, Customer>(
        "SELECT * FROM customer_master WHERE customer_name ILIKE $1 ORDER BY created_at DESC",
    )
    .bind(like_pattern(name.trim()))
    .fetch_all(db_pool)
    .await?;
    Ok(customers)
}

/// Adds a new customer. Both timestamps are stamped by the database.
///
/// # Parameters
/// - `db_pool`: The database connection pool
/// - `customer`: The customer to add
///
/// # Returns
/// The stored customer, including its timestamps.
///
/// # Errors
/// `MasterErr::Validation` for a missing required field or an id that is
/// already taken, `MasterErr::Store` when the insert fails.
pub async fn customer_add(
    db_pool: &Pool<Postgres>,
    customer: Customer,
) -> Result<Customer, MasterErr> {
    validate_customer(&customer)?;
    if customer_exists(db_pool, &customer.customer_id).await? {
        return Err(MasterErr::Validation(format!(
            "customer {} already exists",
            customer.customer_id
        )));
    }

    let stored = sqlx::query_as::<_, Customer>(
        r#"
        INSERT INTO customer_master (customer_id, customer_name, address, phone, created_at, updated_at)
        VALUES ($1, $2, $3, $4, now(), now())
        RETURNING *
        "#,
    )
    .bind(&customer.customer_id)
    .bind(&customer.customer_name)
    .bind(&customer.address)
    .bind(&customer.phone)
    .fetch_one(db_pool)
    .await?;

    tracing::info!("created customer {}", stored.customer_id);
    Ok(stored)
}

/// Updates a customer by its id. The id from the path wins over whatever the
/// payload carries; `updated_at` is refreshed, `created_at` is left alone.
///
/// # Errors
/// `MasterErr::Validation` for a missing required field or an id that does
/// not exist, `MasterErr::Store` when the update fails.
pub async fn customer_update(
    db_pool: &Pool<Postgres>,
    customer_id: &str,
    mut customer: Customer,
) -> Result<Customer, MasterErr> {
    customer.customer_id = customer_id.to_string();
    validate_customer(&customer)?;
    if !customer_exists(db_pool, customer_id).await? {
        return Err(MasterErr::Validation(format!(
            "customer {customer_id} does not exist"
        )));
    }

    let stored = sqlx::query_as::<_, Customer>(
        r#"
        UPDATE customer_master
        SET customer_name = $2, address = $3, phone = $4, updated_at = now()
        WHERE customer_id = $1
        RETURNING *
        "#,
    )
    .bind(customer_id)
    .bind(&customer.customer_name)
    .bind(&customer.address)
    .bind(&customer.phone)
    .fetch_one(db_pool)
    .await?;

    tracing::info!("updated customer {customer_id}");
    Ok(stored)
}

/// Removes a customer by its id.
///
/// # Errors
/// `MasterErr::Validation` when no customer has this id, `MasterErr::Store`
/// when the delete fails.
pub async fn customer_delete(db_pool: &Pool<Postgres>, customer_id: &str) -> Result<(), MasterErr> {
    if !customer_exists(db_pool, customer_id).await? {
        return Err(MasterErr::Validation(format!(
            "customer {customer_id} does not exist"
        )));
    }

    sqlx::query("DELETE FROM customer_master WHERE customer_id = $1")
        .bind(customer_id)
        .execute(db_pool)
        .await?;

    tracing::info!("deleted customer {customer_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Customer {
        Customer {
            customer_id: String::from("C0001"),
            customer_name: String::from("Acme Logistics"),
            address: Some(String::from("12 Dock Road")),
            phone: Some(String::from("555-0101")),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn a_complete_customer_passes_validation() {
        assert!(validate_customer(&sample()).is_ok());
    }

    #[test]
    fn blank_id_or_name_is_rejected() {
        let mut missing_id = sample();
        missing_id.customer_id = String::from("   ");
        assert!(matches!(
            validate_customer(&missing_id),
            Err(MasterErr::Validation(_))
        ));

        let mut missing_name = sample();
        missing_name.customer_name = String::new();
        assert!(matches!(
            validate_customer(&missing_name),
            Err(MasterErr::Validation(_))
        ));
    }

    #[test]
    fn optional_contact_fields_may_be_absent() {
        let mut customer = sample();
        customer.address = None;
        customer.phone = None;
        assert!(validate_customer(&customer).is_ok());
    }

    #[test]
    fn timestamps_are_ignored_on_deserialization() {
        let customer: Customer = serde_json::from_value(serde_json::json!({
            "customerId": "C0002",
            "customerName": "Harbor Freight",
            "createdAt": "2020-01-01T00:00:00Z"
        }))
        .expect("payload deserializes");
        assert_eq!(customer.created_at, None);
        assert_eq!(customer.updated_at, None);
    }

    #[test]
    fn descriptor_sorts_fall_back_to_created_at() {
        assert_eq!(CUSTOMERS.resolve_sort("customerName"), "customer_name");
        assert_eq!(CUSTOMERS.resolve_sort("nonsense"), "created_at");
    }
}
