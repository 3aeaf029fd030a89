use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Pool, Postgres};
use utoipa::ToSchema;

use crate::pagination::{EntityDescriptor, PageQuery, PageResponse, fetch_page};
use crate::types::error::MasterErr;

/// Listing configuration for the storage-location table.
pub const LOCATIONS: EntityDescriptor = EntityDescriptor {
    table: "location_master",
    key_column: "location_id",
    search_columns: &["warehouse_code", "location_id"],
    sort_keys: &[
        ("locationId", "location_id"),
        ("warehouseCode", "warehouse_code"),
        ("maxCapacity", "max_capacity"),
        ("createdAt", "created_at"),
        ("updatedAt", "updated_at"),
    ],
    default_sort: "created_at",
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow)]
#[serde(rename_all = "camelCase")]
/// Struct representing a storage location inside a warehouse.
///
/// # Fields
/// - `location_id` - The location's identifier (primary key)
/// - `warehouse_code` - The warehouse this location belongs to
/// - `zone`/`rack`/`level_no`/`position` - Physical coordinates (optional)
/// - `max_capacity` - Upper bound on stored units (optional)
/// - `created_at`/`updated_at` - Stamped by the server, never by clients
pub struct Location {
    pub location_id: String,
    pub warehouse_code: String,
    pub zone: Option<String>,
    pub rack: Option<String>,
    pub level_no: Option<String>,
    pub position: Option<String>,
    pub max_capacity: Option<i32>,
    #[serde(skip_deserializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_deserializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn validate_location(location: &Location) -> Result<(), MasterErr> {
    if location.location_id.trim().is_empty() {
        return Err(MasterErr::Validation(String::from(
            "location id is required",
        )));
    }
    if location.warehouse_code.trim().is_empty() {
        return Err(MasterErr::Validation(String::from(
            "warehouse code is required",
        )));
    }
    if let Some(capacity) = location.max_capacity
        && capacity < 0
    {
        return Err(MasterErr::Validation(String::from(
            "max capacity cannot be negative",
        )));
    }
    Ok(())
}

/// Retrieves one page of storage locations.
///
/// # Errors
/// `MasterErr::InvalidQuery` for a malformed page window, `MasterErr::Store`
/// when the query fails.
pub async fn locations_page(
    db_pool: &Pool<Postgres>,
    query: &PageQuery,
) -> Result<PageResponse<Location>, MasterErr> {
    fetch_page(db_pool, &LOCATIONS, query).await
}

/// Retrieves a location by its id.
///
/// # Errors
/// `MasterErr::NotFound` when no location has this id, `MasterErr::Store`
/// when the query fails.
pub async fn location_get(
    db_pool: &Pool<Postgres>,
    location_id: &str,
) -> Result<Location, MasterErr> {
    sqlx::query_as::<_, Location>("SELECT * FROM location_master WHERE location_id = $1")
        .bind(location_id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| MasterErr::NotFound(format!("location {location_id} not found")))
}

pub async fn location_exists(
    db_pool: &Pool<Postgres>,
    location_id: &str,
) -> Result<bool, MasterErr> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM location_master WHERE location_id = $1)",
    )
    .bind(location_id)
    .fetch_one(db_pool)
    .await?;
    Ok(exists)
}

/// Lists the locations of one warehouse, newest first.
pub async fn locations_by_warehouse(
    db_pool: &Pool<Postgres>,
    warehouse_code: &str,
) -> Result<Vec<Location>, MasterErr> {
    let locations = sqlx::query_as::<_, Location>(
        "SELECT * FROM location_master WHERE warehouse_code = $1 ORDER BY created_at DESC",
    )
    .bind(warehouse_code)
    .fetch_all(db_pool)
    .await?;
    Ok(locations)
}

/// Adds a new storage location. Both timestamps are stamped by the database.
///
/// # Returns
/// The stored location, including its timestamps.
///
/// # Errors
/// `MasterErr::Validation` for a missing required field, a negative capacity,
/// or an id that is already taken; `MasterErr::Store` when the insert fails.
pub async fn location_add(
    db_pool: &Pool<Postgres>,
    location: Location,
) -> Result<Location, MasterErr> {
    validate_location(&location)?;
    if location_exists(db_pool, &location.location_id).await? {
        return Err(MasterErr::Validation(format!(
            "location {} already exists",
            location.location_id
        )));
    }

    let stored = sqlx::query_as::<_, Location>(
        r#"
        INSERT INTO location_master (location_id, warehouse_code, zone, rack, level_no, position, max_capacity, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, now(), now())
        RETURNING *
        "#,
    )
    .bind(&location.location_id)
    .bind(&location.warehouse_code)
    .bind(&location.zone)
    .bind(&location.rack)
    .bind(&location.level_no)
    .bind(&location.position)
    .bind(location.max_capacity)
    .fetch_one(db_pool)
    .await?;

    tracing::info!("created location {}", stored.location_id);
    Ok(stored)
}

/// Updates a location by its id. The id from the path wins over whatever the
/// payload carries; `updated_at` is refreshed, `created_at` is left alone.
///
/// # Errors
/// `MasterErr::Validation` for a rejected payload or an id that does not
/// exist, `MasterErr::Store` when the update fails.
pub async fn location_update(
    db_pool: &Pool<Postgres>,
    location_id: &str,
    mut location: Location,
) -> Result<Location, MasterErr> {
    location.location_id = location_id.to_string();
    validate_location(&location)?;
    if !location_exists(db_pool, location_id).await? {
        return Err(MasterErr::Validation(format!(
            "location {location_id} does not exist"
        )));
    }

    let stored = sqlx::query_as::<_, Location>(
        r#"
        UPDATE location_master
        SET warehouse_code = $2, zone = $3, rack = $4, level_no = $5, position = $6, max_capacity = $7, updated_at = now()
        WHERE location_id = $1
        RETURNING *
        "#,
    )
    .bind(location_id)
    .bind(&location.warehouse_code)
    .bind(&location.zone)
    .bind(&location.rack)
    .bind(&location.level_no)
    .bind(&location.position)
    .bind(location.max_capacity)
    .fetch_one(db_pool)
    .await?;

    tracing::info!("updated location {location_id}");
    Ok(stored)
}

/// Removes a location by its id.
///
/// # Errors
/// `MasterErr::Validation` when no location has this id, `MasterErr::Store`
/// when the delete fails.
pub async fn location_delete(db_pool: &Pool<Postgres>, location_id: &str) -> Result<(), MasterErr> {
    if !location_exists(db_pool, location_id).await? {
        return Err(MasterErr::Validation(format!(
            "location {location_id} does not exist"
        )));
    }

    sqlx::query("DELETE FROM location_master WHERE location_id = $1")
        .bind(location_id)
        .execute(db_pool)
        .await?;

    tracing::info!("deleted location {location_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Location {
        Location {
            location_id: String::from("LOC0001"),
            warehouse_code: String::from("WH01"),
            zone: Some(String::from("A")),
            rack: Some(String::from("R03")),
            level_no: Some(String::from("L2")),
            position: Some(String::from("P07")),
            max_capacity: Some(50),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn a_complete_location_passes_validation() {
        assert!(validate_location(&sample()).is_ok());
    }

    #[test]
    fn id_and_warehouse_code_are_required() {
        let mut missing_id = sample();
        missing_id.location_id = String::from(" ");
        assert!(matches!(
            validate_location(&missing_id),
            Err(MasterErr::Validation(_))
        ));

        let mut missing_code = sample();
        missing_code.warehouse_code = String::new();
        assert!(matches!(
            validate_location(&missing_code),
            Err(MasterErr::Validation(_))
        ));
    }

    #[test]
    fn coordinates_and_capacity_are_optional() {
        let mut location = sample();
        location.zone = None;
        location.rack = None;
        location.level_no = None;
        location.position = None;
        location.max_capacity = None;
        assert!(validate_location(&location).is_ok());
    }

    #[test]
    fn negative_capacity_is_rejected() {
        let mut location = sample();
        location.max_capacity = Some(-10);
        assert!(matches!(
            validate_location(&location),
            Err(MasterErr::Validation(_))
        ));
    }

    #[test]
    fn warehouse_code_is_searchable_and_sortable() {
        assert!(LOCATIONS.search_columns.contains(&"warehouse_code"));
        assert_eq!(LOCATIONS.resolve_sort("warehouseCode"), "warehouse_code");
        assert_eq!(LOCATIONS.resolve_sort("zone"), "created_at");
    }
}
