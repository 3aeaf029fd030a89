use crate::db_config::db_setup;
use sqlx::{Pool, Postgres};
use std::error::Error;

/// The struct holds the database connection pool
///
/// # Fields
/// - `masters_db`: The database connection pool
#[derive(Debug)]
pub struct MasterData {
    pub masters_db: Pool<Postgres>,
}

impl MasterData {
    /// Creates a new `MasterData` instance.
    ///
    /// This function initializes the database connection pool using the
    /// `db_setup` function.
    ///
    /// # Returns
    /// `Ok(MasterData)` if the database connection pool is set up properly,
    /// or an error if not.
    ///
    /// # Errors
    /// This function will return an error if the database connection pool
    /// cannot be initialized.
    pub async fn new() -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            masters_db: db_setup().await?,
        })
    }
}
