use clap::Parser;
use dotenvy::dotenv;
use fake::Fake;
use fake::faker::address::raw::{CityName, StreetName};
use fake::faker::company::raw::{Buzzword, CompanyName};
use fake::faker::phone_number::raw::PhoneNumber;
use fake::locales::EN;
use rand::Rng;
use sqlx::{Pool, Postgres};
use std::error::Error;

use stockroom::config::MasterData;
use stockroom::models::customer_model::{Customer, customer_add};
use stockroom::models::location_model::{Location, location_add};
use stockroom::models::product_model::{Product, product_add};

const UNITS: &[&str] = &["pcs", "box", "kg", "roll", "pallet"];
const ZONES: &[&str] = &["A", "B", "C", "D"];

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Number of customers
    #[arg(long, default_value = "25")]
    customers: u32,

    /// Number of products
    #[arg(long, default_value = "40")]
    products: u32,

    /// Number of storage locations
    #[arg(long, default_value = "30")]
    locations: u32,
}

#[tokio::main]
async fn main() {
    // load env vars
    dotenv().ok();

    let cli = Cli::parse();
    println!("Seeding masters:");
    println!("Customers: {}", cli.customers);
    println!("Products: {}", cli.products);
    println!("Locations: {}", cli.locations);

    match cli.generate_data().await {
        Ok(()) => println!("Successfully seeded master data"),
        Err(err) => {
            eprintln!("Error: {err:?}");
            std::process::exit(1);
        }
    }
}

impl Cli {
    async fn generate_data(&self) -> Result<(), Box<dyn Error>> {
        let master_data = MasterData::new().await?;
        let db_pool = &master_data.masters_db;
        self.generate_customers(db_pool).await?;
        self.generate_products(db_pool).await?;
        self.generate_locations(db_pool).await?;

        Ok(())
    }

    // Everything goes through the model layer so validation and timestamp
    // stamping behave exactly as they do for API callers.
    async fn generate_customers(&self, db_pool: &Pool<Postgres>) -> Result<(), Box<dyn Error>> {
        for i in 1..=self.customers {
            let customer = Customer {
                customer_id: format!("C{i:04}"),
                customer_name: CompanyName(EN).fake(),
                address: Some(format!(
                    "{} {}",
                    StreetName(EN).fake::<String>(),
                    CityName(EN).fake::<String>()
                )),
                phone: Some(PhoneNumber(EN).fake()),
                created_at: None,
                updated_at: None,
            };
            customer_add(db_pool, customer).await?;
        }
        Ok(())
    }

    async fn generate_products(&self, db_pool: &Pool<Postgres>) -> Result<(), Box<dyn Error>> {
        for i in 1..=self.products {
            let mut rng = rand::rng();
            let unit = UNITS[rng.random_range(0..UNITS.len())];
            let product = Product {
                product_id: format!("P{i:04}"),
                product_name: format!(
                    "{} {}",
                    Buzzword(EN).fake::<String>(),
                    (4..8).fake::<String>()
                ),
                specification: Some((8..15).fake::<String>()),
                unit: unit.to_string(),
                safety_stock: rng.random_range(0..50),
                created_at: None,
                updated_at: None,
            };
            product_add(db_pool, product).await?;
        }
        Ok(())
    }

    async fn generate_locations(&self, db_pool: &Pool<Postgres>) -> Result<(), Box<dyn Error>> {
        for i in 1..=self.locations {
            let mut rng = rand::rng();
            let location = Location {
                location_id: format!("LOC{i:04}"),
                warehouse_code: format!("WH{:02}", rng.random_range(1..=3)),
                zone: Some(ZONES[rng.random_range(0..ZONES.len())].to_string()),
                rack: Some(format!("R{:02}", rng.random_range(1..=12))),
                level_no: Some(format!("L{}", rng.random_range(1..=4))),
                position: Some(format!("P{:02}", rng.random_range(1..=20))),
                max_capacity: Some(rng.random_range(10..=100)),
                created_at: None,
                updated_at: None,
            };
            location_add(db_pool, location).await?;
        }
        Ok(())
    }
}
