//! MongoDB connection.
//!
//! ```bash
//! export MONGODB_URI="mongodb://localhost:27017"
//! export DATABASE_NAME="youth_hub_dev"
//! ```
//!
//! The [`Database`] handle is registered in the `ServiceLocator` by `main`
//! and injected into every repository.

use std::env;

use log::info;
use mongodb::bson::doc;
use mongodb::{options::ClientOptions, Client};

/// Driver client plus the name of the application database
#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// Connects using `MONGODB_URI` / `DATABASE_NAME` and pings the server
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let mongodb_uri = env::var("MONGODB_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let database_name = env::var("DATABASE_NAME").unwrap_or_else(|_| "youth_hub_dev".to_string());

        let mut client_options = ClientOptions::parse(&mongodb_uri).await?;
        client_options.app_name = Some("youth_hub_api".to_string());

        let client = Client::with_options(client_options)?;
        let database = Self { client, database_name };
        database.ping().await?;

        info!("✅ MongoDB connected: {}", database.database_name);
        Ok(database)
    }

    /// The application database
    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Round-trip used at boot and by `/health`
    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        self.get_database().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
