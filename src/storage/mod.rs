//! # Storage
//!
//! MongoDB connectivity for the test database: client creation, the liveness
//! check, and the maintenance operations the fixtures depend on.

pub mod client;
pub mod maintenance;

pub use crate::config::MongoConfig;

pub use client::{create_client, sanitize_uri};
pub use maintenance::{
    clear_collections, collection_counts, drop_database, CleanupReport, CollectionCleanup,
};

use crate::db_span;
use crate::errors::{DoclingtaxaError, Result};
use mongodb::bson::doc;
use mongodb::Client;
use tracing::Instrument;

/// Check server liveness with an administrative `ping`
pub async fn check_connection(client: &Client) -> Result<()> {
    async { client.database("admin").run_command(doc! { "ping": 1 }).await }
        .instrument(db_span!("ping"))
        .await
        .map_err(|e| DoclingtaxaError::Database {
            source: e,
            context: "MongoDB connectivity check failed".to_string(),
        })?;

    Ok(())
}
