//! # Test Database Maintenance
//!
//! Collection clearing and database dropping used by the per-test and
//! per-session fixtures.

use crate::errors::{DoclingtaxaError, Result};
use mongodb::bson::{doc, Document};
use mongodb::{Client, Database};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::instrument;

/// Documents removed from a single collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionCleanup {
    pub collection: String,
    pub deleted: u64,
}

/// Result of emptying every collection in a database
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub database: String,
    pub collections: Vec<CollectionCleanup>,
}

impl CleanupReport {
    /// Total documents removed across all collections
    pub fn total_deleted(&self) -> u64 {
        self.collections.iter().map(|c| c.deleted).sum()
    }
}

/// Only real collections; views reject writes.
fn collections_only() -> Document {
    doc! { "type": "collection" }
}

/// Server-managed namespaces reject `delete_many`.
fn is_system_collection(name: &str) -> bool {
    name.starts_with("system.")
}

/// Delete every document from every collection in `db`.
///
/// Collections themselves (and their indexes) are kept. Views are skipped.
#[instrument(level = "debug", skip(db), fields(database = %db.name()))]
pub async fn clear_collections(db: &Database) -> Result<CleanupReport> {
    let mut names = db.list_collection_names().filter(collections_only()).await.map_err(|e| {
        DoclingtaxaError::database(e, format!("Failed to list collections in '{}'", db.name()))
    })?;
    names.sort();

    let mut collections = Vec::with_capacity(names.len());
    for name in names.into_iter().filter(|n| !is_system_collection(n)) {
        let result = db.collection::<Document>(&name).delete_many(doc! {}).await.map_err(|e| {
            DoclingtaxaError::database(
                e,
                format!("Failed to clear collection '{}.{}'", db.name(), name),
            )
        })?;

        tracing::debug!(collection = %name, deleted = result.deleted_count, "Collection cleared");
        collections.push(CollectionCleanup { collection: name, deleted: result.deleted_count });
    }

    let report = CleanupReport { database: db.name().to_string(), collections };
    tracing::debug!(
        collections = report.collections.len(),
        deleted = report.total_deleted(),
        "Test database cleaned"
    );
    Ok(report)
}

/// Drop database `name`. Dropping a database that does not exist succeeds.
#[instrument(level = "debug", skip(client))]
pub async fn drop_database(client: &Client, name: &str) -> Result<()> {
    client
        .database(name)
        .drop()
        .await
        .map_err(|e| DoclingtaxaError::database(e, format!("Failed to drop database '{}'", name)))?;

    tracing::info!(database = %name, "Test database dropped");
    Ok(())
}

/// Document count per collection, system collections and views excluded
pub async fn collection_counts(db: &Database) -> Result<BTreeMap<String, u64>> {
    let names = db.list_collection_names().filter(collections_only()).await.map_err(|e| {
        DoclingtaxaError::database(e, format!("Failed to list collections in '{}'", db.name()))
    })?;

    let mut counts = BTreeMap::new();
    for name in names.into_iter().filter(|n| !is_system_collection(n)) {
        let count = db
            .collection::<Document>(&name)
            .count_documents(doc! {})
            .await
            .map_err(|e| DoclingtaxaError::database(e, format!("Failed to count '{}'", name)))?;
        counts.insert(name, count);
    }

    Ok(counts)
}
