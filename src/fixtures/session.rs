//! Session-scoped MongoDB connection and the per-test clean database.

use super::availability::{Availability, UnavailableReason};
use crate::config::{DatabaseIsolation, MongoConfig};
use crate::errors::{DoclingtaxaError, Result};
use crate::fixture_span;
use crate::storage::{self, CleanupReport};
use futures::FutureExt;
use mongodb::{Client, Database};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::Instrument;
use uuid::Uuid;

/// MongoDB rejects database names of 64 bytes or more.
const MAX_DATABASE_NAME_LEN: usize = 63;

/// Counter for generating unique database names within a test run
static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A live MongoDB connection owned by one test session.
///
/// Cloning is cheap and shares the underlying connection pool. The session
/// database is dropped only by [`MongoSession::teardown`].
#[derive(Debug, Clone)]
pub struct MongoSession {
    client: Client,
    config: MongoConfig,
    database_name: String,
}

impl MongoSession {
    /// Connect and verify liveness.
    ///
    /// Any failure, from a malformed URI to a server selection timeout,
    /// yields `Unavailable` so that dependent tests skip. The database name
    /// follows `config.isolation`.
    pub async fn acquire(config: &MongoConfig) -> Availability<Self> {
        Self::connect(config, session_database_name(config)).await
    }

    /// Like [`acquire`](Self::acquire), but always targets
    /// `config.database_name` as configured, ignoring `config.isolation`.
    ///
    /// Operator commands use this to act on the database they name.
    pub async fn acquire_named(config: &MongoConfig) -> Availability<Self> {
        Self::connect(config, config.database_name.clone()).await
    }

    async fn connect(config: &MongoConfig, database_name: String) -> Availability<Self> {
        let endpoint = storage::sanitize_uri(&config.uri);

        async {
            let client = match storage::create_client(config).await {
                Ok(client) => client,
                Err(e) => return unavailable(&endpoint, &e),
            };

            if let Err(e) = storage::check_connection(&client).await {
                return unavailable(&endpoint, &e);
            }

            tracing::info!(
                endpoint = %endpoint,
                database = %database_name,
                isolation = ?config.isolation,
                "MongoDB test session ready"
            );

            Availability::Ready(Self { client, config: config.clone(), database_name })
        }
        .instrument(fixture_span!("mongodb_test_client", "session"))
        .await
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn config(&self) -> &MongoConfig {
        &self.config
    }

    /// Name of the database this session provisions for tests
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Handle to the session database without cleaning it
    pub fn database(&self) -> Database {
        self.client.database(&self.database_name)
    }

    /// Empty every collection in the session database and return it.
    ///
    /// Call once at the start of each test.
    pub async fn clean_test_db(&self) -> Result<Database> {
        let (db, _) = self.clean_test_db_with_report().await?;
        Ok(db)
    }

    /// Same as [`clean_test_db`](Self::clean_test_db), also returning what was removed
    pub async fn clean_test_db_with_report(&self) -> Result<(Database, CleanupReport)> {
        let db = self.database();
        let report = storage::clear_collections(&db)
            .instrument(fixture_span!("clean_test_db", "function"))
            .await?;
        Ok((db, report))
    }

    /// Close the client, leaving the session database in place
    pub async fn close(self) {
        self.client.shutdown().immediate(true).await;
    }

    /// Drop the session database and close the client.
    ///
    /// The client is shut down even when the drop fails.
    pub async fn teardown(self) -> Result<()> {
        let Self { client, database_name, .. } = self;

        let dropped = storage::drop_database(&client, &database_name).await;
        client.shutdown().immediate(true).await;

        tracing::info!(database = %database_name, ok = dropped.is_ok(), "MongoDB test session closed");
        dropped
    }
}

/// Run `body` with a fresh session, then tear it down.
///
/// Teardown runs whether the body returns or panics; a panic is resumed
/// afterwards so the test still fails. Teardown errors are logged only.
pub async fn run_session<F, Fut, T>(config: &MongoConfig, body: F) -> Availability<T>
where
    F: FnOnce(MongoSession) -> Fut,
    Fut: Future<Output = T>,
{
    let session = match MongoSession::acquire(config).await {
        Availability::Ready(session) => session,
        Availability::Unavailable(reason) => return Availability::Unavailable(reason),
    };

    let outcome = AssertUnwindSafe(body(session.clone())).catch_unwind().await;

    if let Err(e) = session.teardown().await {
        tracing::warn!(error = %e, "MongoDB session teardown failed");
    }

    match outcome {
        Ok(value) => Availability::Ready(value),
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn unavailable<T>(endpoint: &str, error: &DoclingtaxaError) -> Availability<T> {
    let reason = UnavailableReason::mongodb(endpoint, error.detailed_message());
    tracing::warn!(endpoint = %endpoint, "{}", reason);
    Availability::Unavailable(reason)
}

fn session_database_name(config: &MongoConfig) -> String {
    match config.isolation {
        DatabaseIsolation::Shared => config.database_name.clone(),
        DatabaseIsolation::PerWorker => unique_database_name(&config.database_name),
    }
}

/// Generate a unique database name, truncating the base to stay within server limits
fn unique_database_name(base: &str) -> String {
    let counter = SESSION_COUNTER.fetch_add(1, Ordering::SeqCst);
    let uuid_short = &Uuid::new_v4().simple().to_string()[..8];
    let suffix = format!("_{}_{}_{}", std::process::id(), counter, uuid_short);

    let mut keep = MAX_DATABASE_NAME_LEN.saturating_sub(suffix.len()).min(base.len());
    while !base.is_char_boundary(keep) {
        keep -= 1;
    }

    format!("{}{}", &base[..keep], suffix)
}
