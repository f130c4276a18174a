//! # doclingtaxa
//!
//! Test-environment provisioning for the doclingtaxa PDF ingestion pipeline.
//! The pipeline stores extracted document data in MongoDB; its tests need a
//! reachable database with clean state, sample PDF directories, and a way to
//! select tests by category.
//!
//! ## Architecture
//!
//! ```text
//! TestEnvConfig (env, resolved once)
//!      ↓
//! MongoSession::acquire ──ping──→ Ready(session) | Unavailable(reason) → skip
//!      ↓
//! clean_test_db (per test)     sample_pdf_dir / monografias_dir / TempPdfDir
//!      ↓
//! teardown (drop test database, close client)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use doclingtaxa::{fixtures::TestEnvironment, require_available, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let env = TestEnvironment::from_env()?;
//!     let session = require_available!(env.mongodb().await, Ok(()));
//!     let db = session.clean_test_db().await?;
//!     println!("using {}", db.name());
//!     session.teardown().await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod fixtures;
pub mod observability;
pub mod storage;

pub use config::TestEnvConfig;
pub use errors::{DoclingtaxaError, Result};
pub use fixtures::{Availability, MongoSession, TestCategory, TestEnvironment};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
