//! # Test Resource Provisioning
//!
//! Supplies isolated, ready-state resources to tests:
//!
//! - a session-scoped MongoDB connection ([`MongoSession`]) that reports
//!   [`Availability::Unavailable`] instead of failing when the server is absent
//! - a per-test clean database ([`MongoSession::clean_test_db`])
//! - persistent sample directories and a per-test scratch directory
//! - the closed set of [`TestCategory`] tags and the run's [`CategoryFilter`]
//!
//! ```rust,ignore
//! #[tokio::test]
//! async fn stores_extracted_taxa() {
//!     let env = TestEnvironment::from_env().unwrap();
//!     require_category!(env.categories, [TestCategory::Integration]);
//!
//!     let session = require_available!(env.mongodb().await);
//!     let db = session.clean_test_db().await.unwrap();
//!     // ...
//!     session.teardown().await.unwrap();
//! }
//! ```

pub mod availability;
pub mod categories;
pub mod directories;
pub mod session;

pub use availability::{Availability, UnavailableReason};
pub use categories::{registered_markers, CategoryFilter, TestCategory, CATEGORIES_ENV};
pub use directories::{
    ensure_dir, monografias_dir, sample_pdf_dir, temp_pdf_dir, TempPdfDir,
};
pub use session::{run_session, MongoSession};

use crate::config::TestEnvConfig;
use crate::errors::Result;
use crate::observability::{init_logging, log_config_info};
use std::path::PathBuf;

/// Resolved configuration plus category selection for one test run.
///
/// Holds no connections; it is the explicit value every fixture is built from.
#[derive(Debug, Clone)]
pub struct TestEnvironment {
    pub config: TestEnvConfig,
    pub categories: CategoryFilter,
}

impl TestEnvironment {
    /// Resolve configuration and category selection from the process
    /// environment and install logging.
    pub fn from_env() -> Result<Self> {
        let config = TestEnvConfig::from_env()?;
        let categories = CategoryFilter::from_env()?;

        if init_logging(&config.observability)? {
            log_config_info(&config);
        }

        Ok(Self { config, categories })
    }

    /// Build from an explicit configuration with no category restriction
    pub fn new(config: TestEnvConfig) -> Self {
        Self { config, categories: CategoryFilter::all() }
    }

    /// Acquire the session-scoped MongoDB connection
    pub async fn mongodb(&self) -> Availability<MongoSession> {
        MongoSession::acquire(&self.config.mongodb).await
    }

    pub fn sample_pdf_dir(&self) -> Result<PathBuf> {
        sample_pdf_dir(&self.config.fixtures)
    }

    pub fn monografias_dir(&self) -> Result<PathBuf> {
        monografias_dir(&self.config.fixtures)
    }

    /// A fresh per-test scratch directory
    pub fn temp_pdf_dir(&self) -> Result<TempPdfDir> {
        TempPdfDir::new(&self.config.fixtures)
    }
}
