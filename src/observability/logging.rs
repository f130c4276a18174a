//! # Structured Logging
//!
//! Provides subscriber initialisation and span macros using the tracing ecosystem.
//!
//! Tests and the CLI may both try to install a subscriber; the first one wins
//! and later calls are no-ops. `RUST_LOG` always takes precedence over the
//! configured default level.

use crate::config::{ObservabilityConfig, TestEnvConfig, LOG_LEVEL_ENV};
use crate::errors::{DoclingtaxaError, Result};
use tracing_subscriber::EnvFilter;

/// Create a tracing span for database operations.
///
/// ```rust,ignore
/// let span = db_span!("clear_collections", database = "doclingtaxa_test");
/// ```
#[macro_export]
macro_rules! db_span {
    ($operation:expr) => {
        tracing::debug_span!(
            "db_operation",
            operation = %$operation,
            operation_id = %uuid::Uuid::new_v4()
        )
    };
    ($operation:expr, $($field:tt)*) => {
        tracing::debug_span!(
            "db_operation",
            operation = %$operation,
            operation_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Create a tracing span for fixture setup and teardown
#[macro_export]
macro_rules! fixture_span {
    ($fixture:expr, $scope:expr) => {
        tracing::info_span!("fixture", fixture = %$fixture, scope = %$scope)
    };
}

/// Install the global fmt subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<bool> {
    let filter = build_filter(std::env::var("RUST_LOG").ok(), &config.log_level)?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json_logging {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    Ok(installed)
}

/// `RUST_LOG` when set and non-empty, else the configured level.
/// Errors name whichever directive string was rejected.
fn build_filter(rust_log: Option<String>, log_level: &str) -> Result<EnvFilter> {
    let (origin, directives) = match rust_log {
        Some(directives) if !directives.is_empty() => ("RUST_LOG", directives),
        _ => (LOG_LEVEL_ENV, log_level.to_string()),
    };

    EnvFilter::try_new(&directives).map_err(|e| {
        DoclingtaxaError::config_with_source(
            format!("Invalid log filter '{}' from {}", directives, origin),
            Box::new(e),
        )
    })
}

/// Log the resolved test-environment configuration
pub fn log_config_info(config: &TestEnvConfig) {
    tracing::info!(
        mongodb_uri = %crate::storage::sanitize_uri(&config.mongodb.uri),
        database = %config.mongodb.database_name,
        isolation = ?config.mongodb.isolation,
        timeout_secs = config.mongodb.timeout_seconds,
        project_root = %config.fixtures.project_root.display(),
        "doclingtaxa test environment configuration"
    );
}
