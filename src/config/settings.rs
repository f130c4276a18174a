//! # Configuration Settings
//!
//! Defines the configuration structure for the test-environment provisioner.

use crate::errors::{DoclingtaxaError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

/// Environment variable holding the MongoDB endpoint for tests
pub const MONGODB_URI_ENV: &str = "MONGODB_TEST_URI";
/// Environment variable overriding the test database name
pub const MONGODB_DATABASE_ENV: &str = "MONGODB_TEST_DATABASE";
/// Environment variable for the server selection / connect timeout
pub const MONGODB_TIMEOUT_ENV: &str = "MONGODB_TEST_TIMEOUT_SECONDS";
/// Environment variable selecting the database isolation mode
pub const MONGODB_ISOLATION_ENV: &str = "MONGODB_TEST_ISOLATION";
/// Environment variable overriding the project root
pub const PROJECT_ROOT_ENV: &str = "DOCLINGTAXA_PROJECT_ROOT";
/// Set by cargo for the package whose tests or binary are running
pub const CARGO_MANIFEST_DIR_ENV: &str = "CARGO_MANIFEST_DIR";
/// Environment variable for the default log filter
pub const LOG_LEVEL_ENV: &str = "DOCLINGTAXA_LOG_LEVEL";
/// Environment variable enabling JSON log output
pub const LOG_JSON_ENV: &str = "DOCLINGTAXA_LOG_JSON";

pub const DEFAULT_MONGODB_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_TEST_DATABASE: &str = "doclingtaxa_test";

/// Complete test-environment configuration, resolved once at setup time.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct TestEnvConfig {
    /// MongoDB configuration
    #[validate(nested)]
    pub mongodb: MongoConfig,

    /// Fixture directory layout
    #[validate(nested)]
    pub fixtures: FixturesConfig,

    /// Logging configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl TestEnvConfig {
    /// Resolve configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            mongodb: MongoConfig::from_lookup(&lookup)?,
            fixtures: FixturesConfig::from_lookup(&lookup),
            observability: ObservabilityConfig::from_lookup(&lookup),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(DoclingtaxaError::from)?;
        self.mongodb.validate_custom()?;
        Ok(())
    }
}

/// How the test database name is chosen for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DatabaseIsolation {
    /// Every session uses the same fixed database name
    #[default]
    Shared,
    /// Every session derives a unique database name from the base name
    PerWorker,
}

impl std::str::FromStr for DatabaseIsolation {
    type Err = DoclingtaxaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "per-worker" | "per_worker" | "worker" => Ok(Self::PerWorker),
            other => Err(DoclingtaxaError::validation_field(
                format!("Unknown isolation mode '{}', expected 'shared' or 'per-worker'", other),
                "isolation",
            )),
        }
    }
}

/// MongoDB connection configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MongoConfig {
    /// MongoDB connection URI
    #[validate(length(min = 1, message = "MongoDB URI cannot be empty"))]
    pub uri: String,

    /// Base name of the test database
    #[validate(length(min = 1, max = 63, message = "Database name must be 1 to 63 characters"))]
    pub database_name: String,

    /// Server selection and connect timeout in seconds
    #[validate(range(min = 1, max = 60, message = "Timeout must be between 1 and 60 seconds"))]
    pub timeout_seconds: u64,

    /// Database naming mode
    pub isolation: DatabaseIsolation,

    /// Application name reported to the server
    #[validate(length(min = 1, message = "App name cannot be empty"))]
    pub app_name: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGODB_URI.to_string(),
            database_name: DEFAULT_TEST_DATABASE.to_string(),
            timeout_seconds: 5,
            isolation: DatabaseIsolation::Shared,
            app_name: "doclingtaxa-tests".to_string(),
        }
    }
}

impl MongoConfig {
    /// Create MongoConfig from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let uri = lookup(MONGODB_URI_ENV).unwrap_or(defaults.uri);

        let database_name = lookup(MONGODB_DATABASE_ENV).unwrap_or(defaults.database_name);

        let timeout_seconds = lookup(MONGODB_TIMEOUT_ENV)
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_seconds);

        let isolation = match lookup(MONGODB_ISOLATION_ENV) {
            Some(value) => value.parse()?,
            None => defaults.isolation,
        };

        Ok(Self { uri, database_name, timeout_seconds, isolation, app_name: defaults.app_name })
    }

    /// Get the server selection / connect timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Check if this URI uses DNS seed list discovery
    pub fn is_srv(&self) -> bool {
        self.uri.starts_with("mongodb+srv://")
    }

    fn validate_custom(&self) -> Result<()> {
        if !self.uri.starts_with("mongodb://") && !self.is_srv() {
            return Err(DoclingtaxaError::validation_field(
                "MongoDB URI must start with 'mongodb://' or 'mongodb+srv://'",
                "uri",
            ));
        }

        if let Some(c) = self.database_name.chars().find(|c| "/\\. \"$".contains(*c)) {
            return Err(DoclingtaxaError::validation_field(
                format!("Database name '{}' contains invalid character '{}'", self.database_name, c),
                "database_name",
            ));
        }

        Ok(())
    }
}

/// Fixture directory layout, relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FixturesConfig {
    /// Project root all relative fixture paths resolve against
    pub project_root: PathBuf,

    /// Synthetic sample inputs, relative to the project root
    #[validate(length(min = 1, message = "Sample PDF directory cannot be empty"))]
    pub sample_pdfs_dir: String,

    /// Real sample inputs, relative to the project root
    #[validate(length(min = 1, message = "Monografias directory cannot be empty"))]
    pub monografias_dir: String,

    /// Scratch directory name created inside a temporary root
    #[validate(length(min = 1, message = "Temporary PDF directory name cannot be empty"))]
    pub temp_pdfs_dir: String,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            project_root: default_project_root(None, std::env::var(CARGO_MANIFEST_DIR_ENV).ok()),
            sample_pdfs_dir: "tests/fixtures/sample_pdfs".to_string(),
            monografias_dir: "monografias".to_string(),
            temp_pdfs_dir: "test_pdfs".to_string(),
        }
    }
}

impl FixturesConfig {
    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            project_root: default_project_root(
                lookup(PROJECT_ROOT_ENV),
                lookup(CARGO_MANIFEST_DIR_ENV),
            ),
            ..Default::default()
        }
    }

    /// Sample inputs path (not yet created)
    pub fn sample_pdfs_path(&self) -> PathBuf {
        self.project_root.join(&self.sample_pdfs_dir)
    }

    /// Real sample inputs path (not yet created)
    pub fn monografias_path(&self) -> PathBuf {
        self.project_root.join(&self.monografias_dir)
    }
}

/// Explicit root, then the manifest dir of the package under test, then
/// this crate's own manifest dir, then `.`.
fn default_project_root(explicit: Option<String>, runtime_manifest: Option<String>) -> PathBuf {
    explicit
        .or(runtime_manifest)
        .or_else(|| option_env!("CARGO_MANIFEST_DIR").map(str::to_string))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    /// Default log filter when RUST_LOG is unset
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logging: false }
    }
}

impl ObservabilityConfig {
    /// Create ObservabilityConfig from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = lookup(LOG_LEVEL_ENV).unwrap_or_else(|| "info".to_string());

        let json_logging = lookup(LOG_JSON_ENV)
            .map(|s| s.to_lowercase() == "true" || s == "1")
            .unwrap_or(false);

        Self { log_level, json_logging }
    }
}
