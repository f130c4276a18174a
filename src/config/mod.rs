//! # Configuration Management
//!
//! Environment-driven configuration for the test-environment provisioner.
//! Values are resolved once into a [`TestEnvConfig`] and passed explicitly to
//! every consumer.

pub mod settings;

pub use settings::{
    DatabaseIsolation, FixturesConfig, MongoConfig, ObservabilityConfig, TestEnvConfig,
    CARGO_MANIFEST_DIR_ENV, DEFAULT_MONGODB_URI, DEFAULT_TEST_DATABASE, LOG_JSON_ENV, LOG_LEVEL_ENV,
    MONGODB_DATABASE_ENV, MONGODB_ISOLATION_ENV, MONGODB_TIMEOUT_ENV, MONGODB_URI_ENV,
    PROJECT_ROOT_ENV,
};
