//! Test database utilities for integration tests.
//!
//! Sessions built here always use per-worker database names, because
//! `cargo test` runs tests on parallel threads and a shared name would let
//! one test's cleanup race another test's inserts.

use doclingtaxa::config::{DatabaseIsolation, FixturesConfig, MongoConfig, TestEnvConfig};
use doclingtaxa::fixtures::{Availability, MongoSession, TestEnvironment};
use tempfile::TempDir;

/// MongoDB config from `MONGODB_TEST_URI`, isolated per test
pub fn env_mongo_config(prefix: &str) -> MongoConfig {
    let mut config = MongoConfig::from_env().expect("valid MongoDB test configuration");
    config.database_name = format!("{}_{}", config.database_name, prefix);
    config.isolation = DatabaseIsolation::PerWorker;
    config
}

/// Acquire a session against the environment-configured server
pub async fn env_session(prefix: &str) -> Availability<MongoSession> {
    MongoSession::acquire(&env_mongo_config(prefix)).await
}

/// Config pointing at a port where nothing listens
pub fn unreachable_mongo_config() -> MongoConfig {
    MongoConfig { uri: "mongodb://127.0.0.1:1".to_string(), timeout_seconds: 1, ..Default::default() }
}

/// A test environment whose project root is a throwaway directory.
///
/// The directory is removed when this struct is dropped.
pub struct TestProject {
    pub env: TestEnvironment,
    root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self::with_mongo(unreachable_mongo_config())
    }

    pub fn with_mongo(mongodb: MongoConfig) -> Self {
        let root = tempfile::tempdir().expect("create project root");
        let config = TestEnvConfig {
            mongodb,
            fixtures: FixturesConfig { project_root: root.path().to_path_buf(), ..Default::default() },
            ..Default::default()
        };

        Self { env: TestEnvironment::new(config), root }
    }

    pub fn root(&self) -> &std::path::Path {
        self.root.path()
    }
}

#[cfg(feature = "mongodb_tests")]
pub mod container {
    //! Testcontainers-backed MongoDB for tests that must not skip.

    use doclingtaxa::config::{DatabaseIsolation, MongoConfig};
    use testcontainers::runners::AsyncRunner;
    use testcontainers::ContainerAsync;
    use testcontainers_modules::mongo::Mongo;

    /// A MongoDB container; stopped and removed on drop.
    pub struct TestMongo {
        pub config: MongoConfig,
        _container: ContainerAsync<Mongo>,
    }

    impl TestMongo {
        pub async fn new(prefix: &str) -> Self {
            let container = Mongo::default().start().await.unwrap_or_else(|e| {
                panic!("Failed to start MongoDB container for {}: {}", prefix, e)
            });

            let host = container
                .get_host()
                .await
                .unwrap_or_else(|e| panic!("Failed to get container host for {}: {}", prefix, e));

            let port = container
                .get_host_port_ipv4(27017)
                .await
                .unwrap_or_else(|e| panic!("Failed to get container port for {}: {}", prefix, e));

            let config = MongoConfig {
                uri: format!("mongodb://{}:{}", host, port),
                database_name: prefix.to_string(),
                timeout_seconds: 10,
                isolation: DatabaseIsolation::Shared,
                ..Default::default()
            };

            Self { config, _container: container }
        }
    }
}
