//! # Command Line Interface
//!
//! `doclingtaxa-testenv` inspects and maintains the test environment outside
//! a test run: checking MongoDB reachability, pre-creating fixture
//! directories, clearing or dropping the test database, and listing test
//! categories.

pub mod output;

use crate::config::TestEnvConfig;
use crate::fixtures::{
    monografias_dir, registered_markers, sample_pdf_dir, Availability, MongoSession, TestCategory,
};
use crate::observability::{init_logging, log_config_info};
use crate::storage::sanitize_uri;
use clap::{Parser, Subcommand};
use output::{render, render_table, OutputFormat};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "doclingtaxa-testenv")]
#[command(about = "doclingtaxa test environment tooling")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// MongoDB URI override (defaults to MONGODB_TEST_URI)
    #[arg(long, global = true)]
    pub mongodb_uri: Option<String>,

    /// Test database name override (defaults to MONGODB_TEST_DATABASE)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that MongoDB is reachable
    Check {
        /// Exit non-zero when MongoDB is not available
        #[arg(long)]
        strict: bool,
    },

    /// Create the sample and monografias fixture directories
    Prepare,

    /// Delete all documents from every collection in the test database
    Clean {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },

    /// Drop the test database
    Teardown,

    /// List registered test categories
    Markers {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,
    },
}

#[derive(Serialize)]
struct MarkerEntry {
    name: &'static str,
    description: &'static str,
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    // Load .env file if it exists; a missing file is not an error
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    init_logging(&config.observability)?;
    log_config_info(&config);

    match cli.command {
        Commands::Check { strict } => handle_check(&config, strict).await?,
        Commands::Prepare => handle_prepare(&config)?,
        Commands::Clean { output } => handle_clean(&config, output).await?,
        Commands::Teardown => handle_teardown(&config).await?,
        Commands::Markers { output } => handle_markers(output)?,
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> anyhow::Result<TestEnvConfig> {
    let mut config = TestEnvConfig::from_env()?;

    if let Some(uri) = &cli.mongodb_uri {
        config.mongodb.uri = uri.clone();
    }
    if let Some(database) = &cli.database {
        config.mongodb.database_name = database.clone();
    }
    if cli.verbose {
        config.observability.log_level = "debug".to_string();
    }

    config.validate()?;
    Ok(config)
}

/// Operator commands act on the configured database name, whatever the
/// isolation mode says.
async fn operator_session(config: &TestEnvConfig) -> Availability<MongoSession> {
    MongoSession::acquire_named(&config.mongodb).await
}

async fn acquire_or_bail(config: &TestEnvConfig) -> anyhow::Result<MongoSession> {
    match operator_session(config).await {
        Availability::Ready(session) => Ok(session),
        Availability::Unavailable(reason) => anyhow::bail!("{}", reason),
    }
}

async fn handle_check(config: &TestEnvConfig, strict: bool) -> anyhow::Result<()> {
    match operator_session(config).await {
        Availability::Ready(session) => {
            println!(
                "✅ MongoDB ready at {} (test database: {})",
                sanitize_uri(&config.mongodb.uri),
                session.database_name()
            );
            session.close().await;
        }
        Availability::Unavailable(reason) => {
            println!("⚠️  {} (database-dependent tests will be skipped)", reason);
            if strict {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn handle_prepare(config: &TestEnvConfig) -> anyhow::Result<()> {
    let samples = sample_pdf_dir(&config.fixtures)?;
    let monografias = monografias_dir(&config.fixtures)?;

    println!("sample_pdfs: {}", samples.display());
    println!("monografias: {}", monografias.display());
    Ok(())
}

async fn handle_clean(config: &TestEnvConfig, format: OutputFormat) -> anyhow::Result<()> {
    let session = acquire_or_bail(config).await?;
    let result = session.clean_test_db_with_report().await;
    session.close().await;
    let (_, report) = result?;

    if format == OutputFormat::Table {
        if report.collections.is_empty() {
            println!("No collections in {}", report.database);
            return Ok(());
        }
        let rows: Vec<Vec<String>> = report
            .collections
            .iter()
            .map(|c| vec![c.collection.clone(), c.deleted.to_string()])
            .collect();
        print!("{}", render_table(&[("COLLECTION", 32), ("DELETED", 10)], &rows));
        println!("{} documents removed from {}", report.total_deleted(), report.database);
    } else {
        println!("{}", render(&report, format)?);
    }
    Ok(())
}

async fn handle_teardown(config: &TestEnvConfig) -> anyhow::Result<()> {
    let session = acquire_or_bail(config).await?;
    let name = session.database_name().to_string();
    session.teardown().await?;
    println!("Dropped test database {}", name);
    Ok(())
}

fn handle_markers(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => {
            for line in registered_markers() {
                println!("{}", line);
            }
        }
        _ => {
            let entries: Vec<MarkerEntry> = TestCategory::ALL
                .iter()
                .map(|c| MarkerEntry { name: c.as_str(), description: c.description() })
                .collect();
            println!("{}", render(&entries, format)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_check_with_overrides() {
        let cli = Cli::try_parse_from([
            "doclingtaxa-testenv",
            "check",
            "--strict",
            "--mongodb-uri",
            "mongodb://db:27017",
            "--database",
            "taxa_ci",
        ])
        .unwrap();

        assert!(matches!(cli.command, Commands::Check { strict: true }));
        assert_eq!(cli.mongodb_uri.as_deref(), Some("mongodb://db:27017"));
        assert_eq!(cli.database.as_deref(), Some("taxa_ci"));
    }

    #[test]
    fn test_parse_markers_output() {
        let cli =
            Cli::try_parse_from(["doclingtaxa-testenv", "markers", "--output", "json"]).unwrap();
        assert!(matches!(cli.command, Commands::Markers { output: OutputFormat::Json }));
    }

    #[tokio::test]
    async fn test_clean_and_teardown_target_configured_database() {
        use crate::config::DatabaseIsolation;
        use crate::storage::collection_counts;
        use mongodb::bson::{doc, Document};

        let mut config = TestEnvConfig::from_env().unwrap();
        config.mongodb.database_name =
            format!("doclingtaxa_cli_{}", &uuid::Uuid::new_v4().simple().to_string()[..8]);
        config.mongodb.isolation = DatabaseIsolation::PerWorker;

        let session = crate::require_available!(operator_session(&config).await);
        assert_eq!(session.database_name(), config.mongodb.database_name);
        session
            .database()
            .collection::<Document>("documents")
            .insert_one(doc! { "file": "monografia_01.pdf" })
            .await
            .unwrap();

        handle_clean(&config, OutputFormat::Json).await.unwrap();
        let counts = collection_counts(&session.database()).await.unwrap();
        assert_eq!(counts.get("documents"), Some(&0), "clean must empty the configured database");

        handle_teardown(&config).await.unwrap();
        let databases = session.client().list_database_names().await.unwrap();
        assert!(!databases.contains(&config.mongodb.database_name));

        session.close().await;
    }

    #[test]
    fn test_markers_render_every_format() {
        for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Yaml] {
            assert!(handle_markers(format).is_ok());
        }
    }
}
