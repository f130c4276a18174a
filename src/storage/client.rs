//! # MongoDB Client Management
//!
//! Provides client creation and connection validation for the test database.

use crate::config::MongoConfig;
use crate::errors::{DoclingtaxaError, Result};
use mongodb::{options::ClientOptions, Client};

/// Create a MongoDB client with the specified configuration.
///
/// Client construction is lazy: no connection is opened until the first
/// operation, so a successful return says nothing about reachability. Use
/// [`crate::storage::check_connection`] for that.
pub async fn create_client(config: &MongoConfig) -> Result<Client> {
    validate_config(config)?;

    let mut options = ClientOptions::parse(&config.uri).await.map_err(|e| {
        DoclingtaxaError::database(
            e,
            format!("Invalid MongoDB connection string: {}", sanitize_uri(&config.uri)),
        )
    })?;

    options.app_name = Some(config.app_name.clone());
    options.server_selection_timeout = Some(config.timeout());
    options.connect_timeout = Some(config.timeout());

    let client = Client::with_options(options).map_err(|e| {
        tracing::error!(error = %e, uri = %sanitize_uri(&config.uri), "Failed to create MongoDB client");
        DoclingtaxaError::database(
            e,
            format!("Failed to create MongoDB client: {}", sanitize_uri(&config.uri)),
        )
    })?;

    tracing::debug!(
        uri = %sanitize_uri(&config.uri),
        app_name = %config.app_name,
        timeout_ms = config.timeout().as_millis(),
        "MongoDB client created"
    );

    Ok(client)
}

/// Validate client configuration
fn validate_config(config: &MongoConfig) -> Result<()> {
    if config.uri.is_empty() {
        return Err(DoclingtaxaError::validation("MongoDB URI cannot be empty"));
    }

    if !config.uri.starts_with("mongodb://") && !config.is_srv() {
        return Err(DoclingtaxaError::validation(
            "MongoDB URI must start with 'mongodb://' or 'mongodb+srv://'",
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(DoclingtaxaError::validation("timeout must be greater than 0"));
    }

    Ok(())
}

/// Sanitize a MongoDB URI for logging (remove credentials)
pub fn sanitize_uri(uri: &str) -> String {
    if let Ok(parsed) = url::Url::parse(uri) {
        if parsed.password().is_some() || !parsed.username().is_empty() {
            let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();
            return format!(
                "{}://***:***@{}{}{}",
                parsed.scheme(),
                parsed.host_str().unwrap_or("unknown"),
                port,
                parsed.path()
            );
        }
        return uri.to_string();
    }

    // Seed lists ("host1:27017,host2:27017") are not valid URLs; mask userinfo by hand.
    match (uri.find("://"), uri.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}***:***{}", &uri[..scheme_end + 3], &uri[at..])
        }
        _ => uri.to_string(),
    }
}
