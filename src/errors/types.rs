//! # Error Types
//!
//! Error types for the doclingtaxa provisioner using `thiserror`.

/// Custom result type for doclingtaxa operations
pub type Result<T> = std::result::Result<T, DoclingtaxaError>;

/// Main error type for the doclingtaxa provisioner
#[derive(thiserror::Error, Debug)]
pub enum DoclingtaxaError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// MongoDB driver errors
    #[error("Database error: {context}")]
    Database {
        #[source]
        source: mongodb::error::Error,
        context: String,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// An external dependency could not be reached
    #[error("MongoDB not available: {reason}")]
    Unavailable { endpoint: String, reason: String },
}

impl DoclingtaxaError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), source: None }
    }

    /// Create a configuration error with source
    pub fn config_with_source<S: Into<String>>(
        message: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Config { message: message.into(), source: Some(source) }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create a database error with context
    pub fn database<S: Into<String>>(source: mongodb::error::Error, context: S) -> Self {
        Self::Database { source, context: context.into() }
    }

    /// Create an I/O error with context
    pub fn io<S: Into<String>>(source: std::io::Error, context: S) -> Self {
        Self::Io { source, context: context.into() }
    }

    /// Create a dependency-unavailable error
    pub fn unavailable<E: Into<String>, R: Into<String>>(endpoint: E, reason: R) -> Self {
        Self::Unavailable { endpoint: endpoint.into(), reason: reason.into() }
    }

    /// The dependency is absent; dependent tests should skip, not fail.
    pub fn is_dependency_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// The test environment itself is broken; dependent tests should fail.
    pub fn is_environment_misconfiguration(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::Validation { .. } | Self::Io { .. })
    }

    /// This error followed by every underlying cause, joined with `": "`.
    ///
    /// `Display` shows only the outermost context; driver failures such as a
    /// server selection timeout live in the source chain.
    pub fn detailed_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }

    /// Add context to an error (used by ErrorContext trait)
    pub(crate) fn add_context(&mut self, context: String) {
        match self {
            Self::Io { context: ref mut ctx, .. } | Self::Database { context: ref mut ctx, .. } => {
                *ctx = format!("{}: {}", context, ctx);
            }
            _ => {}
        }
    }
}

/// Attach caller context to fallible operations.
pub trait ErrorContext<T> {
    fn context<S: Into<String>>(self, context: S) -> Result<T>;
}

impl<T> ErrorContext<T> for Result<T> {
    fn context<S: Into<String>>(self, context: S) -> Result<T> {
        self.map_err(|mut e| {
            e.add_context(context.into());
            e
        })
    }
}

impl From<mongodb::error::Error> for DoclingtaxaError {
    fn from(error: mongodb::error::Error) -> Self {
        Self::Database { source: error, context: "MongoDB operation failed".to_string() }
    }
}

impl From<std::io::Error> for DoclingtaxaError {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<validator::ValidationErrors> for DoclingtaxaError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect();
        fields.sort();

        // Nested struct failures carry no direct field errors.
        if fields.is_empty() {
            return Self::validation(format!("Validation failed: {}", errors));
        }

        Self::validation(format!("Validation failed: {}", fields.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = DoclingtaxaError::config("MONGODB_TEST_URI is empty");
        assert!(matches!(error, DoclingtaxaError::Config { .. }));
        assert_eq!(error.to_string(), "Configuration error: MONGODB_TEST_URI is empty");
    }

    #[test]
    fn test_validation_error_field() {
        let error = DoclingtaxaError::validation_field("bad name", "database_name");
        if let DoclingtaxaError::Validation { field, .. } = error {
            assert_eq!(field, Some("database_name".to_string()));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_unavailable_message() {
        let error = DoclingtaxaError::unavailable("mongodb://localhost:27017", "connection refused");
        assert_eq!(error.to_string(), "MongoDB not available: connection refused");
        assert!(error.is_dependency_unavailable());
        assert!(!error.is_environment_misconfiguration());
    }

    #[test]
    fn test_io_is_misconfiguration() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error: DoclingtaxaError = io_error.into();
        assert!(matches!(error, DoclingtaxaError::Io { .. }));
        assert!(error.is_environment_misconfiguration());
        assert!(!error.is_dependency_unavailable());
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let error = DoclingtaxaError::io(io_error, "opening socket");

        assert_eq!(error.to_string(), "I/O error: opening socket");
        assert_eq!(error.detailed_message(), "I/O error: opening socket: connection refused");
    }

    #[test]
    fn test_detailed_message_without_source() {
        let error = DoclingtaxaError::validation("bad name");
        assert_eq!(error.detailed_message(), error.to_string());
    }

    #[test]
    fn test_error_context_prefixes_io() {
        let result: Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into());
        let error = result.context("creating sample_pdfs").unwrap_err();
        assert_eq!(error.to_string(), "I/O error: creating sample_pdfs: I/O operation failed");
    }
}
