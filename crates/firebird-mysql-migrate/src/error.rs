//! Error types for the migration library.

use thiserror::Error;

/// Main error type for migration operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Connection failure on either side (unreachable host, bad credentials)
    #[error("Connection error: {message}\n  Context: {context}")]
    Connection { message: String, context: String },

    /// Metadata query against the source failed
    #[error("Introspection failed for {object}: {message}")]
    Introspection { object: String, message: String },

    /// Target table creation failed
    #[error("Schema creation failed for table {table}: {message}")]
    SchemaCreation { table: String, message: String },

    /// Bulk load into a target table failed
    #[error("Insert failed for table {table}: {message}")]
    Insert { table: String, message: String },

    /// Migration was interrupted (SIGINT)
    #[error("Migration interrupted")]
    Interrupted,

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MigrateError {
    /// Create a Connection error with context about which side failed
    pub fn connection(message: impl Into<String>, context: impl Into<String>) -> Self {
        MigrateError::Connection {
            message: message.into(),
            context: context.into(),
        }
    }

    /// Create an Introspection error naming the object being inspected
    pub fn introspection(object: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::Introspection {
            object: object.into(),
            message: message.into(),
        }
    }

    /// Create a SchemaCreation error
    pub fn schema_creation(table: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::SchemaCreation {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Create an Insert error
    pub fn insert(table: impl Into<String>, message: impl Into<String>) -> Self {
        MigrateError::Insert {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        // Add error chain for wrapped errors
        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
