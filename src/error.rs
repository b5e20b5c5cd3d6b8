//! Error types for budget-view
//!
//! Centralized error handling using snafu for ergonomic error definitions.
//! Every variant is recoverable: callers either retry, correct input, or
//! keep showing the last good state.

use snafu::Snafu;
use std::collections::BTreeMap;
use std::fmt;

/// Validation messages keyed by the offending field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<&'static str, String>,
}

impl FieldErrors {
    /// Create an empty set of field errors
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a set holding a single field error
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Attach a message to a field, replacing any previous one
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// Message for a field, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Check whether a field has an error
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over `(field, message)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Convert into a `Result`, failing when any field has an error
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::ValidationFailure { errors: self })
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Main error type for the crate
#[derive(Debug, Snafu)]
pub enum Error {
    /// The request never produced a response (connect failure, timeout, ...)
    #[snafu(display("Network failure: {message}"))]
    NetworkFailure { message: String },

    /// The collaborator answered with a non-2xx status
    #[snafu(display("Server error ({status}): {message}"))]
    ServerError { status: u16, message: String },

    /// Client-side checks rejected the input before submission
    #[snafu(display("Validation failed: {errors}"))]
    ValidationFailure { errors: FieldErrors },

    /// Column key unknown to the view, or not usable for the operation
    #[snafu(display("Invalid column: {key}"))]
    InvalidColumn { key: String },

    /// Another row already holds the edit buffer
    #[snafu(display("Row {row_id} is already being edited"))]
    AlreadyEditing { row_id: String },

    /// A conflicting operation is still in flight
    #[snafu(display("Operation in progress: {operation}"))]
    OperationInProgress { operation: String },

    /// No row is being edited
    #[snafu(display("No row is being edited"))]
    NotEditing {},

    /// Row id not present in the source collection
    #[snafu(display("Row not found: {row_id}"))]
    RowNotFound { row_id: String },

    /// Response body could not be decoded
    #[snafu(display("Decode error: {message}"))]
    Decode { message: String },

    /// Invalid input or state transition
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (config files, export targets)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },

    /// CSV writer error
    #[snafu(display("CSV error: {source}"))]
    Csv { source: csv::Error },
}

impl Error {
    /// Shorthand for a single-field validation failure
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::ValidationFailure {
            errors: FieldErrors::single(field, message),
        }
    }

    /// Field errors carried by a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Error::ValidationFailure { errors } => Some(errors),
            _ => None,
        }
    }

    /// Whether the failure came from the collaborator round-trip
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::NetworkFailure { .. } | Error::ServerError { .. } | Error::Decode { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

impl From<csv::Error> for Error {
    fn from(source: csv::Error) -> Self {
        Error::Csv { source }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Decode {
                message: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Error::ServerError {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Error::NetworkFailure {
                message: err.to_string(),
            }
        }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
