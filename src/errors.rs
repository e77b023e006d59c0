//! Unified error types for `TutorTracker`.
//!
//! Errors fall into three groups: configuration problems detected at startup or
//! first use, failures reported by the tabular-data service, and mapping failures
//! when a fetched record is missing a required field.

use thiserror::Error;

/// Every failure the library can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or placeholder credentials, or an unreadable settings file
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },

    /// The table or record does not exist in the tabular-data service
    #[error("Not found: {resource}")]
    NotFound {
        /// Table name or `table/record-id` that was requested
        resource: String,
    },

    /// The access token was rejected or lacks permission for the base
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Message returned by the service
        message: String,
    },

    /// The request never reached the service or the connection dropped
    #[error("Network error: {message}")]
    Network {
        /// Transport error description
        message: String,
    },

    /// Any other non-success response, or a body that could not be decoded
    #[error("Service error ({status}): {message}")]
    Service {
        /// HTTP status code, 0 when the failure happened after the response
        status: u16,
        /// Message returned by the service
        message: String,
    },

    /// A fetched record lacks a required field or holds an unusable value
    #[error("Record {record_id}: field '{field}' {reason}")]
    Mapping {
        /// Service-assigned id of the offending record
        record_id: String,
        /// Field name as stored in the service
        field: String,
        /// Why the value could not be mapped
        reason: String,
    },

    /// A draft failed a required-field check before being written
    #[error("Validation error: {message}")]
    Validation {
        /// Which check failed
        message: String,
    },

    /// A negative or non-finite money amount
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// File-system failure (session file, settings file)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Short message suitable for showing to the person at the keyboard.
    ///
    /// Each service failure category gets its own wording so the user can tell
    /// a bad token apart from a missing table or a dropped connection.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => format!("Setup required: {message}"),
            Self::NotFound { resource } => format!(
                "Could not find '{resource}'. Check the base id and that the table names match exactly."
            ),
            Self::Unauthorized { .. } => {
                "Authentication failed. Check your personal access token and its access to this base."
                    .to_string()
            }
            Self::Network { .. } => {
                "Could not reach the data service. Check your internet connection.".to_string()
            }
            Self::Service { status, .. } => {
                format!("The data service could not complete the request (HTTP {status}). Please try again.")
            }
            Self::Mapping { field, .. } => {
                format!("A record is missing required data ('{field}').")
            }
            Self::Validation { message } => message.clone(),
            Self::InvalidAmount { amount } => {
                format!("Amounts must be zero or more (got {amount}).")
            }
            Self::Io(_) | Self::Json(_) => {
                "A local file could not be read or written.".to_string()
            }
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
