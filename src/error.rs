use reqwest::StatusCode;
use thiserror::Error;

use crate::form::FormErrors;

#[derive(Error, Debug)]
pub enum ConsoleError {
    // Configuration errors
    #[error("Invalid config: {message}")]
    ConfigValidation { message: String },

    // Token storage errors
    #[error("Failed to save session to '{path}': {source}")]
    StorageSave {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load session from '{path}': {source}")]
    StorageLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse session file '{path}': {source}")]
    StorageParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    // Form errors
    #[error("Form is invalid: {0}")]
    Validation(FormErrors),

    // API errors
    /// A protected endpoint rejected the bearer token (HTTP 401).
    #[error("Session expired or invalid, please log in again")]
    Unauthorized,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("API error ({status}): {detail}")]
    Api { status: StatusCode, detail: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid API base URL '{url}': {message}")]
    BaseUrl { url: String, message: String },

    #[error("Record not found: {id}")]
    EntryNotFound { id: String },

    // Generic errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ConsoleError {
    /// Message suitable for showing to the user as-is.
    ///
    /// API errors surface the server-supplied `detail` without the status prefix.
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::Api { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ConsoleError::Unauthorized)
    }
}

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        ConsoleError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        ConsoleError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<FormErrors> for ConsoleError {
    fn from(errors: FormErrors) -> Self {
        ConsoleError::Validation(errors)
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;
