use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by lookups, rendering and history persistence.
///
/// None of these are fatal: the interaction loops report them and carry on.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// Transport failure, including the request timeout.
    #[error("Failed to reach weather provider: {0}")]
    Network(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("Weather provider returned status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The payload is missing a path or field the report needs.
    #[error("Malformed weather payload: {0}")]
    MalformedPayload(String),

    #[error("History file {path} could not be accessed: {source}")]
    HistoryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("History file {path} is not a JSON array of strings: {source}")]
    HistoryFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Coarse error classes shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    MalformedPayload,
    Persistence,
    InvalidInput,
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::Network(_) | WeatherError::HttpStatus { .. } => ErrorKind::Network,
            WeatherError::MalformedPayload(_) => ErrorKind::MalformedPayload,
            WeatherError::HistoryIo { .. } | WeatherError::HistoryFormat { .. } => {
                ErrorKind::Persistence
            }
            WeatherError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn malformed(what: impl Into<String>) -> Self {
        WeatherError::MalformedPayload(what.into())
    }
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
