use std::{error::Error as StdError, fmt, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrainError {
    #[error("Provider call failed: {0}")]
    ProviderCall(#[from] ProviderError),
    #[error("Response is not valid JSON '{output}': {reason}")]
    ResponseParse { output: String, reason: String },
    #[error("Response violates output schema '{output}': {violation}")]
    SchemaValidation { output: String, violation: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Unknown model: {0}")]
    UnknownModel(String),
    #[error("Failed to load brief '{}': {source}", path.display())]
    BriefLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure reported by a [`ChatTransport`](crate::ChatTransport).
///
/// The core never inspects or rewrites these; they reach the caller inside
/// [`BrainError::ProviderCall`] exactly as the transport produced them.
#[derive(Debug)]
pub enum ProviderError {
    Transport(Box<dyn StdError + Send + Sync>),
    Status { status: u16, message: String },
    Decode(String),
    EmptyResponse,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Transport(error) => write!(f, "transport error: {error}"),
            ProviderError::Status { status, message } => {
                write!(f, "http status {status}: {message}")
            }
            ProviderError::Decode(message) => write!(f, "undecodable response body: {message}"),
            ProviderError::EmptyResponse => write!(f, "no choices returned"),
        }
    }
}

impl StdError for ProviderError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ProviderError::Transport(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}
