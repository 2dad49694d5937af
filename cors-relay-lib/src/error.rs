use thiserror::Error;

/// Errors that stop the relay from starting or running
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WORKER_ENDPOINT must be set when RELAY_MODE=worker")]
    MissingWorkerEndpoint,

    #[error("Invalid worker endpoint '{endpoint}': {reason}")]
    InvalidWorkerEndpoint { endpoint: String, reason: String },

    #[error("Invalid CORSANYWHERE_RATELIMIT: {0} (expected \"<max-requests> <period-minutes> [exempt ...]\")")]
    InvalidRateLimit(String),

    #[error("Failed to build upstream client: {0}")]
    Client(String),
}

pub type Result<T> = std::result::Result<T, RelayError>;
