//! Error types for sqlkit

use thiserror::Error;

/// Boxed error produced by a driver behind a [`Connector`](crate::pool::Connector).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for sqlkit operations
pub type DbResult<T> = Result<T, DbError>;

/// Error types for configuration and connection handling.
///
/// The query builder never produces these; it degrades silently instead.
#[derive(Debug, Error)]
pub enum DbError {
    /// Initial connectivity probe failed while constructing a manager
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error reported by the underlying driver
    #[error("Driver error: {0}")]
    Driver(#[source] BoxError),

    /// Pool error other than a driver failure
    #[error("Pool error: {0}")]
    Pool(String),

    /// Every attempt in the retry budget failed
    #[error("failed to acquire connection after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<DbError>,
    },

    /// The caller's deadline elapsed during checkout or ping
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// `release` was called without a connection
    #[error("a connection must be given in order to release it")]
    MissingConnection,

    /// Configuration could not be read or has the wrong shape
    #[error("Config error: {0}")]
    Config(String),

    /// Malformed duration text
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
}

impl DbError {
    /// Wrap a driver error.
    pub fn driver<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Driver(Box::new(err))
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this is a deadline error
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded)
    }

    /// Check if acquisition gave up after exhausting its retries
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }

    /// The error of the final attempt, when this is a retry exhaustion.
    pub fn last_attempt_error(&self) -> Option<&DbError> {
        match self {
            Self::RetriesExhausted { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for DbError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}
