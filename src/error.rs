//! Error types for the rotating pool manager.
//!
//! All errors use `thiserror`. The transient/fatal split drives the retry
//! policy: only errors matching a known transient signature are retried,
//! everything else surfaces on first occurrence.

use std::time::Duration;

use sqlx::mysql::MySqlDatabaseError;
use thiserror::Error;

/// Boxed error type accepted from credential sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Client is closed")]
    Closed,

    #[error("Credential refresh failed: {message}")]
    CredentialRefresh { message: String },

    #[error("Connection failed: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<sqlx::Error>,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("{op} failed after {attempts} attempts in {elapsed_ms}ms: {source}")]
    RetriesExhausted {
        op: String,
        attempts: u32,
        elapsed_ms: u64,
        #[source]
        source: Box<PoolError>,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl PoolError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a credential refresh error.
    pub fn credential_refresh(message: impl Into<String>) -> Self {
        Self::CredentialRefresh {
            message: message.into(),
        }
    }

    /// Create a connection error, optionally carrying the driver error.
    pub fn connection(message: impl Into<String>, source: Option<sqlx::Error>) -> Self {
        Self::Connection {
            message: message.into(),
            source,
        }
    }

    /// Wrap the last error of an exhausted retry loop.
    pub fn retries_exhausted(
        op: impl Into<String>,
        attempts: u32,
        elapsed: Duration,
        source: PoolError,
    ) -> Self {
        Self::RetriesExhausted {
            op: op.into(),
            attempts,
            elapsed_ms: elapsed.as_millis() as u64,
            source: Box::new(source),
        }
    }

    /// Check if this error is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection { .. } => true,
            Self::Database(err) => is_transient(err),
            _ => false,
        }
    }
}

/// Result type alias for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

/// Substrings that mark a driver error as transient. Only clearly
/// self-healing faults are listed; anything else is treated as fatal.
const TRANSIENT_SIGNATURES: &[&str] = &[
    "connection refused",
    "connection reset",
    "broken pipe",
    "no such host",
    "network is unreachable",
    "i/o timeout",
    "eof",
    "bad connection",
    "invalid connection",
    "server has gone away",
];

/// Classify a driver error as transient (retryable) or fatal.
///
/// I/O and pool-acquire timeouts are transient by category. MySQL server
/// errors 1213 (deadlock) and 1205 (lock wait timeout) are transient by
/// error number. Everything else falls back to the signature list.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db_err) => {
            if let Some(mysql_err) = db_err.try_downcast_ref::<MySqlDatabaseError>() {
                if matches!(mysql_err.number(), 1205 | 1213) {
                    return true;
                }
            }
            is_transient_message(db_err.message())
        }
        other => is_transient_message(&other.to_string()),
    }
}

fn is_transient_message(message: &str) -> bool {
    let message = message.to_lowercase();
    TRANSIENT_SIGNATURES
        .iter()
        .any(|signature| message.contains(signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = PoolError::config("pool_count must be at least 2");
        assert!(err.to_string().contains("Invalid configuration"));
        assert!(err.to_string().contains("pool_count"));
    }

    #[test]
    fn test_closed_error_display() {
        assert_eq!(PoolError::Closed.to_string(), "Client is closed");
    }

    #[test]
    fn test_connection_error_is_retryable() {
        let err = PoolError::connection("handshake failed", None);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_io_error_is_transient() {
        let io_err = std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        );
        let err = PoolError::from(sqlx::Error::from(io_err));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_transient_signatures() {
        assert!(is_transient_message("MySQL server has gone away"));
        assert!(is_transient_message("read tcp 10.0.0.1:3306: i/o timeout"));
        assert!(is_transient_message("unexpected EOF"));
        assert!(is_transient_message("driver: bad connection"));
        assert!(is_transient_message("dial tcp: connection refused"));
    }

    #[test]
    fn test_fatal_messages_are_not_transient() {
        assert!(!is_transient_message("syntax error near 'SELCT'"));
        assert!(!is_transient_message("duplicate entry '1' for key 'PRIMARY'"));
        assert!(!is_transient_message("access denied for user 'app'"));
    }

    #[test]
    fn test_fatal_errors_are_not_retried() {
        assert!(!PoolError::Closed.is_retryable());
        assert!(!PoolError::Cancelled.is_retryable());
        assert!(!PoolError::config("bad").is_retryable());
        assert!(!PoolError::credential_refresh("vault down").is_retryable());
    }

    #[test]
    fn test_retries_exhausted_preserves_source() {
        let inner = PoolError::connection("handshake failed", None);
        let err = PoolError::retries_exhausted("insert_user", 4, Duration::from_millis(700), inner);
        assert!(err.to_string().contains("insert_user"));
        assert!(err.to_string().contains("4 attempts"));
        // The chain stays walkable for operators unwrapping causes.
        assert!(std::error::Error::source(&err).is_some());
        // An exhausted budget is final, not retryable again.
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_row_not_found_is_fatal() {
        let err = PoolError::from(sqlx::Error::RowNotFound);
        assert!(!err.is_retryable());
    }
}
