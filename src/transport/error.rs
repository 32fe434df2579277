//! Transport error types

use thiserror::Error;

/// Transport error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Network, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Timeout, message)
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Server(status), message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Malformed, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::Io, message)
    }

    pub(crate) fn from_reqwest(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(format!("Request timeout: {e}"))
        } else if e.is_connect() {
            Self::network(format!("Connection failed: {e}"))
        } else {
            Self::network(format!("Request failed: {e}"))
        }
    }

    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        Self::server(status.as_u16(), format!("HTTP {status}: {body}"))
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Connection refused, reset, DNS - retryable
    Network,
    /// Request exceeded the client timeout - retryable
    Timeout,
    /// Non-2xx response
    Server(u16),
    /// 2xx response that is not a valid reply
    Malformed,
    /// Local file could not be read
    Io,
}

impl TransportErrorKind {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network | Self::Timeout => true,
            Self::Server(status) => *status >= 500,
            Self::Malformed | Self::Io => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(TransportErrorKind::Network.is_retryable());
        assert!(TransportErrorKind::Timeout.is_retryable());
        assert!(TransportErrorKind::Server(503).is_retryable());
        assert!(!TransportErrorKind::Server(422).is_retryable());
        assert!(!TransportErrorKind::Malformed.is_retryable());
    }

    #[test]
    fn test_status_error_keeps_code() {
        let err = TransportError::from_status(reqwest::StatusCode::BAD_GATEWAY, "upstream");
        assert_eq!(err.kind, TransportErrorKind::Server(502));
        assert!(err.message.contains("upstream"));
    }
}
