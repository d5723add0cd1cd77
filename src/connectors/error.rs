//! Connector Error Types
//!
//! Unified error handling for the wallet connector layer.

use std::time::Duration;

use super::ConnectorKind;

/// Errors that can occur when connecting to a wallet
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConnectorError {
    /// No injected provider was found for the requested wallet brand
    #[error("no injected provider available for this wallet")]
    ProviderUnavailable,

    /// A required configuration value is missing
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// The operation is not supported by the bound connector variant
    #[error("operation `{operation}` is not supported by the {variant} connector")]
    UnsupportedOperation {
        variant: ConnectorKind,
        operation: &'static str,
    },

    /// The remote wallet declined the session
    #[error("session rejected: {0}")]
    SessionRejected(String),

    /// Session negotiation did not complete in time
    #[error("session negotiation timed out after {0:?}")]
    SessionTimeout(Duration),

    /// The provider or relay returned a malformed or unexpected response
    #[error("protocol error: {0}")]
    Protocol(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConnectorError::UnsupportedOperation {
            variant: ConnectorKind::Injected,
            operation: "connect_with_qr_code",
        };
        assert_eq!(
            err.to_string(),
            "operation `connect_with_qr_code` is not supported by the injected connector"
        );

        let err = ConnectorError::MissingConfiguration("relay project id".to_string());
        assert!(err.to_string().contains("relay project id"));
    }
}
