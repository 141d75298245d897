//! # Error Types
//!
//! Custom error types for Bittle Bridge using `thiserror`.

use std::time::Duration;

use thiserror::Error;

/// Main error type for Bittle Bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No input device was available at startup
    #[error("No controller found")]
    NoController,

    /// Neither WiFi nor Bluetooth was selected
    #[error("No connection method selected (enable connect_wifi or connect_bluetooth)")]
    NoTransport,

    /// Controller I/O errors (device read failures, enumeration problems)
    #[error("Controller error: {0}")]
    Controller(String),

    /// Button index with no mapped action command
    #[error("Button {0} has no mapped action")]
    UnmappedButton(usize),

    /// WiFi connectivity check failed before a send
    #[error("Robot is not connected")]
    NotConnected,

    /// Transport write/read failures
    #[error("Robot link error: {0}")]
    Link(String),

    /// A Robot Link call exceeded its time bound
    #[error("Robot link call timed out after {0:?}")]
    LinkTimeout(Duration),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Returns true for the fatal startup conditions that prevent the loop from becoming active.
    #[must_use]
    pub fn is_startup(&self) -> bool {
        matches!(self, Self::NoController | Self::NoTransport)
    }
}

/// Result type alias for Bittle Bridge
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_errors() {
        assert!(BridgeError::NoController.is_startup());
        assert!(BridgeError::NoTransport.is_startup());
        assert!(!BridgeError::NotConnected.is_startup());
        assert!(!BridgeError::UnmappedButton(7).is_startup());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(BridgeError::NoController.to_string(), "No controller found");
        assert_eq!(
            BridgeError::UnmappedButton(9).to_string(),
            "Button 9 has no mapped action"
        );
        let timeout = BridgeError::LinkTimeout(Duration::from_millis(250));
        assert!(timeout.to_string().contains("250ms"));
    }
}
