//! Error types for Keel

use std::fmt;

/// Unified error type for all Keel operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeelError {
    /// Configuration error
    Config(String),

    /// Security error (key material, authentication, etc.)
    Security(String),
}

impl fmt::Display for KeelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeelError::Config(msg) => write!(f, "Configuration error: {}", msg),
            KeelError::Security(msg) => write!(f, "Security error: {}", msg),
        }
    }
}

impl std::error::Error for KeelError {}

/// Result type for Keel operations
pub type KeelResult<T> = Result<T, KeelError>;
