//! Error types for IKE configuration operations
//!
//! Lookups report misses as values ([`Error::ConfigNotFound`],
//! [`Error::CredentialNotFound`]) so the protocol layer can decide whether a
//! miss is fatal to the exchange.

use keel_platform::KeelError;
use std::fmt;

/// Result type for IKE configuration operations
pub type Result<T> = std::result::Result<T, Error>;

/// IKE configuration errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No policy entry satisfies a resolution query
    ConfigNotFound(String),

    /// No credential is registered for an identity
    CredentialNotFound(String),

    /// Retransmit count exceeds the configured bound
    RetransmitLimitExceeded {
        /// Requested retransmit count
        count: u32,
        /// Configured maximum
        max: u32,
    },

    /// Key material could not be parsed
    InvalidKey(String),

    /// Identity could not be parsed
    InvalidIdentity(String),

    /// Host address could not be parsed
    InvalidHost(String),

    /// Invalid parameter
    InvalidParameter(String),

    /// Handle does not belong to this registry
    InvalidHandle(String),
}

impl Error {
    /// True for the lookup-miss kinds
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ConfigNotFound(_) | Error::CredentialNotFound(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigNotFound(what) => write!(f, "No configuration found for {}", what),
            Error::CredentialNotFound(id) => write!(f, "No credential found for {}", id),
            Error::RetransmitLimitExceeded { count, max } => {
                write!(
                    f,
                    "Retransmit limit exceeded: attempt {} of at most {}",
                    count, max
                )
            }
            Error::InvalidKey(msg) => write!(f, "Invalid key material: {}", msg),
            Error::InvalidIdentity(msg) => write!(f, "Invalid identity: {}", msg),
            Error::InvalidHost(msg) => write!(f, "Invalid host: {}", msg),
            Error::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            Error::InvalidHandle(msg) => write!(f, "Invalid handle: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<Error> for KeelError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidKey(_) => KeelError::Security(err.to_string()),
            _ => KeelError::Config(err.to_string()),
        }
    }
}
