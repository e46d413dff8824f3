//! IKEv2 configuration for the Keel daemon.
//!
//! This crate answers the questions an IKEv2 negotiation asks of its
//! configuration:
//!
//! - **Policies** - which init config and SA config apply, looked up by name,
//!   by endpoint addresses or by peer identity
//! - **Credentials** - preshared secrets and RSA keys by identity
//! - **Timeouts** - exponential retransmission backoff and the half-open
//!   IKE_SA lifetime
//!
//! Everything is loaded into an immutable [`Configuration`] snapshot which a
//! [`ConfigurationManager`] publishes atomically.
//!
//! # Example
//!
//! ```rust
//! use keel_ike::{defaults, ConfigurationManager, Host, ManagerSettings};
//!
//! let manager = ConfigurationManager::new(ManagerSettings::default()).unwrap();
//!
//! let mut builder = manager.builder();
//! defaults::load_default_config(&mut builder).unwrap();
//! manager.reload(builder.build());
//!
//! let config = manager.snapshot();
//! let local = Host::new("127.0.0.1", 500).unwrap();
//! let remote = Host::new("127.0.0.1", 500).unwrap();
//! let init = config.policies().resolve_by_hosts(&local, &remote).unwrap();
//! assert_eq!(config.policies().resolve_by_name("localhost").unwrap(), init);
//!
//! assert_eq!(config.retransmission().timeout_for(0).unwrap(), 3000);
//! ```
//!
//! # Security
//!
//! - Preshared secrets are zeroized when their snapshot is dropped
//! - RSA parsing is done by the `rsa` crate
//! - Secret material never reaches the log, only its length
//!
//! # References
//!
//! - [RFC 7296](https://datatracker.ietf.org/doc/html/rfc7296) - Internet Key Exchange Protocol Version 2

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod config;
pub mod configuration;
pub mod credentials;
pub mod defaults;
pub mod error;
pub mod host;
pub mod identity;
pub mod keys;
pub mod logging;
pub mod manager;
pub mod registry;
pub mod retransmit;
pub mod settings;

pub use configuration::{Configuration, ConfigurationBuilder};
pub use credentials::CredentialStore;
pub use error::{Error, Result};
pub use host::Host;
pub use identity::{IdType, Identification};
pub use keys::{RsaPrivateKey, RsaPublicKey};
pub use logging::Diagnostics;
pub use manager::ConfigurationManager;
pub use registry::{InitConfigId, PolicyEntry, PolicyRegistry, SaConfigId};
pub use retransmit::RetransmissionPolicy;
pub use settings::{ManagerSettings, ManagerSettingsBuilder};
