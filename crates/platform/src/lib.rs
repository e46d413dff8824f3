//! # Keel Platform
//!
//! Core platform types and traits shared by the Keel IKE daemon crates.
//!
//! This crate provides:
//! - Unified error types (`KeelError`, `KeelResult`)
//! - The `SecurityModule` lifecycle trait
//!
//! # Examples
//!
//! ```
//! use keel_platform::{KeelError, KeelResult};
//!
//! fn load_policies() -> KeelResult<usize> {
//!     Err(KeelError::Config("no policies configured".to_string()))
//! }
//!
//! assert!(load_policies().is_err());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod error;
pub mod traits;

pub use error::{KeelError, KeelResult};
pub use traits::SecurityModule;
