//! Structured logging for configuration lookups
//!
//! Provides structured, contextual logging using the `tracing` framework.
//! Every component routes its events through a [`Diagnostics`] handle, so a
//! caller can inject its own subscriber per registry instead of relying on
//! process-wide state.
//!
//! # Log Levels
//!
//! - **TRACE**: Per-entry match detail during scans
//! - **DEBUG**: Lookups, registrations, credential loading
//! - **INFO**: Snapshot publication and lifecycle events
//! - **WARN**: Retransmit limit reached, rejected key material
//!
//! Secret material is never logged, only its length.
//!
//! # Example
//!
//! ```no_run
//! use keel_ike::logging::Diagnostics;
//!
//! let subscriber = tracing_subscriber::fmt()
//!     .with_env_filter("keel_ike=debug")
//!     .finish();
//! let diagnostics = Diagnostics::with_dispatch(tracing::Dispatch::new(subscriber));
//!
//! diagnostics.emit(|| {
//!     keel_ike::logging::log_retransmit_limit(6, 5);
//! });
//! ```

use std::fmt::Display;
use tracing::{debug, info, trace, warn, Dispatch};

/// Optional diagnostic sink
///
/// Without a dispatch, events go to whatever subscriber is current for the
/// calling thread.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    dispatch: Option<Dispatch>,
}

impl Diagnostics {
    /// Use the ambient subscriber
    pub fn ambient() -> Self {
        Self::default()
    }

    /// Route all events to `dispatch`
    pub fn with_dispatch(dispatch: Dispatch) -> Self {
        Diagnostics {
            dispatch: Some(dispatch),
        }
    }

    /// True if a dedicated dispatch was injected
    pub fn is_injected(&self) -> bool {
        self.dispatch.is_some()
    }

    /// Run `f` with this sink as the default subscriber
    pub fn emit<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, f),
            None => f(),
        }
    }
}

/// Log registration of a named policy
///
/// # Arguments
///
/// * `name` - Policy name
/// * `init_config` - Arena index of the init config
/// * `sa_config` - Arena index of the SA config
/// * `policies` - Number of policies after registration
pub fn log_config_registered(name: &str, init_config: usize, sa_config: usize, policies: usize) {
    debug!(
        policy = name,
        init_config = init_config,
        sa_config = sa_config,
        policies = policies,
        "Policy registered"
    );
}

/// Log a name based lookup
pub fn log_name_lookup(kind: &str, name: &str, found: bool) {
    debug!(kind = kind, policy = name, found = found, "Policy lookup by name");
}

/// Log the start of an address based lookup
///
/// # Arguments
///
/// * `local` - Our address
/// * `remote` - Peer address
pub fn log_host_lookup(local: impl Display, remote: impl Display) {
    debug!(
        local = %local,
        remote = %remote,
        "Getting config for hosts"
    );
}

/// Log a scanned entry whose remote host matched exactly
pub fn log_host_candidate(policy: &str, remote: impl Display) {
    trace!(
        policy = policy,
        remote = %remote,
        "Config entry with matching remote host"
    );
}

/// Log the outcome of an address based lookup
///
/// # Arguments
///
/// * `policy` - Name of the accepted policy, or None if nothing matched
pub fn log_host_match(policy: Option<&str>) {
    match policy {
        Some(name) => debug!(policy = name, "Host lookup matched"),
        None => debug!("Host lookup found no matching policy"),
    }
}

/// Log an identity scoped SA config lookup
///
/// # Arguments
///
/// * `remote_id` - Peer identity
/// * `local_id` - Our identity, if the caller constrained it
/// * `policy` - Name of the accepted policy, or None if nothing matched
pub fn log_sa_lookup(remote_id: impl Display, local_id: Option<&dyn Display>, policy: Option<&str>) {
    let local = local_id.map(|id| id.to_string());
    debug!(
        remote_id = %remote_id,
        local_id = local.as_deref().unwrap_or("<any>"),
        policy = policy.unwrap_or("<none>"),
        found = policy.is_some(),
        "SA config lookup by identity"
    );
}

/// Log a credential being loaded
///
/// # Arguments
///
/// * `kind` - "psk", "rsa-public" or "rsa-private"
/// * `identity` - Owner identity
/// * `size_bytes` - Secret length or key modulus size in bytes
pub fn log_credential_added(kind: &str, identity: impl Display, size_bytes: usize) {
    debug!(
        kind = kind,
        identity = %identity,
        size_bytes = size_bytes,
        "Credential added"
    );
}

/// Log key material the parser rejected
pub fn log_key_rejected(kind: &str, identity: impl Display, error: &str) {
    warn!(
        kind = kind,
        identity = %identity,
        error = error,
        "Key material rejected"
    );
}

/// Log a credential lookup
pub fn log_credential_lookup(kind: &str, identity: impl Display, found: bool) {
    debug!(
        kind = kind,
        identity = %identity,
        found = found,
        "Credential lookup"
    );
}

/// Log a computed retransmit timeout
pub fn log_retransmit_timeout(count: u32, timeout_ms: u64) {
    trace!(
        retransmit_count = count,
        timeout_ms = timeout_ms,
        "Retransmit timeout computed"
    );
}

/// Log a retransmit request past the configured bound
///
/// # Arguments
///
/// * `count` - Requested retransmit count
/// * `max` - Configured maximum
pub fn log_retransmit_limit(count: u32, max: u32) {
    warn!(
        retransmit_count = count,
        max_retransmit_count = max,
        "Retransmit limit exceeded - giving up on exchange"
    );
}

/// Log publication of a new configuration snapshot
///
/// # Arguments
///
/// * `policies` - Number of policy entries
/// * `secrets` - Number of preshared secrets
/// * `keys` - Number of RSA keys (public and private)
pub fn log_config_reloaded(policies: usize, secrets: usize, keys: usize) {
    info!(
        policies = policies,
        secrets = secrets,
        keys = keys,
        "Configuration snapshot published"
    );
}

/// Log a module lifecycle event
pub fn log_lifecycle(module: &str, event: &str) {
    info!(module = module, event = event, "Module lifecycle event");
}
