//! Configuration for everything after IKE_SA_INIT

use super::proposal::ChildProposal;
use super::traffic_selector::TrafficSelector;
use crate::identity::Identification;
use crate::{Error, Result};
use std::time::Duration;

/// Default Child SA lifetime (30 seconds)
pub const DEFAULT_SA_LIFETIME: Duration = Duration::from_millis(30_000);

/// Authentication method (RFC 7296 Section 3.8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AuthMethod {
    /// RSA Digital Signature
    RsaDigitalSignature = 1,
    /// Shared Key Message Integrity Code
    SharedKeyMic = 2,
}

/// Peer identities, authentication and Child SA parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaConfig {
    local_id: Identification,
    remote_id: Identification,
    auth_method: AuthMethod,
    lifetime: Duration,
    ts_initiator: Vec<TrafficSelector>,
    ts_responder: Vec<TrafficSelector>,
    proposals: Vec<ChildProposal>,
}

impl SaConfig {
    /// Create builder
    pub fn builder() -> SaConfigBuilder {
        SaConfigBuilder::new()
    }

    /// Our identity
    pub fn local_id(&self) -> &Identification {
        &self.local_id
    }

    /// Peer identity
    pub fn remote_id(&self) -> &Identification {
        &self.remote_id
    }

    /// How we authenticate
    pub fn auth_method(&self) -> AuthMethod {
        self.auth_method
    }

    /// Child SA lifetime
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Initiator traffic selectors
    pub fn initiator_selectors(&self) -> &[TrafficSelector] {
        &self.ts_initiator
    }

    /// Responder traffic selectors
    pub fn responder_selectors(&self) -> &[TrafficSelector] {
        &self.ts_responder
    }

    /// Child SA proposals in preference order
    pub fn proposals(&self) -> &[ChildProposal] {
        &self.proposals
    }

    /// Pick the first offered proposal compatible with one of ours
    pub fn select_proposal(&self, offered: &[ChildProposal]) -> Option<ChildProposal> {
        offered
            .iter()
            .find(|candidate| self.proposals.iter().any(|own| own.is_compatible(candidate)))
            .cloned()
    }
}

/// Builder for SaConfig
#[derive(Default)]
pub struct SaConfigBuilder {
    local_id: Option<Identification>,
    remote_id: Option<Identification>,
    auth_method: Option<AuthMethod>,
    lifetime: Option<Duration>,
    ts_initiator: Vec<TrafficSelector>,
    ts_responder: Vec<TrafficSelector>,
    proposals: Vec<ChildProposal>,
}

impl SaConfigBuilder {
    /// Create new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set local identity
    pub fn with_local_id(mut self, id: Identification) -> Self {
        self.local_id = Some(id);
        self
    }

    /// Set remote identity
    pub fn with_remote_id(mut self, id: Identification) -> Self {
        self.remote_id = Some(id);
        self
    }

    /// Set authentication method
    pub fn with_auth_method(mut self, method: AuthMethod) -> Self {
        self.auth_method = Some(method);
        self
    }

    /// Set Child SA lifetime
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    /// Add an initiator traffic selector
    pub fn add_initiator_selector(mut self, ts: TrafficSelector) -> Self {
        self.ts_initiator.push(ts);
        self
    }

    /// Add a responder traffic selector
    pub fn add_responder_selector(mut self, ts: TrafficSelector) -> Self {
        self.ts_responder.push(ts);
        self
    }

    /// Add a Child SA proposal
    pub fn add_proposal(mut self, proposal: ChildProposal) -> Self {
        self.proposals.push(proposal);
        self
    }

    /// Build SaConfig with validation
    pub fn build(self) -> Result<SaConfig> {
        let lifetime = self.lifetime.unwrap_or(DEFAULT_SA_LIFETIME);
        if lifetime.is_zero() {
            return Err(Error::InvalidParameter("SA lifetime cannot be zero".into()));
        }

        Ok(SaConfig {
            local_id: self
                .local_id
                .ok_or_else(|| Error::InvalidParameter("local_id is required".into()))?,
            remote_id: self
                .remote_id
                .ok_or_else(|| Error::InvalidParameter("remote_id is required".into()))?,
            auth_method: self.auth_method.unwrap_or(AuthMethod::SharedKeyMic),
            lifetime,
            ts_initiator: self.ts_initiator,
            ts_responder: self.ts_responder,
            proposals: self.proposals,
        })
    }
}
