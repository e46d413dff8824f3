//! IKE_SA_INIT configuration

use super::proposal::IkeProposal;
use crate::host::Host;
use crate::Result;

/// Parameters for the IKE_SA_INIT exchange between two endpoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitConfig {
    local: Host,
    remote: Host,
    proposals: Vec<IkeProposal>,
}

impl InitConfig {
    /// Create for a pair of endpoints
    pub fn new(local: Host, remote: Host) -> Self {
        InitConfig {
            local,
            remote,
            proposals: Vec::new(),
        }
    }

    /// Create from address strings
    pub fn from_strings(local: &str, remote: &str, local_port: u16, remote_port: u16) -> Result<Self> {
        Ok(InitConfig::new(
            Host::new(local, local_port)?,
            Host::new(remote, remote_port)?,
        ))
    }

    /// Add an IKE proposal
    pub fn add_proposal(mut self, proposal: IkeProposal) -> Self {
        self.proposals.push(proposal);
        self
    }

    /// Our endpoint
    pub fn local_host(&self) -> &Host {
        &self.local
    }

    /// Peer endpoint
    pub fn remote_host(&self) -> &Host {
        &self.remote
    }

    /// Proposals in preference order
    pub fn proposals(&self) -> &[IkeProposal] {
        &self.proposals
    }

    /// Pick the first offered proposal we also support
    pub fn select_proposal(&self, offered: &[IkeProposal]) -> Option<IkeProposal> {
        offered
            .iter()
            .find(|candidate| self.proposals.contains(candidate))
            .copied()
    }
}
