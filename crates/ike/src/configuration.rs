//! Configuration snapshots
//!
//! A [`Configuration`] bundles everything the protocol layer reads while
//! negotiating: the policy registry, the credential store and the
//! retransmission policy. It is assembled once by a [`ConfigurationBuilder`]
//! and is read-only afterwards, so it can be shared between threads without
//! locking.

use crate::config::{InitConfig, SaConfig};
use crate::credentials::CredentialStore;
use crate::identity::Identification;
use crate::keys::{RsaPrivateKey, RsaPublicKey};
use crate::registry::{InitConfigId, PolicyRegistry, SaConfigId};
use crate::retransmit::RetransmissionPolicy;
use crate::settings::ManagerSettings;
use crate::Result;

/// Immutable set of policies, credentials and timeouts
#[derive(Debug, Default)]
pub struct Configuration {
    policies: PolicyRegistry,
    credentials: CredentialStore,
    retransmission: RetransmissionPolicy,
}

impl Configuration {
    /// Start a load phase using `settings`
    pub fn builder(settings: &ManagerSettings) -> ConfigurationBuilder {
        ConfigurationBuilder::new(settings)
    }

    /// Configuration with no policies and no credentials
    pub fn empty(settings: &ManagerSettings) -> Self {
        Self::builder(settings).build()
    }

    /// Named policies and the configs behind them
    pub fn policies(&self) -> &PolicyRegistry {
        &self.policies
    }

    /// Secrets and keys by identity
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Retransmission and half-open timeouts
    pub fn retransmission(&self) -> &RetransmissionPolicy {
        &self.retransmission
    }
}

/// Load-phase API for a [`Configuration`]
///
/// Configs are added first, then tied together under a name with
/// [`register`](Self::register). Credentials can be added in any order.
#[derive(Debug)]
pub struct ConfigurationBuilder {
    policies: PolicyRegistry,
    credentials: CredentialStore,
    retransmission: RetransmissionPolicy,
}

impl ConfigurationBuilder {
    /// Create builder
    pub fn new(settings: &ManagerSettings) -> Self {
        ConfigurationBuilder {
            policies: PolicyRegistry::with_diagnostics(settings.diagnostics.clone()),
            credentials: CredentialStore::with_diagnostics(settings.diagnostics.clone()),
            retransmission: settings.retransmission_policy(),
        }
    }

    /// Add an init config and get its handle
    pub fn add_init_config(&mut self, config: InitConfig) -> InitConfigId {
        self.policies.add_init_config(config)
    }

    /// Add an sa config and get its handle
    pub fn add_sa_config(&mut self, config: SaConfig) -> SaConfigId {
        self.policies.add_sa_config(config)
    }

    /// Register a named policy
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if either handle came from another builder.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        init_config: InitConfigId,
        sa_config: SaConfigId,
    ) -> Result<()> {
        self.policies.register(name, init_config, sa_config)
    }

    /// Add a preshared secret
    pub fn add_preshared_secret(&mut self, identity: Identification, secret: impl Into<Vec<u8>>) {
        self.credentials.add_preshared_secret(identity, secret);
    }

    /// Add a DER-encoded RSA public key
    pub fn add_rsa_public_key(&mut self, identity: Identification, der: &[u8]) -> Result<()> {
        self.credentials.add_rsa_public_key(identity, der)
    }

    /// Add a DER-encoded RSA private key
    pub fn add_rsa_private_key(&mut self, identity: Identification, der: &[u8]) -> Result<()> {
        self.credentials.add_rsa_private_key(identity, der)
    }

    /// Add an already parsed RSA public key
    pub fn insert_rsa_public_key(&mut self, identity: Identification, key: RsaPublicKey) {
        self.credentials.insert_rsa_public_key(identity, key);
    }

    /// Add an already parsed RSA private key
    pub fn insert_rsa_private_key(&mut self, identity: Identification, key: RsaPrivateKey) {
        self.credentials.insert_rsa_private_key(identity, key);
    }

    /// Finish the load phase
    pub fn build(self) -> Configuration {
        Configuration {
            policies: self.policies,
            credentials: self.credentials,
            retransmission: self.retransmission,
        }
    }
}
