//! Configuration manager
//!
//! Owns the live [`Configuration`] and swaps it atomically on reload.
//!
//! # Reload semantics
//!
//! Readers call [`ConfigurationManager::snapshot`] once per negotiation and
//! keep the returned `Arc` until they are done. A reload publishes a new
//! snapshot without waiting for readers; handles obtained from the old
//! snapshot stay valid against it. The old snapshot is dropped, and its
//! secrets zeroed, when the last reader releases it.

use crate::configuration::{Configuration, ConfigurationBuilder};
use crate::logging;
use crate::settings::ManagerSettings;
use arc_swap::ArcSwap;
use keel_platform::{KeelResult, SecurityModule};
use std::sync::Arc;

/// Holder of the current configuration snapshot
#[derive(Debug)]
pub struct ConfigurationManager {
    settings: ManagerSettings,
    current: ArcSwap<Configuration>,
}

impl ConfigurationManager {
    /// Create manager with an empty configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the settings do not validate.
    pub fn new(settings: ManagerSettings) -> crate::Result<Self> {
        settings.validate()?;
        let current = ArcSwap::from_pointee(Configuration::empty(&settings));
        Ok(ConfigurationManager { settings, current })
    }

    /// Settings this manager was created with
    pub fn settings(&self) -> &ManagerSettings {
        &self.settings
    }

    /// Start loading a configuration with this manager's settings
    pub fn builder(&self) -> ConfigurationBuilder {
        Configuration::builder(&self.settings)
    }

    /// Current configuration
    pub fn snapshot(&self) -> Arc<Configuration> {
        self.current.load_full()
    }

    /// Publish a new configuration
    pub fn reload(&self, config: Configuration) {
        let policies = config.policies().len();
        let secrets = config.credentials().preshared_secret_count();
        let keys = config.credentials().rsa_public_key_count()
            + config.credentials().rsa_private_key_count();

        self.current.store(Arc::new(config));
        self.settings
            .diagnostics
            .emit(|| logging::log_config_reloaded(policies, secrets, keys));
    }
}

impl SecurityModule for ConfigurationManager {
    fn id(&self) -> &'static str {
        "ike_configuration"
    }

    fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    fn description(&self) -> &'static str {
        "IKEv2 policy, credential and retransmission configuration"
    }

    fn init(&mut self) -> KeelResult<()> {
        self.settings.validate()?;
        self.settings
            .diagnostics
            .emit(|| logging::log_lifecycle(self.id(), "init"));
        Ok(())
    }

    fn shutdown(&mut self) -> KeelResult<()> {
        self.reload(Configuration::empty(&self.settings));
        self.settings
            .diagnostics
            .emit(|| logging::log_lifecycle(self.id(), "shutdown"));
        Ok(())
    }
}
