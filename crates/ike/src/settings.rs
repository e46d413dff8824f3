//! Manager settings
//!
//! Daemon-wide knobs that are fixed for the lifetime of a configuration
//! manager, with a builder in the same style as the config objects.

use crate::logging::Diagnostics;
use crate::retransmit::{
    RetransmissionPolicy, DEFAULT_FIRST_RETRANSMIT_TIMEOUT_MS,
    DEFAULT_HALF_OPEN_IKE_SA_TIMEOUT_MS, DEFAULT_MAX_RETRANSMIT_COUNT,
};
use crate::{Error, Result};

/// Settings for a [`ConfigurationManager`](crate::ConfigurationManager)
#[derive(Clone, Debug)]
pub struct ManagerSettings {
    /// First retransmit timeout in milliseconds
    pub first_retransmit_timeout_ms: u32,

    /// Retransmissions before giving up, 0 for unlimited
    pub max_retransmit_count: u32,

    /// Milliseconds after which a half-open IKE_SA is deleted
    pub half_open_ike_sa_timeout_ms: u32,

    /// Diagnostic sink handed to every component
    pub diagnostics: Diagnostics,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        ManagerSettings {
            first_retransmit_timeout_ms: DEFAULT_FIRST_RETRANSMIT_TIMEOUT_MS,
            max_retransmit_count: DEFAULT_MAX_RETRANSMIT_COUNT,
            half_open_ike_sa_timeout_ms: DEFAULT_HALF_OPEN_IKE_SA_TIMEOUT_MS,
            diagnostics: Diagnostics::ambient(),
        }
    }
}

impl ManagerSettings {
    /// Create builder for settings
    pub fn builder() -> ManagerSettingsBuilder {
        ManagerSettingsBuilder::new()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.first_retransmit_timeout_ms == 0 {
            return Err(Error::InvalidParameter(
                "first retransmit timeout cannot be zero".into(),
            ));
        }
        if self.half_open_ike_sa_timeout_ms == 0 {
            return Err(Error::InvalidParameter(
                "half-open IKE_SA timeout cannot be zero".into(),
            ));
        }
        Ok(())
    }

    /// Retransmission policy described by these settings
    pub fn retransmission_policy(&self) -> RetransmissionPolicy {
        RetransmissionPolicy::new(
            self.first_retransmit_timeout_ms,
            self.max_retransmit_count,
            self.half_open_ike_sa_timeout_ms,
        )
        .with_diagnostics(self.diagnostics.clone())
    }
}

/// Builder for ManagerSettings
#[derive(Default)]
pub struct ManagerSettingsBuilder {
    first_retransmit_timeout_ms: Option<u32>,
    max_retransmit_count: Option<u32>,
    half_open_ike_sa_timeout_ms: Option<u32>,
    diagnostics: Option<Diagnostics>,
}

impl ManagerSettingsBuilder {
    /// Create new settings builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set first retransmit timeout
    pub fn with_first_retransmit_timeout(mut self, timeout_ms: u32) -> Self {
        self.first_retransmit_timeout_ms = Some(timeout_ms);
        self
    }

    /// Set maximum retransmit count (0 for unlimited)
    pub fn with_max_retransmit_count(mut self, count: u32) -> Self {
        self.max_retransmit_count = Some(count);
        self
    }

    /// Set half-open IKE_SA timeout
    pub fn with_half_open_timeout(mut self, timeout_ms: u32) -> Self {
        self.half_open_ike_sa_timeout_ms = Some(timeout_ms);
        self
    }

    /// Set diagnostic sink
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// Build ManagerSettings with validation
    pub fn build(self) -> Result<ManagerSettings> {
        let defaults = ManagerSettings::default();
        let settings = ManagerSettings {
            first_retransmit_timeout_ms: self
                .first_retransmit_timeout_ms
                .unwrap_or(defaults.first_retransmit_timeout_ms),
            max_retransmit_count: self
                .max_retransmit_count
                .unwrap_or(defaults.max_retransmit_count),
            half_open_ike_sa_timeout_ms: self
                .half_open_ike_sa_timeout_ms
                .unwrap_or(defaults.half_open_ike_sa_timeout_ms),
            diagnostics: self.diagnostics.unwrap_or(defaults.diagnostics),
        };

        settings.validate()?;
        Ok(settings)
    }
}
