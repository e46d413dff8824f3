//! Policy registry
//!
//! Owns the named (init config, SA config) policies and answers the three
//! questions the IKE state machines ask when a negotiation starts:
//!
//! - which policy has this name (initiating a configured connection),
//! - which init config covers these addresses (responding to IKE_SA_INIT),
//! - which SA config belongs to this init config and these identities
//!   (responding to IKE_AUTH).
//!
//! # Ownership
//!
//! Config objects live in arenas owned by the registry and are referred to
//! by [`InitConfigId`] / [`SaConfigId`]. One config may back several named
//! policies; handle identity, not structural equality, decides whether two
//! policies share a config. Handles are tagged with the registry that issued
//! them and are rejected everywhere else, including by the registry of a
//! newer snapshot.
//!
//! # Matching
//!
//! All resolvers scan in registration order and return the first match.
//! Entries are not ranked by specificity, so a wildcard policy registered
//! before an exact one shadows it.

use crate::config::{InitConfig, SaConfig};
use crate::host::Host;
use crate::identity::Identification;
use crate::logging::{self, Diagnostics};
use crate::{Error, Result};
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of registry ids; handles carry the id of the registry that issued them
static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

/// Handle of an init config inside a [`PolicyRegistry`]
///
/// Only valid for the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InitConfigId {
    registry: u64,
    index: u32,
}

/// Handle of an SA config inside a [`PolicyRegistry`]
///
/// Only valid for the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SaConfigId {
    registry: u64,
    index: u32,
}

impl InitConfigId {
    /// Arena index
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl SaConfigId {
    /// Arena index
    pub fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Display for InitConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "init#{}", self.index)
    }
}

impl fmt::Display for SaConfigId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sa#{}", self.index)
    }
}

/// A named policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyEntry {
    name: String,
    init_config: InitConfigId,
    sa_config: SaConfigId,
}

impl PolicyEntry {
    /// Policy name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Init config handle
    pub fn init_config(&self) -> InitConfigId {
        self.init_config
    }

    /// SA config handle
    pub fn sa_config(&self) -> SaConfigId {
        self.sa_config
    }
}

/// Ordered set of named policies
#[derive(Debug)]
pub struct PolicyRegistry {
    id: u64,
    init_configs: Vec<Arc<InitConfig>>,
    sa_configs: Vec<Arc<SaConfig>>,
    tracked_init_configs: HashSet<InitConfigId>,
    tracked_sa_configs: HashSet<SaConfigId>,
    entries: Vec<PolicyEntry>,
    diagnostics: Diagnostics,
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        PolicyRegistry {
            id: NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed),
            init_configs: Vec::new(),
            sa_configs: Vec::new(),
            tracked_init_configs: HashSet::new(),
            tracked_sa_configs: HashSet::new(),
            entries: Vec::new(),
            diagnostics: Diagnostics::default(),
        }
    }
}

impl PolicyRegistry {
    /// Create empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty registry logging to `diagnostics`
    pub fn with_diagnostics(diagnostics: Diagnostics) -> Self {
        PolicyRegistry {
            diagnostics,
            ..Self::default()
        }
    }

    /// Move an init config into the arena
    pub fn add_init_config(&mut self, config: InitConfig) -> InitConfigId {
        let id = InitConfigId {
            registry: self.id,
            index: self.init_configs.len() as u32,
        };
        self.init_configs.push(Arc::new(config));
        id
    }

    /// Move an SA config into the arena
    pub fn add_sa_config(&mut self, config: SaConfig) -> SaConfigId {
        let id = SaConfigId {
            registry: self.id,
            index: self.sa_configs.len() as u32,
        };
        self.sa_configs.push(Arc::new(config));
        id
    }

    /// Append a named policy
    ///
    /// Each handle is tracked once no matter how many policies use it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` for handles issued by another registry,
    /// including the registry of an older snapshot.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        init_config: InitConfigId,
        sa_config: SaConfigId,
    ) -> Result<()> {
        self.init_config(init_config)?;
        self.sa_config(sa_config)?;

        self.tracked_init_configs.insert(init_config);
        self.tracked_sa_configs.insert(sa_config);

        let name = name.into();
        self.diagnostics.emit(|| {
            logging::log_config_registered(
                &name,
                init_config.index(),
                sa_config.index(),
                self.entries.len() + 1,
            )
        });
        self.entries.push(PolicyEntry {
            name,
            init_config,
            sa_config,
        });
        Ok(())
    }

    /// Init config behind a handle
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if another registry issued `id`.
    pub fn init_config(&self, id: InitConfigId) -> Result<&Arc<InitConfig>> {
        if id.registry != self.id {
            return Err(Error::InvalidHandle(format!("{} from another registry", id)));
        }
        self.init_configs
            .get(id.index())
            .ok_or_else(|| Error::InvalidHandle(id.to_string()))
    }

    /// SA config behind a handle
    ///
    /// # Errors
    ///
    /// Returns `InvalidHandle` if another registry issued `id`.
    pub fn sa_config(&self, id: SaConfigId) -> Result<&Arc<SaConfig>> {
        if id.registry != self.id {
            return Err(Error::InvalidHandle(format!("{} from another registry", id)));
        }
        self.sa_configs
            .get(id.index())
            .ok_or_else(|| Error::InvalidHandle(id.to_string()))
    }

    /// Init config of the first policy named `name`
    pub fn resolve_by_name(&self, name: &str) -> Result<InitConfigId> {
        let found = self.find_by_name(name).map(PolicyEntry::init_config);
        self.diagnostics
            .emit(|| logging::log_name_lookup("init", name, found.is_some()));
        found.ok_or_else(|| Error::ConfigNotFound(format!("name '{}'", name)))
    }

    /// SA config of the first policy named `name`
    pub fn resolve_sa_by_name(&self, name: &str) -> Result<SaConfigId> {
        let found = self.find_by_name(name).map(PolicyEntry::sa_config);
        self.diagnostics
            .emit(|| logging::log_name_lookup("sa", name, found.is_some()));
        found.ok_or_else(|| Error::ConfigNotFound(format!("name '{}'", name)))
    }

    /// Init config of the first policy covering `local` and `remote`
    ///
    /// A policy's remote host matches if it equals `remote` or is the
    /// default route; its local host matches under the same rule against
    /// `local`. Exact and wildcard remotes are not ranked against each other.
    pub fn resolve_by_hosts(&self, local: &Host, remote: &Host) -> Result<InitConfigId> {
        self.diagnostics.emit(|| {
            logging::log_host_lookup(local, remote);

            let accepted = self.entries.iter().find(|entry| {
                let config = &self.init_configs[entry.init_config.index()];
                let config_local = config.local_host();
                let config_remote = config.remote_host();

                let remote_matches = if config_remote.ip_is_equal(remote) {
                    logging::log_host_candidate(&entry.name, config_remote);
                    true
                } else {
                    config_remote.is_default_route()
                };

                remote_matches
                    && (config_local.is_default_route() || config_local.ip_is_equal(local))
            });

            logging::log_host_match(accepted.map(PolicyEntry::name));
            accepted
                .map(PolicyEntry::init_config)
                .ok_or_else(|| Error::ConfigNotFound(format!("hosts {} - {}", local, remote)))
        })
    }

    /// SA config for a previously selected init config and peer identities
    ///
    /// Only policies using the very same `init_config` handle are
    /// considered, so a handle from another registry never matches. Without `local_id` the first policy whose remote identity
    /// equals `remote_id` wins.
    pub fn resolve_sa_by_init_config_and_peer(
        &self,
        init_config: InitConfigId,
        remote_id: &Identification,
        local_id: Option<&Identification>,
    ) -> Result<SaConfigId> {
        let accepted = self
            .entries
            .iter()
            .filter(|entry| entry.init_config == init_config)
            .find(|entry| {
                let config = &self.sa_configs[entry.sa_config.index()];
                config.remote_id().equals(remote_id)
                    && local_id.map_or(true, |id| config.local_id().equals(id))
            });

        self.diagnostics.emit(|| {
            logging::log_sa_lookup(
                remote_id,
                local_id.map(|id| id as &dyn fmt::Display),
                accepted.map(PolicyEntry::name),
            )
        });

        accepted.map(PolicyEntry::sa_config).ok_or_else(|| {
            Error::ConfigNotFound(match local_id {
                Some(local) => format!("{} with peer {} as {}", init_config, remote_id, local),
                None => format!("{} with peer {}", init_config, remote_id),
            })
        })
    }

    /// Policies in registration order
    pub fn entries(&self) -> impl Iterator<Item = &PolicyEntry> + '_ {
        self.entries.iter()
    }

    /// Number of policies
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no policy is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct init configs referenced by policies
    pub fn distinct_init_configs(&self) -> usize {
        self.tracked_init_configs.len()
    }

    /// Number of distinct SA configs referenced by policies
    pub fn distinct_sa_configs(&self) -> usize {
        self.tracked_sa_configs.len()
    }

    fn find_by_name(&self, name: &str) -> Option<&PolicyEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}
