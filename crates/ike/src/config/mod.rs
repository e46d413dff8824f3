//! Policy configuration objects
//!
//! An [`InitConfig`] describes the IKE_SA_INIT exchange between two
//! endpoints; an [`SaConfig`] describes identities, authentication and the
//! Child SAs negotiated afterwards. A named policy pairs one of each.

pub mod init_config;
pub mod proposal;
pub mod sa_config;
pub mod traffic_selector;

pub use init_config::InitConfig;
pub use proposal::{
    ChildProposal, ChildProtocol, ChildTransform, DhGroup, EncrAlgorithm, EsnMode, IkeProposal,
    IntegAlgorithm, PrfAlgorithm,
};
pub use sa_config::{AuthMethod, SaConfig, SaConfigBuilder};
pub use traffic_selector::{TrafficSelector, TsType};
