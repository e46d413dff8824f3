//! Built-in "localhost" policy
//!
//! Loopback policy used for bring-up and self-tests: this host talks to
//! 127.0.0.1 on the IKE port, authenticating with RSA signatures. Key
//! material is not compiled in; callers load it with
//! [`load_localhost_keys`].

use crate::config::sa_config::DEFAULT_SA_LIFETIME;
use crate::config::{
    AuthMethod, ChildProposal, ChildProtocol, ChildTransform, DhGroup, EncrAlgorithm, EsnMode,
    IkeProposal, InitConfig, IntegAlgorithm, PrfAlgorithm, SaConfig, TrafficSelector,
};
use crate::configuration::ConfigurationBuilder;
use crate::host::{Host, IKEV2_UDP_PORT};
use crate::identity::Identification;
use crate::keys::{RsaPrivateKey, RsaPublicKey};
use crate::Result;
use std::net::{IpAddr, Ipv4Addr};

/// Name of the built-in policy
pub const LOCALHOST_POLICY: &str = "localhost";

/// Identity used on both sides of the built-in policy
pub fn localhost_identity() -> Identification {
    Identification::from_ip(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

/// IKE proposal offered by the built-in policy
pub fn localhost_ike_proposal() -> IkeProposal {
    IkeProposal {
        encryption_algorithm: EncrAlgorithm::AesCbc,
        encryption_key_length: 16,
        integrity_algorithm: IntegAlgorithm::HmacMd5_96,
        integrity_key_length: 16,
        pseudo_random_function: PrfAlgorithm::HmacMd5,
        pseudo_random_function_key_length: 16,
        diffie_hellman_group: DhGroup::Modp1024,
    }
}

/// ESP proposal offered by the built-in policy
pub fn localhost_child_proposal() -> ChildProposal {
    ChildProposal::new(1, ChildProtocol::Esp)
        .add_transform(ChildTransform::Encr(EncrAlgorithm::AesCbc, 16))
        .add_transform(ChildTransform::Integ(IntegAlgorithm::HmacSha1_96, 20))
        .add_transform(ChildTransform::Dh(DhGroup::Modp1024))
        .add_transform(ChildTransform::Esn(EsnMode::NoEsn))
}

/// Register the built-in "localhost" policy
pub fn load_default_config(builder: &mut ConfigurationBuilder) -> Result<()> {
    let init_config = InitConfig::new(
        Host::any_v4(IKEV2_UDP_PORT),
        Host::new("127.0.0.1", IKEV2_UDP_PORT)?,
    )
    .add_proposal(localhost_ike_proposal());

    let sa_config = SaConfig::builder()
        .with_local_id(localhost_identity())
        .with_remote_id(localhost_identity())
        .with_auth_method(AuthMethod::RsaDigitalSignature)
        .with_lifetime(DEFAULT_SA_LIFETIME)
        .add_initiator_selector(TrafficSelector::ipv4_any())
        .add_responder_selector(TrafficSelector::ipv4_any())
        .add_proposal(localhost_child_proposal())
        .build()?;

    let init = builder.add_init_config(init_config);
    let sa = builder.add_sa_config(sa_config);
    builder.register(LOCALHOST_POLICY, init, sa)
}

/// Register the RSA key pair of the localhost identity
///
/// # Errors
///
/// Returns `InvalidKey` if either DER blob does not parse. Both keys are
/// parsed before either is added, so a failure registers nothing.
pub fn load_localhost_keys(
    builder: &mut ConfigurationBuilder,
    public_der: &[u8],
    private_der: &[u8],
) -> Result<()> {
    let public = RsaPublicKey::from_der(public_der)?;
    let private = RsaPrivateKey::from_der(private_der)?;

    builder.insert_rsa_public_key(localhost_identity(), public);
    builder.insert_rsa_private_key(localhost_identity(), private);
    Ok(())
}
