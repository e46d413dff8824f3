//! Credential store
//!
//! Holds preshared secrets and RSA keys indexed by peer identity. Each kind
//! lives in its own insertion-ordered list; several credentials may share an
//! identity, but lookups always return the first one registered.
//!
//! # Security
//!
//! Preshared secrets are zeroed when the store is dropped. Private keys are
//! shared through `Arc` and zeroed when the last holder lets go.

use crate::identity::Identification;
use crate::keys::{RsaPrivateKey, RsaPublicKey};
use crate::logging::{self, Diagnostics};
use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Zeroize, ZeroizeOnDrop)]
struct PresharedSecretEntry {
    #[zeroize(skip)]
    identity: Identification,
    secret: Vec<u8>,
}

struct KeyEntry<K> {
    identity: Identification,
    key: Arc<K>,
}

/// Preshared secrets and RSA keys by identity
#[derive(Default)]
pub struct CredentialStore {
    preshared_secrets: Vec<PresharedSecretEntry>,
    rsa_public_keys: Vec<KeyEntry<RsaPublicKey>>,
    rsa_private_keys: Vec<KeyEntry<RsaPrivateKey>>,
    diagnostics: Diagnostics,
}

impl CredentialStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty store logging to `diagnostics`
    pub fn with_diagnostics(diagnostics: Diagnostics) -> Self {
        CredentialStore {
            diagnostics,
            ..Self::default()
        }
    }

    /// Add a preshared secret
    ///
    /// The bytes are stored verbatim; no terminator is added.
    pub fn add_preshared_secret(&mut self, identity: Identification, secret: impl Into<Vec<u8>>) {
        let secret = secret.into();
        self.diagnostics
            .emit(|| logging::log_credential_added("psk", &identity, secret.len()));
        self.preshared_secrets
            .push(PresharedSecretEntry { identity, secret });
    }

    /// Parse and add an RSA public key
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the DER cannot be parsed; nothing is added.
    pub fn add_rsa_public_key(&mut self, identity: Identification, der: &[u8]) -> Result<()> {
        let key = self.parse("rsa-public", &identity, RsaPublicKey::from_der, der)?;
        self.insert_rsa_public_key(identity, key);
        Ok(())
    }

    /// Parse and add an RSA private key
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` if the DER cannot be parsed; nothing is added.
    pub fn add_rsa_private_key(&mut self, identity: Identification, der: &[u8]) -> Result<()> {
        let key = self.parse("rsa-private", &identity, RsaPrivateKey::from_der, der)?;
        self.insert_rsa_private_key(identity, key);
        Ok(())
    }

    /// Add an already parsed RSA public key
    pub fn insert_rsa_public_key(&mut self, identity: Identification, key: RsaPublicKey) {
        self.diagnostics.emit(|| {
            logging::log_credential_added("rsa-public", &identity, key.modulus_bits() / 8)
        });
        self.rsa_public_keys.push(KeyEntry {
            identity,
            key: Arc::new(key),
        });
    }

    /// Add an already parsed RSA private key
    pub fn insert_rsa_private_key(&mut self, identity: Identification, key: RsaPrivateKey) {
        self.diagnostics.emit(|| {
            logging::log_credential_added("rsa-private", &identity, key.modulus_bits() / 8)
        });
        self.rsa_private_keys.push(KeyEntry {
            identity,
            key: Arc::new(key),
        });
    }

    /// Preshared secret of the first entry for `identity`
    pub fn get_shared_secret(&self, identity: &Identification) -> Result<&[u8]> {
        let found = self
            .preshared_secrets
            .iter()
            .find(|entry| entry.identity.equals(identity))
            .map(|entry| entry.secret.as_slice());
        self.finish_lookup("psk", identity, found)
    }

    /// RSA public key of the first entry for `identity`
    pub fn get_rsa_public_key(&self, identity: &Identification) -> Result<Arc<RsaPublicKey>> {
        let found = first_key(&self.rsa_public_keys, identity);
        self.finish_lookup("rsa-public", identity, found)
    }

    /// RSA private key of the first entry for `identity`
    pub fn get_rsa_private_key(&self, identity: &Identification) -> Result<Arc<RsaPrivateKey>> {
        let found = first_key(&self.rsa_private_keys, identity);
        self.finish_lookup("rsa-private", identity, found)
    }

    /// Number of preshared secrets
    pub fn preshared_secret_count(&self) -> usize {
        self.preshared_secrets.len()
    }

    /// Number of RSA public keys
    pub fn rsa_public_key_count(&self) -> usize {
        self.rsa_public_keys.len()
    }

    /// Number of RSA private keys
    pub fn rsa_private_key_count(&self) -> usize {
        self.rsa_private_keys.len()
    }

    fn parse<K>(
        &self,
        kind: &str,
        identity: &Identification,
        parser: fn(&[u8]) -> Result<K>,
        der: &[u8],
    ) -> Result<K> {
        parser(der).map_err(|err| {
            self.diagnostics
                .emit(|| logging::log_key_rejected(kind, identity, &err.to_string()));
            err
        })
    }

    fn finish_lookup<T>(&self, kind: &str, identity: &Identification, found: Option<T>) -> Result<T> {
        self.diagnostics
            .emit(|| logging::log_credential_lookup(kind, identity, found.is_some()));
        found.ok_or_else(|| Error::CredentialNotFound(format!("{} {}", kind, identity)))
    }
}

fn first_key<K>(entries: &[KeyEntry<K>], identity: &Identification) -> Option<Arc<K>> {
    entries
        .iter()
        .find(|entry| entry.identity.equals(identity))
        .map(|entry| Arc::clone(&entry.key))
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("preshared_secrets", &self.preshared_secrets.len())
            .field("rsa_public_keys", &self.rsa_public_keys.len())
            .field("rsa_private_keys", &self.rsa_private_keys.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::IdType;

    const LOCALHOST_PUBLIC: &[u8] = include_bytes!("../tests/data/localhost_public_pkcs1.der");
    const LOCALHOST_PRIVATE: &[u8] = include_bytes!("../tests/data/localhost_private_pkcs1.der");
    const PEER_PUBLIC: &[u8] = include_bytes!("../tests/data/peer_public_spki.der");

    fn ipv4(addr: &str) -> Identification {
        Identification::from_string(IdType::Ipv4Addr, addr).unwrap()
    }

    #[test]
    fn test_preshared_secret_round_trip() {
        let mut store = CredentialStore::new();
        store.add_preshared_secret(ipv4("192.168.1.2"), b"s3cr3t".to_vec());

        assert_eq!(store.get_shared_secret(&ipv4("192.168.1.2")), Ok(&b"s3cr3t"[..]));
        assert_eq!(store.get_shared_secret(&ipv4("192.168.1.2")).unwrap().len(), 6);
    }

    #[test]
    fn test_first_registered_secret_wins() {
        let mut store = CredentialStore::new();
        store.add_preshared_secret(ipv4("10.0.0.1"), "first");
        store.add_preshared_secret(ipv4("10.0.0.1"), "second");

        assert_eq!(store.preshared_secret_count(), 2);
        assert_eq!(store.get_shared_secret(&ipv4("10.0.0.1")), Ok(&b"first"[..]));
    }

    #[test]
    fn test_secret_lookup_is_type_aware() {
        let mut store = CredentialStore::new();
        store.add_preshared_secret(ipv4("10.0.0.1"), "secret");

        let as_fqdn = Identification::from_string(IdType::Fqdn, "10.0.0.1").unwrap();
        assert!(matches!(
            store.get_shared_secret(&as_fqdn),
            Err(Error::CredentialNotFound(_))
        ));
    }

    #[test]
    fn test_rsa_keys() {
        let mut store = CredentialStore::new();
        store
            .add_rsa_public_key(ipv4("127.0.0.1"), LOCALHOST_PUBLIC)
            .unwrap();
        store
            .add_rsa_private_key(ipv4("127.0.0.1"), LOCALHOST_PRIVATE)
            .unwrap();

        let public = store.get_rsa_public_key(&ipv4("127.0.0.1")).unwrap();
        let private = store.get_rsa_private_key(&ipv4("127.0.0.1")).unwrap();
        assert!(public.matches(&private));

        assert!(store.get_rsa_public_key(&ipv4("127.0.0.2")).is_err());
        assert!(store.get_rsa_private_key(&ipv4("127.0.0.2")).is_err());
    }

    #[test]
    fn test_first_registered_key_wins() {
        let mut store = CredentialStore::new();
        store.add_rsa_public_key(ipv4("10.0.0.1"), PEER_PUBLIC).unwrap();
        store
            .add_rsa_public_key(ipv4("10.0.0.1"), LOCALHOST_PUBLIC)
            .unwrap();

        let expected = RsaPublicKey::from_der(PEER_PUBLIC).unwrap();
        assert_eq!(*store.get_rsa_public_key(&ipv4("10.0.0.1")).unwrap(), expected);
    }

    #[test]
    fn test_malformed_key_not_registered() {
        let mut store = CredentialStore::new();
        let result = store.add_rsa_private_key(ipv4("10.0.0.1"), &[0xde, 0xad, 0xbe, 0xef]);

        assert!(matches!(result, Err(Error::InvalidKey(_))));
        assert_eq!(store.rsa_private_key_count(), 0);
        assert!(store.get_rsa_private_key(&ipv4("10.0.0.1")).is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut store = CredentialStore::new();
        store.add_preshared_secret(ipv4("10.0.0.1"), "hunter2");
        let rendered = format!("{:?}", store);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("preshared_secrets: 1"));
    }
}
