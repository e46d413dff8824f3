//! Credential Lookup Tests
//!
//! Preshared secrets and RSA keys through the public store API, using the
//! DER fixtures under `tests/data`.

use keel_ike::{
    defaults, CredentialStore, Diagnostics, Error, IdType, Identification, RsaPrivateKey,
    RsaPublicKey,
};
use std::sync::{Arc, Mutex};

const LOCALHOST_PUBLIC: &[u8] = include_bytes!("data/localhost_public_pkcs1.der");
const LOCALHOST_PRIVATE: &[u8] = include_bytes!("data/localhost_private_pkcs1.der");
const PEER_PUBLIC: &[u8] = include_bytes!("data/peer_public_spki.der");
const PEER_PRIVATE: &[u8] = include_bytes!("data/peer_private_pkcs8.der");

fn ipv4(addr: &str) -> Identification {
    Identification::from_string(IdType::Ipv4Addr, addr).unwrap()
}

#[test]
fn test_preshared_secret_verbatim() {
    let mut store = CredentialStore::new();
    store.add_preshared_secret(ipv4("192.0.2.10"), "s3cr3t");

    let secret = store.get_shared_secret(&ipv4("192.0.2.10")).unwrap();
    assert_eq!(secret, b"s3cr3t");
    assert_eq!(secret.len(), 6);
}

#[test]
fn test_binary_secret() {
    let mut store = CredentialStore::new();
    let raw = vec![0x00, 0xff, 0x00, 0x10];
    store.add_preshared_secret(ipv4("192.0.2.10"), raw.clone());
    assert_eq!(store.get_shared_secret(&ipv4("192.0.2.10")), Ok(&raw[..]));
}

#[test]
fn test_first_registered_wins() {
    let mut store = CredentialStore::new();
    store.add_preshared_secret(ipv4("192.0.2.10"), "one");
    store.add_preshared_secret(ipv4("192.0.2.10"), "two");
    store
        .add_rsa_public_key(ipv4("192.0.2.10"), LOCALHOST_PUBLIC)
        .unwrap();
    store.add_rsa_public_key(ipv4("192.0.2.10"), PEER_PUBLIC).unwrap();

    assert_eq!(store.get_shared_secret(&ipv4("192.0.2.10")), Ok(&b"one"[..]));
    assert_eq!(store.preshared_secret_count(), 2);

    let key = store.get_rsa_public_key(&ipv4("192.0.2.10")).unwrap();
    assert_eq!(*key, RsaPublicKey::from_der(LOCALHOST_PUBLIC).unwrap());
}

#[test]
fn test_missing_credentials() {
    let store = CredentialStore::new();
    let id = ipv4("203.0.113.5");

    assert!(matches!(store.get_shared_secret(&id), Err(Error::CredentialNotFound(_))));
    assert!(store.get_rsa_public_key(&id).unwrap_err().is_not_found());
    assert!(store.get_rsa_private_key(&id).unwrap_err().is_not_found());
}

#[test]
fn test_kinds_are_separate() {
    let mut store = CredentialStore::new();
    store.add_rsa_private_key(ipv4("192.0.2.20"), PEER_PRIVATE).unwrap();

    assert!(store.get_rsa_private_key(&ipv4("192.0.2.20")).is_ok());
    assert!(store.get_rsa_public_key(&ipv4("192.0.2.20")).is_err());
    assert!(store.get_shared_secret(&ipv4("192.0.2.20")).is_err());
}

#[test]
fn test_key_encodings() {
    let mut store = CredentialStore::new();
    let local = defaults::localhost_identity();
    let peer = Identification::from_string(IdType::Fqdn, "peer.example.org").unwrap();

    store.add_rsa_public_key(local.clone(), LOCALHOST_PUBLIC).unwrap();
    store.add_rsa_private_key(local.clone(), LOCALHOST_PRIVATE).unwrap();
    store.add_rsa_public_key(peer.clone(), PEER_PUBLIC).unwrap();
    store.add_rsa_private_key(peer.clone(), PEER_PRIVATE).unwrap();

    let local_public = store.get_rsa_public_key(&local).unwrap();
    let local_private = store.get_rsa_private_key(&local).unwrap();
    let peer_public = store.get_rsa_public_key(&peer).unwrap();
    let peer_private = store.get_rsa_private_key(&peer).unwrap();

    assert_eq!(local_public.modulus_bits(), 2048);
    assert_eq!(peer_private.modulus_bits(), 2048);
    assert!(local_public.matches(&local_private));
    assert!(peer_public.matches(&peer_private));
    assert!(!local_public.matches(&peer_private));
    assert_eq!(peer_private.public_key(), *peer_public);
}

#[test]
fn test_malformed_key_not_registered() {
    let mut store = CredentialStore::new();
    let id = ipv4("192.0.2.30");

    let truncated = &LOCALHOST_PUBLIC[..LOCALHOST_PUBLIC.len() / 2];
    assert!(matches!(
        store.add_rsa_public_key(id.clone(), truncated),
        Err(Error::InvalidKey(_))
    ));
    assert!(store.add_rsa_private_key(id.clone(), b"").is_err());

    assert_eq!(store.rsa_public_key_count(), 0);
    assert_eq!(store.rsa_private_key_count(), 0);
    assert!(store.get_rsa_public_key(&id).is_err());

    // A valid key added afterwards is the first one
    store.add_rsa_public_key(id.clone(), PEER_PUBLIC).unwrap();
    assert!(store.get_rsa_public_key(&id).is_ok());
}

#[test]
fn test_keys_outlive_store() {
    let key: Arc<RsaPrivateKey> = {
        let mut store = CredentialStore::new();
        store.add_rsa_private_key(ipv4("192.0.2.40"), PEER_PRIVATE).unwrap();
        store.get_rsa_private_key(&ipv4("192.0.2.40")).unwrap()
    };
    assert_eq!(key.modulus_bits(), 2048);
}

/// Writer collecting formatted log lines
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_secrets_never_logged() {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let diagnostics = Diagnostics::with_dispatch(tracing::Dispatch::new(subscriber));

    let mut store = CredentialStore::with_diagnostics(diagnostics);
    store.add_preshared_secret(ipv4("192.0.2.50"), "correct-horse-battery");
    store.get_shared_secret(&ipv4("192.0.2.50")).unwrap();
    assert!(store.get_shared_secret(&ipv4("192.0.2.51")).is_err());

    let output = String::from_utf8(capture.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("192.0.2.50"));
    assert!(!output.contains("correct-horse-battery"));
}
