//! RSA key objects
//!
//! Parses raw DER key material into key objects the authentication layer
//! can use. Public keys are accepted as PKCS#1 `RSAPublicKey` or X.509
//! SubjectPublicKeyInfo, private keys as PKCS#1 `RSAPrivateKey` or
//! unencrypted PKCS#8.
//!
//! # Security
//!
//! Private exponents and primes are zeroed on drop by the underlying `rsa`
//! key type. `Debug` output never includes key components.

use crate::{Error, Result};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::traits::PublicKeyParts;
use std::fmt;

/// RSA public key
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    inner: rsa::RsaPublicKey,
}

impl RsaPublicKey {
    /// Parse DER encoded public key
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = match rsa::RsaPublicKey::from_pkcs1_der(der) {
            Ok(key) => key,
            Err(_) => rsa::RsaPublicKey::from_public_key_der(der)
                .map_err(|e| Error::InvalidKey(format!("Invalid RSA public key: {}", e)))?,
        };
        Ok(RsaPublicKey { inner })
    }

    /// Modulus size in bits
    pub fn modulus_bits(&self) -> usize {
        self.inner.size() * 8
    }

    /// True if `private` is the other half of this key pair
    pub fn matches(&self, private: &RsaPrivateKey) -> bool {
        self.inner == private.inner.to_public_key()
    }

    /// Underlying key for signature verification
    pub fn as_rsa(&self) -> &rsa::RsaPublicKey {
        &self.inner
    }
}

impl fmt::Debug for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPublicKey")
            .field("key_size_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

/// RSA private key
pub struct RsaPrivateKey {
    inner: rsa::RsaPrivateKey,
}

impl RsaPrivateKey {
    /// Parse DER encoded private key
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = match rsa::RsaPrivateKey::from_pkcs1_der(der) {
            Ok(key) => key,
            Err(_) => rsa::RsaPrivateKey::from_pkcs8_der(der)
                .map_err(|e| Error::InvalidKey(format!("Invalid RSA private key: {}", e)))?,
        };
        Ok(RsaPrivateKey { inner })
    }

    /// Modulus size in bits
    pub fn modulus_bits(&self) -> usize {
        self.inner.size() * 8
    }

    /// Derive the public half
    pub fn public_key(&self) -> RsaPublicKey {
        RsaPublicKey {
            inner: self.inner.to_public_key(),
        }
    }

    /// Underlying key for signing
    pub fn as_rsa(&self) -> &rsa::RsaPrivateKey {
        &self.inner
    }
}

impl fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("key_size_bits", &self.modulus_bits())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCALHOST_PUBLIC: &[u8] = include_bytes!("../tests/data/localhost_public_pkcs1.der");
    const LOCALHOST_PRIVATE: &[u8] = include_bytes!("../tests/data/localhost_private_pkcs1.der");
    const PEER_PUBLIC: &[u8] = include_bytes!("../tests/data/peer_public_spki.der");
    const PEER_PRIVATE: &[u8] = include_bytes!("../tests/data/peer_private_pkcs8.der");

    #[test]
    fn test_parse_pkcs1_pair() {
        let public = RsaPublicKey::from_der(LOCALHOST_PUBLIC).expect("PKCS#1 public key");
        let private = RsaPrivateKey::from_der(LOCALHOST_PRIVATE).expect("PKCS#1 private key");

        assert_eq!(public.modulus_bits(), 2048);
        assert_eq!(private.modulus_bits(), 2048);
        assert!(public.matches(&private));
        assert_eq!(private.public_key(), public);
    }

    #[test]
    fn test_parse_spki_and_pkcs8_pair() {
        let public = RsaPublicKey::from_der(PEER_PUBLIC).expect("SPKI public key");
        let private = RsaPrivateKey::from_der(PEER_PRIVATE).expect("PKCS#8 private key");
        assert!(public.matches(&private));
    }

    #[test]
    fn test_mismatched_pair() {
        let public = RsaPublicKey::from_der(LOCALHOST_PUBLIC).unwrap();
        let private = RsaPrivateKey::from_der(PEER_PRIVATE).unwrap();
        assert!(!public.matches(&private));
    }

    #[test]
    fn test_malformed_key_material() {
        assert!(matches!(
            RsaPublicKey::from_der(&[0x30, 0x03, 0x02, 0x01]),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            RsaPrivateKey::from_der(&LOCALHOST_PRIVATE[..64]),
            Err(Error::InvalidKey(_))
        ));
        // A public key is not a private key
        assert!(RsaPrivateKey::from_der(LOCALHOST_PUBLIC).is_err());
    }

    #[test]
    fn test_debug_hides_components() {
        let private = RsaPrivateKey::from_der(LOCALHOST_PRIVATE).unwrap();
        let rendered = format!("{:?}", private);
        assert!(rendered.contains("key_size_bits: 2048"));
        assert!(!rendered.contains("primes"));
    }
}
