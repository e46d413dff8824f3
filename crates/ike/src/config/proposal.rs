//! IKE and Child SA proposals
//!
//! Algorithm identifiers follow the IANA IKEv2 transform registries
//! (RFC 7296 Section 3.3.2).

/// Encryption algorithm (transform type 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum EncrAlgorithm {
    /// 3DES-CBC
    Des3 = 3,
    /// AES-CBC
    AesCbc = 12,
    /// AES-CTR
    AesCtr = 13,
    /// AES-GCM with 16-byte ICV
    AesGcm16 = 20,
}

impl EncrAlgorithm {
    /// Convert from u16
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            3 => Some(EncrAlgorithm::Des3),
            12 => Some(EncrAlgorithm::AesCbc),
            13 => Some(EncrAlgorithm::AesCtr),
            20 => Some(EncrAlgorithm::AesGcm16),
            _ => None,
        }
    }

    /// Convert to u16
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// Integrity algorithm (transform type 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum IntegAlgorithm {
    /// HMAC-MD5-96
    HmacMd5_96 = 1,
    /// HMAC-SHA1-96
    HmacSha1_96 = 2,
    /// HMAC-SHA2-256-128
    HmacSha256_128 = 12,
}

impl IntegAlgorithm {
    /// Convert from u16
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(IntegAlgorithm::HmacMd5_96),
            2 => Some(IntegAlgorithm::HmacSha1_96),
            12 => Some(IntegAlgorithm::HmacSha256_128),
            _ => None,
        }
    }

    /// Convert to u16
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// Pseudo-random function (transform type 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum PrfAlgorithm {
    /// HMAC-MD5
    HmacMd5 = 1,
    /// HMAC-SHA1
    HmacSha1 = 2,
    /// HMAC-SHA2-256
    HmacSha256 = 5,
}

impl PrfAlgorithm {
    /// Convert from u16
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(PrfAlgorithm::HmacMd5),
            2 => Some(PrfAlgorithm::HmacSha1),
            5 => Some(PrfAlgorithm::HmacSha256),
            _ => None,
        }
    }

    /// Convert to u16
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// Diffie-Hellman group (transform type 4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DhGroup {
    /// 768-bit MODP group
    Modp768 = 1,
    /// 1024-bit MODP group
    Modp1024 = 2,
    /// 2048-bit MODP group
    Modp2048 = 14,
    /// Curve25519
    Curve25519 = 31,
}

impl DhGroup {
    /// Convert from u16
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(DhGroup::Modp768),
            2 => Some(DhGroup::Modp1024),
            14 => Some(DhGroup::Modp2048),
            31 => Some(DhGroup::Curve25519),
            _ => None,
        }
    }

    /// Convert to u16
    pub fn to_u16(self) -> u16 {
        self as u16
    }
}

/// Extended sequence numbers (transform type 5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum EsnMode {
    /// 32-bit sequence numbers
    NoEsn = 0,
    /// 64-bit extended sequence numbers
    Esn = 1,
}

/// IKE SA proposal
///
/// One fixed algorithm per transform type, as offered in IKE_SA_INIT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IkeProposal {
    /// Encryption algorithm
    pub encryption_algorithm: EncrAlgorithm,
    /// Encryption key length in bytes
    pub encryption_key_length: u16,
    /// Integrity algorithm
    pub integrity_algorithm: IntegAlgorithm,
    /// Integrity key length in bytes
    pub integrity_key_length: u16,
    /// Pseudo-random function
    pub pseudo_random_function: PrfAlgorithm,
    /// PRF key length in bytes
    pub pseudo_random_function_key_length: u16,
    /// Diffie-Hellman group
    pub diffie_hellman_group: DhGroup,
}

/// IPsec protocol a Child SA proposal applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ChildProtocol {
    /// Authentication Header
    Ah = 2,
    /// Encapsulating Security Payload
    Esp = 3,
}

/// Single algorithm choice inside a Child SA proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildTransform {
    /// Encryption algorithm with key length in bytes
    Encr(EncrAlgorithm, u16),
    /// Integrity algorithm with key length in bytes
    Integ(IntegAlgorithm, u16),
    /// Diffie-Hellman group for PFS
    Dh(DhGroup),
    /// Extended sequence numbers
    Esn(EsnMode),
}

/// Child SA proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildProposal {
    /// Proposal number
    pub number: u8,
    /// Protocol
    pub protocol: ChildProtocol,
    transforms: Vec<ChildTransform>,
}

impl ChildProposal {
    /// Create an empty proposal
    pub fn new(number: u8, protocol: ChildProtocol) -> Self {
        ChildProposal {
            number,
            protocol,
            transforms: Vec::new(),
        }
    }

    /// Add a transform
    pub fn add_transform(mut self, transform: ChildTransform) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Transforms in insertion order
    pub fn transforms(&self) -> &[ChildTransform] {
        &self.transforms
    }

    /// Same protocol and same transforms with the same multiplicity, order
    /// ignored
    pub fn is_compatible(&self, other: &ChildProposal) -> bool {
        let occurrences =
            |list: &[ChildTransform], t: &ChildTransform| list.iter().filter(|x| *x == t).count();

        self.protocol == other.protocol
            && self.transforms.len() == other.transforms.len()
            && self
                .transforms
                .iter()
                .all(|t| occurrences(&self.transforms, t) == occurrences(&other.transforms, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn esp_aes_sha1() -> ChildProposal {
        ChildProposal::new(1, ChildProtocol::Esp)
            .add_transform(ChildTransform::Encr(EncrAlgorithm::AesCbc, 16))
            .add_transform(ChildTransform::Integ(IntegAlgorithm::HmacSha1_96, 20))
            .add_transform(ChildTransform::Esn(EsnMode::NoEsn))
    }

    #[test]
    fn test_transform_id_conversion() {
        assert_eq!(EncrAlgorithm::from_u16(12), Some(EncrAlgorithm::AesCbc));
        assert_eq!(EncrAlgorithm::AesGcm16.to_u16(), 20);
        assert_eq!(IntegAlgorithm::from_u16(2), Some(IntegAlgorithm::HmacSha1_96));
        assert_eq!(PrfAlgorithm::from_u16(1), Some(PrfAlgorithm::HmacMd5));
        assert_eq!(DhGroup::from_u16(2), Some(DhGroup::Modp1024));
        assert_eq!(DhGroup::from_u16(99), None);
    }

    #[test]
    fn test_child_proposal_compatibility_ignores_order() {
        let ours = esp_aes_sha1();
        let theirs = ChildProposal::new(2, ChildProtocol::Esp)
            .add_transform(ChildTransform::Esn(EsnMode::NoEsn))
            .add_transform(ChildTransform::Integ(IntegAlgorithm::HmacSha1_96, 20))
            .add_transform(ChildTransform::Encr(EncrAlgorithm::AesCbc, 16));

        assert!(ours.is_compatible(&theirs));
        assert_eq!(ours.transforms().len(), 3);
    }

    #[test]
    fn test_child_proposal_incompatible() {
        let ours = esp_aes_sha1();

        let wrong_protocol = ChildProposal::new(1, ChildProtocol::Ah)
            .add_transform(ChildTransform::Encr(EncrAlgorithm::AesCbc, 16))
            .add_transform(ChildTransform::Integ(IntegAlgorithm::HmacSha1_96, 20))
            .add_transform(ChildTransform::Esn(EsnMode::NoEsn));
        assert!(!ours.is_compatible(&wrong_protocol));

        let wrong_key = ChildProposal::new(1, ChildProtocol::Esp)
            .add_transform(ChildTransform::Encr(EncrAlgorithm::AesCbc, 32))
            .add_transform(ChildTransform::Integ(IntegAlgorithm::HmacSha1_96, 20))
            .add_transform(ChildTransform::Esn(EsnMode::NoEsn));
        assert!(!ours.is_compatible(&wrong_key));
    }

    #[test]
    fn test_child_proposal_repeated_transforms() {
        let aes = ChildTransform::Encr(EncrAlgorithm::AesCbc, 16);
        let sha1 = ChildTransform::Integ(IntegAlgorithm::HmacSha1_96, 20);

        let two_aes = ChildProposal::new(1, ChildProtocol::Esp)
            .add_transform(aes)
            .add_transform(aes)
            .add_transform(sha1);
        let two_sha1 = ChildProposal::new(1, ChildProtocol::Esp)
            .add_transform(aes)
            .add_transform(sha1)
            .add_transform(sha1);
        let reordered = ChildProposal::new(2, ChildProtocol::Esp)
            .add_transform(sha1)
            .add_transform(aes)
            .add_transform(aes);

        assert!(!two_aes.is_compatible(&two_sha1));
        assert!(!two_sha1.is_compatible(&two_aes));
        assert!(two_aes.is_compatible(&reordered));
    }
}
