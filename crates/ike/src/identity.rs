//! Peer identities
//!
//! An [`Identification`] is the matching key for SA config selection and
//! credential lookup. Equality is type-aware: two identities are equal only
//! if both the ID type and the encoded value match, so the FQDN
//! `"10.0.0.1"` never equals the IPv4 address `10.0.0.1`.

use crate::{Error, Result};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// ID Type (RFC 7296 Section 3.5)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IdType {
    /// IPv4 address
    Ipv4Addr = 1,
    /// Fully-qualified domain name
    Fqdn = 2,
    /// RFC 822 email address
    Rfc822Addr = 3,
    /// IPv6 address
    Ipv6Addr = 5,
    /// DER encoded ASN.1 distinguished name
    DerAsn1Dn = 9,
    /// DER encoded ASN.1 general name
    DerAsn1Gn = 10,
    /// Opaque key ID
    KeyId = 11,
}

impl IdType {
    /// Convert from u8
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(IdType::Ipv4Addr),
            2 => Some(IdType::Fqdn),
            3 => Some(IdType::Rfc822Addr),
            5 => Some(IdType::Ipv6Addr),
            9 => Some(IdType::DerAsn1Dn),
            10 => Some(IdType::DerAsn1Gn),
            11 => Some(IdType::KeyId),
            _ => None,
        }
    }

    /// Convert to u8
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    fn name(self) -> &'static str {
        match self {
            IdType::Ipv4Addr => "ID_IPV4_ADDR",
            IdType::Fqdn => "ID_FQDN",
            IdType::Rfc822Addr => "ID_RFC822_ADDR",
            IdType::Ipv6Addr => "ID_IPV6_ADDR",
            IdType::DerAsn1Dn => "ID_DER_ASN1_DN",
            IdType::DerAsn1Gn => "ID_DER_ASN1_GN",
            IdType::KeyId => "ID_KEY_ID",
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed peer identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identification {
    id_type: IdType,
    encoded: Vec<u8>,
}

impl Identification {
    /// Create from an already encoded value
    pub fn new(id_type: IdType, encoded: impl Into<Vec<u8>>) -> Self {
        Identification {
            id_type,
            encoded: encoded.into(),
        }
    }

    /// Parse the textual form of an identity
    ///
    /// Address types are stored in network byte order, names as UTF-8 and
    /// key IDs are read as hex. Distinguished names cannot be built from a
    /// string.
    pub fn from_string(id_type: IdType, text: &str) -> Result<Self> {
        let encoded = match id_type {
            IdType::Ipv4Addr => text
                .parse::<Ipv4Addr>()
                .map_err(|_| Error::InvalidIdentity(format!("not an IPv4 address: {}", text)))?
                .octets()
                .to_vec(),
            IdType::Ipv6Addr => text
                .parse::<Ipv6Addr>()
                .map_err(|_| Error::InvalidIdentity(format!("not an IPv6 address: {}", text)))?
                .octets()
                .to_vec(),
            IdType::Fqdn | IdType::Rfc822Addr => {
                if text.is_empty() {
                    return Err(Error::InvalidIdentity(format!("empty {}", id_type)));
                }
                text.as_bytes().to_vec()
            }
            IdType::KeyId => hex::decode(text)
                .map_err(|e| Error::InvalidIdentity(format!("key id is not hex: {}", e)))?,
            IdType::DerAsn1Dn | IdType::DerAsn1Gn => {
                return Err(Error::InvalidIdentity(format!(
                    "{} cannot be created from a string",
                    id_type
                )))
            }
        };

        Ok(Identification { id_type, encoded })
    }

    /// Identity for an IP address
    pub fn from_ip(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => Identification::new(IdType::Ipv4Addr, v4.octets().to_vec()),
            IpAddr::V6(v6) => Identification::new(IdType::Ipv6Addr, v6.octets().to_vec()),
        }
    }

    /// ID type
    pub fn id_type(&self) -> IdType {
        self.id_type
    }

    /// Encoded identification data
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// Type-aware equality
    pub fn equals(&self, other: &Identification) -> bool {
        self == other
    }
}

impl fmt::Display for Identification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id_type {
            IdType::Ipv4Addr => match <[u8; 4]>::try_from(self.encoded.as_slice()) {
                Ok(octets) => write!(f, "{}", Ipv4Addr::from(octets)),
                Err(_) => write!(f, "{}", hex::encode(&self.encoded)),
            },
            IdType::Ipv6Addr => match <[u8; 16]>::try_from(self.encoded.as_slice()) {
                Ok(octets) => write!(f, "{}", Ipv6Addr::from(octets)),
                Err(_) => write!(f, "{}", hex::encode(&self.encoded)),
            },
            IdType::Fqdn | IdType::Rfc822Addr => match std::str::from_utf8(&self.encoded) {
                Ok(text) => f.write_str(text),
                Err(_) => write!(f, "{}", hex::encode(&self.encoded)),
            },
            IdType::DerAsn1Dn | IdType::DerAsn1Gn | IdType::KeyId => {
                write!(f, "{}:{}", self.id_type, hex::encode(&self.encoded))
            }
        }
    }
}
