//! Chain addresses.
//!
//! Addresses use the Filecoin string form: a network prefix (`f` mainnet,
//! `t` testnet), a protocol digit (`0` id, `1` secp256k1, `2` actor,
//! `3` bls, `4` delegated) and a payload. ID addresses carry a decimal
//! payload; delegated addresses carry a decimal namespace actor id, an `f`
//! separator and a base32 sub-address; the other protocols carry lowercase
//! base32. The payload is not checksummed here; key management owns that.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrategyError};

const BASE32_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz234567";

/// Network an address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

/// A validated chain address, stored in lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn network(&self) -> Network {
        if self.0.starts_with('f') {
            Network::Mainnet
        } else {
            Network::Testnet
        }
    }

    /// Protocol digit (0–4).
    pub fn protocol(&self) -> u8 {
        self.0.as_bytes().get(1).map_or(0, |b| b.wrapping_sub(b'0'))
    }
}

impl FromStr for Address {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        let invalid = |why: &str| StrategyError::InvalidArgument(format!("address '{s}': {why}"));

        let mut chars = normalized.chars();
        match chars.next() {
            Some('f') | Some('t') => {}
            _ => return Err(invalid("network prefix must be 'f' or 't'")),
        }
        let protocol = match chars.next() {
            Some(c @ '0'..='4') => c,
            _ => return Err(invalid("protocol must be a digit 0-4")),
        };
        let payload = chars.as_str();
        if payload.is_empty() {
            return Err(invalid("empty payload"));
        }
        let payload_ok = match protocol {
            '0' => is_decimal(payload),
            '4' => match payload.split_once('f') {
                Some((actor, sub)) => is_decimal(actor) && is_base32(sub),
                None => false,
            },
            _ => is_base32(payload),
        };
        if !payload_ok {
            return Err(invalid("malformed payload"));
        }

        Ok(Address(normalized))
    }
}

impl TryFrom<String> for Address {
    type Error = StrategyError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn is_base32(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| BASE32_ALPHABET.contains(c))
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
