//! Hardware addresses

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// A 6-byte hardware address (802.11 station address or BLE device address)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// Broadcast address `ff:ff:ff:ff:ff:ff`
    pub const BROADCAST: MacAddr = MacAddr([0xFF; 6]);

    /// Read an address from the first six bytes of `bytes`
    ///
    /// Returns `None` if fewer than six bytes are available.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let octets: [u8; 6] = bytes.get(..6)?.try_into().ok()?;
        Some(Self(octets))
    }

    /// Get the raw octets
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// Locally administered bit of the first octet
    pub fn is_local(&self) -> bool {
        self.0[0] & 0x02 != 0
    }

    /// Group (multicast) bit of the first octet
    pub fn is_multicast(&self) -> bool {
        self.0[0] & 0x01 != 0
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for MacAddr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split([':', '-']);

        for octet in octets.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| ParseError::InvalidMac(s.to_string()))?;
            if part.len() != 2 {
                return Err(ParseError::InvalidMac(s.to_string()));
            }
            *octet =
                u8::from_str_radix(part, 16).map_err(|_| ParseError::InvalidMac(s.to_string()))?;
        }

        if parts.next().is_some() {
            return Err(ParseError::InvalidMac(s.to_string()));
        }

        Ok(Self(octets))
    }
}
