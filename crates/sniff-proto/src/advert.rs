//! BLE advertisement records
//!
//! Advertisement data is a sequence of AD structures:
//! ```text
//! [length] [type] [data; length - 1]
//! ```
//! A zero length byte terminates the sequence early.

use crate::mac::MacAddr;

/// Flags
pub const AD_FLAGS: u8 = 0x01;
/// Incomplete list of 16-bit service UUIDs
pub const AD_UUID16_INCOMPLETE: u8 = 0x02;
/// Complete list of 16-bit service UUIDs
pub const AD_UUID16_COMPLETE: u8 = 0x03;
/// Shortened local name
pub const AD_SHORT_NAME: u8 = 0x08;
/// Complete local name
pub const AD_COMPLETE_NAME: u8 = 0x09;
/// TX power level
pub const AD_TX_POWER: u8 = 0x0A;
/// Manufacturer specific data
pub const AD_MANUFACTURER: u8 = 0xFF;

/// One observed advertisement
///
/// The payload aliases the driver's event buffer and is only valid for the
/// duration of the event callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvertisementRecord<'a> {
    pub address: MacAddr,
    /// Random (non-permanent) device address
    pub is_random: bool,
    pub payload: &'a [u8],
}

impl<'a> AdvertisementRecord<'a> {
    pub fn new(address: MacAddr, is_random: bool, payload: &'a [u8]) -> Self {
        Self {
            address,
            is_random,
            payload,
        }
    }

    /// Iterate over the complete AD structures in the payload
    pub fn ad_structures(&self) -> AdStructures<'a> {
        AdStructures { rest: self.payload }
    }

    /// Local name, preferring the complete name over the shortened one
    pub fn local_name(&self) -> Option<&'a str> {
        let mut short = None;
        for ad in self.ad_structures() {
            match ad.ad_type {
                AD_COMPLETE_NAME => return std::str::from_utf8(ad.data).ok(),
                AD_SHORT_NAME => short = std::str::from_utf8(ad.data).ok(),
                _ => {}
            }
        }
        short
    }

    /// Company identifier from manufacturer specific data
    pub fn manufacturer_id(&self) -> Option<u16> {
        self.ad_structures()
            .find(|ad| ad.ad_type == AD_MANUFACTURER)
            .and_then(|ad| ad.data.get(..2))
            .map(|id| u16::from_le_bytes([id[0], id[1]]))
    }

    /// Advertised TX power in dBm
    pub fn tx_power(&self) -> Option<i8> {
        self.ad_structures()
            .find(|ad| ad.ad_type == AD_TX_POWER)
            .and_then(|ad| ad.data.first())
            .map(|&p| p as i8)
    }
}

/// A single AD structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdStructure<'a> {
    pub ad_type: u8,
    pub data: &'a [u8],
}

/// Iterator over AD structures, stopping at a zero length or truncation
#[derive(Debug, Clone)]
pub struct AdStructures<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for AdStructures<'a> {
    type Item = AdStructure<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&len, body) = self.rest.split_first()?;
        let len = len as usize;
        if len == 0 || body.len() < len {
            self.rest = &[];
            return None;
        }
        let (ad_type, data) = (body[0], &body[1..len]);
        self.rest = &body[len..];
        Some(AdStructure { ad_type, data })
    }
}
