//! Beacon frame view
//!
//! ```text
//! offset  size  field
//!      0    24  management header
//!     24     8  timestamp (TSF, little-endian)
//!     32     2  beacon interval (TU)
//!     34     2  capability information
//!     36     1  first element ID (SSID by convention)
//!     37     1  first element length
//!     38     n  element bodies...
//! ```
//!
//! A buffer counts as a beacon once it also holds the first SSID byte and
//! the tail padding of the 8-byte aligned layout the radio firmware uses,
//! so [`BEACON_MIN_LEN`] is 40 rather than 38.

use crate::error::{ensure_len, ParseError};
use crate::frame::{read_u16, MgmtHeader, MGMT_HEADER_LEN};

const TIMESTAMP_OFFSET: usize = MGMT_HEADER_LEN;
const INTERVAL_OFFSET: usize = MGMT_HEADER_LEN + 8;
const CAPABILITIES_OFFSET: usize = MGMT_HEADER_LEN + 10;
const ELEMENTS_OFFSET: usize = MGMT_HEADER_LEN + 12;

/// Fixed fields, first element header and the first SSID byte
const BEACON_PACKED_LEN: usize = ELEMENTS_OFFSET + 3;
/// Alignment of the firmware beacon layout (set by the u64 timestamp)
const BEACON_ALIGN: usize = 8;

/// Minimum length for a buffer to be interpreted as a beacon
pub const BEACON_MIN_LEN: usize = BEACON_PACKED_LEN.next_multiple_of(BEACON_ALIGN);

/// Element ID of the SSID element
pub const ELEMENT_SSID: u8 = 0;
/// Element ID of the DS parameter set (current channel)
pub const ELEMENT_DS_PARAMS: u8 = 3;

/// Microseconds in one time unit
const TU_MICROS: u64 = 1024;

/// Borrowed view over a beacon frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeaconFrame<'a> {
    bytes: &'a [u8],
}

impl<'a> BeaconFrame<'a> {
    /// Create a view, checking that the buffer is at least
    /// [`BEACON_MIN_LEN`] bytes
    pub fn new(bytes: &'a [u8]) -> Result<Self, ParseError> {
        ensure_len("beacon", bytes, BEACON_MIN_LEN)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn header(&self) -> MgmtHeader<'a> {
        MgmtHeader::from_validated(self.bytes)
    }

    /// TSF timer value in microseconds
    pub fn timestamp(&self) -> u64 {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&self.bytes[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + 8]);
        u64::from_le_bytes(raw)
    }

    /// Beacon interval in time units
    pub fn interval(&self) -> u16 {
        read_u16(self.bytes, INTERVAL_OFFSET)
    }

    /// Beacon interval in microseconds
    pub fn interval_micros(&self) -> u64 {
        self.interval() as u64 * TU_MICROS
    }

    /// Raw capability information bits
    pub fn capabilities(&self) -> u16 {
        read_u16(self.bytes, CAPABILITIES_OFFSET)
    }

    /// Privacy capability bit (WEP/WPA required)
    pub fn is_private(&self) -> bool {
        self.capabilities() & (1 << 4) != 0
    }

    /// The first information element
    ///
    /// Its body is clamped to the bytes actually captured.
    pub fn first_element(&self) -> InfoElement<'a> {
        let id = self.bytes[ELEMENTS_OFFSET];
        let len = self.bytes[ELEMENTS_OFFSET + 1] as usize;
        let start = ELEMENTS_OFFSET + 2;
        let end = (start + len).min(self.bytes.len());
        InfoElement {
            id,
            declared_len: len as u8,
            data: &self.bytes[start..end],
        }
    }

    /// Network name carried in the first element
    ///
    /// Returns `None` when the first element is not an SSID element. A hidden
    /// network yields an empty slice.
    pub fn ssid(&self) -> Option<&'a [u8]> {
        let elem = self.first_element();
        (elem.id == ELEMENT_SSID).then_some(elem.data)
    }

    /// Network name, if it is valid UTF-8
    pub fn ssid_str(&self) -> Option<&'a str> {
        self.ssid().and_then(|s| std::str::from_utf8(s).ok())
    }

    /// Iterate over the complete information elements
    pub fn elements(&self) -> Elements<'a> {
        Elements {
            rest: &self.bytes[ELEMENTS_OFFSET..],
        }
    }

    /// Channel advertised in the DS parameter set, if present
    pub fn ds_channel(&self) -> Option<u8> {
        self.elements()
            .find(|e| e.id == ELEMENT_DS_PARAMS)
            .and_then(|e| e.data.first().copied())
    }
}

/// A single information element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoElement<'a> {
    pub id: u8,
    /// Length byte as it appeared on the wire
    pub declared_len: u8,
    pub data: &'a [u8],
}

impl InfoElement<'_> {
    /// True when fewer bytes were captured than the length byte declares
    pub fn is_truncated(&self) -> bool {
        self.data.len() < self.declared_len as usize
    }
}

/// Iterator over information elements, stopping at the first truncated one
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Elements<'a> {
    type Item = InfoElement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&id, tail) = self.rest.split_first()?;
        let (&len, body) = tail.split_first()?;
        let len = len as usize;
        if body.len() < len {
            self.rest = &[];
            return None;
        }
        let (data, rest) = body.split_at(len);
        self.rest = rest;
        Some(InfoElement {
            id,
            declared_len: len as u8,
            data,
        })
    }
}
