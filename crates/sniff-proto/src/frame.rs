//! 802.11 frame control and management frame header
//!
//! # Header Layout
//! ```text
//! offset  size  field
//!      0     2  frame control (little-endian bit field)
//!      2     2  duration / ID
//!      4     6  address 1 (destination)
//!     10     6  address 2 (source)
//!     16     6  address 3 (BSSID)
//!     22     2  sequence control
//! ```
//!
//! # Frame Control Bits
//! ```text
//! bit  0-1   protocol version
//! bit  2-3   type
//! bit  4-7   subtype
//! bit  8     to DS
//! bit  9     from DS
//! bit 10     more fragments
//! bit 11     retry
//! bit 12     power management
//! bit 13     more data
//! bit 14     protected frame
//! bit 15     +HTC / order
//! ```

use crate::error::{ensure_len, ParseError};
use crate::mac::MacAddr;

/// Size of the common management frame header
pub const MGMT_HEADER_LEN: usize = 24;

/// Management subtype used by beacons (and reused by TracerFi)
pub const SUBTYPE_BEACON: u8 = 0b1000;

/// 802.11 frame type (2-bit field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameType {
    /// Management frames (beacons, probes, ...)
    Management = 0,
    /// Control frames (RTS, CTS, ACK, ...)
    Control = 1,
    /// Data frames
    Data = 2,
    /// Extension frames
    Extension = 3,
}

impl FrameType {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::Management,
            1 => Self::Control,
            2 => Self::Data,
            _ => Self::Extension,
        }
    }
}

/// Decoded frame control field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameControl {
    pub version: u8,
    pub frame_type: FrameType,
    pub subtype: u8,
    pub to_ds: bool,
    pub from_ds: bool,
    pub more_fragments: bool,
    pub retry: bool,
    pub power_mgmt: bool,
    pub more_data: bool,
    pub protected: bool,
    pub order: bool,
}

impl FrameControl {
    /// Decode from the raw 16-bit field
    pub fn decode(raw: u16) -> Self {
        let bit = |n: u16| raw & (1 << n) != 0;
        Self {
            version: (raw & 0b11) as u8,
            frame_type: FrameType::from_bits(((raw >> 2) & 0b11) as u8),
            subtype: ((raw >> 4) & 0b1111) as u8,
            to_ds: bit(8),
            from_ds: bit(9),
            more_fragments: bit(10),
            retry: bit(11),
            power_mgmt: bit(12),
            more_data: bit(13),
            protected: bit(14),
            order: bit(15),
        }
    }

    /// Decode from the first two bytes of a frame
    pub fn from_bytes(bytes: [u8; 2]) -> Self {
        Self::decode(u16::from_le_bytes(bytes))
    }

    /// Encode to the raw 16-bit field
    pub fn encode(&self) -> u16 {
        let flag = |set: bool, n: u16| if set { 1 << n } else { 0 };
        (self.version as u16 & 0b11)
            | ((self.frame_type as u16) << 2)
            | ((self.subtype as u16 & 0b1111) << 4)
            | flag(self.to_ds, 8)
            | flag(self.from_ds, 9)
            | flag(self.more_fragments, 10)
            | flag(self.retry, 11)
            | flag(self.power_mgmt, 12)
            | flag(self.more_data, 13)
            | flag(self.protected, 14)
            | flag(self.order, 15)
    }

    /// Encode to wire bytes
    pub fn to_bytes(&self) -> [u8; 2] {
        self.encode().to_le_bytes()
    }

    /// Management frame with the given subtype and all flags clear
    pub fn management(subtype: u8) -> Self {
        Self {
            version: 0,
            frame_type: FrameType::Management,
            subtype: subtype & 0b1111,
            to_ds: false,
            from_ds: false,
            more_fragments: false,
            retry: false,
            power_mgmt: false,
            more_data: false,
            protected: false,
            order: false,
        }
    }

    /// True for the beacon management subtype
    ///
    /// Only the subtype is compared, matching what capture filters see: the
    /// driver has already restricted delivery to management frames.
    pub fn is_beacon_subtype(&self) -> bool {
        self.subtype == SUBTYPE_BEACON
    }
}

/// Sequence control field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceControl(pub u16);

impl SequenceControl {
    /// Fragment number (low 4 bits)
    pub fn fragment(&self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// Sequence number (high 12 bits)
    pub fn sequence(&self) -> u16 {
        self.0 >> 4
    }
}

/// Borrowed view over a management frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MgmtHeader<'a> {
    bytes: &'a [u8],
}

impl<'a> MgmtHeader<'a> {
    /// Create a view, checking that the full header is present
    pub fn new(bytes: &'a [u8]) -> Result<Self, ParseError> {
        ensure_len("management header", bytes, MGMT_HEADER_LEN)?;
        Ok(Self { bytes })
    }

    /// View over bytes already checked by a longer layout
    pub(crate) fn from_validated(bytes: &'a [u8]) -> Self {
        debug_assert!(bytes.len() >= MGMT_HEADER_LEN);
        Self { bytes }
    }

    /// Underlying bytes (the whole frame, not just the header)
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn frame_control(&self) -> FrameControl {
        FrameControl::from_bytes([self.bytes[0], self.bytes[1]])
    }

    pub fn duration_id(&self) -> u16 {
        read_u16(self.bytes, 2)
    }

    /// Address 1
    pub fn destination(&self) -> MacAddr {
        read_mac(self.bytes, 4)
    }

    /// Address 2
    pub fn source(&self) -> MacAddr {
        read_mac(self.bytes, 10)
    }

    /// Address 3
    pub fn bssid(&self) -> MacAddr {
        read_mac(self.bytes, 16)
    }

    pub fn sequence_control(&self) -> SequenceControl {
        SequenceControl(read_u16(self.bytes, 22))
    }
}

// Callers guarantee the range is in bounds via the view constructors.
pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

pub(crate) fn read_mac(bytes: &[u8], offset: usize) -> MacAddr {
    let mut octets = [0u8; 6];
    octets.copy_from_slice(&bytes[offset..offset + 6]);
    MacAddr(octets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_beacon_frame_control() {
        // Beacon: type 0, subtype 8 -> 0x0080
        let fc = FrameControl::from_bytes([0x80, 0x00]);
        assert_eq!(fc.version, 0);
        assert_eq!(fc.frame_type, FrameType::Management);
        assert_eq!(fc.subtype, SUBTYPE_BEACON);
        assert!(fc.is_beacon_subtype());
        assert!(!fc.power_mgmt);
    }

    #[test]
    fn test_decode_flags() {
        // Data frame (type 2), subtype 0, to_ds + retry + protected
        let raw = (2 << 2) | (1 << 8) | (1 << 11) | (1 << 14);
        let fc = FrameControl::decode(raw);
        assert_eq!(fc.frame_type, FrameType::Data);
        assert!(fc.to_ds);
        assert!(!fc.from_ds);
        assert!(fc.retry);
        assert!(fc.protected);
        assert!(!fc.order);
    }

    #[test]
    fn test_encode_power_mgmt_beacon() {
        let mut fc = FrameControl::management(SUBTYPE_BEACON);
        fc.power_mgmt = true;
        assert_eq!(fc.encode(), 0x1080);
        assert_eq!(fc.to_bytes(), [0x80, 0x10]);
    }

    #[test]
    fn test_encode_decode_every_bit() {
        for n in 0..16 {
            let raw = 1u16 << n;
            assert_eq!(FrameControl::decode(raw).encode(), raw, "bit {n}");
        }
    }

    #[test]
    fn test_header_fields() {
        let mut frame = [0u8; 24];
        frame[0] = 0x80;
        frame[2..4].copy_from_slice(&0x013Au16.to_le_bytes());
        frame[4..10].copy_from_slice(&[0xFF; 6]);
        frame[10..16].copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        frame[16..22].copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        // sequence 0x123, fragment 4
        frame[22..24].copy_from_slice(&((0x123u16 << 4) | 4).to_le_bytes());

        let hdr = MgmtHeader::new(&frame).unwrap();
        assert!(hdr.frame_control().is_beacon_subtype());
        assert_eq!(hdr.duration_id(), 0x013A);
        assert_eq!(hdr.destination(), MacAddr::BROADCAST);
        assert_eq!(hdr.source(), MacAddr([1, 2, 3, 4, 5, 6]));
        assert_eq!(hdr.bssid(), hdr.source());
        assert_eq!(hdr.sequence_control().sequence(), 0x123);
        assert_eq!(hdr.sequence_control().fragment(), 4);
    }

    #[test]
    fn test_header_too_short() {
        let err = MgmtHeader::new(&[0x80; 23]).unwrap_err();
        assert_eq!(
            err,
            ParseError::Truncated {
                layout: "management header",
                needed: 24,
                actual: 23
            }
        );
    }
}
