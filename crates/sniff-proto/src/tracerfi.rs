//! TracerFi discovery frame
//!
//! TracerFi devices announce themselves with a frame that reuses the beacon
//! management subtype but replaces the destination address with a magic
//! number and protocol version.
//!
//! # Frame Format
//! ```text
//! offset  size  field
//!      0     2  frame control (beacon subtype, power management set)
//!      2     2  duration / ID
//!      4     4  magic (little-endian u32, 0x54524649)
//!      8     1  protocol version
//!      9     1  reserved
//!     10     6  sender address (device MAC)
//!     16     8  reserved padding
//! ```
//!
//! The frame is exactly as long as a management header, which is the
//! shortest frame the radio will transmit.

use crate::error::{ensure_len, ParseError};
use crate::frame::{read_mac, read_u16, read_u32, FrameControl, SUBTYPE_BEACON};
use crate::mac::MacAddr;
use crate::EncodeFrame;

/// TracerFi magic number
pub const MAGIC: u32 = 0x5452_4649;
/// TracerFi protocol version
pub const VERSION: u8 = 0;
/// Length of a TracerFi frame
pub const TRACERFI_LEN: usize = 24;

const MAGIC_OFFSET: usize = 4;
const VERSION_OFFSET: usize = 8;
const RESERVED_OFFSET: usize = 9;
const SENDER_OFFSET: usize = 10;
const PADDING_OFFSET: usize = 16;

/// Borrowed view over a TracerFi frame
///
/// Construction only checks the length; use [`TracerFiFrame::parse`] to
/// also require a matching magic number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracerFiFrame<'a> {
    bytes: &'a [u8],
}

impl<'a> TracerFiFrame<'a> {
    /// Create a view without validating the magic number
    pub fn new(bytes: &'a [u8]) -> Result<Self, ParseError> {
        ensure_len("TracerFi frame", bytes, TRACERFI_LEN)?;
        Ok(Self { bytes })
    }

    /// Create a view and require the TracerFi magic number
    pub fn parse(bytes: &'a [u8]) -> Result<Self, ParseError> {
        let frame = Self::new(bytes)?;
        if !frame.is_valid() {
            return Err(ParseError::BadMagic(frame.magic()));
        }
        Ok(frame)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn frame_control(&self) -> FrameControl {
        FrameControl::from_bytes([self.bytes[0], self.bytes[1]])
    }

    pub fn duration_id(&self) -> u16 {
        read_u16(self.bytes, 2)
    }

    pub fn magic(&self) -> u32 {
        read_u32(self.bytes, MAGIC_OFFSET)
    }

    /// True if the magic number matches
    pub fn is_valid(&self) -> bool {
        self.magic() == MAGIC
    }

    pub fn version(&self) -> u8 {
        self.bytes[VERSION_OFFSET]
    }

    /// Address of the announcing device
    pub fn sender(&self) -> MacAddr {
        read_mac(self.bytes, SENDER_OFFSET)
    }
}

/// Owned TracerFi frame used for transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracerFiPacket {
    pub frame_control: FrameControl,
    pub duration_id: u16,
    pub version: u8,
    pub sender: MacAddr,
}

impl TracerFiPacket {
    /// Default announcement stamped with the device's own address
    pub fn new(sender: MacAddr) -> Self {
        let mut frame_control = FrameControl::management(SUBTYPE_BEACON);
        frame_control.power_mgmt = true;
        Self {
            frame_control,
            duration_id: 0,
            version: VERSION,
            sender,
        }
    }

    /// Encode to a fixed-size wire buffer
    pub fn to_bytes(&self) -> [u8; TRACERFI_LEN] {
        let mut frame = [0u8; TRACERFI_LEN];
        frame[0..2].copy_from_slice(&self.frame_control.to_bytes());
        frame[2..4].copy_from_slice(&self.duration_id.to_le_bytes());
        frame[MAGIC_OFFSET..VERSION_OFFSET].copy_from_slice(&MAGIC.to_le_bytes());
        frame[VERSION_OFFSET] = self.version;
        frame[RESERVED_OFFSET] = 0;
        frame[SENDER_OFFSET..PADDING_OFFSET].copy_from_slice(&self.sender.octets());
        frame
    }
}

impl EncodeFrame for TracerFiPacket {
    fn encode(&self) -> Vec<u8> {
        self.to_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE: MacAddr = MacAddr([0x24, 0x0A, 0xC4, 0x12, 0x34, 0x56]);

    #[test]
    fn test_encode_default_packet() {
        let bytes = TracerFiPacket::new(DEVICE).to_bytes();
        assert_eq!(
            bytes,
            [
                0x80, 0x10, // beacon subtype, power management
                0x00, 0x00, // duration
                0x49, 0x46, 0x52, 0x54, // magic, little-endian
                0x00, 0x00, // version, reserved
                0x24, 0x0A, 0xC4, 0x12, 0x34, 0x56, // sender
                0, 0, 0, 0, 0, 0, 0, 0, // padding
            ]
        );
    }

    #[test]
    fn test_parse_encoded_packet() {
        let bytes = TracerFiPacket::new(DEVICE).encode();
        let frame = TracerFiFrame::parse(&bytes).unwrap();
        assert!(frame.is_valid());
        assert!(frame.frame_control().is_beacon_subtype());
        assert!(frame.frame_control().power_mgmt);
        assert_eq!(frame.version(), VERSION);
        assert_eq!(frame.sender(), DEVICE);
        assert_eq!(frame.duration_id(), 0);
    }

    #[test]
    fn test_parse_bad_magic() {
        let mut bytes = TracerFiPacket::new(DEVICE).to_bytes();
        bytes[4] = 0x00;
        assert_eq!(
            TracerFiFrame::parse(&bytes),
            Err(ParseError::BadMagic(0x5452_4600))
        );
        // length-only view still constructs
        assert!(!TracerFiFrame::new(&bytes).unwrap().is_valid());
    }

    #[test]
    fn test_too_short() {
        let bytes = TracerFiPacket::new(DEVICE).to_bytes();
        assert!(matches!(
            TracerFiFrame::new(&bytes[..23]),
            Err(ParseError::Truncated { needed: 24, actual: 23, .. })
        ));
    }
}
