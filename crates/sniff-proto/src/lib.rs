//! Sniffer Protocol Library
//!
//! This crate provides bounds-checked layouts and a pure classifier for the
//! frames a passive sniffer cares about:
//!
//! - **802.11 management frames**: frame control bit field and the common
//!   24-byte header
//! - **Beacons**: fixed fields plus information elements (SSID first)
//! - **TracerFi**: a private discovery frame that reuses the beacon subtype
//!   and carries a magic number in place of the destination address
//! - **BLE advertisements**: address, random-address flag and AD structures
//!
//! # Architecture
//!
//! Every layout is a borrowed view (`&'a [u8]`) created through a constructor
//! that checks the minimum length first. Field accessors decode explicit byte
//! offsets and bit positions; nothing relies on in-memory struct layout.
//!
//! The [`classify`] function maps a captured buffer to exactly one
//! [`ScanResult`], whose payload borrows the capture buffer.
//!
//! # Example
//!
//! ```rust
//! use sniff_proto::{classify, MacAddr, ScanKind, TracerFiPacket};
//!
//! let frame = TracerFiPacket::new(MacAddr([0x24, 0x0A, 0xC4, 1, 2, 3])).to_bytes();
//! let result = classify(&frame, -48, 6);
//!
//! assert_eq!(result.kind(), ScanKind::TracerFi);
//! assert_eq!(result.as_tracerfi().unwrap().sender().to_string(), "24:0a:c4:01:02:03");
//! ```

pub mod advert;
pub mod beacon;
pub mod channel;
pub mod classify;
pub mod error;
pub mod frame;
pub mod mac;
pub mod result;
pub mod tracerfi;

pub use advert::AdvertisementRecord;
pub use beacon::{BeaconFrame, InfoElement, BEACON_MIN_LEN};
pub use channel::ChannelMask;
pub use classify::{classify, Classifier, TieBreak};
pub use error::ParseError;
pub use frame::{FrameControl, FrameType, MgmtHeader, MGMT_HEADER_LEN, SUBTYPE_BEACON};
pub use mac::MacAddr;
pub use result::{Payload, ScanKind, ScanResult};
pub use tracerfi::{TracerFiFrame, TracerFiPacket, TRACERFI_LEN};

/// Trait for frames that can be encoded for transmission
pub trait EncodeFrame {
    /// Encode this frame to its wire format
    fn encode(&self) -> Vec<u8>;
}
