//! Sniffer Simulation Library
//!
//! This crate provides a simulation layer for running the scan sequence
//! without radio hardware. It includes:
//!
//! - **VirtualRadio**: a [`RadioDriver`](sniff_scan::RadioDriver) that plays
//!   back scripted frames per channel and scripted BLE devices, journals every
//!   call and can fail chosen calls
//! - **air**: builders for beacons, TracerFi frames and advertisement data
//! - **ResultCollector**: a sink that keeps owned copies of every result
//!
//! # Example
//!
//! ```rust
//! use sniff_proto::MacAddr;
//! use sniff_sim::{air, AirFrame, VirtualRadio};
//!
//! let mut radio = VirtualRadio::new("bench", MacAddr([0x24, 0x0A, 0xC4, 0, 0, 1]));
//!
//! let beacon = air::beacon_frame(MacAddr([0x02, 0, 0, 0, 0, 6]), "corner-cafe", 6).unwrap();
//! radio.add_frame(6, AirFrame::management(-60, beacon)).unwrap();
//!
//! assert_eq!(radio.air_frames(6), 1);
//! ```

pub mod air;
pub mod collect;
pub mod error;
pub mod radio;

pub use air::{AirFrame, BleDevice};
pub use collect::{CollectedResult, ResultCollector};
pub use error::SimError;
pub use radio::{DriverCall, DriverOp, JournalEntry, VirtualRadio, VirtualRadioConfig};
