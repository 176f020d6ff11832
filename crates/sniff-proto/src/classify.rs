//! Frame classifier
//!
//! Turns a raw captured buffer into a [`ScanResult`]. Classification is a
//! pure function of its inputs: no allocation, no shared state, and no
//! logging, so it is safe to call from the driver's receive callback.
//!
//! # Decision order
//! 1. Shorter than a management header: `None`
//! 2. Subtype other than beacon: `None`
//! 3. At least [`BEACON_MIN_LEN`](crate::beacon::BEACON_MIN_LEN) bytes: `AccessPoint`
//! 4. At least [`TRACERFI_LEN`](crate::tracerfi::TRACERFI_LEN) bytes: `TracerFi` if the magic matches,
//!    otherwise `None`
//!
//! Step 3 is decided by length alone, so a TracerFi frame padded past the
//! beacon minimum is reported as an access point. [`TieBreak::MagicFirst`]
//! checks the magic before falling back to the beacon interpretation.

use crate::beacon::BeaconFrame;
use crate::frame::{FrameControl, MGMT_HEADER_LEN};
use crate::result::{Payload, ScanResult};
use crate::tracerfi::TracerFiFrame;

/// How to resolve a beacon-subtype frame that could be either layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TieBreak {
    /// Length decides first: long frames are always access points
    #[default]
    SizeFirst,
    /// A matching TracerFi magic wins regardless of length
    MagicFirst,
}

/// Frame classifier configured with a tie-break policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classifier {
    tie_break: TieBreak,
}

impl Classifier {
    pub const fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Classify a captured frame
    pub fn classify<'a>(&self, frame: &'a [u8], rssi: i8, channel: u8) -> ScanResult<'a> {
        let length = frame.len();
        let none = ScanResult::none(rssi, channel, length);

        if length < MGMT_HEADER_LEN {
            return none;
        }

        let fc = FrameControl::from_bytes([frame[0], frame[1]]);
        if !fc.is_beacon_subtype() {
            return none;
        }

        let payload = match self.tie_break {
            TieBreak::SizeFirst => size_first(frame),
            TieBreak::MagicFirst => magic_first(frame),
        };

        ScanResult { payload, ..none }
    }

    /// Classify a capture whose driver-reported length may differ from the
    /// buffer it arrived in
    ///
    /// The shorter of the two bounds the view, so a bogus length can never
    /// expose bytes past the end of the buffer.
    pub fn classify_len<'a>(
        &self,
        buffer: &'a [u8],
        length: usize,
        rssi: i8,
        channel: u8,
    ) -> ScanResult<'a> {
        let length = length.min(buffer.len());
        self.classify(&buffer[..length], rssi, channel)
    }
}

fn size_first(frame: &[u8]) -> Payload<'_> {
    if let Ok(beacon) = BeaconFrame::new(frame) {
        return Payload::AccessPoint(beacon);
    }
    match TracerFiFrame::parse(frame) {
        Ok(tfi) => Payload::TracerFi(tfi),
        Err(_) => Payload::None,
    }
}

fn magic_first(frame: &[u8]) -> Payload<'_> {
    if let Ok(tfi) = TracerFiFrame::parse(frame) {
        return Payload::TracerFi(tfi);
    }
    match BeaconFrame::new(frame) {
        Ok(beacon) => Payload::AccessPoint(beacon),
        Err(_) => Payload::None,
    }
}

/// Classify a captured frame with the default [`TieBreak::SizeFirst`] policy
pub fn classify(frame: &[u8], rssi: i8, channel: u8) -> ScanResult<'_> {
    Classifier::default().classify(frame, rssi, channel)
}
