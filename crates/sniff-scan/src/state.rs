//! Scan phase tracking

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Phase of the scan sequence
///
/// Phases only ever advance: `Idle -> TfiTransmit -> ApSweep -> BleScan -> Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScanPhase {
    #[default]
    Idle,
    /// Transmitting TracerFi announcements with capture enabled
    TfiTransmit,
    /// Hopping across masked channels with capture enabled
    ApSweep,
    /// Capture disabled, BLE discovery running
    BleScan,
}

impl ScanPhase {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::TfiTransmit => "TracerFi transmit",
            Self::ApSweep => "AP sweep",
            Self::BleScan => "BLE scan",
        }
    }
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Explicit orchestrator state, threaded through every phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanState {
    pub phase: ScanPhase,
    /// Channel the radio was last tuned to (0 before the first tune)
    pub tuned_channel: u8,
    pub transmits_sent: u8,
    pub channels_visited: u8,
}

impl ScanState {
    /// Enter a new phase
    pub(crate) fn advance(&mut self, phase: ScanPhase) {
        self.phase = phase;
    }
}

/// Summary of a completed scan
///
/// Results themselves are delivered to the sink while the scan runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    pub transmits_sent: u8,
    pub channels_visited: u8,
    /// Wall-clock time from the first driver call to the last
    pub elapsed: Duration,
}
