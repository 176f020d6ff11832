//! Error types for the scan orchestrator

use thiserror::Error;

use crate::state::ScanPhase;

/// Failure reported by the radio driver
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// A radio operation failed
    #[error("{op} failed: {reason}")]
    Radio { op: &'static str, reason: String },

    /// The driver was not initialized for the requested operation
    #[error("driver not ready: {0}")]
    NotReady(&'static str),
}

impl DriverError {
    /// Convenience constructor for [`DriverError::Radio`]
    pub fn radio(op: &'static str, reason: impl Into<String>) -> Self {
        Self::Radio {
            op,
            reason: reason.into(),
        }
    }
}

/// Errors that abort a scan
///
/// Every driver failure is fatal: the sequence stops at the failing call and
/// no further driver calls are made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A driver call failed during the given phase
    #[error("scan aborted during {phase}: {source}")]
    Driver {
        phase: ScanPhase,
        #[source]
        source: DriverError,
    },

    /// Settings rejected before any driver call
    #[error("invalid scan settings: {0}")]
    InvalidSettings(String),
}

impl ScanError {
    /// Phase the scan was in when it aborted, if it had started
    pub fn phase(&self) -> Option<ScanPhase> {
        match self {
            ScanError::Driver { phase, .. } => Some(*phase),
            ScanError::InvalidSettings(_) => None,
        }
    }
}
