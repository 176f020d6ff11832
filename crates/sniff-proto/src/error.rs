//! Error types for frame layout decoding

use thiserror::Error;

/// Errors that can occur while decoding captured data
///
/// The classifier never surfaces these: a buffer that fails to decode is
/// simply classified as `None`. They are returned by the typed view
/// constructors and by the text parsers used for configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Buffer is shorter than the minimum size of the layout
    #[error("truncated {layout}: need {needed} bytes, got {actual}")]
    Truncated {
        layout: &'static str,
        needed: usize,
        actual: usize,
    },

    /// TracerFi magic number mismatch
    #[error("bad TracerFi magic: 0x{0:08X}")]
    BadMagic(u32),

    /// Channel number outside 1..=14
    #[error("invalid channel: {0}")]
    InvalidChannel(u8),

    /// Hardware address text could not be parsed
    #[error("invalid MAC address: {0}")]
    InvalidMac(String),

    /// Unknown channel mask preset name
    #[error("unknown channel mask preset: {0}")]
    UnknownPreset(String),
}

/// Check that `buf` holds at least `needed` bytes for `layout`
pub(crate) fn ensure_len(layout: &'static str, buf: &[u8], needed: usize) -> Result<(), ParseError> {
    if buf.len() < needed {
        return Err(ParseError::Truncated {
            layout,
            needed,
            actual: buf.len(),
        });
    }
    Ok(())
}
