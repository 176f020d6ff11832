//! Errors raised while scripting the virtual radio

use sniff_proto::ParseError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Scripted traffic placed on a channel outside 1..=14
    #[error("invalid channel: {0}")]
    Channel(#[from] ParseError),

    #[error("SSID is {0} bytes, limit is 32")]
    SsidTooLong(usize),

    /// Advertisement data would exceed the 31-byte legacy limit
    #[error("advertisement needs {0} bytes, limit is 31")]
    AdvertisementTooLong(usize),
}
