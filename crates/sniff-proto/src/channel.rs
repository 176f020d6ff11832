//! 2.4 GHz channel masks
//!
//! A [`ChannelMask`] selects which of the 14 channels take part in a sweep.
//! Bit *i* of the mask enables channel *i + 1*.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Lowest valid channel number
pub const MIN_CHANNEL: u8 = 1;
/// Highest valid channel number
pub const MAX_CHANNEL: u8 = 14;

const VALID_BITS: u16 = 0x3FFF;

/// A 14-bit set of channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ChannelMask(u16);

impl ChannelMask {
    /// Channels 1-14 (Japan and most unregulated use)
    pub const ALL: ChannelMask = ChannelMask(0b0011_1111_1111_1111);
    /// Channels 1-11 (United States)
    pub const US: ChannelMask = ChannelMask(0b0000_0111_1111_1111);
    /// Channels 1-13 (United Kingdom and most of Europe)
    pub const UK: ChannelMask = ChannelMask(0b0001_1111_1111_1111);
    /// Alias of [`ChannelMask::UK`]
    pub const EU: ChannelMask = ChannelMask::UK;
    /// No channels
    pub const EMPTY: ChannelMask = ChannelMask(0);

    /// Create a mask from raw bits. Bits above channel 14 are discarded.
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits & VALID_BITS)
    }

    /// Raw bit value
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Build a mask from channel numbers
    pub fn from_channels<I>(channels: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = u8>,
    {
        let mut mask = Self::EMPTY;
        for ch in channels {
            mask.insert(ch)?;
        }
        Ok(mask)
    }

    /// Whether `channel` is enabled. Out-of-range channels are never enabled.
    pub fn contains(&self, channel: u8) -> bool {
        match bit_for(channel) {
            Some(bit) => self.0 & bit != 0,
            None => false,
        }
    }

    /// Enable a channel
    pub fn insert(&mut self, channel: u8) -> Result<(), ParseError> {
        let bit = bit_for(channel).ok_or(ParseError::InvalidChannel(channel))?;
        self.0 |= bit;
        Ok(())
    }

    /// Disable a channel
    pub fn remove(&mut self, channel: u8) -> Result<(), ParseError> {
        let bit = bit_for(channel).ok_or(ParseError::InvalidChannel(channel))?;
        self.0 &= !bit;
        Ok(())
    }

    /// Enabled channels in ascending order
    pub fn channels(&self) -> impl Iterator<Item = u8> + '_ {
        (MIN_CHANNEL..=MAX_CHANNEL).filter(move |&ch| self.contains(ch))
    }

    /// Number of enabled channels
    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// True if no channel is enabled
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Preset name, if the mask matches one
    pub fn preset_name(&self) -> Option<&'static str> {
        match *self {
            Self::ALL => Some("all"),
            Self::US => Some("us"),
            Self::UK => Some("uk"),
            _ => None,
        }
    }
}

/// Check that `channel` is in 1..=14
pub fn validate_channel(channel: u8) -> Result<u8, ParseError> {
    bit_for(channel)
        .map(|_| channel)
        .ok_or(ParseError::InvalidChannel(channel))
}

fn bit_for(channel: u8) -> Option<u16> {
    if (MIN_CHANNEL..=MAX_CHANNEL).contains(&channel) {
        Some(1 << (channel - 1))
    } else {
        None
    }
}

impl fmt::Display for ChannelMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.preset_name() {
            return write!(f, "{name}");
        }
        let mut first = true;
        for ch in self.channels() {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{ch}")?;
            first = false;
        }
        Ok(())
    }
}

/// Parses a preset name (`all`, `us`, `uk`, `eu`) or a comma-separated list
/// of channel numbers.
impl FromStr for ChannelMask {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => return Ok(Self::ALL),
            "us" => return Ok(Self::US),
            "uk" | "eu" => return Ok(Self::UK),
            _ => {}
        }

        let mut mask = Self::EMPTY;
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let ch: u8 = part
                .parse()
                .map_err(|_| ParseError::UnknownPreset(s.to_string()))?;
            mask.insert(ch)?;
        }
        Ok(mask)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::ChannelMask;

    impl Serialize for ChannelMask {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.channels())
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum MaskRepr {
        Preset(String),
        Channels(Vec<u8>),
    }

    impl<'de> Deserialize<'de> for ChannelMask {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            match MaskRepr::deserialize(deserializer)? {
                MaskRepr::Preset(name) => name.parse().map_err(serde::de::Error::custom),
                MaskRepr::Channels(channels) => {
                    ChannelMask::from_channels(channels).map_err(serde::de::Error::custom)
                }
            }
        }
    }
}
