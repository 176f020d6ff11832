//! Scan configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sniff_proto::channel::validate_channel;
use sniff_proto::{ChannelMask, TieBreak};

use crate::error::ScanError;

/// Parameters for one run of the scan sequence
///
/// Durations are stored as whole milliseconds so the JSON form stays
/// readable; use the `Duration` accessors in code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanSettings {
    /// Channels visited during the AP sweep
    pub mask: ChannelMask,
    /// Dwell time per channel during the AP sweep
    pub ap_period_ms: u64,
    /// Length of the BLE scan phase
    pub ble_period_ms: u64,
    /// Wait after each TracerFi transmission
    pub tfi_period_ms: u64,
    /// Number of TracerFi transmissions
    pub tfi_transmits: u8,
    /// Channel used for TracerFi transmissions
    pub tfi_channel: u8,
    /// Transmit power in 0.25 dBm units
    pub tfi_power: i8,
    /// Classifier policy for frames that match both interpretations
    pub tie_break: TieBreak,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            mask: ChannelMask::ALL,
            ap_period_ms: 120,
            ble_period_ms: 5000,
            tfi_period_ms: 100,
            tfi_transmits: 3,
            tfi_channel: 1,
            tfi_power: 78,
            tie_break: TieBreak::default(),
        }
    }
}

impl ScanSettings {
    pub fn ap_period(&self) -> Duration {
        Duration::from_millis(self.ap_period_ms)
    }

    pub fn ble_period(&self) -> Duration {
        Duration::from_millis(self.ble_period_ms)
    }

    pub fn tfi_period(&self) -> Duration {
        Duration::from_millis(self.tfi_period_ms)
    }

    /// Reject settings the radio cannot honour
    ///
    /// An empty mask is allowed: the sweep simply visits nothing.
    pub fn validate(&self) -> Result<(), ScanError> {
        validate_channel(self.tfi_channel)
            .map_err(|e| ScanError::InvalidSettings(format!("tfi_channel: {e}")))?;
        Ok(())
    }

    /// Total time `Sniffer::run` spends waiting with these settings
    pub fn expected_duration(&self) -> Duration {
        self.tfi_period() * u32::from(self.tfi_transmits)
            + self.ap_period() * self.mask.count() as u32
            + self.ble_period()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ScanSettings::default();
        assert_eq!(settings.mask, ChannelMask::ALL);
        assert_eq!(settings.ap_period(), Duration::from_millis(120));
        assert_eq!(settings.ble_period(), Duration::from_secs(5));
        assert_eq!(settings.tfi_period(), Duration::from_millis(100));
        assert_eq!(settings.tfi_transmits, 3);
        assert_eq!(settings.tfi_channel, 1);
        assert_eq!(settings.tfi_power, 78);
        assert_eq!(settings.tie_break, TieBreak::SizeFirst);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_expected_duration() {
        let settings = ScanSettings {
            mask: ChannelMask::from_channels([1, 6, 11]).unwrap(),
            ..Default::default()
        };
        // 3 * 100 + 3 * 120 + 5000
        assert_eq!(settings.expected_duration(), Duration::from_millis(5660));

        let settings = ScanSettings::default();
        // 3 * 100 + 14 * 120 + 5000
        assert_eq!(settings.expected_duration(), Duration::from_millis(6980));
    }

    #[test]
    fn test_validate_rejects_bad_channel() {
        for channel in [0, 15, 255] {
            let settings = ScanSettings {
                tfi_channel: channel,
                ..Default::default()
            };
            assert!(matches!(
                settings.validate(),
                Err(ScanError::InvalidSettings(_))
            ));
        }
    }

    #[test]
    fn test_empty_mask_is_valid() {
        let settings = ScanSettings {
            mask: ChannelMask::EMPTY,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = ScanSettings {
            mask: ChannelMask::US,
            tie_break: TieBreak::MagicFirst,
            ..Default::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: ScanSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let parsed: ScanSettings =
            serde_json::from_str(r#"{"mask": "us", "tfi_transmits": 5}"#).unwrap();
        assert_eq!(parsed.mask, ChannelMask::US);
        assert_eq!(parsed.tfi_transmits, 5);
        assert_eq!(parsed.ap_period_ms, 120);
        assert_eq!(parsed.tie_break, TieBreak::SizeFirst);
    }

    #[test]
    fn test_json_mask_as_channel_list() {
        let parsed: ScanSettings =
            serde_json::from_str(r#"{"mask": [1, 6, 11], "tie_break": "magic_first"}"#).unwrap();
        assert_eq!(parsed.mask.channels().collect::<Vec<_>>(), vec![1, 6, 11]);
        assert_eq!(parsed.tie_break, TieBreak::MagicFirst);
    }

    #[test]
    fn test_json_rejects_bad_mask() {
        assert!(serde_json::from_str::<ScanSettings>(r#"{"mask": [0, 6]}"#).is_err());
        assert!(serde_json::from_str::<ScanSettings>(r#"{"mask": "mars"}"#).is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn expected_duration_sums_phases(
                bits in 0u16..0x4000,
                ap in 0u64..1000,
                ble in 0u64..10_000,
                tfi in 0u64..1000,
                transmits in any::<u8>(),
            ) {
                let settings = ScanSettings {
                    mask: ChannelMask::from_bits(bits),
                    ap_period_ms: ap,
                    ble_period_ms: ble,
                    tfi_period_ms: tfi,
                    tfi_transmits: transmits,
                    ..Default::default()
                };
                let total = tfi * u64::from(transmits) + ap * u64::from(bits.count_ones()) + ble;
                prop_assert_eq!(settings.expected_duration(), Duration::from_millis(total));
            }

            #[test]
            fn json_keeps_mask(bits in 0u16..0x4000) {
                let settings = ScanSettings {
                    mask: ChannelMask::from_bits(bits),
                    ..Default::default()
                };
                let json = serde_json::to_string(&settings).unwrap();
                let parsed: ScanSettings = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(parsed.mask, settings.mask);
            }
        }
    }
}
