//! Property tests for the frame classifier and channel masks
//!
//! These exercise the classifier over arbitrary buffers:
//! - Short buffers never classify as anything
//! - Length decides between the beacon and TracerFi layouts
//! - Classification is deterministic

use proptest::prelude::*;
use sniff_proto::tracerfi::MAGIC;
use sniff_proto::{
    classify, ChannelMask, Classifier, ScanKind, TieBreak, BEACON_MIN_LEN, MGMT_HEADER_LEN,
    TRACERFI_LEN,
};

// ============================================================================
// Strategies
// ============================================================================

/// Arbitrary bytes with the beacon subtype forced into the frame control field
fn beacon_subtype_frame(len: std::ops::Range<usize>) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), len).prop_map(|mut frame| {
        frame[0] = (frame[0] & 0x0F) | 0x80;
        frame
    })
}

fn with_magic(mut frame: Vec<u8>) -> Vec<u8> {
    frame[4..8].copy_from_slice(&MAGIC.to_le_bytes());
    frame
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn short_buffers_are_none(
        frame in prop::collection::vec(any::<u8>(), 0..MGMT_HEADER_LEN),
        rssi: i8,
        channel in 0u8..=14,
    ) {
        let result = classify(&frame, rssi, channel);
        prop_assert_eq!(result.kind(), ScanKind::None);
        prop_assert_eq!(result.payload_size, frame.len());
        prop_assert_eq!(result.rssi, rssi);
        prop_assert_eq!(result.channel, channel);
    }

    #[test]
    fn long_beacon_subtype_is_access_point(
        frame in beacon_subtype_frame(BEACON_MIN_LEN..256),
        tag_magic: bool,
    ) {
        let frame = if tag_magic { with_magic(frame) } else { frame };
        let result = classify(&frame, -60, 6);
        prop_assert_eq!(result.kind(), ScanKind::AccessPoint);
        prop_assert_eq!(result.raw().len(), frame.len());
    }

    #[test]
    fn mid_length_is_tracerfi_iff_magic(
        frame in beacon_subtype_frame(TRACERFI_LEN..BEACON_MIN_LEN),
        tag_magic: bool,
    ) {
        let frame = if tag_magic { with_magic(frame) } else { frame };
        let magic = u32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]);
        let result = classify(&frame, -60, 6);

        if magic == MAGIC {
            prop_assert_eq!(result.kind(), ScanKind::TracerFi);
        } else {
            prop_assert_eq!(result.kind(), ScanKind::None);
        }
    }

    #[test]
    fn other_subtypes_are_none(
        mut frame in prop::collection::vec(any::<u8>(), MGMT_HEADER_LEN..256),
        subtype in (0u8..16).prop_filter("not beacon", |s| *s != 0b1000),
    ) {
        frame[0] = (frame[0] & 0x0F) | (subtype << 4);
        prop_assert!(classify(&frame, -60, 6).is_none());
    }

    #[test]
    fn classification_is_idempotent(
        frame in prop::collection::vec(any::<u8>(), 0..128),
        rssi: i8,
        channel in 0u8..=14,
        magic_first: bool,
    ) {
        let policy = if magic_first { TieBreak::MagicFirst } else { TieBreak::SizeFirst };
        let classifier = Classifier::new(policy);
        let first = classifier.classify(&frame, rssi, channel);
        let second = classifier.classify(&frame, rssi, channel);

        prop_assert_eq!(first.kind(), second.kind());
        prop_assert_eq!(first, second);
        if !first.is_none() {
            prop_assert_eq!(first.raw().as_ptr(), second.raw().as_ptr());
            prop_assert_eq!(first.raw().len(), second.raw().len());
        }
    }

    #[test]
    fn magic_first_finds_padded_tracerfi(
        frame in beacon_subtype_frame(TRACERFI_LEN..256),
    ) {
        let frame = with_magic(frame);
        let result = Classifier::new(TieBreak::MagicFirst).classify(&frame, -60, 6);
        prop_assert_eq!(result.kind(), ScanKind::TracerFi);
    }

    #[test]
    fn mask_bit_matches_channel(bits: u16) {
        let mask = ChannelMask::from_bits(bits);
        for i in 0..14u8 {
            prop_assert_eq!(mask.contains(i + 1), bits & (1 << i) != 0);
        }
        let visited: Vec<u8> = mask.channels().collect();
        prop_assert_eq!(visited.len(), mask.count());
        prop_assert!(visited.windows(2).all(|w| w[0] < w[1]));
    }
}
