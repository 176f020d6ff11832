//! Tagged scan results

use std::fmt;

use crate::advert::AdvertisementRecord;
use crate::beacon::BeaconFrame;
use crate::tracerfi::TracerFiFrame;

/// What a scan result describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScanKind {
    /// Nothing of interest
    None,
    /// A TracerFi discovery frame
    TracerFi,
    /// An access point beacon
    AccessPoint,
    /// A BLE advertisement
    Advertisement,
    /// Classic Bluetooth inquiry result (reserved, never produced)
    ClassicDevice,
}

impl ScanKind {
    /// Short label used in logs and output
    pub fn name(&self) -> &'static str {
        match self {
            ScanKind::None => "none",
            ScanKind::TracerFi => "tfi",
            ScanKind::AccessPoint => "ap",
            ScanKind::Advertisement => "ble",
            ScanKind::ClassicDevice => "bt",
        }
    }
}

/// Typed view of a result's payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    None,
    TracerFi(TracerFiFrame<'a>),
    AccessPoint(BeaconFrame<'a>),
    Advertisement(AdvertisementRecord<'a>),
}

/// One classified capture
///
/// Borrows the driver's capture buffer; it is valid only for the duration of
/// the classification call and the sink invocation that follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanResult<'a> {
    /// Signal strength in dBm
    pub rssi: i8,
    /// Channel the frame was captured on (0 for BLE)
    pub channel: u8,
    /// Captured length in bytes
    pub payload_size: usize,
    pub payload: Payload<'a>,
}

impl<'a> ScanResult<'a> {
    /// A "no match" result carrying only capture metadata
    pub fn none(rssi: i8, channel: u8, payload_size: usize) -> Self {
        Self {
            rssi,
            channel,
            payload_size,
            payload: Payload::None,
        }
    }

    pub fn kind(&self) -> ScanKind {
        match self.payload {
            Payload::None => ScanKind::None,
            Payload::TracerFi(_) => ScanKind::TracerFi,
            Payload::AccessPoint(_) => ScanKind::AccessPoint,
            Payload::Advertisement(_) => ScanKind::Advertisement,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self.payload, Payload::None)
    }

    pub fn as_tracerfi(&self) -> Option<&TracerFiFrame<'a>> {
        match &self.payload {
            Payload::TracerFi(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_beacon(&self) -> Option<&BeaconFrame<'a>> {
        match &self.payload {
            Payload::AccessPoint(frame) => Some(frame),
            _ => None,
        }
    }

    pub fn as_advertisement(&self) -> Option<&AdvertisementRecord<'a>> {
        match &self.payload {
            Payload::Advertisement(record) => Some(record),
            _ => None,
        }
    }

    /// Raw bytes behind the view (empty for `None`)
    pub fn raw(&self) -> &'a [u8] {
        match self.payload {
            Payload::None => &[],
            Payload::TracerFi(frame) => frame.as_bytes(),
            Payload::AccessPoint(frame) => frame.as_bytes(),
            Payload::Advertisement(record) => record.payload,
        }
    }
}

/// One-line summary, e.g. `ap ch=6 rssi=-52 24:0a:c4:01:02:03 "corp-net"`
impl fmt::Display for ScanResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ch={} rssi={}",
            self.kind().name(),
            self.channel,
            self.rssi
        )?;
        match &self.payload {
            Payload::None => Ok(()),
            Payload::TracerFi(frame) => {
                write!(f, " {} v{}", frame.sender(), frame.version())
            }
            Payload::AccessPoint(beacon) => {
                write!(f, " {}", beacon.header().bssid())?;
                match beacon.ssid() {
                    Some(ssid) => write!(f, " \"{}\"", String::from_utf8_lossy(ssid)),
                    None => Ok(()),
                }
            }
            Payload::Advertisement(record) => {
                write!(
                    f,
                    " {}{}",
                    record.address,
                    if record.is_random { " (random)" } else { "" }
                )?;
                match record.local_name() {
                    Some(name) => write!(f, " \"{name}\""),
                    None => write!(f, " [{} bytes]", record.payload.len()),
                }
            }
        }
    }
}
