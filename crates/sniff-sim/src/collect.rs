//! Owned copies of scan results
//!
//! Results handed to a sink borrow the driver's buffer. The collector copies
//! out what callers need so results can be inspected after the scan.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use sniff_proto::{MacAddr, Payload, ScanKind, ScanResult};
use sniff_scan::ResultSink;

/// A scan result detached from the capture buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectedResult {
    pub kind: ScanKind,
    pub rssi: i8,
    pub channel: u8,
    pub payload_size: usize,
    /// TracerFi sender, beacon BSSID or BLE address
    pub address: Option<MacAddr>,
    /// SSID or BLE local name
    pub name: Option<String>,
    #[serde(skip)]
    pub raw: Vec<u8>,
}

impl CollectedResult {
    pub fn from_result(result: &ScanResult<'_>) -> Self {
        let (address, name) = match &result.payload {
            Payload::None => (None, None),
            Payload::TracerFi(frame) => (Some(frame.sender()), None),
            Payload::AccessPoint(beacon) => (
                Some(beacon.header().bssid()),
                beacon.ssid_str().map(str::to_string),
            ),
            Payload::Advertisement(record) => (
                Some(record.address),
                record.local_name().map(str::to_string),
            ),
        };

        Self {
            kind: result.kind(),
            rssi: result.rssi,
            channel: result.channel,
            payload_size: result.payload_size,
            address,
            name,
            raw: result.raw().to_vec(),
        }
    }
}

/// Sink that keeps every result it is given
#[derive(Debug, Default)]
pub struct ResultCollector {
    results: Mutex<Vec<CollectedResult>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything collected so far
    pub fn results(&self) -> Vec<CollectedResult> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Collected results of one kind, in arrival order
    pub fn of_kind(&self, kind: ScanKind) -> Vec<CollectedResult> {
        self.results()
            .into_iter()
            .filter(|r| r.kind == kind)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultSink for ResultCollector {
    fn on_result(&self, result: &ScanResult<'_>) {
        let collected = CollectedResult::from_result(result);
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(collected);
    }
}

#[cfg(test)]
mod tests {
    use sniff_proto::classify;

    use super::*;
    use crate::air;

    const BSSID: MacAddr = MacAddr([0x02, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE]);

    #[test]
    fn test_collects_owned_copies() {
        let collector = ResultCollector::new();
        {
            let frame = air::beacon_frame(BSSID, "lab", 3).unwrap();
            collector.on_result(&classify(&frame, -61, 3));
        }

        let results = collector.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, ScanKind::AccessPoint);
        assert_eq!(results[0].address, Some(BSSID));
        assert_eq!(results[0].name.as_deref(), Some("lab"));
        assert_eq!(results[0].raw.len(), results[0].payload_size);
    }

    #[test]
    fn test_of_kind_filters() {
        let collector = ResultCollector::new();
        let tfi = air::tracerfi_frame(BSSID);
        let beacon = air::beacon_frame(BSSID, "x", 1).unwrap();
        collector.on_result(&classify(&tfi, -40, 1));
        collector.on_result(&classify(&beacon, -40, 1));
        collector.on_result(&classify(&tfi, -42, 1));

        let tfis = collector.of_kind(ScanKind::TracerFi);
        assert_eq!(tfis.len(), 2);
        assert_eq!(tfis[1].rssi, -42);
        assert_eq!(tfis[0].address, Some(BSSID));
        assert!(!collector.is_empty());
    }

    #[test]
    fn test_serializes_without_raw_bytes() {
        let tfi = air::tracerfi_frame(BSSID);
        let collected = CollectedResult::from_result(&classify(&tfi, -40, 1));
        let json = serde_json::to_value(&collected).unwrap();
        assert_eq!(json["kind"], "TracerFi");
        assert_eq!(json["payload_size"], 24);
        assert!(json.get("raw").is_none());
    }
}
