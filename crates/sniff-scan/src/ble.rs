//! BLE advertisement adapter
//!
//! Converts BLE discovery events into `Advertisement` scan results. Only
//! inquiry results carry a device; every other event is logged and dropped.

use std::sync::Arc;

use sniff_proto::{AdvertisementRecord, Payload, ScanResult};
use tracing::{debug, info};

use crate::driver::{BleAddrType, BleScanResult, GapEvent, GapHandler, SearchEvent};
use crate::sink::ResultSink;

/// Build a scan result from a BLE event, if it describes a discovered device
///
/// The record borrows the event's address and advertisement bytes. BLE
/// results are not channel-indexed, so `channel` is always 0, and
/// `payload_size` is the advertisement data length.
pub fn on_scan_event<'a>(event: &GapEvent<'a>) -> Option<ScanResult<'a>> {
    match event {
        GapEvent::ScanResult(scan) if scan.search == SearchEvent::InquiryResult => {
            Some(advertisement_result(scan))
        }
        _ => None,
    }
}

fn advertisement_result<'a>(scan: &BleScanResult<'a>) -> ScanResult<'a> {
    let record = AdvertisementRecord::new(
        scan.address,
        scan.addr_type == BleAddrType::Random,
        scan.adv_data,
    );
    ScanResult {
        rssi: scan.rssi,
        channel: 0,
        payload_size: scan.adv_data.len(),
        payload: Payload::Advertisement(record),
    }
}

/// Event handler registered with the BLE stack during the scan phase
#[derive(Clone)]
pub struct AdvertisementHandler {
    sink: Arc<dyn ResultSink>,
}

impl AdvertisementHandler {
    pub fn new(sink: Arc<dyn ResultSink>) -> Self {
        Self { sink }
    }

    /// Handle one BLE event
    ///
    /// Returns true if a result was delivered to the sink.
    pub fn on_event(&self, event: &GapEvent<'_>) -> bool {
        match event {
            GapEvent::ScanParamSetComplete => debug!("BLE scan parameters applied"),
            GapEvent::ScanStartComplete => info!("BLE scan started"),
            GapEvent::ScanStopComplete => info!("BLE scan stopped"),
            GapEvent::ScanResult(scan) if scan.search != SearchEvent::InquiryResult => {
                debug!("Ignoring BLE search event {:?}", scan.search)
            }
            GapEvent::ScanResult(_) => {}
            GapEvent::Unknown(code) => debug!("Unhandled BLE event {}", code),
        }

        match on_scan_event(event) {
            Some(result) => {
                self.sink.on_result(&result);
                true
            }
            None => false,
        }
    }

    /// Wrap into a handler the driver can hold
    pub fn into_handler(self) -> GapHandler {
        Arc::new(move |event: &GapEvent<'_>| {
            self.on_event(event);
        })
    }
}
