//! Scripted air traffic
//!
//! Builders for the frames and advertisements a virtual radio can "hear".
//! Frames are built byte by byte in wire order so they exercise the same
//! parsing paths as captured traffic.

use sniff_proto::advert::{AD_COMPLETE_NAME, AD_FLAGS};
use sniff_proto::beacon::{ELEMENT_DS_PARAMS, ELEMENT_SSID};
use sniff_proto::{EncodeFrame, FrameControl, MacAddr, TracerFiPacket, SUBTYPE_BEACON};
use sniff_scan::{BleAddrType, BleScanResult, PacketKind, RxFrame, SearchEvent};

use crate::error::SimError;

/// Longest SSID a beacon may carry
pub const MAX_SSID_LEN: usize = 32;
/// Legacy advertisement payload limit
pub const MAX_ADV_LEN: usize = 31;

/// Default beacon interval in TU
const BEACON_INTERVAL: u16 = 100;
/// ESS capability bit
const CAP_ESS: u16 = 0x0001;
/// General discoverable, BR/EDR not supported
const ADV_FLAGS_GENERAL: u8 = 0x06;

/// A packet the virtual radio delivers while tuned to its channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirFrame {
    pub kind: PacketKind,
    pub rssi: i8,
    pub payload: Vec<u8>,
}

impl AirFrame {
    pub fn new(kind: PacketKind, rssi: i8, payload: Vec<u8>) -> Self {
        Self {
            kind,
            rssi,
            payload,
        }
    }

    /// Management frame heard at the given signal strength
    pub fn management(rssi: i8, payload: Vec<u8>) -> Self {
        Self::new(PacketKind::Management, rssi, payload)
    }

    /// Borrow as a captured frame on `channel`
    pub fn rx(&self, channel: u8) -> RxFrame<'_> {
        RxFrame {
            kind: self.kind,
            rssi: self.rssi,
            channel,
            sig_len: self.payload.len(),
            payload: &self.payload,
        }
    }
}

/// A BLE device that answers discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BleDevice {
    pub address: MacAddr,
    pub addr_type: BleAddrType,
    pub rssi: i8,
    pub adv_data: Vec<u8>,
}

impl BleDevice {
    pub fn new(address: MacAddr, addr_type: BleAddrType, rssi: i8, adv_data: Vec<u8>) -> Self {
        Self {
            address,
            addr_type,
            rssi,
            adv_data,
        }
    }

    /// Borrow as an inquiry result event payload
    pub fn inquiry_result(&self) -> BleScanResult<'_> {
        BleScanResult {
            search: SearchEvent::InquiryResult,
            address: self.address,
            addr_type: self.addr_type,
            rssi: self.rssi,
            adv_data: &self.adv_data,
        }
    }
}

/// Build a beacon advertising `ssid` on `channel`
///
/// The body carries the SSID element first, followed by a DS parameter set.
pub fn beacon_frame(bssid: MacAddr, ssid: &str, channel: u8) -> Result<Vec<u8>, SimError> {
    if ssid.len() > MAX_SSID_LEN {
        return Err(SimError::SsidTooLong(ssid.len()));
    }

    let mut frame = Vec::with_capacity(24 + 12 + 2 + ssid.len() + 3);
    frame.extend_from_slice(&FrameControl::management(SUBTYPE_BEACON).to_bytes());
    frame.extend_from_slice(&0u16.to_le_bytes());
    frame.extend_from_slice(&MacAddr::BROADCAST.octets());
    frame.extend_from_slice(&bssid.octets());
    frame.extend_from_slice(&bssid.octets());
    frame.extend_from_slice(&0u16.to_le_bytes());

    frame.extend_from_slice(&0u64.to_le_bytes());
    frame.extend_from_slice(&BEACON_INTERVAL.to_le_bytes());
    frame.extend_from_slice(&CAP_ESS.to_le_bytes());

    frame.push(ELEMENT_SSID);
    frame.push(ssid.len() as u8);
    frame.extend_from_slice(ssid.as_bytes());
    frame.extend_from_slice(&[ELEMENT_DS_PARAMS, 1, channel]);
    Ok(frame)
}

/// Build the TracerFi announcement `sender` would transmit
pub fn tracerfi_frame(sender: MacAddr) -> Vec<u8> {
    TracerFiPacket::new(sender).encode()
}

/// Build advertisement data carrying flags and a complete local name
pub fn advertisement_data(name: &str) -> Result<Vec<u8>, SimError> {
    let needed = 3 + 2 + name.len();
    if needed > MAX_ADV_LEN {
        return Err(SimError::AdvertisementTooLong(needed));
    }

    let mut data = Vec::with_capacity(needed);
    data.extend_from_slice(&[2, AD_FLAGS, ADV_FLAGS_GENERAL]);
    data.push(name.len() as u8 + 1);
    data.push(AD_COMPLETE_NAME);
    data.extend_from_slice(name.as_bytes());
    Ok(data)
}
