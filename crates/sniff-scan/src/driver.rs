//! Radio driver interface
//!
//! The driver is the platform service that owns the WiFi/BLE radio. The
//! orchestrator calls into it to change modes and transmit, and the driver
//! calls back from its own receive context with captured frames and BLE
//! events.
//!
//! Callbacks are shared (`Arc`) so a driver can keep them for as long as the
//! corresponding mode is active. They never block and never retain the
//! borrowed buffers they are handed.

use std::sync::Arc;

use sniff_proto::MacAddr;

use crate::error::DriverError;

/// Kind of packet delivered in capture mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketKind {
    Management,
    Control,
    Data,
    /// Other packets (e.g. malformed or non-802.11)
    Misc,
}

/// A frame delivered while capture mode is enabled
#[derive(Debug, Clone, Copy)]
pub struct RxFrame<'a> {
    pub kind: PacketKind,
    /// Signal strength in dBm
    pub rssi: i8,
    /// Channel the radio was tuned to when the frame arrived
    pub channel: u8,
    /// Length reported by the receiver; may disagree with `payload.len()`
    pub sig_len: usize,
    pub payload: &'a [u8],
}

/// BLE address type reported with a scan result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BleAddrType {
    Public,
    Random,
    RpaPublic,
    RpaRandom,
}

/// Sub-event of a BLE scan result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchEvent {
    /// A device was discovered
    InquiryResult,
    /// The scan window ended
    InquiryComplete,
    DiscoveryResult,
    DiscoveryBleResult,
    DiscoveryComplete,
    SearchCanceled,
}

/// Payload of a BLE scan result event
#[derive(Debug, Clone, Copy)]
pub struct BleScanResult<'a> {
    pub search: SearchEvent,
    pub address: MacAddr,
    pub addr_type: BleAddrType,
    pub rssi: i8,
    /// Advertisement data; aliases the driver's event buffer
    pub adv_data: &'a [u8],
}

/// Events delivered by the BLE stack during discovery
#[derive(Debug, Clone, Copy)]
pub enum GapEvent<'a> {
    ScanParamSetComplete,
    ScanStartComplete,
    ScanStopComplete,
    ScanResult(BleScanResult<'a>),
    /// Any event this crate does not handle, by raw event code
    Unknown(u32),
}

/// Receive callback for capture mode
pub type CaptureHandler = Arc<dyn Fn(&RxFrame<'_>) + Send + Sync>;

/// Event callback for BLE discovery
pub type GapHandler = Arc<dyn Fn(&GapEvent<'_>) + Send + Sync>;

/// Operations the orchestrator needs from the radio
///
/// Every fallible call is treated as fatal by the orchestrator.
pub trait RadioDriver: Send {
    /// Enter promiscuous capture mode, delivering frames to `handler`
    fn enable_capture(&mut self, handler: CaptureHandler) -> Result<(), DriverError>;

    /// Leave capture mode; no further frames are delivered afterwards
    fn disable_capture(&mut self) -> Result<(), DriverError>;

    /// Tune the radio
    fn set_channel(&mut self, channel: u8) -> Result<(), DriverError>;

    /// Set transmit power in the radio's native units (0.25 dBm steps)
    fn set_tx_power(&mut self, power: i8) -> Result<(), DriverError>;

    /// Transmit a raw 802.11 frame on the current channel
    fn transmit(&mut self, frame: &[u8]) -> Result<(), DriverError>;

    /// Start BLE discovery, delivering events to `handler`
    fn begin_ble_scan(&mut self, handler: GapHandler) -> Result<(), DriverError>;

    /// Stop BLE discovery
    fn end_ble_scan(&mut self) -> Result<(), DriverError>;

    /// Factory-programmed station address of this device
    fn mac_address(&self) -> Result<MacAddr, DriverError>;
}
