//! Virtual radio simulation
//!
//! Implements [`RadioDriver`] against scripted air traffic. Frames placed on a
//! channel are delivered to the capture handler each time the radio tunes to
//! that channel while capture is enabled. BLE devices answer as soon as a BLE
//! scan begins. Every driver call is journaled with its time on the tokio
//! clock, so tests running with a paused clock see exact offsets.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sniff_proto::channel::validate_channel;
use sniff_proto::MacAddr;
use sniff_scan::{
    BleAddrType, BleScanResult, CaptureHandler, DriverError, GapEvent, GapHandler, RadioDriver,
    SearchEvent,
};
use tokio::time::Instant;
use tracing::debug;

use crate::air::{AirFrame, BleDevice};
use crate::error::SimError;

/// Driver operation, used to target fault injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverOp {
    EnableCapture,
    DisableCapture,
    SetChannel,
    SetTxPower,
    Transmit,
    BeginBleScan,
    EndBleScan,
}

impl DriverOp {
    /// Get the driver call name
    pub fn name(&self) -> &'static str {
        match self {
            Self::EnableCapture => "enable_capture",
            Self::DisableCapture => "disable_capture",
            Self::SetChannel => "set_channel",
            Self::SetTxPower => "set_tx_power",
            Self::Transmit => "transmit",
            Self::BeginBleScan => "begin_ble_scan",
            Self::EndBleScan => "end_ble_scan",
        }
    }
}

/// A driver call as the radio saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    EnableCapture,
    DisableCapture,
    SetChannel(u8),
    SetTxPower(i8),
    Transmit(Vec<u8>),
    BeginBleScan,
    EndBleScan,
}

impl DriverCall {
    pub fn op(&self) -> DriverOp {
        match self {
            Self::EnableCapture => DriverOp::EnableCapture,
            Self::DisableCapture => DriverOp::DisableCapture,
            Self::SetChannel(_) => DriverOp::SetChannel,
            Self::SetTxPower(_) => DriverOp::SetTxPower,
            Self::Transmit(_) => DriverOp::Transmit,
            Self::BeginBleScan => DriverOp::BeginBleScan,
            Self::EndBleScan => DriverOp::EndBleScan,
        }
    }
}

/// One journaled driver call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// Time since the radio was created
    pub at: Duration,
    pub call: DriverCall,
    /// False if the call was failed by fault injection or state checks
    pub ok: bool,
}

/// Configuration for creating a virtual radio
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VirtualRadioConfig {
    /// Display name/identifier
    pub id: String,
    /// Station address reported by `mac_address`
    pub mac: MacAddr,
}

impl Default for VirtualRadioConfig {
    fn default() -> Self {
        Self {
            id: "Virtual Radio".to_string(),
            mac: MacAddr([0x24, 0x0A, 0xC4, 0x00, 0x00, 0x01]),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Fault {
    op: DriverOp,
    /// 1-based call number that fails
    nth: usize,
}

/// A simulated radio with scripted traffic
pub struct VirtualRadio {
    id: String,
    mac: MacAddr,
    created: Instant,
    /// Channel currently tuned (0 until the first tune)
    channel: u8,
    tx_power: Option<i8>,
    capture: Option<CaptureHandler>,
    ble: Option<GapHandler>,
    air: BTreeMap<u8, Vec<AirFrame>>,
    devices: Vec<BleDevice>,
    journal: Vec<JournalEntry>,
    faults: Vec<Fault>,
    mac_fault: bool,
    call_counts: HashMap<DriverOp, usize>,
}

impl fmt::Debug for VirtualRadio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualRadio")
            .field("id", &self.id)
            .field("mac", &self.mac)
            .field("channel", &self.channel)
            .field("capturing", &self.capture.is_some())
            .field("ble_scanning", &self.ble.is_some())
            .finish_non_exhaustive()
    }
}

impl VirtualRadio {
    /// Create a new virtual radio with no scripted traffic
    pub fn new(id: impl Into<String>, mac: MacAddr) -> Self {
        Self {
            id: id.into(),
            mac,
            created: Instant::now(),
            channel: 0,
            tx_power: None,
            capture: None,
            ble: None,
            air: BTreeMap::new(),
            devices: Vec::new(),
            journal: Vec::new(),
            faults: Vec::new(),
            mac_fault: false,
            call_counts: HashMap::new(),
        }
    }

    /// Create a virtual radio from configuration
    pub fn from_config(config: VirtualRadioConfig) -> Self {
        Self::new(config.id, config.mac)
    }

    /// Get the radio's unique identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn tx_power(&self) -> Option<i8> {
        self.tx_power
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    pub fn is_ble_scanning(&self) -> bool {
        self.ble.is_some()
    }

    /// Place a frame on the air for `channel`
    pub fn add_frame(&mut self, channel: u8, frame: AirFrame) -> Result<(), SimError> {
        let channel = validate_channel(channel)?;
        self.air.entry(channel).or_default().push(frame);
        Ok(())
    }

    /// Number of frames scripted on `channel`
    pub fn air_frames(&self, channel: u8) -> usize {
        self.air.get(&channel).map_or(0, Vec::len)
    }

    /// Add a device that answers BLE discovery
    pub fn add_device(&mut self, device: BleDevice) {
        self.devices.push(device);
    }

    /// Fail the `nth` call (1-based) to `op`
    pub fn fail_on(&mut self, op: DriverOp, nth: usize) {
        self.faults.push(Fault { op, nth });
    }

    /// Make `mac_address` fail
    pub fn fail_mac_address(&mut self) {
        self.mac_fault = true;
    }

    /// Every driver call so far, in order
    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    /// Journaled calls without timestamps
    pub fn calls(&self) -> Vec<&DriverCall> {
        self.journal.iter().map(|e| &e.call).collect()
    }

    /// Transmitted frames with their send times
    pub fn transmissions(&self) -> Vec<(Duration, &[u8])> {
        self.journal
            .iter()
            .filter_map(|e| match &e.call {
                DriverCall::Transmit(frame) if e.ok => Some((e.at, frame.as_slice())),
                _ => None,
            })
            .collect()
    }

    /// Successful tunes with their times
    pub fn channel_hops(&self) -> Vec<(Duration, u8)> {
        self.journal
            .iter()
            .filter_map(|e| match e.call {
                DriverCall::SetChannel(channel) if e.ok => Some((e.at, channel)),
                _ => None,
            })
            .collect()
    }

    /// Clear the journal and call counters, keeping scripted traffic
    pub fn clear_journal(&mut self) {
        self.journal.clear();
        self.call_counts.clear();
    }

    /// Journal a call and apply fault injection
    fn begin_call(&mut self, call: DriverCall) -> Result<(), DriverError> {
        let op = call.op();
        let count = self.call_counts.entry(op).or_insert(0);
        *count += 1;
        let count = *count;
        let faulted = self.faults.iter().any(|f| f.op == op && f.nth == count);

        self.journal.push(JournalEntry {
            at: self.created.elapsed(),
            call,
            ok: !faulted,
        });

        if faulted {
            debug!("{}: injected failure on {} #{}", self.id, op.name(), count);
            return Err(DriverError::radio(op.name(), "injected fault"));
        }
        Ok(())
    }

    /// Mark the last journaled call as failed and return the error
    fn reject(&mut self, err: DriverError) -> Result<(), DriverError> {
        if let Some(entry) = self.journal.last_mut() {
            entry.ok = false;
        }
        Err(err)
    }

    fn deliver_air(&self) {
        let Some(handler) = &self.capture else {
            return;
        };
        let Some(frames) = self.air.get(&self.channel) else {
            return;
        };
        debug!(
            "{}: delivering {} frames on channel {}",
            self.id,
            frames.len(),
            self.channel
        );
        for frame in frames {
            handler(&frame.rx(self.channel));
        }
    }
}

impl RadioDriver for VirtualRadio {
    fn enable_capture(&mut self, handler: CaptureHandler) -> Result<(), DriverError> {
        self.begin_call(DriverCall::EnableCapture)?;
        self.capture = Some(handler);
        self.deliver_air();
        Ok(())
    }

    fn disable_capture(&mut self) -> Result<(), DriverError> {
        self.begin_call(DriverCall::DisableCapture)?;
        if self.capture.take().is_none() {
            return self.reject(DriverError::NotReady("capture is not enabled"));
        }
        Ok(())
    }

    fn set_channel(&mut self, channel: u8) -> Result<(), DriverError> {
        self.begin_call(DriverCall::SetChannel(channel))?;
        if let Err(e) = validate_channel(channel) {
            return self.reject(DriverError::radio("set_channel", e.to_string()));
        }
        self.channel = channel;
        self.deliver_air();
        Ok(())
    }

    fn set_tx_power(&mut self, power: i8) -> Result<(), DriverError> {
        self.begin_call(DriverCall::SetTxPower(power))?;
        self.tx_power = Some(power);
        Ok(())
    }

    fn transmit(&mut self, frame: &[u8]) -> Result<(), DriverError> {
        self.begin_call(DriverCall::Transmit(frame.to_vec()))?;
        if self.channel == 0 {
            return self.reject(DriverError::NotReady("no channel selected"));
        }
        debug!(
            "{}: transmitted {} bytes on channel {}",
            self.id,
            frame.len(),
            self.channel
        );
        Ok(())
    }

    fn begin_ble_scan(&mut self, handler: GapHandler) -> Result<(), DriverError> {
        self.begin_call(DriverCall::BeginBleScan)?;
        if self.capture.is_some() {
            return self.reject(DriverError::NotReady("capture still enabled"));
        }

        handler(&GapEvent::ScanParamSetComplete);
        handler(&GapEvent::ScanStartComplete);
        for device in &self.devices {
            handler(&GapEvent::ScanResult(device.inquiry_result()));
        }
        handler(&GapEvent::ScanResult(BleScanResult {
            search: SearchEvent::InquiryComplete,
            address: MacAddr::default(),
            addr_type: BleAddrType::Public,
            rssi: 0,
            adv_data: &[],
        }));

        self.ble = Some(handler);
        Ok(())
    }

    fn end_ble_scan(&mut self) -> Result<(), DriverError> {
        self.begin_call(DriverCall::EndBleScan)?;
        match self.ble.take() {
            Some(handler) => {
                handler(&GapEvent::ScanStopComplete);
                Ok(())
            }
            None => self.reject(DriverError::NotReady("BLE scan is not running")),
        }
    }

    fn mac_address(&self) -> Result<MacAddr, DriverError> {
        if self.mac_fault {
            return Err(DriverError::radio("mac_address", "injected fault"));
        }
        Ok(self.mac)
    }
}
