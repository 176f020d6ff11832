//! Sniffer Scan Orchestrator
//!
//! This crate drives a radio through the sniffer's scan sequence and turns
//! whatever it hears into [`ScanResult`](sniff_proto::ScanResult)s for a
//! caller-supplied sink.
//!
//! # Architecture
//!
//! - [`RadioDriver`] is the boundary to the platform radio service. The
//!   driver calls back from its own context with captured frames
//!   ([`RxFrame`]) and BLE events ([`GapEvent`]).
//! - [`CaptureCallback`] classifies management frames while capture is on.
//! - [`AdvertisementHandler`] turns BLE inquiry results into advertisement
//!   results.
//! - [`Sniffer`] owns the driver and runs the phases in order, waiting on the
//!   tokio clock between steps.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sniff_proto::ScanResult;
//! use sniff_scan::{RadioDriver, ScanSettings, Sniffer};
//!
//! async fn scan<D: RadioDriver>(driver: D) -> Result<(), sniff_scan::ScanError> {
//!     let sink = |result: &ScanResult<'_>| println!("{result}");
//!     let mut sniffer = Sniffer::new(driver, Arc::new(sink));
//!     let report = sniffer.run(&ScanSettings::default()).await?;
//!     println!("visited {} channels", report.channels_visited);
//!     Ok(())
//! }
//! ```

pub mod ble;
pub mod capture;
pub mod driver;
pub mod error;
pub mod orchestrator;
pub mod settings;
pub mod sink;
pub mod state;

pub use ble::{on_scan_event, AdvertisementHandler};
pub use capture::CaptureCallback;
pub use driver::{
    BleAddrType, BleScanResult, CaptureHandler, GapEvent, GapHandler, PacketKind, RadioDriver,
    RxFrame, SearchEvent,
};
pub use error::{DriverError, ScanError};
pub use orchestrator::Sniffer;
pub use settings::ScanSettings;
pub use sink::ResultSink;
pub use state::{ScanPhase, ScanReport, ScanState};
