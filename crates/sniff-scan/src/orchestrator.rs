//! Scan orchestrator
//!
//! Drives the radio through one fixed sequence:
//!
//! 1. **TracerFi transmit**: capture on, tune to the TracerFi channel, set
//!    power and announce this device `tfi_transmits` times
//! 2. **AP sweep**: hop across every masked channel, dwelling `ap_period` on
//!    each while capture keeps classifying frames
//! 3. **BLE scan**: capture off, BLE discovery for `ble_period`
//!
//! Results reach the sink from the driver's callback context while the
//! sequence waits. Any driver failure ends the run at the failing call.

use std::sync::Arc;

use sniff_proto::{Classifier, TracerFiPacket};
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info};

use crate::ble::AdvertisementHandler;
use crate::capture::CaptureCallback;
use crate::driver::RadioDriver;
use crate::error::{DriverError, ScanError};
use crate::settings::ScanSettings;
use crate::sink::ResultSink;
use crate::state::{ScanPhase, ScanReport, ScanState};

/// Owns the radio driver and runs the scan sequence against it
pub struct Sniffer<D: RadioDriver> {
    driver: D,
    sink: Arc<dyn ResultSink>,
    state: ScanState,
}

impl<D: RadioDriver> Sniffer<D> {
    pub fn new(driver: D, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            driver,
            sink,
            state: ScanState::default(),
        }
    }

    /// Current orchestrator state
    ///
    /// After a failed run this still holds the phase the failure happened in.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Give the driver back
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Run the full sequence once
    ///
    /// Takes `&mut self`, so a sniffer can only run one sequence at a time.
    pub async fn run(&mut self, settings: &ScanSettings) -> Result<ScanReport, ScanError> {
        settings.validate()?;

        let started = Instant::now();
        self.state = ScanState::default();

        self.transmit_phase(settings).await?;
        self.sweep_phase(settings).await?;
        self.ble_phase(settings).await?;

        self.state.advance(ScanPhase::Idle);
        let report = ScanReport {
            transmits_sent: self.state.transmits_sent,
            channels_visited: self.state.channels_visited,
            elapsed: started.elapsed(),
        };
        info!(
            "Scan complete: {} transmits, {} channels in {:?}",
            report.transmits_sent, report.channels_visited, report.elapsed
        );
        Ok(report)
    }

    async fn transmit_phase(&mut self, settings: &ScanSettings) -> Result<(), ScanError> {
        self.state.advance(ScanPhase::TfiTransmit);
        info!(
            "Starting {} on channel {}",
            ScanPhase::TfiTransmit,
            settings.tfi_channel
        );

        let capture = CaptureCallback::new(Classifier::new(settings.tie_break), self.sink.clone());
        let phase = self.state.phase;
        fatal(phase, self.driver.enable_capture(capture.into_handler()))?;
        fatal(phase, self.driver.set_channel(settings.tfi_channel))?;
        self.state.tuned_channel = settings.tfi_channel;
        fatal(phase, self.driver.set_tx_power(settings.tfi_power))?;

        let mac = fatal(phase, self.driver.mac_address())?;
        info!("tx mac {}", mac);
        let packet = TracerFiPacket::new(mac).to_bytes();

        for _ in 0..settings.tfi_transmits {
            fatal(phase, self.driver.transmit(&packet))?;
            self.state.transmits_sent += 1;
            sleep(settings.tfi_period()).await;
        }
        Ok(())
    }

    async fn sweep_phase(&mut self, settings: &ScanSettings) -> Result<(), ScanError> {
        self.state.advance(ScanPhase::ApSweep);
        info!("Starting {} over {}", ScanPhase::ApSweep, settings.mask);

        for channel in settings.mask.channels() {
            fatal(self.state.phase, self.driver.set_channel(channel))?;
            self.state.tuned_channel = channel;
            self.state.channels_visited += 1;
            debug!("Tuned to channel {}", channel);
            sleep(settings.ap_period()).await;
        }
        Ok(())
    }

    async fn ble_phase(&mut self, settings: &ScanSettings) -> Result<(), ScanError> {
        self.state.advance(ScanPhase::BleScan);
        info!("Starting {} for {:?}", ScanPhase::BleScan, settings.ble_period());

        let phase = self.state.phase;
        fatal(phase, self.driver.disable_capture())?;
        let handler = AdvertisementHandler::new(self.sink.clone());
        fatal(phase, self.driver.begin_ble_scan(handler.into_handler()))?;
        sleep(settings.ble_period()).await;
        fatal(phase, self.driver.end_ble_scan())?;
        Ok(())
    }
}

fn fatal<T>(phase: ScanPhase, result: Result<T, DriverError>) -> Result<T, ScanError> {
    result.map_err(|source| {
        error!("Driver failure during {}: {}", phase, source);
        ScanError::Driver { phase, source }
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use sniff_proto::{ChannelMask, MacAddr, ScanResult};

    use super::*;
    use crate::driver::{CaptureHandler, GapHandler};

    const MAC: MacAddr = MacAddr([0x24, 0x0A, 0xC4, 0x00, 0x00, 0x01]);

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        EnableCapture,
        DisableCapture,
        SetChannel(u8),
        SetTxPower(i8),
        Transmit(usize),
        BeginBle,
        EndBle,
    }

    /// Records calls and fails on a chosen one
    #[derive(Default)]
    struct ScriptedDriver {
        calls: Vec<(Call, Duration)>,
        fail_on: Option<Call>,
        origin: Option<Instant>,
    }

    impl ScriptedDriver {
        fn record(&mut self, call: Call) -> Result<(), DriverError> {
            let origin = *self.origin.get_or_insert_with(Instant::now);
            let failing = self.fail_on.as_ref() == Some(&call);
            self.calls.push((call, origin.elapsed()));
            if failing {
                Err(DriverError::radio("scripted", "injected"))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.iter().map(|(c, _)| c.clone()).collect()
        }
    }

    impl RadioDriver for ScriptedDriver {
        fn enable_capture(&mut self, _handler: CaptureHandler) -> Result<(), DriverError> {
            self.record(Call::EnableCapture)
        }
        fn disable_capture(&mut self) -> Result<(), DriverError> {
            self.record(Call::DisableCapture)
        }
        fn set_channel(&mut self, channel: u8) -> Result<(), DriverError> {
            self.record(Call::SetChannel(channel))
        }
        fn set_tx_power(&mut self, power: i8) -> Result<(), DriverError> {
            self.record(Call::SetTxPower(power))
        }
        fn transmit(&mut self, frame: &[u8]) -> Result<(), DriverError> {
            self.record(Call::Transmit(frame.len()))
        }
        fn begin_ble_scan(&mut self, _handler: GapHandler) -> Result<(), DriverError> {
            self.record(Call::BeginBle)
        }
        fn end_ble_scan(&mut self) -> Result<(), DriverError> {
            self.record(Call::EndBle)
        }
        fn mac_address(&self) -> Result<MacAddr, DriverError> {
            Ok(MAC)
        }
    }

    fn sniffer(driver: ScriptedDriver) -> Sniffer<ScriptedDriver> {
        let seen = Arc::new(Mutex::new(0usize));
        let sink = move |_: &ScanResult<'_>| *seen.lock().unwrap() += 1;
        Sniffer::new(driver, Arc::new(sink))
    }

    fn settings(channels: &[u8]) -> ScanSettings {
        ScanSettings {
            mask: ChannelMask::from_channels(channels.iter().copied()).unwrap(),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_sequence() {
        let mut sniffer = sniffer(ScriptedDriver::default());
        let report = sniffer.run(&settings(&[1, 6, 11])).await.unwrap();

        assert_eq!(
            sniffer.driver().calls(),
            vec![
                Call::EnableCapture,
                Call::SetChannel(1),
                Call::SetTxPower(78),
                Call::Transmit(24),
                Call::Transmit(24),
                Call::Transmit(24),
                Call::SetChannel(1),
                Call::SetChannel(6),
                Call::SetChannel(11),
                Call::DisableCapture,
                Call::BeginBle,
                Call::EndBle,
            ]
        );
        assert_eq!(report.transmits_sent, 3);
        assert_eq!(report.channels_visited, 3);
        assert_eq!(report.elapsed, Duration::from_millis(5660));

        let state = sniffer.state();
        assert_eq!(state.phase, ScanPhase::Idle);
        assert_eq!(state.tuned_channel, 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_between_calls() {
        let mut sniffer = sniffer(ScriptedDriver::default());
        sniffer.run(&settings(&[3, 4])).await.unwrap();

        let times: Vec<u64> = sniffer
            .driver()
            .calls
            .iter()
            .map(|(_, t)| t.as_millis() as u64)
            .collect();
        // enable, tune, power, 3 transmits, 2 hops, disable, begin, end
        assert_eq!(times, vec![0, 0, 0, 0, 100, 200, 300, 420, 540, 540, 5540]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_failure_is_fatal() {
        let driver = ScriptedDriver {
            fail_on: Some(Call::SetChannel(6)),
            ..Default::default()
        };
        let mut sniffer = sniffer(driver);
        let err = sniffer.run(&settings(&[1, 6, 11])).await.unwrap_err();

        assert_eq!(err.phase(), Some(ScanPhase::ApSweep));
        assert_eq!(sniffer.state().phase, ScanPhase::ApSweep);
        assert_eq!(sniffer.driver().calls().last(), Some(&Call::SetChannel(6)));
        assert!(!sniffer.driver().calls().contains(&Call::SetChannel(11)));
        assert!(!sniffer.driver().calls().contains(&Call::DisableCapture));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_settings_make_no_calls() {
        let mut sniffer = sniffer(ScriptedDriver::default());
        let bad = ScanSettings {
            tfi_channel: 0,
            ..Default::default()
        };
        let err = sniffer.run(&bad).await.unwrap_err();

        assert!(matches!(err, ScanError::InvalidSettings(_)));
        assert!(sniffer.driver().calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_mask_skips_sweep() {
        let mut sniffer = sniffer(ScriptedDriver::default());
        let report = sniffer.run(&settings(&[])).await.unwrap();

        assert_eq!(report.channels_visited, 0);
        assert_eq!(sniffer.state().tuned_channel, 1);
        assert_eq!(report.elapsed, Duration::from_millis(5300));
    }
}
