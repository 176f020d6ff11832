//! Result delivery

use sniff_proto::ScanResult;

/// Receives every classified frame and accepted BLE advertisement
///
/// Called synchronously from the driver's callback context: implementations
/// must return promptly and must copy out anything they want to keep, since
/// the result borrows the driver's buffer.
pub trait ResultSink: Send + Sync {
    fn on_result(&self, result: &ScanResult<'_>);
}

impl<F> ResultSink for F
where
    F: Fn(&ScanResult<'_>) + Send + Sync,
{
    fn on_result(&self, result: &ScanResult<'_>) {
        self(result)
    }
}
