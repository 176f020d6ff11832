//! Promiscuous receive callback
//!
//! Filters captured packets down to management frames, classifies them and
//! forwards anything recognized to the result sink.

use std::sync::Arc;

use sniff_proto::Classifier;

use crate::driver::{CaptureHandler, PacketKind, RxFrame};
use crate::sink::ResultSink;

/// Classifies captured frames and forwards matches to a sink
#[derive(Clone)]
pub struct CaptureCallback {
    classifier: Classifier,
    sink: Arc<dyn ResultSink>,
}

impl CaptureCallback {
    pub fn new(classifier: Classifier, sink: Arc<dyn ResultSink>) -> Self {
        Self { classifier, sink }
    }

    /// Handle one captured packet
    ///
    /// Returns true if a result was delivered to the sink.
    pub fn on_frame(&self, frame: &RxFrame<'_>) -> bool {
        if frame.kind != PacketKind::Management {
            return false;
        }

        let result =
            self.classifier
                .classify_len(frame.payload, frame.sig_len, frame.rssi, frame.channel);
        if result.is_none() {
            return false;
        }

        self.sink.on_result(&result);
        true
    }

    /// Wrap into a handler the driver can hold
    pub fn into_handler(self) -> CaptureHandler {
        Arc::new(move |frame: &RxFrame<'_>| {
            self.on_frame(frame);
        })
    }
}
