//! Test utilities for the forward proxy.
//!
//! Deterministic doubles for the driven ports. Enable with the `test-utils`
//! feature flag.
//!
//! # Example
//!
//! ```rust
//! use coap_forward_proxy::test_utils::ControllableTimeSource;
//! use coap_forward_proxy::TimeSource;
//!
//! let time = ControllableTimeSource::new(1000);
//! let shared = time.clone();
//! shared.advance(5);
//! assert_eq!(time.now().as_secs(), 1005);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{Endpoint, Timestamp, TransportError};
use crate::ports::{RandomSource, TimeSource, Transport};

/// A time source that returns a fixed timestamp.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    timestamp: u64,
}

impl FixedTimeSource {
    /// Create a new fixed time source with the given timestamp (in seconds).
    pub fn new(timestamp: u64) -> Self {
        Self { timestamp }
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.timestamp)
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same clock, so the proxy and its request engine can be
/// driven from one handle kept by the test.
#[derive(Debug, Clone, Default)]
pub struct ControllableTimeSource {
    time: Arc<AtomicU64>,
}

impl ControllableTimeSource {
    /// Start the clock at `initial` seconds.
    pub fn new(initial: u64) -> Self {
        Self {
            time: Arc::new(AtomicU64::new(initial)),
        }
    }

    /// Move the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.time.fetch_add(secs, Ordering::SeqCst);
    }
}

impl TimeSource for ControllableTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.time.load(Ordering::SeqCst))
    }
}

/// A random source that always yields the same value (reduced modulo the
/// bound), so retransmission timeouts are predictable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRandomSource {
    value: u64,
}

impl FixedRandomSource {
    pub fn new(value: u64) -> Self {
        Self { value }
    }
}

impl RandomSource for FixedRandomSource {
    fn random_below(&self, bound: u64) -> u64 {
        if bound == 0 {
            0
        } else {
            self.value % bound
        }
    }
}

/// A datagram captured by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentDatagram {
    /// Payload bytes.
    pub bytes: Vec<u8>,
    /// Destination.
    pub remote: Endpoint,
}

#[derive(Debug, Default)]
struct RecordingState {
    sent: Vec<SentDatagram>,
    failure: Option<TransportError>,
}

/// Transport that records every datagram instead of sending it.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingTransport {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far.
    pub fn sent(&self) -> Vec<SentDatagram> {
        self.state.lock().sent.clone()
    }

    /// Number of datagrams sent so far.
    pub fn sent_count(&self) -> usize {
        self.state.lock().sent.len()
    }

    /// Forget recorded datagrams.
    pub fn clear(&self) {
        self.state.lock().sent.clear();
    }

    /// Make every following send fail with `error` (`None` restores
    /// success).
    pub fn fail_with(&self, error: Option<TransportError>) {
        self.state.lock().failure = error;
    }
}

impl Transport for RecordingTransport {
    fn send_to(&self, bytes: &[u8], remote: &Endpoint) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if let Some(err) = state.failure.clone() {
            return Err(err);
        }
        state.sent.push(SentDatagram {
            bytes: bytes.to_vec(),
            remote: *remote,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_time_source_returns_configured_value() {
        let source = FixedTimeSource::new(1000);
        assert_eq!(source.now().as_secs(), 1000);
    }

    #[test]
    fn test_controllable_time_source_is_shared() {
        let source = ControllableTimeSource::new(10);
        let clone = source.clone();
        clone.advance(5);
        assert_eq!(source.now().as_secs(), 15);
    }

    #[test]
    fn test_recording_transport_records_and_fails() {
        let transport = RecordingTransport::new();
        let remote = Endpoint::new("192.0.2.1".parse().unwrap(), 5683);

        transport.send_to(&[1, 2, 3], &remote).unwrap();
        assert_eq!(
            transport.sent(),
            vec![SentDatagram {
                bytes: vec![1, 2, 3],
                remote
            }]
        );

        transport.fail_with(Some(TransportError::WouldBlock));
        assert_eq!(
            transport.send_to(&[4], &remote),
            Err(TransportError::WouldBlock)
        );
        assert_eq!(transport.sent_count(), 1);
    }
}
