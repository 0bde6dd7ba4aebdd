//! Value Objects and compile-time bounds for the forward proxy

/// Maximum number of concurrently proxied exchanges.
///
/// Each accepted request holds one waiter until the origin answers or the
/// waiter times out. Requests beyond this bound are answered with 5.00.
pub const WAITER_POOL_CAPACITY: usize = 2;

/// Size of the scratch buffer the outgoing request is assembled in.
pub const REQUEST_BUF_SIZE: usize = 128;

/// Maximum number of outstanding memos held by the in-memory request engine.
pub const MEMO_CAPACITY: usize = 8;

/// Default port of the `coap` scheme (RFC 7252 Section 6.1).
pub const COAP_DEFAULT_PORT: u16 = 5683;

/// MAX_TRANSMIT_WAIT with the default transmission parameters
/// (RFC 7252 Section 4.8.2).
pub const MAX_TRANSMIT_WAIT_SECS: u64 = 93;

/// ACK_TIMEOUT (RFC 7252 Section 4.8): initial retransmission timeout of
/// a confirmable request, before randomization.
pub const ACK_TIMEOUT_SECS: u64 = 2;

/// Upper bound of the random extension of the first timeout, i.e.
/// ACK_TIMEOUT * (ACK_RANDOM_FACTOR - 1) with ACK_RANDOM_FACTOR = 1.5.
pub const ACK_RANDOM_EXTRA_SECS: u64 = 1;

/// MAX_RETRANSMIT (RFC 7252 Section 4.8).
pub const MAX_RETRANSMIT: u8 = 4;

/// Runtime configuration for the forward proxy
///
/// The pool capacity is deliberately absent: it is a compile-time bound
/// (see [`WAITER_POOL_CAPACITY`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Seconds a waiter may stay allocated without a relayed response.
    /// Expired waiters are freed by the maintenance sweep.
    /// Default: MAX_TRANSMIT_WAIT (93 seconds)
    pub waiter_timeout_secs: u64,
    /// Seconds an outgoing request memo is kept by the request engine.
    /// Default: MAX_TRANSMIT_WAIT (93 seconds)
    pub memo_lifetime_secs: u64,
    /// Interval between maintenance sweeps in the node loop.
    pub sweep_interval_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            waiter_timeout_secs: MAX_TRANSMIT_WAIT_SECS,
            memo_lifetime_secs: MAX_TRANSMIT_WAIT_SECS,
            sweep_interval_secs: 1,
        }
    }
}

impl ProxyConfig {
    /// Create a config suitable for testing (short timeouts)
    pub fn for_testing() -> Self {
        Self {
            waiter_timeout_secs: 5,
            memo_lifetime_secs: 5,
            sweep_interval_secs: 1,
        }
    }
}
