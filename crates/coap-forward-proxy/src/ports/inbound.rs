//! # Driving Ports (Inbound API)
//!
//! The calls a host node makes into the forward proxy: one per received
//! request, one per origin response, and a periodic sweep.

use crate::domain::{Endpoint, Pdu, PduError, ProxyError, RelayError, WaiterHandle};

/// What `process` did with a request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyOutcome {
    /// No `Proxy-Uri` option; the request belongs to another handler.
    NotProxyRequest,
    /// Translated request handed to the request engine.
    Forwarded(WaiterHandle),
    /// An equivalent request is already in flight; nothing was sent and the
    /// client gets no reply.
    Duplicate,
}

/// Proxy counters and pool occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProxyStats {
    /// Waiters currently allocated.
    pub in_use: usize,
    /// Compile-time pool capacity.
    pub capacity: usize,
    /// Requests handed to the request engine.
    pub forwarded: u64,
    /// Requests dropped by the dedup gate.
    pub duplicates: u64,
    /// Requests answered with an error code.
    pub rejected: u64,
    /// Origin responses relayed to a client.
    pub relayed: u64,
    /// Waiters freed by the timeout sweep.
    pub expired: u64,
}

/// Primary API of the forward proxy.
///
/// All methods run on the single cooperative context that owns the proxy;
/// none of them blocks on the network.
///
/// # Example
///
/// ```rust,ignore
/// fn on_datagram<P: ForwardProxyApi>(proxy: &mut P, bytes: &[u8], from: Endpoint) {
///     let mut reply = [0u8; 64];
///     if let Ok(len) = proxy.handle_request(bytes, from, &mut reply) {
///         if len > 0 {
///             send(&reply[..len], from);
///         }
///     }
/// }
/// ```
pub trait ForwardProxyApi {
    /// `true` if `request` carries a `Proxy-Uri` option.
    fn matches(&self, request: &Pdu<'_>) -> bool;

    /// Validate, correlate and forward one client request.
    ///
    /// # Returns
    ///
    /// - `Ok(NotProxyRequest)` for requests without `Proxy-Uri`
    /// - `Ok(Forwarded(handle))` once the translated request is handed off
    /// - `Ok(Duplicate)` when the dedup gate matched
    /// - `Err(_)` for every rejected request; no waiter is left allocated
    fn process(&mut self, request: &Pdu<'_>, client: Endpoint) -> Result<ProxyOutcome, ProxyError>;

    /// Listener entry point: parse `request`, run [`Self::process`] and
    /// write the error reply (if any) into `reply`.
    ///
    /// Returns the reply length; `0` means nothing has to be sent back.
    /// Unparsable datagrams are reported as `Err` and get no reply.
    fn handle_request(
        &mut self,
        request: &[u8],
        client: Endpoint,
        reply: &mut [u8],
    ) -> Result<usize, PduError>;

    /// Relay an origin response to the waiter behind `handle` and free it.
    fn relay_response(&mut self, handle: WaiterHandle, response: &[u8]) -> Result<(), RelayError>;

    /// Free waiters whose response did not arrive in time. Returns the
    /// number freed.
    fn expire_waiters(&mut self) -> usize;

    /// Current counters.
    fn stats(&self) -> ProxyStats;
}
