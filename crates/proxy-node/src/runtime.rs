//! The node event loop.
//!
//! One task owns the proxy. It receives every datagram on the shared socket
//! and routes it by code: requests carrying a `Proxy-Uri` go through the
//! proxy, other requests are answered with 4.04 since the node serves no
//! resources of its own, and responses are matched against outstanding
//! memos and relayed to the waiting client. A timer drives retransmission
//! and the waiter and memo sweeps.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use coap_forward_proxy::{
    write_error_response, Code, Endpoint, ForwardProxy, ForwardProxyApi, MemoRequestEngine, Pdu, ProxyStats,
    StaticInterfaceRegistry, SystemTimeSource, Transport, UdpTransport,
};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use crate::cli::NodeConfig;

/// Largest datagram the node accepts (RFC 7252 Section 4.6).
pub const MAX_DATAGRAM_LEN: usize = 1152;

/// Room for an error reply: header plus the longest token.
const REPLY_BUF_SIZE: usize = 16;

/// The proxy as wired by the node: memo engine and replies on one socket.
pub type NodeProxy = ForwardProxy<MemoRequestEngine<UdpTransport>, UdpTransport>;

/// A running forward proxy bound to a UDP socket.
pub struct ProxyNode {
    proxy: NodeProxy,
    transport: UdpTransport,
    sweep_interval: Duration,
}

impl ProxyNode {
    /// Bind the configured address and wire the proxy.
    pub async fn bind(config: &NodeConfig) -> Result<Self> {
        let transport = UdpTransport::bind(config.bind_addr)
            .await
            .with_context(|| format!("binding {}", config.bind_addr))?;
        Ok(Self::with_transport(transport, config))
    }

    /// Wire the proxy on an already bound transport.
    pub fn with_transport(transport: UdpTransport, config: &NodeConfig) -> Self {
        let engine = MemoRequestEngine::new(
            transport.clone(),
            Box::new(SystemTimeSource::new()),
            config.proxy.memo_lifetime_secs,
        );
        let proxy = ForwardProxy::new(
            engine,
            transport.clone(),
            Box::new(StaticInterfaceRegistry::new(config.interfaces.iter().copied())),
            Box::new(SystemTimeSource::new()),
            config.proxy.clone(),
        );

        Self {
            proxy,
            transport,
            sweep_interval: Duration::from_secs(config.proxy.sweep_interval_secs.max(1)),
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    pub fn stats(&self) -> ProxyStats {
        self.proxy.stats()
    }

    /// Run until `shutdown` completes.
    pub async fn run<F>(mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let socket = Arc::clone(self.transport.socket());
        let mut buf = [0u8; MAX_DATAGRAM_LEN];
        let mut sweep = tokio::time::interval(self.sweep_interval);
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(addr = ?self.local_addr().ok(), "proxy node listening");

        loop {
            tokio::select! {
                received = socket.recv_from(&mut buf) => match received {
                    Ok((len, from)) => self.on_datagram(&buf[..len], Endpoint::from(from)),
                    Err(e) => warn!(error = %e, "receive failed"),
                },
                _ = sweep.tick() => {
                    self.sweep();
                }
                () = &mut shutdown => break,
            }
        }

        let stats = self.stats();
        info!(
            forwarded = stats.forwarded,
            relayed = stats.relayed,
            rejected = stats.rejected,
            expired = stats.expired,
            "proxy node stopped"
        );
        Ok(())
    }

    /// Route one received datagram.
    pub fn on_datagram(&mut self, datagram: &[u8], from: Endpoint) {
        let pdu = match Pdu::parse(datagram) {
            Ok(pdu) => pdu,
            Err(e) => {
                debug!(%from, error = %e, "dropping unparsable datagram");
                return;
            }
        };

        if !pdu.code().is_request() {
            self.on_response(datagram, from);
        } else if self.proxy.matches(&pdu) {
            self.on_proxy_request(datagram, from);
        } else {
            self.on_unclaimed_request(&pdu, from);
        }
    }

    fn on_proxy_request(&mut self, datagram: &[u8], from: Endpoint) {
        let mut reply = [0u8; REPLY_BUF_SIZE];
        match self.proxy.handle_request(datagram, from, &mut reply) {
            Ok(0) => {}
            Ok(len) => self.reply(&reply[..len], &from),
            Err(e) => debug!(%from, error = %e, "request dropped"),
        }
    }

    fn on_unclaimed_request(&self, request: &Pdu<'_>, from: Endpoint) {
        let mut reply = [0u8; REPLY_BUF_SIZE];
        match write_error_response(request, Code::NOT_FOUND, &mut reply) {
            Ok(len) => {
                debug!(%from, code = %request.code(), "no resource for request");
                self.reply(&reply[..len], &from);
            }
            Err(e) => debug!(%from, error = %e, "request dropped"),
        }
    }

    fn reply(&self, bytes: &[u8], to: &Endpoint) {
        if let Err(e) = self.transport.send_to(bytes, to) {
            warn!(%to, error = %e, "failed to send error reply");
        }
    }

    fn on_response(&mut self, datagram: &[u8], from: Endpoint) {
        let Some(handle) = self.proxy.engine_mut().match_response(datagram, &from) else {
            trace!(%from, "no outstanding request for datagram");
            return;
        };
        if let Err(e) = self.proxy.relay_response(handle, datagram) {
            debug!(%handle, error = %e, "response not relayed");
        }
    }

    /// Retransmit unacknowledged origin requests, then free timed-out
    /// waiters and memos. Returns the number of waiters freed.
    pub fn sweep(&mut self) -> usize {
        let resent = self.proxy.engine_mut().retransmit();
        let waiters = self.proxy.expire_waiters();
        let memos = self.proxy.engine_mut().expire();
        if resent + waiters + memos > 0 {
            debug!(resent, waiters, memos, "sweep");
        }
        waiters
    }
}
