//! # In-Memory Request Engine
//!
//! A small client-side request engine: it sends origin requests through a
//! [`Transport`], keeps one memo per outstanding request and matches origin
//! responses back to the waiter that was handed over with the request.
//!
//! Memos live in a fixed array of `N` slots. A memo is removed when its
//! response matches, when the origin resets the exchange, when the proxy
//! cancels it, when retransmissions run out, or when it outlives the
//! exchange lifetime.
//!
//! Confirmable requests keep their encoded bytes and are retransmitted by
//! [`MemoRequestEngine::retransmit`] with exponential back-off
//! (RFC 7252 Section 4.2) until the origin acknowledges them.

use tracing::{debug, trace, warn};

use crate::domain::pdu::HEADER_LEN;
use crate::domain::{
    Code, EngineError, Endpoint, MessageType, Pdu, PduWriter, Timestamp, WaiterHandle,
    ACK_RANDOM_EXTRA_SECS, ACK_TIMEOUT_SECS, MAX_RETRANSMIT, MAX_TOKEN_LEN, MEMO_CAPACITY,
};
use crate::ports::{RandomSource, RequestEngine, TimeSource, Transport};

use super::random::ThreadRandomSource;

/// Back-off state of an unacknowledged confirmable request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Retransmission {
    attempts: u8,
    timeout_secs: u64,
    due: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Memo {
    token: [u8; MAX_TOKEN_LEN],
    token_len: usize,
    message_id: u16,
    remote: Endpoint,
    context: WaiterHandle,
    sent_at: Timestamp,
    request: Vec<u8>,
    /// `None` for non-confirmable requests and once the origin has ACKed.
    retransmission: Option<Retransmission>,
}

impl Memo {
    fn token(&self) -> &[u8] {
        &self.token[..self.token_len]
    }

    /// Address/port match. Interfaces are compared only when both sides
    /// know theirs.
    fn is_peer(&self, from: &Endpoint) -> bool {
        let same_interface = match (self.remote.interface, from.interface) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        };
        self.remote.addr == from.addr && self.remote.port == from.port && same_interface
    }

    fn matches(&self, token: &[u8], from: &Endpoint) -> bool {
        self.token() == token && self.is_peer(from)
    }
}

/// Request engine with a bounded, in-memory memo table.
pub struct MemoRequestEngine<T: Transport, const N: usize = MEMO_CAPACITY> {
    memos: [Option<Memo>; N],
    transport: T,
    time_source: Box<dyn TimeSource>,
    random: Box<dyn RandomSource>,
    lifetime_secs: u64,
}

impl<T: Transport, const N: usize> MemoRequestEngine<T, N> {
    /// Create an engine sending through `transport`.
    ///
    /// # Arguments
    ///
    /// * `transport` - Datagram transport towards origin servers
    /// * `time_source` - Clock used to stamp memos and schedule retransmissions
    /// * `lifetime_secs` - How long a memo waits for its response
    pub fn new(transport: T, time_source: Box<dyn TimeSource>, lifetime_secs: u64) -> Self {
        Self {
            memos: std::array::from_fn(|_| None),
            transport,
            time_source,
            random: Box::new(ThreadRandomSource),
            lifetime_secs,
        }
    }

    /// Replace the source of retransmission jitter.
    #[must_use]
    pub fn with_random_source(mut self, random: Box<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Handle a datagram received from an origin server.
    ///
    /// An empty ACK stops retransmission of the request it acknowledges,
    /// an empty RST drops it. A response matching a memo by token and peer
    /// returns the waiter handed over with the request and forgets the
    /// memo; a confirmable (separate) response is acknowledged first.
    /// Unparsable datagrams never match.
    pub fn match_response(&mut self, response: &[u8], from: &Endpoint) -> Option<WaiterHandle> {
        let pdu = Pdu::parse(response).ok()?;
        if pdu.code().is_empty() {
            self.on_empty(&pdu, from);
            return None;
        }

        let slot = self
            .memos
            .iter_mut()
            .find(|memo| memo.as_ref().is_some_and(|m| m.matches(pdu.token(), from)))?;
        let memo = slot.take()?;

        if pdu.msg_type() == MessageType::Confirmable {
            self.acknowledge(pdu.message_id(), from);
        }
        debug!(%from, context = %memo.context, "origin response matched");
        Some(memo.context)
    }

    fn on_empty(&mut self, pdu: &Pdu<'_>, from: &Endpoint) {
        let mid = pdu.message_id();
        let Some(slot) = self
            .memos
            .iter_mut()
            .find(|memo| memo.as_ref().is_some_and(|m| m.message_id == mid && m.is_peer(from)))
        else {
            trace!(%from, mid, "empty message ignored");
            return;
        };

        match pdu.msg_type() {
            MessageType::Acknowledgement => {
                if let Some(memo) = slot.as_mut() {
                    memo.retransmission = None;
                    debug!(%from, context = %memo.context, "origin acknowledged request");
                }
            }
            MessageType::Reset => {
                if let Some(memo) = slot.take() {
                    debug!(%from, context = %memo.context, "origin reset request");
                }
            }
            _ => trace!(%from, mid, "empty message ignored"),
        }
    }

    fn acknowledge(&self, message_id: u16, to: &Endpoint) {
        let mut buf = [0u8; HEADER_LEN];
        let ack = PduWriter::new(&mut buf, MessageType::Acknowledgement, Code::EMPTY, message_id, &[])
            .and_then(|writer| writer.finish(&[]));
        match ack {
            Ok(len) => {
                if let Err(e) = self.transport.send_to(&buf[..len], to) {
                    warn!(%to, error = %e, "failed to acknowledge separate response");
                }
            }
            Err(e) => warn!(error = %e, "failed to encode acknowledgement"),
        }
    }

    /// Retransmit confirmable requests whose timeout has elapsed and drop
    /// those that were retransmitted `MAX_RETRANSMIT` times without an
    /// acknowledgement. Returns the number of datagrams resent.
    pub fn retransmit(&mut self) -> usize {
        let now = self.time_source.now();
        let mut resent = 0;
        for slot in &mut self.memos {
            let Some(memo) = slot.as_mut() else { continue };
            let Some(state) = memo.retransmission.as_mut() else { continue };
            if now.as_secs() < state.due.as_secs() {
                continue;
            }

            if state.attempts >= MAX_RETRANSMIT {
                debug!(remote = %memo.remote, context = %memo.context, "origin never acknowledged request");
                *slot = None;
                continue;
            }

            state.attempts += 1;
            state.timeout_secs *= 2;
            state.due = now.add_secs(state.timeout_secs);
            match self.transport.send_to(&memo.request, &memo.remote) {
                Ok(()) => {
                    resent += 1;
                    debug!(
                        remote = %memo.remote,
                        context = %memo.context,
                        attempt = state.attempts,
                        "request retransmitted"
                    );
                }
                Err(e) => warn!(remote = %memo.remote, error = %e, "retransmission failed"),
            }
        }
        resent
    }

    /// Drop memos older than the exchange lifetime. Returns the number
    /// dropped.
    pub fn expire(&mut self) -> usize {
        let now = self.time_source.now();
        let lifetime = self.lifetime_secs;
        let mut dropped = 0;
        for slot in &mut self.memos {
            if slot
                .as_ref()
                .is_some_and(|m| now.secs_since(m.sent_at) >= lifetime)
            {
                if let Some(memo) = slot.take() {
                    debug!(remote = %memo.remote, context = %memo.context, "memo expired");
                }
                dropped += 1;
            }
        }
        dropped
    }

    /// Outstanding requests.
    pub fn in_flight(&self) -> usize {
        self.memos.iter().filter(|m| m.is_some()).count()
    }

    /// Memo capacity.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport, const N: usize> RequestEngine for MemoRequestEngine<T, N> {
    fn has_in_flight(&self, request: &Pdu<'_>, remote: &Endpoint) -> bool {
        self.memos
            .iter()
            .flatten()
            .any(|memo| memo.token() == request.token() && memo.remote == *remote)
    }

    fn send(
        &mut self,
        request: &[u8],
        remote: Endpoint,
        context: WaiterHandle,
    ) -> Result<(), EngineError> {
        let pdu = Pdu::parse(request)?;
        let slot = self
            .memos
            .iter_mut()
            .find(|memo| memo.is_none())
            .ok_or(EngineError::Full { capacity: N })?;

        self.transport.send_to(request, &remote)?;

        let now = self.time_source.now();
        let retransmission = (pdu.msg_type() == MessageType::Confirmable).then(|| {
            let timeout_secs = ACK_TIMEOUT_SECS + self.random.random_below(ACK_RANDOM_EXTRA_SECS + 1);
            Retransmission {
                attempts: 0,
                timeout_secs,
                due: now.add_secs(timeout_secs),
            }
        });

        let mut token = [0u8; MAX_TOKEN_LEN];
        token[..pdu.token().len()].copy_from_slice(pdu.token());
        *slot = Some(Memo {
            token,
            token_len: pdu.token().len(),
            message_id: pdu.message_id(),
            remote,
            context,
            sent_at: now,
            request: request.to_vec(),
            retransmission,
        });
        debug!(%remote, %context, len = request.len(), "request sent to origin");
        Ok(())
    }

    fn cancel(&mut self, context: WaiterHandle) {
        for slot in &mut self.memos {
            if slot.as_ref().is_some_and(|m| m.context == context) {
                *slot = None;
            }
        }
    }
}
