use tracing::{debug, warn};

use crate::domain::{
    write_error_response, Endpoint, OptionNumber, Pdu, PduError, ProxyError, RelayError,
    WaiterHandle,
};
use crate::ports::{ForwardProxyApi, ProxyOutcome, ProxyStats, RequestEngine, Transport};
use crate::service::ForwardProxy;

impl<E, T, const K: usize> ForwardProxyApi for ForwardProxy<E, T, K>
where
    E: RequestEngine,
    T: Transport,
{
    fn matches(&self, request: &Pdu<'_>) -> bool {
        request.option(OptionNumber::PROXY_URI).is_some()
    }

    fn process(&mut self, request: &Pdu<'_>, client: Endpoint) -> Result<ProxyOutcome, ProxyError> {
        self.dispatch(request, client).map_err(|err| {
            self.counters.rejected += 1;
            err
        })
    }

    fn handle_request(
        &mut self,
        request: &[u8],
        client: Endpoint,
        reply: &mut [u8],
    ) -> Result<usize, PduError> {
        let pdu = Pdu::parse(request)?;
        if !pdu.code().is_request() {
            debug!(%client, code = %pdu.code(), "not a request, ignored");
            return Ok(0);
        }

        match self.process(&pdu, client) {
            Ok(_) => Ok(0),
            Err(err) => {
                let code = err.response_code();
                warn!(%client, %code, error = %err, "proxy request rejected");
                write_error_response(&pdu, code, reply)
            }
        }
    }

    fn relay_response(&mut self, handle: WaiterHandle, response: &[u8]) -> Result<(), RelayError> {
        self.relay(handle, response)
    }

    fn expire_waiters(&mut self) -> usize {
        self.sweep_expired()
    }

    fn stats(&self) -> ProxyStats {
        let pool = self.pool.stats();
        ProxyStats {
            in_use: pool.in_use,
            capacity: pool.capacity,
            forwarded: self.counters.forwarded,
            duplicates: self.counters.duplicates,
            rejected: self.counters.rejected,
            relayed: self.counters.relayed,
            expired: self.counters.expired,
        }
    }
}
