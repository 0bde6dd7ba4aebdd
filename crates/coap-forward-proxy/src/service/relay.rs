//! Response relay: origin response back to the waiting client.

use tracing::{debug, warn};

use crate::domain::{RelayError, WaiterHandle};
use crate::ports::{RequestEngine, Transport};
use crate::service::ForwardProxy;

impl<E, T, const K: usize> ForwardProxy<E, T, K>
where
    E: RequestEngine,
    T: Transport,
{
    /// Send `response` verbatim to the client behind `handle` and free the
    /// waiter. The waiter is freed even when the send fails.
    pub(crate) fn relay(&mut self, handle: WaiterHandle, response: &[u8]) -> Result<(), RelayError> {
        let Some(waiter) = self.pool.free(handle) else {
            warn!(%handle, "response for stale waiter dropped");
            return Err(RelayError::StaleHandle);
        };

        self.transport.send_to(response, &waiter.remote).map_err(|err| {
            warn!(%handle, client = %waiter.remote, error = %err, "relaying response failed");
            err
        })?;

        self.counters.relayed += 1;
        debug!(%handle, client = %waiter.remote, len = response.len(), "response relayed");
        Ok(())
    }
}
