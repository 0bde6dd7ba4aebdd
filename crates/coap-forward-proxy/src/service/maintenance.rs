use tracing::info;

use crate::ports::{RequestEngine, Transport};
use crate::service::ForwardProxy;

impl<E, T, const K: usize> ForwardProxy<E, T, K>
where
    E: RequestEngine,
    T: Transport,
{
    /// Free waiters older than `waiter_timeout_secs` and withdraw their
    /// requests from the engine.
    ///
    /// Call from a timer task every `sweep_interval_secs`.
    pub(crate) fn sweep_expired(&mut self) -> usize {
        let now = self.now();
        let timeout = self.config.waiter_timeout_secs;
        let engine = &mut self.engine;

        let freed = self.pool.drain_expired(now, timeout, |handle, waiter| {
            engine.cancel(handle);
            info!(%handle, client = %waiter.remote, "waiter timed out without response");
        });

        self.counters.expired += freed as u64;
        freed
    }
}
