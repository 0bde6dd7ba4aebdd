use crate::domain::{ProxyConfig, Timestamp, WaiterPool, REQUEST_BUF_SIZE, WAITER_POOL_CAPACITY};
use crate::ports::{InterfaceRegistry, RequestEngine, TimeSource, Transport};

/// Forward proxy implementing the driving port.
///
/// Owns the waiter pool and the scratch buffer outgoing requests are
/// assembled in, so proxying a request never touches the heap. `K` is the
/// compile-time waiter capacity.
///
/// # Example
///
/// ```rust,ignore
/// use coap_forward_proxy::{ForwardProxy, ForwardProxyApi, ProxyConfig};
///
/// let mut proxy: ForwardProxy<_, _> = ForwardProxy::new(
///     engine,
///     transport,
///     Box::new(StaticInterfaceRegistry::new([InterfaceId::new(1)])),
///     Box::new(SystemTimeSource::new()),
///     ProxyConfig::default(),
/// );
///
/// let reply_len = proxy.handle_request(&datagram, client, &mut reply)?;
/// ```
pub struct ForwardProxy<E, T, const K: usize = WAITER_POOL_CAPACITY>
where
    E: RequestEngine,
    T: Transport,
{
    pub(crate) pool: WaiterPool<K>,
    pub(crate) scratch: [u8; REQUEST_BUF_SIZE],
    pub(crate) engine: E,
    /// Used to relay origin responses to clients.
    pub(crate) transport: T,
    pub(crate) interfaces: Box<dyn InterfaceRegistry>,
    pub(crate) time_source: Box<dyn TimeSource>,
    pub(crate) config: ProxyConfig,
    pub(crate) counters: Counters,
}

/// Running totals behind `ProxyStats`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub forwarded: u64,
    pub duplicates: u64,
    pub rejected: u64,
    pub relayed: u64,
    pub expired: u64,
}

impl<E, T, const K: usize> ForwardProxy<E, T, K>
where
    E: RequestEngine,
    T: Transport,
{
    /// Create a proxy with an empty waiter pool.
    ///
    /// # Arguments
    ///
    /// * `engine` - Client request engine origin requests are handed to
    /// * `transport` - Datagram transport used to relay responses
    /// * `interfaces` - Interfaces available for link-local destinations
    /// * `time_source` - Provider for current time
    /// * `config` - Waiter timeout and related settings
    pub fn new(
        engine: E,
        transport: T,
        interfaces: Box<dyn InterfaceRegistry>,
        time_source: Box<dyn TimeSource>,
        config: ProxyConfig,
    ) -> Self {
        Self {
            pool: WaiterPool::new(),
            scratch: [0; REQUEST_BUF_SIZE],
            engine,
            transport,
            interfaces,
            time_source,
            config,
            counters: Counters::default(),
        }
    }

    /// Get the current timestamp from the time source.
    pub(crate) fn now(&self) -> Timestamp {
        self.time_source.now()
    }

    /// Waiter pool (read-only).
    pub fn pool(&self) -> &WaiterPool<K> {
        &self.pool
    }

    /// Request engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the request engine, e.g. to match an incoming
    /// response before handing it to `relay_response`.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Active configuration.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}
