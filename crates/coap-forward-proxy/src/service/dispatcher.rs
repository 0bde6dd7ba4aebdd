//! Forward dispatcher: validation, dedup gate and hand-off.

use tracing::{debug, warn};

use crate::domain::{
    parse_endpoint, translate_request, Endpoint, InvalidProxyUri, OptionNumber, ParsedUri, Pdu,
    ProxyError,
};
use crate::ports::{ProxyOutcome, RequestEngine, Transport};
use crate::service::ForwardProxy;

/// The only scheme this proxy forwards.
pub(crate) const COAP_SCHEME: &str = "coap";

impl<E, T, const K: usize> ForwardProxy<E, T, K>
where
    E: RequestEngine,
    T: Transport,
{
    /// Run one request through the dispatcher.
    ///
    /// Validation and the dedup gate run before a waiter is claimed, so a
    /// rejected or duplicate request never holds a slot. Once claimed, the
    /// waiter is released again if translation or hand-off fails.
    pub(crate) fn dispatch(
        &mut self,
        request: &Pdu<'_>,
        client: Endpoint,
    ) -> Result<ProxyOutcome, ProxyError> {
        let Some(raw_uri) = request.option(OptionNumber::PROXY_URI) else {
            return Ok(ProxyOutcome::NotProxyRequest);
        };

        let uri_text = std::str::from_utf8(raw_uri).map_err(|_| InvalidProxyUri::NotUtf8)?;
        let uri = ParsedUri::parse_absolute(uri_text)?;

        let scheme = uri.scheme.unwrap_or_default();
        if !scheme.eq_ignore_ascii_case(COAP_SCHEME) {
            warn!(%client, scheme, "Proxy-Uri scheme not supported");
            return Err(ProxyError::UnsupportedScheme);
        }

        let origin = parse_endpoint(
            uri.host.unwrap_or_default(),
            uri.port.unwrap_or_default(),
            self.interfaces.as_ref(),
        )?;

        if self.engine.has_in_flight(request, &origin) {
            debug!(%client, %origin, token = ?request.token(), "duplicate proxy request dropped");
            self.counters.duplicates += 1;
            return Ok(ProxyOutcome::Duplicate);
        }

        let now = self.now();
        let handle = self
            .pool
            .allocate(client, now)
            .ok_or(ProxyError::OutOfResources { capacity: K })?;

        let len = match translate_request(request, &uri, &mut self.scratch) {
            Ok(len) => len,
            Err(err) => {
                self.pool.free(handle);
                return Err(err.into());
            }
        };

        if let Err(err) = self.engine.send(&self.scratch[..len], origin, handle) {
            self.pool.free(handle);
            return Err(err.into());
        }

        self.counters.forwarded += 1;
        debug!(%client, %origin, %handle, len, "proxy request forwarded");
        Ok(ProxyOutcome::Forwarded(handle))
    }
}
