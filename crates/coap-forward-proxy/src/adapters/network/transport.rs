//! UDP transport over a shared socket.

use std::io;
use std::net::{SocketAddr, UdpSocket as StdUdpSocket};
use std::sync::Arc;

use tokio::net::UdpSocket;
use tracing::trace;

use crate::domain::{Endpoint, TransportError};
use crate::ports::Transport;

/// Datagram transport backed by one non-blocking OS socket.
///
/// The node loop receives through the tokio handle; the proxy and the
/// request engine send through a duplicate std handle of the same socket,
/// straight to the OS. Sends therefore never wait on the reactor, and a
/// full socket buffer surfaces as `TransportError::WouldBlock`.
#[derive(Debug, Clone)]
pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    sender: Arc<StdUdpSocket>,
}

impl UdpTransport {
    /// Bind a new socket. Must be called within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns error if socket binding fails.
    pub async fn bind(addr: SocketAddr) -> io::Result<Self> {
        Self::from_std(StdUdpSocket::bind(addr)?)
    }

    /// Wrap an already bound std socket. Must be called within a tokio
    /// runtime.
    pub fn from_std(socket: StdUdpSocket) -> io::Result<Self> {
        socket.set_nonblocking(true)?;
        let sender = socket.try_clone()?;
        Ok(Self {
            socket: Arc::new(UdpSocket::from_std(socket)?),
            sender: Arc::new(sender),
        })
    }

    /// The shared socket, for receiving.
    pub fn socket(&self) -> &Arc<UdpSocket> {
        &self.socket
    }

    /// Get the local address the socket is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.sender.local_addr()
    }
}

impl Transport for UdpTransport {
    fn send_to(&self, bytes: &[u8], remote: &Endpoint) -> Result<(), TransportError> {
        match self.sender.send_to(bytes, remote.to_socket_addr()) {
            Ok(_) => {
                trace!(%remote, len = bytes.len(), "datagram sent");
                Ok(())
            }
            Err(e) => Err(match e.kind() {
                io::ErrorKind::WouldBlock => TransportError::WouldBlock,
                io::ErrorKind::InvalidInput | io::ErrorKind::AddrNotAvailable => {
                    TransportError::Unreachable(remote.to_string())
                }
                _ => TransportError::Io(e.to_string()),
            }),
        }
    }
}
