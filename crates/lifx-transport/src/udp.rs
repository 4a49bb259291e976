//! UDP socket wrapper

use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use tokio::net::UdpSocket;
use tracing::debug;

use crate::error::{Result, TransportError};

/// Largest datagram we expect to receive. LIFX messages are far
/// smaller, but leave room for payloads we don't know about.
const MAX_DATAGRAM: usize = 4096;

/// A broadcast-capable UDP socket on an ephemeral local port.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Bind to an ephemeral port on the default interface, with
    /// broadcast enabled.
    pub async fn bind() -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(TransportError::Bind)?;
        socket.set_broadcast(true).map_err(TransportError::Bind)?;

        debug!(local = %socket.local_addr()?, "UDP socket bound");

        Ok(Self { socket })
    }

    /// Get the local address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Best-effort unicast or broadcast send.
    pub async fn send_to(&self, data: &[u8], target: SocketAddr) -> Result<()> {
        self.socket
            .send_to(data, target)
            .await
            .map_err(TransportError::Send)?;
        Ok(())
    }

    /// Receive one datagram, waiting at most `wait`.
    ///
    /// Returns [`TransportError::Timeout`] when the deadline elapses
    /// first; any other failure is a hard I/O error.
    pub async fn recv_one(&self, wait: Duration) -> Result<(Bytes, SocketAddr)> {
        let mut buf = [0u8; MAX_DATAGRAM];
        match tokio::time::timeout(wait, self.socket.recv_from(&mut buf)).await {
            Ok(Ok((len, from))) => {
                debug!(%from, len, "received datagram");
                Ok((Bytes::copy_from_slice(&buf[..len]), from))
            }
            Ok(Err(e)) => Err(TransportError::Io(e)),
            Err(_) => Err(TransportError::Timeout),
        }
    }
}
