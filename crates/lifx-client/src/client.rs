//! Controller session

use std::net::SocketAddr;
use std::time::Duration;

use tracing::debug;

use crate::device::Device;

/// Backoff parameters for the retrying exchange primitive.
///
/// UDP has no reliability guarantees. LIFX devices are usually pretty
/// good on a LAN, but in the event a packet is dropped we use strict
/// per-attempt timeouts and aggressively retry.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Timeout for the first attempt.
    pub base_timeout: Duration,
    /// Multiplier applied to the per-attempt timeout after each miss.
    pub backoff: f64,
    /// Cap on the per-attempt timeout.
    pub max_timeout: Duration,
    /// Overall deadline for one exchange; `None` retries indefinitely.
    pub overall: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_timeout: Duration::from_millis(300),
            backoff: 1.5,
            max_timeout: Duration::from_secs(10),
            overall: None,
        }
    }
}

impl RetryPolicy {
    pub(crate) fn next_timeout(&self, current: Duration) -> Duration {
        current.mul_f64(self.backoff).min(self.max_timeout)
    }
}

/// One controller session.
///
/// Holds the random 32-bit source identifier stamped on all outgoing
/// messages; devices echo it back, which is how responses to this
/// session are told apart from other controllers' traffic on the same
/// broadcast domain. Device handles produced by this client carry the
/// session's source and are only meaningful within it.
#[derive(Debug, Clone)]
pub struct Client {
    source: u32,
    retry: RetryPolicy,
    discovery_addr: SocketAddr,
}

impl Client {
    /// Create a session with a fresh random source identifier and
    /// default retry policy.
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The session's source identifier.
    pub fn source(&self) -> u32 {
        self.source
    }

    pub(crate) fn retry(&self) -> RetryPolicy {
        self.retry
    }

    pub(crate) fn discovery_addr(&self) -> SocketAddr {
        self.discovery_addr
    }

    /// Build a handle for a device at a known address, bypassing
    /// discovery (devices can migrate ports between sessions, so
    /// prefer [`Client::discover`] when in doubt).
    pub fn device(&self, serial: [u8; 6], addr: SocketAddr) -> Device {
        Device::new(serial, addr, self.source, self.retry)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    source: Option<u32>,
    retry: RetryPolicy,
    discovery_addr: SocketAddr,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            retry: RetryPolicy::default(),
            discovery_addr: SocketAddr::from(([255, 255, 255, 255], lifx_proto::DEFAULT_PORT)),
        }
    }

    /// Fix the source identifier instead of generating one.
    pub fn source(mut self, source: u32) -> Self {
        self.source = Some(source);
        self
    }

    /// Timeout for the first attempt of each exchange.
    pub fn base_timeout(mut self, timeout: Duration) -> Self {
        self.retry.base_timeout = timeout;
        self
    }

    /// Per-attempt timeout multiplier.
    pub fn backoff(mut self, factor: f64) -> Self {
        self.retry.backoff = factor;
        self
    }

    /// Cap on the per-attempt timeout.
    pub fn max_timeout(mut self, timeout: Duration) -> Self {
        self.retry.max_timeout = timeout;
        self
    }

    /// Overall deadline for each exchange, after which retrying stops
    /// and the operation fails with a timeout.
    pub fn overall_timeout(mut self, timeout: Duration) -> Self {
        self.retry.overall = Some(timeout);
        self
    }

    /// Where discovery probes are sent. Defaults to the subnet
    /// broadcast address on the protocol's well-known port.
    pub fn discovery_addr(mut self, addr: SocketAddr) -> Self {
        self.discovery_addr = addr;
        self
    }

    pub fn build(self) -> Client {
        let source = self.source.unwrap_or_else(rand::random);
        debug!(source = format_args!("0x{source:08x}"), "new session");
        Client {
            source,
            retry: self.retry,
            discovery_addr: self.discovery_addr,
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
