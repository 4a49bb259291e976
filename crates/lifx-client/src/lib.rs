//! LIFX LAN client
//!
//! Discovery and control of LIFX devices on the local network, over
//! UDP. A [`Client`] is one controller session: it owns the random
//! 32-bit source identifier that distinguishes this session's traffic
//! from other controllers on the same LAN. [`Client::discover`]
//! broadcasts a service query and returns [`Device`] handles, which
//! carry the per-device sequence counter used to correlate each request
//! with its response.
//!
//! # Example
//!
//! ```ignore
//! use lifx_client::Client;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Client::new();
//!     for mut device in client.discover(Duration::from_secs(2)).await? {
//!         println!("{} is {:?}", device.addr(), device.get_label().await?);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! UDP gives no delivery guarantee, so every exchange retries under
//! exponential backoff; see [`RetryPolicy`].

pub mod client;
pub mod device;
pub mod discovery;
pub mod error;

pub use client::{Client, ClientBuilder, RetryPolicy};
pub use device::Device;
pub use error::{ClientError, Result};

// Re-exported wire types that appear in the public API.
pub use lifx_proto::payload::{HostFirmware, LightState, Waveform, WaveformConfig};
pub use lifx_proto::Hsbk;
