//! Discover every light on the LAN and print what it is and what it can do.
//!
//! ```sh
//! cargo run --example inspect
//! ```

use std::time::Duration;

use anyhow::Context;
use lifx_client::Client;
use lifx_products::{Catalog, FirmwareVersion};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let client = Client::new();
    let devices = client
        .discover(Duration::from_secs(2))
        .await
        .context("discovery failed")?;

    if devices.is_empty() {
        println!("no devices responded");
        return Ok(());
    }

    for mut device in devices {
        let serial = device
            .serial()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":");
        println!("{serial} at {}", device.addr());

        let label = device.get_label().await.context("GetLabel")?;
        let (vendor, product) = device.get_version().await.context("GetVersion")?;
        let firmware = device.get_host_firmware().await.context("GetHostFirmware")?;
        let state = device.get_color().await.context("GetColor")?;

        println!("  label:    {label}");
        println!(
            "  firmware: {}.{} (build {})",
            firmware.major, firmware.minor, firmware.build
        );
        println!(
            "  power:    {}",
            if state.power > 0 { "on" } else { "off" }
        );
        println!(
            "  color:    hue={} sat={} bri={} kelvin={}",
            state.color.hue, state.color.saturation, state.color.brightness, state.color.kelvin
        );

        match Catalog::builtin().resolve(
            vendor,
            product,
            FirmwareVersion {
                major: firmware.major,
                minor: firmware.minor,
            },
        ) {
            Ok(resolved) => {
                println!("  product:  {} (pid {})", resolved.name, resolved.pid);
                println!("  features: {}", resolved.capabilities);
            }
            Err(e) => println!("  product:  vendor {vendor} / product {product} ({e})"),
        }
    }

    Ok(())
}
