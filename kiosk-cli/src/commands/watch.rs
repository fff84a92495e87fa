//! Follow the live view.

use anyhow::{Context, Result};
use kiosk_client::{HttpSnapshotSource, HttpTransport, Kiosk, KioskConfig};
use std::time::Duration;

use super::describe;

/// Run the watch command until Ctrl-C.
pub async fn run(config: &KioskConfig) -> Result<()> {
    let transport = HttpTransport::new(Duration::from_millis(config.server.connect_timeout_ms))
        .context("Failed to create push transport")?;
    let source =
        HttpSnapshotSource::from_config(config).context("Failed to create snapshot client")?;

    println!("=== kiosk-sync watch ===");
    println!("Events: {}", config.events_url());
    println!();

    let kiosk = Kiosk::start(config, transport, source);
    let mut view = kiosk.view();
    println!("{}", describe(&view.borrow_and_update()));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted, stopping kiosk session");
                break;
            }
            changed = view.changed() => {
                if changed.is_err() {
                    tracing::warn!("view channel closed");
                    break;
                }
                println!("{}", describe(&view.borrow_and_update()));
            }
        }
    }

    kiosk.stop().await;
    Ok(())
}
