//! One-shot snapshot of the startup reads.

use anyhow::{Context, Result};
use kiosk_client::{HttpSnapshotSource, KioskConfig, Snapshot};
use kiosk_core::KioskView;
use std::time::{SystemTime, UNIX_EPOCH};

use super::describe;

/// Run the snapshot command.
pub async fn run(config: &KioskConfig) -> Result<()> {
    let source =
        HttpSnapshotSource::from_config(config).context("Failed to create snapshot client")?;

    println!("=== kiosk-sync snapshot ===");
    println!("Base: {}", config.server.base_url);
    println!();

    let snapshot = Snapshot::fetch(&source).await;

    println!("Reads:");
    println!("  call/state:   {}", snapshot.call.state());
    if let Some(session) = snapshot.call.session() {
        println!("    session:    {}", session.call_id);
    }
    println!("  picture/meta: {}", snapshot.picture_url);
    println!(
        "  volume:       {}%{}",
        snapshot.volume.volume_percent,
        if snapshot.volume.muted { " (muted)" } else { "" }
    );
    println!();

    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("System clock before Unix epoch")?
        .as_millis() as u64;
    let mut view = KioskView::new();
    snapshot.seed(&mut view, stamp);

    println!("Seeded view:");
    println!("  {}", describe(&view));

    Ok(())
}
