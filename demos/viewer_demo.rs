//! Webcam Viewer Demo
//!
//! This example drives the viewer facade against the scriptable mock host:
//! device enumeration, stream lifecycle, resolution switching, hot-plug, and
//! the fullscreen toggle.

use camview::{
    MockFullscreenHost, MockMediaHost, MockStreamSink, ResolutionProfile, VideoDevice,
    ViewerBuilder,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("🎥 Camview Webcam Viewer Demo");
    println!("=============================");

    let host = Arc::new(MockMediaHost::with_devices(vec![
        VideoDevice::new("cam-front", "Integrated Camera"),
        VideoDevice::new("cam-usb", "USB 4K Camera"),
    ]));
    let sink = Arc::new(MockStreamSink::new());
    let viewer = ViewerBuilder::new(
        host.clone(),
        Arc::new(MockFullscreenHost::new()),
        sink.clone(),
    )
    .build();

    println!("\n📋 Demo 1: Device Enumeration");
    viewer.start().await?;
    println!("{}", serde_json::to_string_pretty(&viewer.devices())?);
    println!(
        "Default selection: {}",
        viewer.selected_device_id().unwrap_or_default()
    );

    println!("\n🔴 Demo 2: Stream Lifecycle");
    let handle = viewer.active_stream().expect("stream attached on start");
    println!("Attached stream {} at {}", handle.id, handle.resolution);
    viewer.select_device("cam-usb").await?;
    let handle = viewer.active_stream().expect("stream attached after swap");
    println!("Swapped to {} ({})", handle.device_id, handle.resolution);

    println!("\n⚙️  Demo 3: Resolution Switch");
    for profile in ResolutionProfile::ALL {
        viewer.set_resolution(profile).await?;
        let handle = viewer.active_stream().expect("stream attached");
        println!(
            "{} requested, negotiated {}",
            profile.dimension_label(),
            handle.resolution
        );
    }

    println!("\n🔌 Demo 4: Hot-Plug");
    host.set_devices(vec![VideoDevice::new("cam-dock", "Docking Station Camera")]);
    host.notify_device_change();
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!(
        "Devices after hot-plug: {:?}",
        viewer
            .devices()
            .iter()
            .map(|d| d.label.clone())
            .collect::<Vec<_>>()
    );
    println!(
        "Selection fell back to: {}",
        viewer.selected_device_id().unwrap_or_default()
    );

    println!("\n🖥️  Demo 5: Fullscreen Toggle");
    println!("Fullscreen: {}", viewer.toggle_fullscreen()?);
    println!("Fullscreen: {}", viewer.toggle_fullscreen()?);

    println!("\n📊 Session stats: {}", serde_json::to_string(&viewer.stats())?);
    viewer.teardown();

    println!("\n✨ Viewer demo completed!");
    Ok(())
}
