//! Integration tests for the viewer facade
//!
//! Drives the full startup, selection, hot-plug reconciliation, fullscreen,
//! and event flows against the scriptable mock hosts.

use camview::{
    CameraError, HostError, MockFullscreenHost, MockMediaHost, MockStreamSink, ResolutionProfile,
    SelectionOutcome, VideoDevice, ViewerBuilder, ViewerEvent, WebcamViewer,
};
use std::sync::Arc;
use std::time::Duration;

fn viewer_over(
    devices: Vec<VideoDevice>,
) -> (
    Arc<MockMediaHost>,
    Arc<MockStreamSink>,
    Arc<MockFullscreenHost>,
    WebcamViewer,
) {
    let host = Arc::new(MockMediaHost::with_devices(devices));
    let sink = Arc::new(MockStreamSink::new());
    let fullscreen = Arc::new(MockFullscreenHost::new());
    let viewer = ViewerBuilder::new(host.clone(), fullscreen.clone(), sink.clone()).build();
    (host, sink, fullscreen, viewer)
}

fn two_cameras() -> Vec<VideoDevice> {
    vec![
        VideoDevice::new("cam-a", "Integrated Camera"),
        VideoDevice::new("cam-b", "USB Camera"),
    ]
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

// ============================================================================
// STARTUP
// ============================================================================

#[tokio::test]
async fn test_start_attaches_default_device_at_full_hd() {
    let (host, sink, _fs, viewer) = viewer_over(two_cameras());

    viewer.start().await.unwrap();

    assert_eq!(viewer.devices().len(), 2);
    assert_eq!(viewer.selected_device_id().as_deref(), Some("cam-a"));
    assert_eq!(viewer.resolution(), ResolutionProfile::Fhd);
    assert_eq!(viewer.last_error(), None);

    let handle = viewer.active_stream().unwrap();
    assert_eq!(handle.device_id, "cam-a");
    assert_eq!(sink.current(), Some(handle));

    let constrained: Vec<_> = host
        .acquire_requests()
        .into_iter()
        .filter(|c| !c.is_probe())
        .collect();
    assert_eq!(constrained.len(), 1);
    assert_eq!(constrained[0].device_id.as_deref(), Some("cam-a"));
    assert_eq!(constrained[0].ideal_width, Some(1920));
    assert_eq!(constrained[0].ideal_height, Some(1080));
}

#[tokio::test]
async fn test_start_honors_configured_default_resolution() {
    let host = Arc::new(MockMediaHost::with_devices(two_cameras()));
    let viewer = ViewerBuilder::new(
        host.clone(),
        Arc::new(MockFullscreenHost::new()),
        Arc::new(MockStreamSink::new()),
    )
    .default_resolution(ResolutionProfile::Uhd4k)
    .build();

    viewer.start().await.unwrap();

    assert_eq!(viewer.resolution(), ResolutionProfile::Uhd4k);
    let last = host.acquire_requests().pop().unwrap();
    assert_eq!(last.ideal_width, Some(3840));
    assert_eq!(last.ideal_height, Some(2160));
}

#[tokio::test]
async fn test_start_with_permission_denied() {
    let (host, sink, _fs, viewer) = viewer_over(two_cameras());
    host.fail_next_acquire(HostError::not_allowed("prompt dismissed"));

    let result = viewer.start().await;

    assert_eq!(result.unwrap_err(), CameraError::PermissionDenied);
    assert!(viewer.devices().is_empty());
    assert_eq!(viewer.last_error(), Some(CameraError::PermissionDenied));
    assert_eq!(viewer.active_stream(), None);
    assert_eq!(sink.current(), None);
    // Only the probe was attempted; with no devices there is nothing to select.
    assert!(host.acquire_requests().iter().all(|c| c.is_probe()));
}

#[tokio::test]
async fn test_viewer_recovers_after_failed_start() {
    let (host, _sink, _fs, viewer) = viewer_over(Vec::new());

    assert_eq!(
        viewer.start().await.unwrap_err(),
        CameraError::NoDeviceFound
    );
    assert_eq!(viewer.last_error(), Some(CameraError::NoDeviceFound));

    // A camera shows up; a manual refresh picks it up and attaches it.
    host.set_devices(vec![VideoDevice::new("cam-a", "Integrated Camera")]);
    viewer.refresh_devices().await.unwrap();

    assert_eq!(viewer.selected_device_id().as_deref(), Some("cam-a"));
    assert_eq!(viewer.active_stream().unwrap().device_id, "cam-a");
    assert_eq!(viewer.last_error(), None);
}

// ============================================================================
// SELECTION
// ============================================================================

#[tokio::test]
async fn test_select_device_swaps_the_stream() {
    let (host, sink, _fs, viewer) = viewer_over(two_cameras());
    viewer.start().await.unwrap();
    let first = viewer.active_stream().unwrap();

    let outcome = viewer.select_device("cam-b").await.unwrap();

    assert!(matches!(outcome, SelectionOutcome::Attached(ref h) if h.device_id == "cam-b"));
    assert_eq!(viewer.selected_device_id().as_deref(), Some("cam-b"));
    assert_eq!(sink.current().unwrap().device_id, "cam-b");

    let old = host
        .stream_records()
        .into_iter()
        .find(|r| r.handle.id == first.id)
        .unwrap();
    assert!(old.is_stopped());
}

#[tokio::test]
async fn test_set_resolution_reacquires_on_selected_device() {
    let (host, _sink, _fs, viewer) = viewer_over(two_cameras());
    viewer.start().await.unwrap();

    let outcome = viewer
        .set_resolution(ResolutionProfile::Uhd4k)
        .await
        .unwrap();

    assert!(matches!(outcome, Some(SelectionOutcome::Attached(_))));
    assert_eq!(viewer.resolution(), ResolutionProfile::Uhd4k);
    let last = host.acquire_requests().pop().unwrap();
    assert_eq!(last.device_id.as_deref(), Some("cam-a"));
    assert_eq!(last.ideal_width, Some(3840));
    assert_eq!(last.ideal_height, Some(2160));
}

#[tokio::test]
async fn test_set_resolution_before_any_device() {
    let (host, _sink, _fs, viewer) = viewer_over(Vec::new());

    let outcome = viewer
        .set_resolution(ResolutionProfile::Uhd4k)
        .await
        .unwrap();

    assert_eq!(outcome, None);
    assert_eq!(viewer.resolution(), ResolutionProfile::Uhd4k);
    assert!(host.acquire_requests().is_empty());
}

// ============================================================================
// HOT-PLUG RECONCILIATION
// ============================================================================

#[tokio::test]
async fn test_hotplug_falls_back_to_new_default() {
    let (host, _sink, _fs, viewer) = viewer_over(vec![VideoDevice::new(
        "cam-a",
        "Integrated Camera",
    )]);
    viewer.start().await.unwrap();
    assert_eq!(viewer.selected_device_id().as_deref(), Some("cam-a"));

    // cam-a is unplugged and cam-b appears.
    host.set_devices(vec![VideoDevice::new("cam-b", "USB Camera")]);
    host.notify_device_change();

    wait_until(|| viewer.selected_device_id().as_deref() == Some("cam-b")).await;
    assert_eq!(viewer.active_stream().unwrap().device_id, "cam-b");
    assert!(viewer.devices().iter().all(|d| d.device_id == "cam-b"));
}

#[tokio::test]
async fn test_hotplug_keeps_surviving_selection() {
    let (host, _sink, _fs, viewer) = viewer_over(two_cameras());
    viewer.start().await.unwrap();
    viewer.select_device("cam-b").await.unwrap();
    let attached = viewer.active_stream().unwrap();

    // A third camera appears; cam-b is still present, so nothing re-acquires.
    host.set_devices(vec![
        VideoDevice::new("cam-b", "USB Camera"),
        VideoDevice::new("cam-c", "Capture Card"),
    ]);
    host.notify_device_change();

    wait_until(|| viewer.devices().iter().any(|d| d.device_id == "cam-c")).await;
    assert_eq!(viewer.selected_device_id().as_deref(), Some("cam-b"));
    assert_eq!(viewer.active_stream(), Some(attached));
}

// ============================================================================
// FULLSCREEN
// ============================================================================

#[tokio::test]
async fn test_toggle_fullscreen_round_trip() {
    let (_host, _sink, _fs, viewer) = viewer_over(two_cameras());

    assert!(viewer.toggle_fullscreen().unwrap());
    assert!(viewer.is_fullscreen());

    assert!(!viewer.toggle_fullscreen().unwrap());
    assert!(!viewer.is_fullscreen());
}

#[tokio::test]
async fn test_fullscreen_failure_surfaces_unknown() {
    let (_host, _sink, fs, viewer) = viewer_over(two_cameras());
    fs.fail_next(HostError::other("fullscreen denied"));

    let result = viewer.toggle_fullscreen();

    assert!(matches!(result.unwrap_err(), CameraError::Unknown { .. }));
    assert!(!viewer.is_fullscreen());
    assert!(matches!(
        viewer.last_error(),
        Some(CameraError::Unknown { .. })
    ));
}

// ============================================================================
// EVENTS
// ============================================================================

#[tokio::test]
async fn test_events_trace_the_startup_flow() {
    let (_host, _sink, _fs, viewer) = viewer_over(two_cameras());
    let mut events = viewer.events();

    viewer.start().await.unwrap();

    let first = tokio::time::timeout(Duration::from_secs(2), events.next())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(first, ViewerEvent::DevicesChanged { ref devices } if devices.len() == 2));

    let second = tokio::time::timeout(Duration::from_secs(2), events.next())
        .await
        .unwrap()
        .unwrap();
    assert!(
        matches!(second, ViewerEvent::StreamAttached { ref handle } if handle.device_id == "cam-a")
    );
}

#[tokio::test]
async fn test_clear_error_emits_event() {
    let (_host, _sink, fs, viewer) = viewer_over(two_cameras());
    fs.fail_next(HostError::other("fullscreen denied"));
    let _ = viewer.toggle_fullscreen();
    let mut events = viewer.events();

    viewer.clear_error();

    assert_eq!(viewer.last_error(), None);
    let event = tokio::time::timeout(Duration::from_secs(2), events.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.event_type(), "error_cleared");
}

// ============================================================================
// TEARDOWN
// ============================================================================

#[tokio::test]
async fn test_teardown_releases_everything_and_is_idempotent() {
    let (host, sink, _fs, viewer) = viewer_over(two_cameras());
    viewer.start().await.unwrap();
    let attached = viewer.active_stream().unwrap();

    viewer.teardown();
    viewer.teardown();

    assert_eq!(viewer.active_stream(), None);
    assert_eq!(sink.current(), None);
    let record = host
        .stream_records()
        .into_iter()
        .find(|r| r.handle.id == attached.id)
        .unwrap();
    assert!(record.is_stopped());
}
