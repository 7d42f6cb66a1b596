//! Viewer facade and builder
//!
//! [`WebcamViewer`] wires the device directory, the camera session manager,
//! and the fullscreen controller together behind the surface the presentation
//! layer consumes: device list, selection, resolution, error banner,
//! fullscreen flag, and an event stream.

use crate::config::ViewerConfig;
use crate::event::{EventStream, ViewerEvent};
use camview_core::{
    CameraError, FullscreenHost, MediaHost, ResolutionProfile, StreamHandle, StreamSink,
    VideoDevice,
};
use camview_media::{
    CameraSessionManager, DeviceDirectory, DeviceSnapshot, FullscreenController, SelectionOutcome,
    SessionEvent, SessionStats,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Fluent builder for a [`WebcamViewer`]
pub struct ViewerBuilder {
    media_host: Arc<dyn MediaHost>,
    fullscreen_host: Arc<dyn FullscreenHost>,
    sink: Arc<dyn StreamSink>,
    config: ViewerConfig,
}

impl ViewerBuilder {
    /// Builder over the three host seams the viewer consumes: capture,
    /// fullscreen presentation, and the render surface.
    pub fn new(
        media_host: Arc<dyn MediaHost>,
        fullscreen_host: Arc<dyn FullscreenHost>,
        sink: Arc<dyn StreamSink>,
    ) -> Self {
        Self {
            media_host,
            fullscreen_host,
            sink,
            config: ViewerConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ViewerConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolution applied until the user picks another one
    pub fn default_resolution(mut self, resolution: ResolutionProfile) -> Self {
        self.config.default_resolution = resolution;
        self
    }

    /// Whether hot-plug notifications trigger a full device refresh
    pub fn watch_device_changes(mut self, watch: bool) -> Self {
        self.config.watch_device_changes = watch;
        self
    }

    /// Build the viewer with the current configuration
    pub fn build(self) -> WebcamViewer {
        let (event_tx, _) = broadcast::channel(self.config.event_capacity);
        let shared = Arc::new(ViewerShared {
            directory: DeviceDirectory::new(self.media_host.clone()),
            session: CameraSessionManager::new(self.media_host, self.sink.clone()),
            config: self.config,
            event_tx,
        });
        WebcamViewer {
            shared,
            fullscreen: FullscreenController::new(self.fullscreen_host),
            sink: self.sink,
            tasks: Mutex::new(Vec::new()),
        }
    }
}

/// State shared between the facade and its background tasks
struct ViewerShared {
    directory: DeviceDirectory,
    session: CameraSessionManager,
    config: ViewerConfig,
    event_tx: broadcast::Sender<ViewerEvent>,
}

impl ViewerShared {
    fn emit(&self, event: ViewerEvent) {
        let _ = self.event_tx.send(event);
    }

    /// Full device refresh followed by selection reconciliation.
    ///
    /// A failed refresh surfaces its classified error but never touches the
    /// active stream; only a selection change releases streams.
    async fn refresh_and_reconcile(&self) -> Result<DeviceSnapshot, CameraError> {
        match self.directory.refresh().await {
            Ok(snapshot) => {
                self.emit(ViewerEvent::DevicesChanged {
                    devices: snapshot.devices.clone(),
                });
                self.reconcile_selection(&snapshot).await;
                Ok(snapshot)
            }
            Err(error) => {
                self.session.set_error(error.clone());
                self.emit(ViewerEvent::ErrorRaised {
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Keep the current selection if it survived the refresh, otherwise fall
    /// back to the new default device and re-apply.
    async fn reconcile_selection(&self, snapshot: &DeviceSnapshot) {
        let selected = self.session.selected_device_id();
        let survived = selected
            .as_deref()
            .map(|id| snapshot.devices.iter().any(|d| d.device_id == id))
            .unwrap_or(false);
        if survived || !self.config.auto_select_default {
            return;
        }
        if let Some(default) = snapshot.default_selection() {
            debug!(device_id = %default.device_id, "falling back to the default device");
            // Acquisition failures are recorded by the session manager and
            // forwarded as events; nothing else to do here.
            let _ = self.session.select_device(&default.device_id).await;
        }
    }
}

/// Browser-style webcam viewer core.
///
/// Owns the device directory and the camera session manager, reacts to
/// hot-plug notifications, and exposes the state the presentation layer
/// renders. Built via [`ViewerBuilder`]; call [`start`](WebcamViewer::start)
/// to enumerate devices and attach the default camera.
pub struct WebcamViewer {
    shared: Arc<ViewerShared>,
    fullscreen: FullscreenController,
    sink: Arc<dyn StreamSink>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl WebcamViewer {
    /// Enumerate devices, attach the default camera at the configured
    /// resolution, and spawn the background tasks (session event forwarding
    /// and, if configured, the hot-plug watcher).
    ///
    /// A classified failure is recorded as the surfaced error and returned;
    /// the viewer stays usable either way and recovers on the next selection
    /// or hot-plug event.
    pub async fn start(&self) -> Result<(), CameraError> {
        info!("starting webcam viewer");
        self.spawn_tasks();

        // Record the configured resolution before the first acquisition. No
        // device is selected yet, so this never re-acquires.
        let _ = self
            .shared
            .session
            .select_resolution(self.shared.config.default_resolution)
            .await?;

        self.shared.refresh_and_reconcile().await.map(|_| ())
    }

    fn spawn_tasks(&self) {
        let mut tasks = self.tasks.lock();
        if !tasks.is_empty() {
            return;
        }

        // Bridge session events into viewer events.
        let mut session_events = self.shared.session.subscribe_events();
        let forward = self.shared.clone();
        tasks.push(tokio::spawn(async move {
            loop {
                match session_events.recv().await {
                    Ok(SessionEvent::StreamAttached { handle }) => {
                        forward.emit(ViewerEvent::StreamAttached { handle });
                    }
                    Ok(SessionEvent::StreamReleased { handle }) => {
                        forward.emit(ViewerEvent::StreamReleased { handle });
                    }
                    Ok(SessionEvent::AcquisitionFailed { error, .. }) => {
                        forward.emit(ViewerEvent::ErrorRaised { error });
                    }
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }));

        // Answer every topology notification with a full refresh.
        if self.shared.config.watch_device_changes {
            let mut changes = self.shared.directory.changes();
            let shared = self.shared.clone();
            tasks.push(tokio::spawn(async move {
                loop {
                    match changes.recv().await {
                        Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {
                            let _ = shared.refresh_and_reconcile().await;
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }));
        }
    }

    /// The current device snapshot, in platform enumeration order
    pub fn devices(&self) -> Vec<VideoDevice> {
        self.shared.directory.devices()
    }

    /// Currently selected device id, if any
    pub fn selected_device_id(&self) -> Option<String> {
        self.shared.session.selected_device_id()
    }

    /// Swap the active stream to the given device at the current resolution
    pub async fn select_device(&self, device_id: &str) -> Result<SelectionOutcome, CameraError> {
        self.shared.session.select_device(device_id).await
    }

    /// Currently selected resolution profile
    pub fn resolution(&self) -> ResolutionProfile {
        self.shared.session.resolution()
    }

    /// Switch the target resolution, re-acquiring on the selected device.
    ///
    /// With no device selected yet the preference is only recorded
    /// (`Ok(None)`); the first acquisition will use it.
    pub async fn set_resolution(
        &self,
        resolution: ResolutionProfile,
    ) -> Result<Option<SelectionOutcome>, CameraError> {
        let outcome = self.shared.session.select_resolution(resolution).await;
        // The preference is recorded even when the re-acquisition fails.
        self.shared
            .emit(ViewerEvent::ResolutionChanged { resolution });
        outcome
    }

    /// Re-enumerate devices and reconcile the selection against the result
    pub async fn refresh_devices(&self) -> Result<DeviceSnapshot, CameraError> {
        self.shared.refresh_and_reconcile().await
    }

    /// Descriptor of the active stream, if one is attached
    pub fn active_stream(&self) -> Option<StreamHandle> {
        self.shared.session.active_stream()
    }

    /// The currently surfaced error, if any
    pub fn last_error(&self) -> Option<CameraError> {
        self.shared.session.last_error()
    }

    /// Dismiss the surfaced error
    pub fn clear_error(&self) {
        self.shared.session.clear_error();
        self.shared.emit(ViewerEvent::ErrorCleared);
    }

    /// Whether the viewer surface is currently fullscreen
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_fullscreen()
    }

    /// Enter fullscreen on the render surface, or leave it if it is already
    /// fullscreen. Returns the new state; host-signaled failures surface as
    /// [`CameraError::Unknown`].
    pub fn toggle_fullscreen(&self) -> Result<bool, CameraError> {
        match self.fullscreen.toggle(&self.sink.surface_id()) {
            Ok(active) => {
                self.shared.emit(ViewerEvent::FullscreenChanged { active });
                Ok(active)
            }
            Err(error) => {
                self.shared.session.set_error(error.clone());
                self.shared.emit(ViewerEvent::ErrorRaised {
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Subscribe to viewer events
    pub fn events(&self) -> EventStream {
        EventStream::new(self.shared.event_tx.subscribe())
    }

    /// Lifetime counters of the underlying session manager
    pub fn stats(&self) -> SessionStats {
        self.shared.session.stats()
    }

    /// The active configuration
    pub fn config(&self) -> &ViewerConfig {
        &self.shared.config
    }

    /// Stop the background tasks and release the active stream.
    ///
    /// Idempotent; used when the owning view is destroyed. An acquisition
    /// still in flight is invalidated and its late result released.
    pub fn teardown(&self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        self.shared.session.teardown();
    }
}

impl Drop for WebcamViewer {
    fn drop(&mut self) {
        self.teardown();
    }
}
