//! Camera session lifecycle
//!
//! The session manager owns the single active capture stream: acquisition
//! under constraints, teardown of the previous stream before any new
//! acquisition, and classification of failures. Overlapping selections settle
//! last-writer-wins through a generation counter; a result arriving under a
//! stale generation is released on arrival and never attached.

use camview_core::{
    CameraError, CaptureStream, MediaHost, ResolutionProfile, StreamConstraints, StreamHandle,
    StreamSink,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Session manager events
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A stream was acquired and attached to the sink
    StreamAttached {
        /// Descriptor of the attached stream
        handle: StreamHandle,
    },
    /// A previously active stream was stopped and detached
    StreamReleased {
        /// Descriptor of the released stream
        handle: StreamHandle,
    },
    /// An acquisition failed; no stream is attached
    AcquisitionFailed {
        /// Device the acquisition targeted
        device_id: String,
        /// Classified failure
        error: CameraError,
    },
}

/// Counters over the lifetime of a session manager
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// Selections that reached the acquisition step
    pub acquisitions_started: u64,
    /// Streams that became the active stream
    pub streams_attached: u64,
    /// Streams stopped by teardown or replacement
    pub streams_released: u64,
    /// Acquisitions that completed under a stale generation and were discarded
    pub stale_discards: u64,
    /// Acquisitions that failed with a classified error
    pub failures: u64,
}

/// Result of an [`apply_selection`] call.
///
/// [`apply_selection`]: CameraSessionManager::apply_selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    /// The acquired stream is now the sole active stream
    Attached(StreamHandle),
    /// A newer selection arrived while this one was acquiring; any stream
    /// opened by this call was released without being attached
    Superseded,
}

struct SessionInner {
    generation: u64,
    selected_device_id: Option<String>,
    resolution: ResolutionProfile,
    active: Option<Box<dyn CaptureStream>>,
    last_error: Option<CameraError>,
    stats: SessionStats,
}

/// Owns the lifecycle of exactly one active capture stream at a time.
pub struct CameraSessionManager {
    host: Arc<dyn MediaHost>,
    sink: Arc<dyn StreamSink>,
    inner: Mutex<SessionInner>,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl CameraSessionManager {
    /// Create a session manager over the given host, rendering into `sink`.
    ///
    /// Starts with no selection and the default resolution profile.
    pub fn new(host: Arc<dyn MediaHost>, sink: Arc<dyn StreamSink>) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            host,
            sink,
            inner: Mutex::new(SessionInner {
                generation: 0,
                selected_device_id: None,
                resolution: ResolutionProfile::default(),
                active: None,
                last_error: None,
                stats: SessionStats::default(),
            }),
            event_tx,
        }
    }

    /// Swap the active stream for one matching the given device and
    /// resolution.
    ///
    /// The currently active stream (if any) is stopped before the new
    /// acquisition is requested; this ordering holds even when the new
    /// acquisition later fails. If a newer selection lands while this one is
    /// still acquiring, the newer one wins: this call's stream is released on
    /// arrival and `Ok(SelectionOutcome::Superseded)` is returned.
    pub async fn apply_selection(
        &self,
        device_id: &str,
        resolution: ResolutionProfile,
    ) -> Result<SelectionOutcome, CameraError> {
        let token = {
            let mut inner = self.inner.lock();
            inner.generation += 1;
            inner.selected_device_id = Some(device_id.to_string());
            inner.resolution = resolution;
            inner.stats.acquisitions_started += 1;
            // Teardown before acquire: two capture handles on the same
            // physical device is a platform error on most hosts.
            self.release_active(&mut inner);
            inner.generation
        };

        debug!(device_id, %resolution, "acquiring camera stream");
        let constraints = StreamConstraints::exact(device_id, resolution.dimensions());
        match self.host.acquire_stream(&constraints).await {
            Ok(stream) => {
                let handle = stream.handle();
                let mut inner = self.inner.lock();
                if inner.generation != token {
                    debug!(device_id, stream_id = %handle.id, "discarding superseded stream");
                    stream.stop();
                    inner.stats.stale_discards += 1;
                    return Ok(SelectionOutcome::Superseded);
                }
                inner.active = Some(stream);
                inner.last_error = None;
                inner.stats.streams_attached += 1;
                self.sink.attach(handle.clone());
                drop(inner);
                info!(device_id, stream_id = %handle.id, resolution = %handle.resolution, "camera stream attached");
                let _ = self.event_tx.send(SessionEvent::StreamAttached {
                    handle: handle.clone(),
                });
                Ok(SelectionOutcome::Attached(handle))
            }
            Err(err) => {
                let mut inner = self.inner.lock();
                if inner.generation != token {
                    inner.stats.stale_discards += 1;
                    return Ok(SelectionOutcome::Superseded);
                }
                let error = CameraError::from_acquire_failure(err);
                warn!(device_id, %error, "camera acquisition failed");
                inner.last_error = Some(error.clone());
                inner.stats.failures += 1;
                drop(inner);
                let _ = self.event_tx.send(SessionEvent::AcquisitionFailed {
                    device_id: device_id.to_string(),
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Re-apply the current resolution on a different device.
    pub async fn select_device(&self, device_id: &str) -> Result<SelectionOutcome, CameraError> {
        let resolution = self.inner.lock().resolution;
        self.apply_selection(device_id, resolution).await
    }

    /// Switch the target resolution.
    ///
    /// Re-acquires on the selected device, or just records the preference
    /// when no device is selected yet (`Ok(None)`).
    pub async fn select_resolution(
        &self,
        resolution: ResolutionProfile,
    ) -> Result<Option<SelectionOutcome>, CameraError> {
        let device_id = {
            let mut inner = self.inner.lock();
            inner.resolution = resolution;
            inner.selected_device_id.clone()
        };
        match device_id {
            Some(id) => self.apply_selection(&id, resolution).await.map(Some),
            None => Ok(None),
        }
    }

    /// Stop the active stream unconditionally.
    ///
    /// Idempotent; calling with no active stream is a no-op. Also invalidates
    /// any acquisition still in flight, so a result arriving after teardown
    /// is released instead of attached.
    pub fn teardown(&self) {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        self.release_active(&mut inner);
    }

    /// Currently selected device id, if any
    pub fn selected_device_id(&self) -> Option<String> {
        self.inner.lock().selected_device_id.clone()
    }

    /// Currently selected resolution profile
    pub fn resolution(&self) -> ResolutionProfile {
        self.inner.lock().resolution
    }

    /// Descriptor of the active stream, if one is attached
    pub fn active_stream(&self) -> Option<StreamHandle> {
        self.inner.lock().active.as_ref().map(|s| s.handle())
    }

    /// The currently surfaced error, if any
    pub fn last_error(&self) -> Option<CameraError> {
        self.inner.lock().last_error.clone()
    }

    /// Record a classified failure from a collaborator (e.g. a device
    /// refresh) as the surfaced error. The active stream is not touched.
    pub fn set_error(&self, error: CameraError) {
        self.inner.lock().last_error = Some(error);
    }

    /// Clear the surfaced error
    pub fn clear_error(&self) {
        self.inner.lock().last_error = None;
    }

    /// Lifetime counters
    pub fn stats(&self) -> SessionStats {
        self.inner.lock().stats.clone()
    }

    /// Subscribe to session events
    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    fn release_active(&self, inner: &mut SessionInner) {
        if let Some(stream) = inner.active.take() {
            let handle = stream.handle();
            stream.stop();
            self.sink.clear();
            inner.stats.streams_released += 1;
            debug!(stream_id = %handle.id, "released active stream");
            let _ = self.event_tx.send(SessionEvent::StreamReleased { handle });
        }
    }
}

impl Drop for CameraSessionManager {
    fn drop(&mut self) {
        self.teardown();
    }
}
