//! Device directory
//!
//! Discovers the video input devices visible to the host and designates a
//! default selection. Some platforms withhold human-readable labels until a
//! capture permission has been granted, so every refresh opens a short-lived
//! probe stream and releases it again before returning; the probe is never
//! attached to a sink.

use camview_core::{CameraError, DeviceChange, MediaHost, StreamConstraints, VideoDevice};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Result of a successful refresh: the replacement device list, in platform
/// enumeration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSnapshot {
    /// Devices in enumeration order; never empty for a successful refresh
    pub devices: Vec<VideoDevice>,
}

impl DeviceSnapshot {
    /// The default selection: the first device in enumeration order.
    pub fn default_selection(&self) -> Option<&VideoDevice> {
        self.devices.first()
    }
}

/// Produces the current camera list and reacts to hot-plug events.
///
/// The directory only discovers devices; it never touches the active capture
/// stream. Reconciling a selection that a refresh invalidated is the
/// consumer's job.
pub struct DeviceDirectory {
    host: Arc<dyn MediaHost>,
    snapshot: RwLock<Vec<VideoDevice>>,
}

impl DeviceDirectory {
    /// Create a directory over the given host
    pub fn new(host: Arc<dyn MediaHost>) -> Self {
        Self {
            host,
            snapshot: RwLock::new(Vec::new()),
        }
    }

    /// Re-enumerate the available cameras, replacing the snapshot wholesale.
    ///
    /// Idempotent and callable at any time. On any failure the snapshot is
    /// replaced with an empty list and the classified error is returned; no
    /// retry is performed here.
    pub async fn refresh(&self) -> Result<DeviceSnapshot, CameraError> {
        debug!("refreshing device directory");

        // Probe capture to unlock device labels. Held open across the
        // enumeration, stopped before this function returns.
        let probe = match self.host.acquire_stream(&StreamConstraints::any()).await {
            Ok(stream) => stream,
            Err(err) => {
                *self.snapshot.write() = Vec::new();
                let error = CameraError::from_probe_failure(err);
                warn!(%error, "permission probe failed");
                return Err(error);
            }
        };

        let enumerated = self.host.enumerate_devices().await;
        probe.stop();

        let raw = match enumerated {
            Ok(devices) => devices,
            Err(err) => {
                *self.snapshot.write() = Vec::new();
                let error = CameraError::from_probe_failure(err);
                warn!(%error, "device enumeration failed");
                return Err(error);
            }
        };

        let devices: Vec<VideoDevice> = raw
            .into_iter()
            .map(|d| VideoDevice::with_fallback_label(d.device_id, Some(d.label)))
            .collect();

        *self.snapshot.write() = devices.clone();

        if devices.is_empty() {
            warn!("enumeration returned no video inputs");
            return Err(CameraError::NoDeviceFound);
        }

        info!(count = devices.len(), "device directory refreshed");
        Ok(DeviceSnapshot { devices })
    }

    /// The current snapshot (empty until the first successful refresh)
    pub fn devices(&self) -> Vec<VideoDevice> {
        self.snapshot.read().clone()
    }

    /// Whether the snapshot contains the given device id
    pub fn contains(&self, device_id: &str) -> bool {
        self.snapshot
            .read()
            .iter()
            .any(|d| d.device_id == device_id)
    }

    /// Subscribe to host device topology notifications.
    ///
    /// Each notification should be answered with a full [`refresh`], not an
    /// incremental diff.
    ///
    /// [`refresh`]: DeviceDirectory::refresh
    pub fn changes(&self) -> broadcast::Receiver<DeviceChange> {
        self.host.device_changes()
    }
}
