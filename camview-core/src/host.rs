//! Host capability seams
//!
//! The viewer consumes four capabilities from its host platform: device
//! enumeration, stream acquisition under constraints, a device topology
//! change notification, and fullscreen presentation. Each is a trait here so
//! the session logic stays testable against scripted backends, the same way
//! the capture machinery is kept behind a backend trait elsewhere in this
//! workspace.

use crate::video::{VideoDevice, VideoResolution};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

/// Constraint name reported by the host when the exact device id could not be
/// matched (device unplugged between selection and acquisition).
pub const DEVICE_ID_CONSTRAINT: &str = "device_id";

/// Raw failure reported by a host capability call.
///
/// This is deliberately close to the failure shape capture platforms actually
/// produce (a coarse kind plus a free-form message); classification into the
/// viewer's error taxonomy happens in [`crate::error::CameraError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("host {} failure: {message}", .kind.as_str())]
pub struct HostError {
    /// Coarse failure category
    pub kind: HostErrorKind,
    /// Platform-provided detail message
    pub message: String,
    /// Name of the violated constraint, for `Overconstrained` failures
    pub constraint: Option<String>,
}

impl HostError {
    /// The user or platform refused the capture permission
    pub fn not_allowed(message: impl Into<String>) -> Self {
        Self::new(HostErrorKind::NotAllowed, message)
    }

    /// No device satisfied the request
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(HostErrorKind::NotFound, message)
    }

    /// The device exists but could not be opened (busy, hardware fault)
    pub fn not_readable(message: impl Into<String>) -> Self {
        Self::new(HostErrorKind::NotReadable, message)
    }

    /// The platform aborted the operation
    pub fn aborted(message: impl Into<String>) -> Self {
        Self::new(HostErrorKind::Aborted, message)
    }

    /// A constraint could not be satisfied; `constraint` names the offender
    pub fn overconstrained(constraint: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: HostErrorKind::Overconstrained,
            message: message.into(),
            constraint: Some(constraint.into()),
        }
    }

    /// Any other host failure
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(HostErrorKind::Other, message)
    }

    /// Whether this is an `Overconstrained` failure on the exact device id
    pub fn violates_device_constraint(&self) -> bool {
        self.kind == HostErrorKind::Overconstrained
            && self.constraint.as_deref() == Some(DEVICE_ID_CONSTRAINT)
    }

    fn new(kind: HostErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            constraint: None,
        }
    }
}

/// Coarse host failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostErrorKind {
    /// Capture permission was refused
    NotAllowed,
    /// No matching device exists
    NotFound,
    /// Device present but unusable (already in use, hardware fault)
    NotReadable,
    /// A requested constraint could not be satisfied
    Overconstrained,
    /// The operation was aborted by the platform
    Aborted,
    /// Anything else
    Other,
}

impl HostErrorKind {
    /// Stable lowercase tag for log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            HostErrorKind::NotAllowed => "not_allowed",
            HostErrorKind::NotFound => "not_found",
            HostErrorKind::NotReadable => "not_readable",
            HostErrorKind::Overconstrained => "overconstrained",
            HostErrorKind::Aborted => "aborted",
            HostErrorKind::Other => "other",
        }
    }
}

/// Constraints passed to stream acquisition.
///
/// The device id is an exact-match constraint; the dimensions are ideal
/// hints the platform negotiates best-effort. A request with no device id and
/// no dimensions is the permission probe used to unlock device labels before
/// enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamConstraints {
    /// Exact device to open; `None` accepts any camera
    pub device_id: Option<String>,
    /// Ideal capture width in pixels
    pub ideal_width: Option<u32>,
    /// Ideal capture height in pixels
    pub ideal_height: Option<u32>,
}

impl StreamConstraints {
    /// Accept any camera at any resolution (permission probe)
    pub fn any() -> Self {
        Self {
            device_id: None,
            ideal_width: None,
            ideal_height: None,
        }
    }

    /// Exact device with ideal dimensions
    pub fn exact(device_id: impl Into<String>, resolution: VideoResolution) -> Self {
        Self {
            device_id: Some(device_id.into()),
            ideal_width: Some(resolution.width),
            ideal_height: Some(resolution.height),
        }
    }

    /// Whether this is the label-unlocking permission probe
    pub fn is_probe(&self) -> bool {
        self.device_id.is_none()
    }
}

/// Cheap, cloneable descriptor of a live capture stream.
///
/// The owning stream object stays with the session manager; sinks and events
/// only ever see this descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamHandle {
    /// Unique id of this acquisition
    pub id: Uuid,
    /// Device the stream was opened on
    pub device_id: String,
    /// Actual negotiated resolution, which may differ from the ideal request
    pub resolution: VideoResolution,
}

impl StreamHandle {
    /// Create a handle with a fresh id
    pub fn new(device_id: impl Into<String>, resolution: VideoResolution) -> Self {
        Self {
            id: Uuid::new_v4(),
            device_id: device_id.into(),
            resolution,
        }
    }
}

/// Notification that the set of attached capture devices changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceChange;

/// Capture capabilities consumed from the host platform
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// List the video input devices currently visible to the platform.
    ///
    /// Label availability may depend on a previously granted permission; the
    /// device directory handles that by probing first.
    async fn enumerate_devices(&self) -> Result<Vec<VideoDevice>, HostError>;

    /// Open a capture stream satisfying the given constraints.
    ///
    /// May suspend indefinitely while the platform waits on a user permission
    /// prompt; no timeout is imposed here.
    async fn acquire_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> Result<Box<dyn CaptureStream>, HostError>;

    /// Subscribe to device topology change notifications (hot-plug/unplug).
    fn device_changes(&self) -> broadcast::Receiver<DeviceChange>;
}

/// A live, exclusively owned capture stream
pub trait CaptureStream: Send + Sync + std::fmt::Debug {
    /// Descriptor for handing to sinks and events
    fn handle(&self) -> StreamHandle;

    /// Stop every track owned by this stream, releasing the capture device.
    fn stop(&self);
}

/// Fullscreen presentation capability of the host
pub trait FullscreenHost: Send + Sync {
    /// Request fullscreen presentation for the given surface
    fn request_fullscreen(&self, surface_id: &str) -> Result<(), HostError>;

    /// Leave fullscreen presentation
    fn exit_fullscreen(&self) -> Result<(), HostError>;

    /// Identity of the surface currently presented fullscreen, if any
    fn fullscreen_surface(&self) -> Option<String>;
}

/// Renderable surface that displays the active stream.
///
/// The sink holds a non-owning reference: it renders whatever handle it was
/// last given and must never stop or reconfigure the underlying tracks.
pub trait StreamSink: Send + Sync {
    /// Show the given stream
    fn attach(&self, handle: StreamHandle);

    /// Stop showing any stream
    fn clear(&self);

    /// Identity of this surface, for fullscreen bookkeeping
    fn surface_id(&self) -> String;
}
