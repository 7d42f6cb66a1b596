//! Viewer error taxonomy
//!
//! All failures surfaced to the presentation layer are classified into
//! [`CameraError`]. Raw host failures ([`HostError`]) are mapped here, in one
//! place, so the presentation-layer contract stays exhaustive and testable.

use crate::host::{HostError, HostErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Classified camera failure shown to the user, one at a time
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CameraError {
    /// The platform rejected the camera permission prompt
    #[error("camera access denied by the platform")]
    PermissionDenied,

    /// Enumeration produced zero video input devices
    #[error("no camera device found")]
    NoDeviceFound,

    /// The requested resolution/device combination is impossible
    #[error("requested resolution is not supported by the selected camera")]
    ConstraintUnsatisfiable,

    /// Acquisition failed for a reason tied to the specific device
    #[error("camera initialization failed: {detail}")]
    DeviceInitFailed {
        /// Platform-provided detail (device busy, disconnected, ...)
        detail: String,
    },

    /// Any other failure during permission request, enumeration, or acquisition
    #[error("unexpected camera error: {detail}")]
    Unknown {
        /// Detail message, if the platform provided one
        detail: String,
    },
}

impl CameraError {
    /// Classify a failure of the permission-unlocking probe or of device
    /// enumeration.
    pub fn from_probe_failure(err: HostError) -> Self {
        match err.kind {
            HostErrorKind::NotAllowed => CameraError::PermissionDenied,
            HostErrorKind::NotFound => CameraError::NoDeviceFound,
            HostErrorKind::NotReadable | HostErrorKind::Overconstrained | HostErrorKind::Aborted => {
                CameraError::DeviceInitFailed {
                    detail: err.message,
                }
            }
            HostErrorKind::Other => CameraError::Unknown {
                detail: err.message,
            },
        }
    }

    /// Classify a failure of a constrained stream acquisition.
    ///
    /// An overconstrained failure on the exact device id means the device
    /// disappeared between selection and acquisition; that is a device
    /// failure, not an impossible resolution.
    pub fn from_acquire_failure(err: HostError) -> Self {
        match err.kind {
            HostErrorKind::NotAllowed => CameraError::PermissionDenied,
            HostErrorKind::Overconstrained => {
                if err.violates_device_constraint() {
                    CameraError::DeviceInitFailed {
                        detail: err.message,
                    }
                } else {
                    CameraError::ConstraintUnsatisfiable
                }
            }
            HostErrorKind::NotFound | HostErrorKind::NotReadable | HostErrorKind::Aborted => {
                CameraError::DeviceInitFailed {
                    detail: err.message,
                }
            }
            HostErrorKind::Other => CameraError::Unknown {
                detail: err.message,
            },
        }
    }

    /// Stable tag for the presentation layer
    pub fn kind(&self) -> &'static str {
        match self {
            CameraError::PermissionDenied => "permission_denied",
            CameraError::NoDeviceFound => "no_device_found",
            CameraError::ConstraintUnsatisfiable => "constraint_unsatisfiable",
            CameraError::DeviceInitFailed { .. } => "device_init_failed",
            CameraError::Unknown { .. } => "unknown",
        }
    }

    /// Banner text for the presentation layer
    pub fn user_message(&self) -> String {
        match self {
            CameraError::PermissionDenied => {
                "Camera access was denied. Allow camera access in your browser or OS settings."
                    .to_string()
            }
            CameraError::NoDeviceFound => {
                "No camera was found. Check that a camera is connected.".to_string()
            }
            CameraError::ConstraintUnsatisfiable => {
                "The selected resolution is not supported by this camera.".to_string()
            }
            CameraError::DeviceInitFailed { detail } => {
                format!("Failed to start the camera: {}", detail)
            }
            CameraError::Unknown { detail } if detail.is_empty() => {
                "An unexpected camera error occurred.".to_string()
            }
            CameraError::Unknown { detail } => {
                format!("An unexpected camera error occurred: {}", detail)
            }
        }
    }
}
