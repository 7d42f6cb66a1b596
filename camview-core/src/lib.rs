//! # Camview Core
//!
//! Error taxonomy, device and resolution types, and the host capability seams
//! for the camview webcam viewer. This crate defines what the viewer needs
//! from the platform (device enumeration, stream acquisition, fullscreen
//! presentation) without committing to a concrete backend.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod host;
pub mod video;

// Re-export main types
pub use error::CameraError;
pub use host::{
    CaptureStream, DeviceChange, FullscreenHost, HostError, HostErrorKind, MediaHost,
    StreamConstraints, StreamHandle, StreamSink, DEVICE_ID_CONSTRAINT,
};
pub use video::{ResolutionProfile, VideoDevice, VideoResolution};
