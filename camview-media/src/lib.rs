//! # Camview Media
//!
//! Device discovery and camera session lifecycle for the camview webcam
//! viewer. The [`DeviceDirectory`] produces the current camera list and a
//! default selection; the [`CameraSessionManager`] owns the single active
//! capture stream, swapping it as the selected device or resolution changes
//! and always releasing the previous stream first.

#![warn(clippy::all)]

pub mod directory;
pub mod fullscreen;
pub mod mock;
pub mod session;

// Re-export main types
pub use directory::{DeviceDirectory, DeviceSnapshot};
pub use fullscreen::FullscreenController;
pub use session::{CameraSessionManager, SelectionOutcome, SessionEvent, SessionStats};
