//! # Camview - Browser-Style Webcam Viewer Core
//!
//! Camview maintains exactly one live camera stream at a time behind the
//! surface a presentation layer renders: a device list with a default
//! selection, a Full HD / 4K resolution toggle, a classified error banner,
//! and a fullscreen flag. The host platform's capture and fullscreen
//! capabilities stay behind trait seams, so the whole lifecycle is testable
//! against scripted backends.
//!
//! ## Key Features
//!
//! - **One stream, always**: the previous stream is released before any new
//!   acquisition; overlapping selections settle last-writer-wins with
//!   guaranteed cleanup of superseded results
//! - **Hot-plug aware**: device topology notifications trigger a full
//!   refresh, with selection reconciliation at the facade
//! - **Classified errors**: every platform failure maps into a small,
//!   exhaustive error taxonomy with ready-made banner text
//! - **Host-agnostic**: capture, fullscreen, and rendering are trait seams;
//!   scriptable mocks ship in-tree
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use camview::{
//!     MockFullscreenHost, MockMediaHost, MockStreamSink, ResolutionProfile, VideoDevice,
//!     ViewerBuilder,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let host = Arc::new(MockMediaHost::with_devices(vec![VideoDevice::new(
//!         "cam-front",
//!         "Integrated Camera",
//!     )]));
//!     let viewer = ViewerBuilder::new(
//!         host,
//!         Arc::new(MockFullscreenHost::new()),
//!         Arc::new(MockStreamSink::new()),
//!     )
//!     .build();
//!
//!     // Enumerate cameras and attach the default device at Full HD
//!     viewer.start().await?;
//!
//!     // Switch to 4K and toggle fullscreen
//!     viewer.set_resolution(ResolutionProfile::Uhd4k).await?;
//!     viewer.toggle_fullscreen()?;
//!
//!     // React to viewer events
//!     let mut events = viewer.events();
//!     while let Some(event) = events.next().await {
//!         println!("viewer event: {:?}", event);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export core types for easy access
pub use camview_core::{
    CameraError, CaptureStream, DeviceChange, FullscreenHost, HostError, HostErrorKind, MediaHost,
    ResolutionProfile, StreamConstraints, StreamHandle, StreamSink, VideoDevice, VideoResolution,
};

pub use camview_media::{
    mock::{MockFullscreenHost, MockMediaHost, MockStreamSink},
    CameraSessionManager, DeviceDirectory, DeviceSnapshot, FullscreenController, SelectionOutcome,
    SessionEvent, SessionStats,
};

// Public API modules
pub mod config;
pub mod event;
pub mod viewer;

// Re-export main API types
pub use config::ViewerConfig;
pub use event::{EventStream, ViewerEvent};
pub use viewer::{ViewerBuilder, WebcamViewer};
