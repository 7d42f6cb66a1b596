//! Viewer events for the presentation layer

use camview_core::{CameraError, ResolutionProfile, StreamHandle, VideoDevice};
use tokio::sync::broadcast;

/// Events the presentation layer can react to
#[derive(Debug, Clone)]
pub enum ViewerEvent {
    /// The device list was replaced by a refresh
    DevicesChanged {
        /// The new device snapshot, in enumeration order
        devices: Vec<VideoDevice>,
    },
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
    /// The target resolution changed
    ResolutionChanged {
        /// The new resolution profile
        resolution: ResolutionProfile,
    },
    /// Fullscreen presentation was entered or left
    FullscreenChanged {
        /// Whether the viewer surface is now fullscreen
        active: bool,
    },
    /// A classified error became the surfaced error
    ErrorRaised {
        /// The error to display
        error: CameraError,
    },
    /// The surfaced error was cleared
    ErrorCleared,
}

impl ViewerEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            ViewerEvent::DevicesChanged { .. } => "devices_changed",
            ViewerEvent::StreamAttached { .. } => "stream_attached",
            ViewerEvent::StreamReleased { .. } => "stream_released",
            ViewerEvent::ResolutionChanged { .. } => "resolution_changed",
            ViewerEvent::FullscreenChanged { .. } => "fullscreen_changed",
            ViewerEvent::ErrorRaised { .. } => "error_raised",
            ViewerEvent::ErrorCleared => "error_cleared",
        }
    }

    /// Check if this is a stream lifecycle event
    pub fn is_stream_event(&self) -> bool {
        matches!(
            self,
            ViewerEvent::StreamAttached { .. } | ViewerEvent::StreamReleased { .. }
        )
    }

    /// Check if this is an error-state event
    pub fn is_error_event(&self) -> bool {
        matches!(
            self,
            ViewerEvent::ErrorRaised { .. } | ViewerEvent::ErrorCleared
        )
    }

    /// Check if this is a device-list event
    pub fn is_device_event(&self) -> bool {
        matches!(self, ViewerEvent::DevicesChanged { .. })
    }
}

/// Stream of viewer events for async iteration
#[derive(Debug)]
pub struct EventStream {
    receiver: broadcast::Receiver<ViewerEvent>,
}

impl EventStream {
    /// Create a new event stream over a receiver
    pub fn new(receiver: broadcast::Receiver<ViewerEvent>) -> Self {
        Self { receiver }
    }

    /// Get the next event from the stream.
    ///
    /// Skips over lag gaps; returns `None` once the viewer is gone.
    pub async fn next(&mut self) -> Option<ViewerEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Try to get the next event without blocking
    pub fn try_next(&mut self) -> Option<ViewerEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}
