//! Fullscreen toggle
//!
//! Thin pass-through to the host's fullscreen capability with a boolean
//! state flag kept in sync with the host's reported fullscreen surface.

use camview_core::{CameraError, FullscreenHost};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Toggles fullscreen presentation for the viewer's render surface.
pub struct FullscreenController {
    host: Arc<dyn FullscreenHost>,
    active: AtomicBool,
}

impl FullscreenController {
    /// Create a controller over the given host capability
    pub fn new(host: Arc<dyn FullscreenHost>) -> Self {
        Self {
            host,
            active: AtomicBool::new(false),
        }
    }

    /// Enter fullscreen on `surface_id` if it is not the current fullscreen
    /// surface, leave fullscreen otherwise. Returns the new state.
    ///
    /// Host-signaled failures surface as [`CameraError::Unknown`] and leave
    /// the state flag untouched.
    pub fn toggle(&self, surface_id: &str) -> Result<bool, CameraError> {
        let entering = self.host.fullscreen_surface().as_deref() != Some(surface_id);
        let result = if entering {
            self.host.request_fullscreen(surface_id)
        } else {
            self.host.exit_fullscreen()
        };
        match result {
            Ok(()) => {
                self.active.store(entering, Ordering::SeqCst);
                debug!(surface_id, fullscreen = entering, "fullscreen toggled");
                Ok(entering)
            }
            Err(err) => {
                warn!(surface_id, %err, "fullscreen request failed");
                Err(CameraError::Unknown {
                    detail: err.message,
                })
            }
        }
    }

    /// Whether the viewer's surface is currently fullscreen
    pub fn is_fullscreen(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
