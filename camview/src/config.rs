//! Configuration types and defaults

use camview_core::ResolutionProfile;

/// Viewer configuration.
///
/// Nothing here is persisted: every run starts from these defaults (Full HD,
/// first enumerated device).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerConfig {
    /// Resolution applied until the user picks another one
    pub default_resolution: ResolutionProfile,
    /// React to hot-plug notifications with a full device refresh
    pub watch_device_changes: bool,
    /// Apply the first enumerated device automatically on startup
    pub auto_select_default: bool,
    /// Capacity of the viewer event channel
    pub event_capacity: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_resolution: ResolutionProfile::Fhd,
            watch_device_changes: true,
            auto_select_default: true,
            event_capacity: 100,
        }
    }
}
