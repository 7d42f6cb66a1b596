//! Device and resolution types shared across the viewer
//!
//! These are the data types handed to the presentation layer: the device
//! snapshot produced by enumeration and the fixed set of target resolutions
//! the viewer offers.

use serde::{Deserialize, Serialize};

/// A video input device as reported by the host platform.
///
/// The `device_id` is an opaque handle; it is passed back verbatim when
/// acquiring a stream and carries no meaning beyond identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDevice {
    /// Opaque device identifier from platform enumeration
    pub device_id: String,
    /// Human-readable device name
    pub label: String,
}

impl VideoDevice {
    /// Create a device entry with an explicit label
    pub fn new(device_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            label: label.into(),
        }
    }

    /// Create a device entry, synthesizing a label from the id prefix when the
    /// platform withholds one (some platforms return empty labels until a
    /// capture permission has been granted).
    pub fn with_fallback_label(device_id: impl Into<String>, label: Option<String>) -> Self {
        let device_id = device_id.into();
        let label = match label.filter(|l| !l.is_empty()) {
            Some(label) => label,
            None => {
                let prefix: String = device_id.chars().take(4).collect();
                format!("Camera {}...", prefix)
            }
        };
        Self { device_id, label }
    }
}

/// Target resolution presets offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResolutionProfile {
    /// Full HD, 1920x1080
    #[default]
    Fhd,
    /// 4K UHD, 3840x2160
    Uhd4k,
}

impl ResolutionProfile {
    /// All selectable profiles, in menu order
    pub const ALL: [ResolutionProfile; 2] = [ResolutionProfile::Fhd, ResolutionProfile::Uhd4k];

    /// The ideal capture dimensions this profile requests.
    ///
    /// These are advisory: the camera may negotiate a different actual
    /// resolution without that counting as a failure.
    pub const fn dimensions(self) -> VideoResolution {
        match self {
            ResolutionProfile::Fhd => VideoResolution::FULL_HD,
            ResolutionProfile::Uhd4k => VideoResolution::UHD_4K,
        }
    }

    /// Short button label ("FHD" / "4K")
    pub const fn short_label(self) -> &'static str {
        match self {
            ResolutionProfile::Fhd => "FHD",
            ResolutionProfile::Uhd4k => "4K",
        }
    }

    /// Dimension string for status display ("1920x1080" / "3840x2160")
    pub fn dimension_label(self) -> String {
        let dims = self.dimensions();
        format!("{}x{}", dims.width, dims.height)
    }
}

impl std::fmt::Display for ResolutionProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_label())
    }
}

/// Video resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoResolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl VideoResolution {
    /// Create a resolution from explicit dimensions
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 1920x1080
    pub const FULL_HD: Self = Self::new(1920, 1080);
    /// 3840x2160
    pub const UHD_4K: Self = Self::new(3840, 2160);

    /// Total pixel count
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Width / height ratio
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

impl std::fmt::Display for VideoResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
