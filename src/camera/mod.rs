//! Camera capability seam.
//!
//! Everything ambient about the device (secure origin, capture support, the stream itself) sits
//! behind [`CameraProvider`] so the scanner can run against a fake camera.

mod headless;
mod negotiate;
mod profiles;

use async_trait::async_trait;

pub use headless::{is_secure_origin, HeadlessCamera};
pub use negotiate::{negotiate, tune_stream, CAMERA_DENIED, INSECURE_CONTEXT, NO_CAPTURE_SUPPORT};
pub use profiles::{default_profiles, ConstraintProfile, Facing, FrameRate, Resolution};

/// A live capture stream. Not `Clone`: whoever holds it owns the device until
/// it goes back through [`CameraProvider::stop_stream`].
#[derive(Debug, PartialEq, Eq)]
pub struct VideoStream {
    pub id: u64,
    pub width: u32,
    pub height: u32,
}

impl VideoStream {
    pub fn orientation(&self) -> Orientation {
        Orientation::from_dimensions(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

impl Orientation {
    /// Unknown (zero) dimensions read as landscape.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width > 0 && height > width {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    /// Width over height of the preview surface.
    pub fn aspect_ratio(self) -> f64 {
        match self {
            Orientation::Portrait => 3.0 / 4.0,
            Orientation::Landscape => 4.0 / 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    Continuous,
    SingleShot,
    Manual,
}

/// Constraints applied to a running track after it starts.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackTuning {
    Resolution {
        resolution: Resolution,
        frame_rate: FrameRate,
    },
    Focus(FocusMode),
}

#[async_trait]
pub trait CameraProvider: Send + Sync {
    /// Camera access needs HTTPS (or localhost) on mobile browsers.
    fn is_secure_context(&self) -> bool;

    /// Whether the platform exposes camera capture at all.
    fn supports_capture(&self) -> bool;

    async fn request_stream(&self, profile: &ConstraintProfile) -> anyhow::Result<VideoStream>;

    fn focus_modes(&self, stream: &VideoStream) -> Vec<FocusMode>;

    async fn apply_tuning(&self, stream: &VideoStream, tuning: &TrackTuning) -> anyhow::Result<()>;

    /// Releases the device. Synchronous so teardown can run from `Drop`.
    fn stop_stream(&self, stream: VideoStream);
}
