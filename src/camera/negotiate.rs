use tracing::{debug, info, instrument, warn};

use super::profiles::{ConstraintProfile, FULL_HD, SCAN_FRAME_RATE};
use super::{CameraProvider, FocusMode, TrackTuning, VideoStream};
use crate::error::{AppError, AppResult};

pub const INSECURE_CONTEXT: &str = "Camera requires HTTPS on mobile browsers.";
pub const NO_CAPTURE_SUPPORT: &str = "This browser does not support camera access.";
pub const CAMERA_DENIED: &str =
    "Unable to access camera. Check camera permission in browser settings.";

/// Starts the first profile the device accepts, then tunes it best-effort.
#[instrument(skip(provider, profiles), fields(profiles = profiles.len()))]
pub async fn negotiate(
    provider: &dyn CameraProvider,
    profiles: &[ConstraintProfile],
) -> AppResult<VideoStream> {
    if !provider.is_secure_context() {
        warn!("camera requested from insecure context");
        return Err(AppError::CameraUnavailable(INSECURE_CONTEXT.into()));
    }
    if !provider.supports_capture() {
        warn!("platform has no camera capture");
        return Err(AppError::CameraUnavailable(NO_CAPTURE_SUPPORT.into()));
    }

    for (index, profile) in profiles.iter().enumerate() {
        match provider.request_stream(profile).await {
            Ok(stream) => {
                info!(index, stream_id = stream.id, width = stream.width, height = stream.height, "camera started");
                tune_stream(provider, &stream).await;
                return Ok(stream);
            }
            Err(e) => debug!(index, error = %e, "constraint profile rejected"),
        }
    }

    warn!("every constraint profile failed");
    Err(AppError::CameraUnavailable(CAMERA_DENIED.into()))
}

/// Never fails: unsupported constraints are skipped.
pub async fn tune_stream(provider: &dyn CameraProvider, stream: &VideoStream) {
    let resolution = TrackTuning::Resolution {
        resolution: FULL_HD,
        frame_rate: SCAN_FRAME_RATE,
    };
    if let Err(e) = provider.apply_tuning(stream, &resolution).await {
        debug!(error = %e, "resolution tuning ignored");
    }

    let modes = provider.focus_modes(stream);
    let focus = if modes.contains(&FocusMode::Continuous) {
        FocusMode::Continuous
    } else if modes.contains(&FocusMode::SingleShot) {
        FocusMode::SingleShot
    } else {
        return;
    };

    if let Err(e) = provider.apply_tuning(stream, &TrackTuning::Focus(focus)).await {
        debug!(error = %e, ?focus, "focus tuning ignored");
    }
}
