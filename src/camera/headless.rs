use std::net::IpAddr;

use async_trait::async_trait;
use reqwest::Url;

use super::{CameraProvider, ConstraintProfile, FocusMode, TrackTuning, VideoStream};

/// HTTPS anywhere, plain HTTP only on loopback hosts. Loopback means `localhost`,
/// a `.localhost` name, or a loopback IP literal.
pub fn is_secure_origin(origin: &str) -> bool {
    let Ok(url) = Url::parse(origin.trim()) else {
        return false;
    };
    match url.scheme() {
        "https" => true,
        "http" => url.host_str().map_or(false, is_loopback_host),
        _ => false,
    }
}

fn is_loopback_host(host: &str) -> bool {
    match host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>() {
        Ok(ip) => ip.is_loopback(),
        Err(_) => host == "localhost" || host.ends_with(".localhost"),
    }
}

/// Provider for environments with no camera device, e.g. a terminal.
#[derive(Debug, Clone)]
pub struct HeadlessCamera {
    origin: String,
}

impl HeadlessCamera {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
        }
    }
}

#[async_trait]
impl CameraProvider for HeadlessCamera {
    fn is_secure_context(&self) -> bool {
        is_secure_origin(&self.origin)
    }

    fn supports_capture(&self) -> bool {
        false
    }

    async fn request_stream(&self, _profile: &ConstraintProfile) -> anyhow::Result<VideoStream> {
        anyhow::bail!("no camera device")
    }

    fn focus_modes(&self, _stream: &VideoStream) -> Vec<FocusMode> {
        Vec::new()
    }

    async fn apply_tuning(&self, _stream: &VideoStream, _tuning: &TrackTuning) -> anyhow::Result<()> {
        Ok(())
    }

    fn stop_stream(&self, _stream: VideoStream) {}
}
