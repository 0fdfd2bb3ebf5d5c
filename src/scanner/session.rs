use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::decoder::{CancelHandle, CandidateSink, FrameDecoder};
use crate::camera::{self, CameraProvider, ConstraintProfile, Orientation, VideoStream};
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Scanning,
    LookingUp,
}

/// Lets a code through once; repeats of the last accepted code are ignored.
#[derive(Debug, Default, Clone)]
pub struct Debouncer {
    last_accepted: String,
}

impl Debouncer {
    pub fn accept(&mut self, decoded: &str) -> Option<String> {
        let code = decoded.trim();
        if code.is_empty() || code == self.last_accepted {
            return None;
        }
        self.last_accepted = code.to_string();
        Some(self.last_accepted.clone())
    }

    pub fn last_accepted(&self) -> &str {
        &self.last_accepted
    }

    pub fn reset(&mut self) {
        self.last_accepted.clear();
    }
}

/// Exclusive hold on the camera plus the decode subscription feeding it.
/// Camera and decoder are released on every exit path, `Drop` included.
pub struct ScanSession {
    id: Uuid,
    state: ScanState,
    debounce: Debouncer,
    orientation: Orientation,
    last_error: Option<String>,
    camera: Arc<dyn CameraProvider>,
    stream: Option<VideoStream>,
    decoding: Option<CancelHandle>,
    candidates: mpsc::UnboundedReceiver<String>,
    /// Newest frame seen while a lookup was running.
    pending: Option<String>,
}

impl ScanSession {
    #[instrument(skip_all)]
    pub async fn start(
        camera: Arc<dyn CameraProvider>,
        decoder: &dyn FrameDecoder,
        profiles: &[ConstraintProfile],
    ) -> AppResult<Self> {
        let stream = camera::negotiate(camera.as_ref(), profiles).await?;
        let (sink, candidates) = CandidateSink::channel();
        let decoding = decoder.start_decoding(&stream, sink);
        let id = Uuid::new_v4();
        info!(session_id = %id, stream_id = stream.id, "scan session started");

        Ok(Self {
            id,
            state: ScanState::Scanning,
            debounce: Debouncer::default(),
            orientation: stream.orientation(),
            last_error: None,
            camera,
            stream: Some(stream),
            decoding: Some(decoding),
            candidates,
            pending: None,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != ScanState::Idle
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn last_accepted(&self) -> &str {
        self.debounce.last_accepted()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    /// Waits for the next code that differs from the last accepted one and moves to
    /// `LookingUp`. `None` once the session is torn down or the decoder stops.
    pub async fn next_candidate(&mut self) -> Option<String> {
        while self.state == ScanState::Scanning {
            let raw = match self.pending.take() {
                Some(raw) => raw,
                None => self.candidates.recv().await?,
            };
            if let Some(code) = self.debounce.accept(&raw) {
                debug!(session_id = %self.id, %code, "candidate accepted");
                self.state = ScanState::LookingUp;
                return Some(code);
            }
        }
        None
    }

    /// Back to sampling after a lookup, unless the session was torn down meanwhile.
    /// Frames queued during the lookup collapse to the newest one.
    pub fn lookup_finished(&mut self) {
        if self.state != ScanState::LookingUp {
            return;
        }
        let mut skipped = 0usize;
        while let Ok(raw) = self.candidates.try_recv() {
            if self.pending.replace(raw).is_some() {
                skipped += 1;
            }
        }
        if skipped > 0 {
            debug!(session_id = %self.id, skipped, "dropped frames queued during lookup");
        }
        self.state = ScanState::Scanning;
    }

    pub fn teardown(&mut self) {
        if let Some(mut decoding) = self.decoding.take() {
            decoding.cancel();
        }
        if let Some(stream) = self.stream.take() {
            debug!(session_id = %self.id, stream_id = stream.id, "releasing camera");
            self.camera.stop_stream(stream);
        }
        self.candidates.close();
        self.pending = None;
        self.state = ScanState::Idle;
    }
}

impl Drop for ScanSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
