use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::{sync::mpsc, task::JoinHandle};

use crate::camera::VideoStream;

/// Samples frames of a stream and reports decoded text through the sink.
pub trait FrameDecoder: Send + Sync {
    fn start_decoding(&self, stream: &VideoStream, sink: CandidateSink) -> CancelHandle;
}

/// Where a decoder delivers raw decoded text. Emitting after cancellation is a no-op.
#[derive(Debug, Clone)]
pub struct CandidateSink {
    tx: mpsc::UnboundedSender<String>,
    stopped: Arc<AtomicBool>,
}

impl CandidateSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Self {
            tx,
            stopped: Arc::new(AtomicBool::new(false)),
        };
        (sink, rx)
    }

    /// Returns false once the subscription is cancelled or nobody is listening.
    pub fn emit(&self, text: &str) -> bool {
        if self.is_stopped() {
            return false;
        }
        self.tx.send(text.to_string()).is_ok()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst) || self.tx.is_closed()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            stopped: self.stopped.clone(),
            task: None,
        }
    }
}

/// Stops a decode subscription. `cancel` is synchronous and idempotent; dropping cancels too.
#[derive(Debug)]
pub struct CancelHandle {
    stopped: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl CancelHandle {
    /// Ties a sampling task to the handle so cancelling also aborts it.
    pub fn with_task(mut self, task: JoinHandle<()>) -> Self {
        self.task = Some(task);
        self
    }

    pub fn cancel(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Decoder that never reports anything. Stands in where no decoding backend exists.
#[derive(Debug, Default, Clone)]
pub struct NoopDecoder;

impl FrameDecoder for NoopDecoder {
    fn start_decoding(&self, _stream: &VideoStream, sink: CandidateSink) -> CancelHandle {
        sink.cancel_handle()
    }
}
