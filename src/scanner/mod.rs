mod decoder;
mod session;

#[cfg(test)]
pub(crate) use decoder::fake;
pub use decoder::{CancelHandle, CandidateSink, FrameDecoder, NoopDecoder};
pub use session::{Debouncer, ScanSession, ScanState};
