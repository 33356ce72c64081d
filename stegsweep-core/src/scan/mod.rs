//! The frame scan pipeline: extraction, dispatch, aggregation.

use crate::analyzers::RawOutput;
use crate::error::AnalyzerError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod aggregate;
mod coordinator;
mod dispatch;

pub use aggregate::aggregate;
pub use coordinator::scan_video;
pub use dispatch::{dispatch, ResultTable};

/// One still image sampled from the video.
///
/// Immutable once extracted; `index` is the 1-based position in sampling
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub index: u32,
    pub path: PathBuf,
    pub format: FrameFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    Png,
}

/// Outcome of one (analyzer, frame) invocation.
#[derive(Debug, Clone)]
pub struct AnalyzerResult {
    pub analyzer_name: String,
    pub frame_index: u32,
    pub status: AnalyzerStatus,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub enum AnalyzerStatus {
    Ok(RawOutput),
    Failed(AnalyzerError),
}

/// Cooperative cancellation signal for an in-flight scan.
///
/// Clones share the same flag. The dispatcher checks it before starting each
/// frame; the coordinator checks it between stages. Cancellation still runs
/// the workspace teardown.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}
