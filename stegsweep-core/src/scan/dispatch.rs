//! Applies every configured analyzer to every extracted frame.
//!
//! Results are keyed by frame ordinal, so the report's ordering never
//! depends on worker completion order. A single failing invocation is
//! recorded in place and never aborts the scan.

use super::{AnalyzerResult, AnalyzerStatus, CancellationToken, Frame};
use crate::analyzers::Analyzer;
use crate::error::{CoreError, CoreResult};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::time::Instant;

/// Per-frame result table, one entry per (frame ordinal, analyzer) pair.
pub type ResultTable = BTreeMap<u32, Vec<AnalyzerResult>>;

/// Runs every analyzer once against every frame on a bounded worker pool.
///
/// Frames skipped due to cancellation are simply absent from the table; the
/// coordinator turns an observed cancellation into `CoreError::Cancelled`.
pub fn dispatch(
    frames: &[Frame],
    analyzers: &[Box<dyn Analyzer>],
    max_workers: usize,
    cancel: &CancellationToken,
) -> CoreResult<ResultTable> {
    if frames.is_empty() {
        return Ok(ResultTable::new());
    }

    let workers = max_workers.max(1).min(frames.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| CoreError::Other(format!("failed to build worker pool: {e}")))?;

    log::debug!(
        "Dispatching {} frames across {} workers ({} analyzers each)",
        frames.len(),
        workers,
        analyzers.len()
    );

    let per_frame: Vec<(u32, Vec<AnalyzerResult>)> = pool.install(|| {
        frames
            .par_iter()
            .filter_map(|frame| {
                if cancel.is_cancelled() {
                    return None;
                }
                Some((frame.index, scan_frame(frame, analyzers)))
            })
            .collect()
    });

    Ok(per_frame.into_iter().collect())
}

/// Runs each analyzer exactly once against a single frame.
fn scan_frame(frame: &Frame, analyzers: &[Box<dyn Analyzer>]) -> Vec<AnalyzerResult> {
    analyzers
        .iter()
        .map(|analyzer| {
            log::debug!("Scanning frame {} with {}", frame.index, analyzer.name());
            let started = Instant::now();
            let status = match analyzer.analyze(&frame.path) {
                Ok(raw) => AnalyzerStatus::Ok(raw),
                Err(err) => {
                    log::warn!(
                        "{} failed on frame {}: {}",
                        analyzer.name(),
                        frame.index,
                        err
                    );
                    AnalyzerStatus::Failed(err)
                }
            };
            AnalyzerResult {
                analyzer_name: analyzer.name().to_string(),
                frame_index: frame.index,
                status,
                elapsed: started.elapsed(),
            }
        })
        .collect()
}
