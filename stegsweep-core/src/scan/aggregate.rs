//! Reduces per-frame analyzer results into the final suspicion verdict.

use super::{AnalyzerStatus, ResultTable};
use crate::analyzers::MatchRule;
use crate::report::{FrameVerdict, ScanReport};
use std::collections::BTreeMap;

/// Pure reduction from a fixed result table to a [`ScanReport`].
///
/// A frame is flagged when at least one successful analyzer result matches
/// that analyzer's rule. Failed results contribute no flag (absence of
/// evidence, not evidence of absence) but are tallied so the caller can
/// judge how degraded the verdict is. Running this twice over the same
/// table yields an identical report.
pub fn aggregate(
    results: &ResultTable,
    total_frames: usize,
    threshold: f64,
    rules: &BTreeMap<String, MatchRule>,
) -> ScanReport {
    let mut per_frame = BTreeMap::new();
    let mut flagged_frames = Vec::new();
    let mut analyzer_failures = 0usize;

    for (&frame_index, frame_results) in results {
        let mut reasons = Vec::new();
        for result in frame_results {
            match &result.status {
                AnalyzerStatus::Ok(raw) => {
                    let matched = rules
                        .get(&result.analyzer_name)
                        .map(|rule| rule.matches(&raw.combined()))
                        .unwrap_or(false);
                    if matched {
                        reasons.push(result.analyzer_name.clone());
                    }
                }
                AnalyzerStatus::Failed(_) => analyzer_failures += 1,
            }
        }

        let flagged = !reasons.is_empty();
        if flagged {
            // BTreeMap iteration is ascending, so this stays sorted.
            flagged_frames.push(frame_index);
        }
        per_frame.insert(
            frame_index,
            FrameVerdict {
                frame_index,
                flagged,
                reasons,
            },
        );
    }

    // An empty scan is never suspicious, whatever the threshold.
    let suspicious = if total_frames == 0 {
        false
    } else {
        flagged_frames.len() as f64 / total_frames as f64 > threshold
    };

    ScanReport {
        suspicious,
        threshold,
        total_frames,
        flagged_frames,
        per_frame,
        analyzer_failures,
    }
}
