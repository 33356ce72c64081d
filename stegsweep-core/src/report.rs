//! Scan reports: the only artifact that outlives a scan.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Per-frame classification derived from that frame's analyzer results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameVerdict {
    /// 1-based frame ordinal
    pub frame_index: u32,
    pub flagged: bool,
    /// Names of the analyzers whose output matched, in configured order
    pub reasons: Vec<String>,
}

/// Final verdict for one scanned video. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    pub suspicious: bool,
    pub threshold: f64,
    pub total_frames: usize,
    /// Flagged frame ordinals, ascending
    pub flagged_frames: Vec<u32>,
    pub per_frame: BTreeMap<u32, FrameVerdict>,
    /// Count of analyzer invocations that failed (timeout/internal/no-data)
    pub analyzer_failures: usize,
}

impl ScanReport {
    /// Report for a scan that produced no frames to analyze.
    pub fn empty(threshold: f64) -> Self {
        Self {
            suspicious: false,
            threshold,
            total_frames: 0,
            flagged_frames: Vec::new(),
            per_frame: BTreeMap::new(),
            analyzer_failures: 0,
        }
    }

    /// Fraction of frames flagged; 0.0 for an empty scan.
    pub fn flagged_ratio(&self) -> f64 {
        if self.total_frames == 0 {
            0.0
        } else {
            self.flagged_frames.len() as f64 / self.total_frames as f64
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Suspicious:        {}",
            if self.suspicious { "YES" } else { "no" }
        )?;
        writeln!(
            f,
            "Flagged frames:    {} / {} (threshold {:.0}%)",
            self.flagged_frames.len(),
            self.total_frames,
            self.threshold * 100.0
        )?;
        if !self.flagged_frames.is_empty() {
            let ordinals: Vec<String> =
                self.flagged_frames.iter().map(|n| n.to_string()).collect();
            writeln!(f, "Flagged ordinals:  {}", ordinals.join(", "))?;
        }
        if self.analyzer_failures > 0 {
            writeln!(
                f,
                "Analyzer failures: {} (verdict may be degraded)",
                self.analyzer_failures
            )?;
        }
        Ok(())
    }
}
