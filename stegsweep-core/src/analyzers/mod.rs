//! Analyzer adapters for external steganography tools.
//!
//! Every analyzer wraps one external executable behind the same contract:
//! run against a single frame file, return the captured output. Invocations
//! are stateless, apply a bounded timeout, and convert every fault into a
//! non-fatal [`AnalyzerError`] so one bad frame or one wedged tool never
//! takes down the scan.

use crate::config::ScanConfig;
use crate::error::AnalyzerError;
use crate::external::{run_with_timeout, CommandError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;
use std::time::Duration;

mod steghide;
mod zsteg;

pub use steghide::SteghideAnalyzer;
pub use zsteg::ZstegAnalyzer;

/// Raw captured output of one analyzer invocation.
pub use crate::external::CommandOutput as RawOutput;

/// Identifiers for the analyzers shipped with the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// LSB-pattern detector (zsteg)
    Zsteg,
    /// Passphrase-protected payload probe (steghide)
    Steghide,
}

impl AnalyzerKind {
    pub fn name(self) -> &'static str {
        match self {
            AnalyzerKind::Zsteg => "zsteg",
            AnalyzerKind::Steghide => "steghide",
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnalyzerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zsteg" => Ok(AnalyzerKind::Zsteg),
            "steghide" => Ok(AnalyzerKind::Steghide),
            other => Err(format!("unknown analyzer '{other}'")),
        }
    }
}

/// Keyword set that marks an analyzer's output as a positive detection.
///
/// Matching is a case-insensitive substring test over the tool's combined
/// stdout/stderr. The per-analyzer defaults live in [`default_rule`] and can
/// be overridden through `ScanConfig::match_keywords`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRule {
    keywords: Vec<String>,
}

impl MatchRule {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// True when any keyword occurs in `raw` (case-insensitive).
    pub fn matches(&self, raw: &str) -> bool {
        let haystack = raw.to_lowercase();
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }
}

/// Uniform contract over external detection tools.
///
/// Implementations must be stateless between invocations: no ordering
/// assumptions, no per-frame state carried across calls.
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Positive-detection pattern applied to this analyzer's raw output.
    fn rule(&self) -> &MatchRule;

    /// Runs the tool against one frame file.
    fn analyze(&self, frame_path: &Path) -> Result<RawOutput, AnalyzerError>;
}

/// Default positive-detection keywords per analyzer.
///
/// The zsteg keyword is kept as the single word the historical heuristic
/// grepped for; the steghide set matches the `steghide info` lines printed
/// only when an extractable payload exists.
pub fn default_rule(kind: AnalyzerKind) -> MatchRule {
    match kind {
        AnalyzerKind::Zsteg => MatchRule::new(["detected"]),
        AnalyzerKind::Steghide => MatchRule::new(["embedded file", "embedded data"]),
    }
}

/// Builds the configured analyzer set, applying any keyword overrides.
pub fn build_analyzers(config: &ScanConfig) -> Vec<Box<dyn Analyzer>> {
    let timeout = Duration::from_secs(config.analyzer_timeout_secs);
    config
        .analyzers
        .iter()
        .map(|&kind| {
            let rule = config
                .match_keywords
                .get(&kind)
                .map(|kw| MatchRule::new(kw.iter().cloned()))
                .unwrap_or_else(|| default_rule(kind));
            match kind {
                AnalyzerKind::Zsteg => Box::new(ZstegAnalyzer::new(
                    config.tools.zsteg.clone(),
                    rule,
                    timeout,
                )) as Box<dyn Analyzer>,
                AnalyzerKind::Steghide => Box::new(SteghideAnalyzer::new(
                    config.tools.steghide.clone(),
                    rule,
                    timeout,
                )),
            }
        })
        .collect()
}

/// Shared invocation path: bounded execution with command-level errors
/// mapped into the analyzer failure taxonomy.
pub(crate) fn run_tool(cmd: &mut Command, timeout: Duration) -> Result<RawOutput, AnalyzerError> {
    run_with_timeout(cmd, timeout).map_err(|e| match e {
        CommandError::Timeout(d) => AnalyzerError::Timeout(d.as_secs()),
        CommandError::Io(e) => AnalyzerError::Internal(e.to_string()),
    })
}
