//! Passphrase-protected payload probing via the steghide CLI.
//!
//! steghide exits non-zero both for "no embedded data" and for real faults.
//! Exit status 1 with readable output is the tool's documented negative
//! result and is returned as a successful (non-matching) RawOutput, not as
//! a failure.

use super::{run_tool, Analyzer, MatchRule, RawOutput};
use crate::error::AnalyzerError;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

pub struct SteghideAnalyzer {
    tool_path: String,
    rule: MatchRule,
    timeout: Duration,
}

impl SteghideAnalyzer {
    pub fn new(tool_path: String, rule: MatchRule, timeout: Duration) -> Self {
        Self {
            tool_path,
            rule,
            timeout,
        }
    }
}

impl Analyzer for SteghideAnalyzer {
    fn name(&self) -> &'static str {
        "steghide"
    }

    fn rule(&self) -> &MatchRule {
        &self.rule
    }

    fn analyze(&self, frame_path: &Path) -> Result<RawOutput, AnalyzerError> {
        let mut cmd = Command::new(&self.tool_path);
        // Empty passphrase keeps the probe non-interactive; without it the
        // tool blocks on a terminal prompt.
        cmd.args(["info", "-p", ""]).arg(frame_path);

        let output = run_tool(&mut cmd, self.timeout)?;
        if output.success() {
            return Ok(output);
        }

        let combined = output.combined().to_lowercase();
        if combined.contains("not supported") || combined.contains("unknown file format") {
            return Err(AnalyzerError::NoData(format!(
                "unsupported cover format: {}",
                frame_path.display()
            )));
        }

        // Status 1 is how steghide says "nothing extractable here".
        if output.exit_code == Some(1) {
            return Ok(output);
        }

        Err(AnalyzerError::Internal(format!(
            "steghide exited with {}: {}",
            output.exit_code.unwrap_or(-1),
            output.stderr.trim()
        )))
    }
}
