//! LSB-pattern detection via the zsteg CLI.

use super::{run_tool, Analyzer, MatchRule, RawOutput};
use crate::error::AnalyzerError;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

pub struct ZstegAnalyzer {
    tool_path: String,
    rule: MatchRule,
    timeout: Duration,
}

impl ZstegAnalyzer {
    pub fn new(tool_path: String, rule: MatchRule, timeout: Duration) -> Self {
        Self {
            tool_path,
            rule,
            timeout,
        }
    }
}

impl Analyzer for ZstegAnalyzer {
    fn name(&self) -> &'static str {
        "zsteg"
    }

    fn rule(&self) -> &MatchRule {
        &self.rule
    }

    fn analyze(&self, frame_path: &Path) -> Result<RawOutput, AnalyzerError> {
        let mut cmd = Command::new(&self.tool_path);
        cmd.arg("-a").arg(frame_path);

        let output = run_tool(&mut cmd, self.timeout)?;
        if output.success() {
            return Ok(output);
        }

        if output.combined().to_lowercase().contains("not supported") {
            return Err(AnalyzerError::NoData(format!(
                "unsupported file format: {}",
                frame_path.display()
            )));
        }

        Err(AnalyzerError::Internal(format!(
            "zsteg exited with {}: {}",
            output.exit_code.unwrap_or(-1),
            output.stderr.trim()
        )))
    }
}
