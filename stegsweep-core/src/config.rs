use crate::analyzers::AnalyzerKind;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Configuration for one video scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Frames sampled per second of source video
    #[serde(default = "default_sampling_fps")]
    pub sampling_fps: f64,

    /// Flagged-frame fraction above which the video is declared suspicious
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Analyzers to run on every frame, in order
    #[serde(default = "default_analyzers")]
    pub analyzers: Vec<AnalyzerKind>,

    /// Timeout for a single analyzer invocation, in seconds
    #[serde(default = "default_analyzer_timeout_secs")]
    pub analyzer_timeout_secs: u64,

    /// Number of parallel analyzer workers
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Base directory for the frame workspace (system temp dir when unset)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// Locations of the external tools
    #[serde(default)]
    pub tools: ToolPaths,

    /// Per-analyzer overrides for the positive-detection keyword set.
    /// Analyzers keep their built-in keywords unless listed here.
    #[serde(default)]
    pub match_keywords: BTreeMap<AnalyzerKind, Vec<String>>,
}

/// Paths (or bare command names) of the external tools the scan shells out to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolPaths {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    #[serde(default = "default_zsteg")]
    pub zsteg: String,

    #[serde(default = "default_steghide")]
    pub steghide: String,
}

fn default_sampling_fps() -> f64 {
    3.0
}

fn default_threshold() -> f64 {
    0.05
}

fn default_analyzers() -> Vec<AnalyzerKind> {
    vec![AnalyzerKind::Zsteg, AnalyzerKind::Steghide]
}

fn default_analyzer_timeout_secs() -> u64 {
    30
}

fn default_max_workers() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(2)
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_zsteg() -> String {
    "zsteg".to_string()
}

fn default_steghide() -> String {
    "steghide".to_string()
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            zsteg: default_zsteg(),
            steghide: default_steghide(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            sampling_fps: default_sampling_fps(),
            threshold: default_threshold(),
            analyzers: default_analyzers(),
            analyzer_timeout_secs: default_analyzer_timeout_secs(),
            max_workers: default_max_workers(),
            temp_dir: None,
            tools: ToolPaths::default(),
            match_keywords: BTreeMap::new(),
        }
    }
}

impl ScanConfig {
    /// Validates the configuration, returning `CoreError::Config` on the
    /// first violated constraint.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.sampling_fps.is_finite() || self.sampling_fps <= 0.0 {
            return Err(CoreError::Config(format!(
                "sampling_fps must be a positive number, got {}",
                self.sampling_fps
            )));
        }
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(CoreError::Config(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        if self.analyzers.is_empty() {
            return Err(CoreError::Config(
                "at least one analyzer must be configured".to_string(),
            ));
        }
        if self.analyzer_timeout_secs == 0 {
            return Err(CoreError::Config(
                "analyzer_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.max_workers == 0 {
            return Err(CoreError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.sampling_fps, 3.0);
        assert_eq!(config.threshold, 0.05);
        assert_eq!(
            config.analyzers,
            vec![AnalyzerKind::Zsteg, AnalyzerKind::Steghide]
        );
    }

    #[test]
    fn rejects_non_positive_sampling_rate() {
        let mut config = ScanConfig::default();
        config.sampling_fps = 0.0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
        config.sampling_fps = -1.0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        let mut config = ScanConfig::default();
        config.threshold = 1.5;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
        config.threshold = -0.1;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn rejects_empty_analyzer_set_and_zero_workers() {
        let mut config = ScanConfig::default();
        config.analyzers.clear();
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));

        let mut config = ScanConfig::default();
        config.max_workers = 0;
        assert!(matches!(config.validate(), Err(CoreError::Config(_))));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ScanConfig = serde_json::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.tools.ffmpeg, "ffmpeg");
        assert!(config.match_keywords.is_empty());
    }
}
