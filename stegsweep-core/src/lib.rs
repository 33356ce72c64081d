//! Core library for detecting hidden data in video frames.
//!
//! A scan decomposes a video into still frames with ffmpeg, runs each frame
//! through external steganography analyzers (zsteg, steghide), and reduces
//! the per-frame signals into a single suspicion verdict: the video is
//! suspicious when the flagged fraction of frames exceeds a threshold.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use stegsweep_core::{scan_video, ScanConfig};
//! use std::path::Path;
//!
//! let mut config = ScanConfig::default();
//! config.threshold = 0.05;
//! config.validate().unwrap();
//!
//! let report = scan_video(Path::new("/path/to/video.mp4"), &config, None).unwrap();
//! println!("{report}");
//! ```

pub mod analyzers;
pub mod config;
pub mod error;
pub mod external;
pub mod report;
pub mod scan;
pub mod workspace;

// Re-exports for public API
pub use analyzers::{Analyzer, AnalyzerKind, MatchRule, RawOutput};
pub use config::{ScanConfig, ToolPaths};
pub use error::{AnalyzerError, CoreError, CoreResult};
pub use report::{FrameVerdict, ScanReport};
pub use scan::{
    scan_video, AnalyzerResult, AnalyzerStatus, CancellationToken, Frame, FrameFormat,
};
pub use workspace::Workspace;
