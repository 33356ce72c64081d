use thiserror::Error;

/// Custom error types for stegsweep.
///
/// These are the fatal errors: any of them aborts the scan (after the frame
/// workspace has been released). Per-analyzer failures are the separate,
/// non-fatal [`AnalyzerError`].
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workspace error: {0}")]
    Resource(String),

    #[error("Frame extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("External dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, std::io::Error),

    #[error("Scan cancelled")]
    Cancelled,

    #[error("Unexpected error: {0}")]
    Other(String),
}

/// Result type for stegsweep operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Non-fatal failure of a single analyzer invocation.
///
/// Recorded in the per-frame result table and tallied in the report's
/// `analyzer_failures` count; never aborts the scan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    #[error("analyzer timed out after {0}s")]
    Timeout(u64),

    #[error("analyzer fault: {0}")]
    Internal(String),

    #[error("file not analyzable: {0}")]
    NoData(String),
}
