//! Interactions with external command-line tools.
//!
//! Everything the scan shells out to lives behind this module: the ffmpeg
//! frame extractor, the bounded command runner used by analyzer adapters,
//! and a best-effort ffprobe wrapper for pre-scan diagnostics.

use crate::error::{CoreError, CoreResult};
use std::io;
use std::process::{Command, Stdio};

mod command;
pub mod ffmpeg;
mod media;

pub use command::{run_with_timeout, CommandError, CommandOutput};
pub use ffmpeg::extract_frames;
pub use media::probe_duration_secs;

/// Checks that a required external command exists and is executable.
///
/// Runs `<cmd> -version` and discards the output; only a failure to start
/// the process at all is treated as an error.
pub(crate) fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check for '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}
