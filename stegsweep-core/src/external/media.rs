//! Media probing via ffprobe, used for pre-scan diagnostics.

use std::path::Path;

/// Duration of the input in seconds, when ffprobe can determine it.
///
/// Best effort only: a missing ffprobe binary or an unreadable container is
/// logged at debug level and the scan proceeds without the estimate.
pub fn probe_duration_secs(input_path: &Path) -> Option<f64> {
    match ffprobe::ffprobe(input_path) {
        Ok(metadata) => metadata
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok()),
        Err(err) => {
            log::debug!("ffprobe failed for {}: {:?}", input_path.display(), err);
            None
        }
    }
}
