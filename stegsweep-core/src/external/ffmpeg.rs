//! Frame extraction via ffmpeg.
//!
//! One ffmpeg invocation samples the video at the configured rate and writes
//! zero-padded PNGs (`frame_0001.png`, ...) into the workspace, so a plain
//! lexicographic listing recovers the frames in temporal order.

use crate::error::{CoreError, CoreResult};
use crate::scan::{Frame, FrameFormat};
use std::io;
use std::path::Path;
use std::process::Command;

pub const FRAME_PREFIX: &str = "frame_";
pub const FRAME_EXTENSION: &str = "png";

/// Extracts frames from `video_path` into `workspace_root` at `sampling_fps`.
///
/// A non-zero ffmpeg exit is fatal (`ExtractionFailed`). A successful run
/// that produced no frame files is a valid empty extraction: a video shorter
/// than the sampling interval simply yields nothing to analyze.
pub fn extract_frames(
    ffmpeg: &str,
    video_path: &Path,
    workspace_root: &Path,
    sampling_fps: f64,
) -> CoreResult<Vec<Frame>> {
    let pattern = workspace_root.join(format!("{FRAME_PREFIX}%04d.{FRAME_EXTENSION}"));
    log::info!(
        "Extracting frames from {} at {} fps",
        video_path.display(),
        sampling_fps
    );

    let mut cmd = Command::new(ffmpeg);
    cmd.arg("-hide_banner")
        .args(["-loglevel", "error"])
        .arg("-i")
        .arg(video_path)
        .args(["-vf", &format!("fps={sampling_fps}")])
        .arg(&pattern);
    log::debug!("Running command: {:?}", cmd);

    let output = cmd.output().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            CoreError::DependencyNotFound(ffmpeg.to_string())
        } else {
            CoreError::CommandStart(ffmpeg.to_string(), e)
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CoreError::ExtractionFailed(format!(
            "ffmpeg exited with {}: {}",
            output.status.code().unwrap_or(-1),
            stderr.trim()
        )));
    }

    let frames = collect_frames(workspace_root)?;
    log::info!("Extracted {} frames", frames.len());
    Ok(frames)
}

/// Recovers the frame sequence from the workspace directory listing.
fn collect_frames(workspace_root: &Path) -> CoreResult<Vec<Frame>> {
    let mut frames = Vec::new();
    for entry in std::fs::read_dir(workspace_root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if let Some(index) = parse_frame_ordinal(&name) {
            frames.push(Frame {
                index,
                path: entry.path(),
                format: FrameFormat::Png,
            });
        }
    }
    frames.sort_by_key(|f| f.index);

    // Ordinals must be exactly 1..=n; a gap means a partial extraction.
    for (pos, frame) in frames.iter().enumerate() {
        let expected = (pos + 1) as u32;
        if frame.index != expected {
            return Err(CoreError::ExtractionFailed(format!(
                "frame sequence has a gap: expected ordinal {}, found {}",
                expected, frame.index
            )));
        }
    }

    Ok(frames)
}

fn parse_frame_ordinal(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix(FRAME_PREFIX)?
        .strip_suffix(&format!(".{FRAME_EXTENSION}"))?
        .parse()
        .ok()
}
