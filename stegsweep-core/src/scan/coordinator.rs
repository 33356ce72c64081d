//! The scan coordinator: extract, dispatch, aggregate, with guaranteed
//! workspace teardown on every exit path.

use super::{aggregate, dispatch, CancellationToken};
use crate::analyzers::{self, MatchRule};
use crate::config::ScanConfig;
use crate::error::{CoreError, CoreResult};
use crate::external;
use crate::report::ScanReport;
use crate::workspace::Workspace;
use std::collections::BTreeMap;
use std::path::Path;

/// Scans a video for hidden data in its frames.
///
/// Sequences the full pipeline: acquire a frame workspace, extract frames
/// with ffmpeg, run every configured analyzer on every frame, and reduce
/// the results to a [`ScanReport`]. The workspace is released before this
/// function returns, on success, fatal error, and cancellation alike.
///
/// Extraction failures are fatal and yield no report. Individual analyzer
/// failures are absorbed into the report's `analyzer_failures` tally.
pub fn scan_video(
    video_path: &Path,
    config: &ScanConfig,
    cancel: Option<&CancellationToken>,
) -> CoreResult<ScanReport> {
    config.validate()?;

    if !video_path.is_file() {
        return Err(CoreError::InputNotFound(video_path.display().to_string()));
    }
    external::check_dependency(&config.tools.ffmpeg)?;

    let default_token = CancellationToken::new();
    let cancel = cancel.unwrap_or(&default_token);

    if let Some(duration) = external::probe_duration_secs(video_path) {
        log::info!(
            "Input runs {:.1}s; expecting roughly {} frames at {} fps",
            duration,
            (duration * config.sampling_fps).ceil() as u64,
            config.sampling_fps
        );
    }

    let mut workspace = Workspace::acquire(config.temp_dir.as_deref())?;
    let result = run_pipeline(video_path, config, cancel, &workspace);

    // Teardown runs whatever happened above; TempDir's Drop covers a panic.
    // A workspace that cannot be removed is itself fatal: a report must not
    // be handed back while frame files linger on disk.
    match workspace.release() {
        Ok(()) => result,
        Err(release_err) => match result {
            Err(pipeline_err) => {
                log::warn!("Workspace teardown failed: {release_err}");
                Err(pipeline_err)
            }
            Ok(_) => Err(release_err),
        },
    }
}

fn run_pipeline(
    video_path: &Path,
    config: &ScanConfig,
    cancel: &CancellationToken,
    workspace: &Workspace,
) -> CoreResult<ScanReport> {
    log::debug!("Scan state: extracting (workspace {})", workspace.id());
    let frames = external::extract_frames(
        &config.tools.ffmpeg,
        video_path,
        workspace.root_path(),
        config.sampling_fps,
    )?;

    if frames.is_empty() {
        log::info!("No frames sampled; reporting clean scan");
        return Ok(ScanReport::empty(config.threshold));
    }
    if cancel.is_cancelled() {
        return Err(CoreError::Cancelled);
    }

    log::debug!("Scan state: dispatching {} frames", frames.len());
    let analyzers = analyzers::build_analyzers(config);
    let results = dispatch(&frames, &analyzers, config.max_workers, cancel)?;
    if cancel.is_cancelled() {
        return Err(CoreError::Cancelled);
    }

    log::debug!("Scan state: aggregating");
    let rules: BTreeMap<String, MatchRule> = analyzers
        .iter()
        .map(|a| (a.name().to_string(), a.rule().clone()))
        .collect();
    let report = aggregate(&results, frames.len(), config.threshold, &rules);

    log::info!(
        "Scan complete: suspicious={} flagged={}/{} analyzer_failures={}",
        report.suspicious,
        report.flagged_frames.len(),
        report.total_frames,
        report.analyzer_failures
    );
    Ok(report)
}
