// stegsweep-core/tests/scan_pipeline_tests.rs
//
// End-to-end coordinator tests with shell scripts standing in for ffmpeg
// and the analyzers, wired in through the configurable tool paths. Every
// test also asserts the workspace directory is gone afterwards.

#![cfg(unix)]

use stegsweep_core::{
    scan_video, AnalyzerKind, CancellationToken, CoreError, ScanConfig,
};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn write_script(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path.to_string_lossy().into_owned()
}

/// Fake ffmpeg: answers `-version`, otherwise touches `frame_0001..NNNN.png`
/// next to the output pattern it was handed as its last argument.
fn fake_ffmpeg(dir: &Path, frame_count: u32) -> String {
    let body = format!(
        "#!/bin/sh\n\
         if [ \"$1\" = \"-version\" ]; then echo fake ffmpeg; exit 0; fi\n\
         for last in \"$@\"; do :; done\n\
         outdir=$(dirname \"$last\")\n\
         i=1\n\
         while [ \"$i\" -le {frame_count} ]; do\n\
           : > \"$outdir/$(printf 'frame_%04d.png' \"$i\")\"\n\
           i=$((i+1))\n\
         done\n\
         exit 0\n"
    );
    write_script(dir, "fake_ffmpeg", &body)
}

/// Fake zsteg that prints a detection line for the given frame basenames.
fn fake_zsteg(dir: &Path, flagged: &[&str]) -> String {
    let patterns = if flagged.is_empty() {
        "__never__".to_string()
    } else {
        flagged.join("|")
    };
    let body = format!(
        "#!/bin/sh\n\
         for last in \"$@\"; do :; done\n\
         case \"$(basename \"$last\")\" in\n\
           {patterns}) echo 'payload detected' ;;\n\
           *) echo 'clean' ;;\n\
         esac\n\
         exit 0\n"
    );
    write_script(dir, "fake_zsteg", &body)
}

struct Fixture {
    tools_dir: TempDir,
    workspace_base: TempDir,
    video: PathBuf,
    config: ScanConfig,
}

fn fixture(frame_count: u32, flagged: &[&str]) -> Fixture {
    let tools = tempdir().unwrap();
    let workspace_base = tempdir().unwrap();
    let video = tools.path().join("input.mp4");
    fs::write(&video, b"not a real video").unwrap();

    let mut config = ScanConfig::default();
    config.analyzers = vec![AnalyzerKind::Zsteg];
    config.tools.ffmpeg = fake_ffmpeg(tools.path(), frame_count);
    config.tools.zsteg = fake_zsteg(tools.path(), flagged);
    config.temp_dir = Some(workspace_base.path().to_path_buf());
    config.max_workers = 4;

    Fixture {
        tools_dir: tools,
        workspace_base,
        video,
        config,
    }
}

fn assert_workspace_gone(fx: &Fixture) {
    let leftovers = fs::read_dir(fx.workspace_base.path()).unwrap().count();
    assert_eq!(leftovers, 0, "workspace directory leaked");
}

#[test]
fn scenario_a_flagged_frames_over_threshold_is_suspicious() {
    let fx = fixture(20, &["frame_0003.png", "frame_0007.png"]);
    let report = scan_video(&fx.video, &fx.config, None).unwrap();

    assert!(report.suspicious); // 2/20 = 0.10 > 0.05
    assert_eq!(report.total_frames, 20);
    assert_eq!(report.flagged_frames, vec![3, 7]);
    assert_eq!(report.analyzer_failures, 0);
    assert_eq!(report.per_frame[&3].reasons, vec!["zsteg"]);
    assert_workspace_gone(&fx);
}

#[test]
fn scenario_b_clean_frames_are_not_suspicious() {
    let fx = fixture(20, &[]);
    let report = scan_video(&fx.video, &fx.config, None).unwrap();

    assert!(!report.suspicious);
    assert!(report.flagged_frames.is_empty());
    assert_eq!(report.total_frames, 20);
    assert_workspace_gone(&fx);
}

#[test]
fn scenario_c_extraction_failure_is_fatal_and_leaves_no_workspace() {
    let mut fx = fixture(0, &[]);
    fx.config.tools.ffmpeg = write_script(
        fx.tools_dir.path(),
        "broken_ffmpeg",
        "#!/bin/sh\nif [ \"$1\" = \"-version\" ]; then exit 0; fi\necho 'demuxer blew up' >&2\nexit 1\n",
    );

    let result = scan_video(&fx.video, &fx.config, None);
    assert!(matches!(result, Err(CoreError::ExtractionFailed(_))));
    assert_workspace_gone(&fx);
}

#[test]
fn zero_extracted_frames_yield_clean_empty_report() {
    let fx = fixture(0, &[]);
    let report = scan_video(&fx.video, &fx.config, None).unwrap();

    assert!(!report.suspicious);
    assert_eq!(report.total_frames, 0);
    assert!(report.flagged_frames.is_empty());
    assert_workspace_gone(&fx);
}

#[test]
fn scenario_d_analyzer_timeout_degrades_but_does_not_flag() {
    let mut fx = fixture(2, &[]);
    fx.config.tools.zsteg =
        write_script(fx.tools_dir.path(), "slow_zsteg", "#!/bin/sh\nsleep 30\n");
    fx.config.analyzer_timeout_secs = 1;

    let report = scan_video(&fx.video, &fx.config, None).unwrap();
    assert_eq!(report.analyzer_failures, 2);
    assert!(report.flagged_frames.is_empty());
    assert!(!report.suspicious);
    assert_workspace_gone(&fx);
}

#[test]
fn steghide_negative_exit_is_not_a_failure() {
    let mut fx = fixture(3, &[]);
    fx.config.analyzers = vec![AnalyzerKind::Steghide];
    fx.config.tools.steghide = write_script(
        fx.tools_dir.path(),
        "fake_steghide",
        "#!/bin/sh\necho 'steghide: could not extract any data with that passphrase!' >&2\nexit 1\n",
    );

    let report = scan_video(&fx.video, &fx.config, None).unwrap();
    assert_eq!(report.analyzer_failures, 0);
    assert!(report.flagged_frames.is_empty());
    assert!(!report.suspicious);
    assert_workspace_gone(&fx);
}

#[test]
fn analyzer_crash_still_produces_full_report_and_cleanup() {
    let mut fx = fixture(5, &[]);
    fx.config.tools.zsteg = write_script(
        fx.tools_dir.path(),
        "crashing_zsteg",
        "#!/bin/sh\necho 'ruby segfault' >&2\nexit 134\n",
    );

    let report = scan_video(&fx.video, &fx.config, None).unwrap();
    assert_eq!(report.total_frames, 5);
    assert_eq!(report.analyzer_failures, 5);
    assert!(!report.suspicious);
    assert_workspace_gone(&fx);
}

#[test]
fn failed_workspace_removal_is_fatal_even_after_clean_pipeline() {
    // The analyzer swaps the workspace directory for a regular file, so the
    // pipeline itself succeeds but teardown cannot remove the workspace.
    // No report may be returned in that state.
    let mut fx = fixture(1, &[]);
    fx.config.tools.zsteg = write_script(
        fx.tools_dir.path(),
        "sabotaging_zsteg",
        "#!/bin/sh\n\
         for last in \"$@\"; do :; done\n\
         ws=$(dirname \"$last\")\n\
         rm -rf \"$ws\"\n\
         : > \"$ws\"\n\
         echo 'clean'\n\
         exit 0\n",
    );

    let result = scan_video(&fx.video, &fx.config, None);
    assert!(matches!(result, Err(CoreError::Resource(_))));
}

#[test]
fn cancellation_aborts_with_no_report_and_no_leak() {
    let fx = fixture(10, &[]);
    let token = CancellationToken::new();
    token.cancel();

    let result = scan_video(&fx.video, &fx.config, Some(&token));
    assert!(matches!(result, Err(CoreError::Cancelled)));
    assert_workspace_gone(&fx);
}

#[test]
fn missing_input_is_reported_before_any_workspace_exists() {
    let fx = fixture(1, &[]);
    let result = scan_video(Path::new("/no/such/video.mp4"), &fx.config, None);
    assert!(matches!(result, Err(CoreError::InputNotFound(_))));
    assert_workspace_gone(&fx);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let mut fx = fixture(1, &[]);
    fx.config.threshold = 2.0;
    let result = scan_video(&fx.video, &fx.config, None);
    assert!(matches!(result, Err(CoreError::Config(_))));
    assert_workspace_gone(&fx);
}
