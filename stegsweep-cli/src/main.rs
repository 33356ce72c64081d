// stegsweep-cli/src/main.rs
//
// Command-line interface for the stegsweep video steganography scanner.
// Parses arguments, configures stegsweep-core, runs the scan, and renders
// the resulting report. All pipeline logic lives in the core library.

use clap::{Parser, Subcommand};
use stegsweep_core::{scan_video, AnalyzerKind, CoreError, ScanConfig};
use std::path::PathBuf;
use std::process;

/// Exit code when the scan completed and the video was declared suspicious.
const EXIT_SUSPICIOUS: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Stegsweep: scan video frames for hidden data",
    long_about = "Extracts frames from a video with ffmpeg and runs each one through \
external steganography analyzers (zsteg, steghide). Exits 0 when clean, 2 when the \
video is declared suspicious, 1 on a fatal error."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scans a video (or single image) for steganographic content
    Scan(ScanArgs),
}

#[derive(Parser, Debug)]
struct ScanArgs {
    /// Path to the video file to scan
    #[arg(required = true, value_name = "VIDEO")]
    video: PathBuf,

    /// Flagged-frame fraction above which the video is suspicious (0-1)
    #[arg(short, long, value_name = "RATIO")]
    threshold: Option<f64>,

    /// Frames sampled per second of source video
    #[arg(long, value_name = "FPS")]
    fps: Option<f64>,

    /// Comma-separated analyzers to run (zsteg, steghide)
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    analyzers: Option<Vec<AnalyzerKind>>,

    /// Per-invocation analyzer timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Number of parallel analyzer workers
    #[arg(short, long, value_name = "COUNT")]
    jobs: Option<usize>,

    /// Base directory for the temporary frame workspace
    #[arg(long, value_name = "DIR")]
    temp_dir: Option<PathBuf>,

    /// Emit the report as JSON instead of the human-readable rendering
    #[arg(long)]
    json: bool,
}

fn get_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn build_config(args: &ScanArgs) -> ScanConfig {
    let mut config = ScanConfig::default();
    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(fps) = args.fps {
        config.sampling_fps = fps;
    }
    if let Some(analyzers) = &args.analyzers {
        config.analyzers = analyzers.clone();
    }
    if let Some(timeout) = args.timeout {
        config.analyzer_timeout_secs = timeout;
    }
    if let Some(jobs) = args.jobs {
        config.max_workers = jobs;
    }
    config.temp_dir = args.temp_dir.clone();
    config
}

fn run_scan(args: ScanArgs) -> Result<i32, CoreError> {
    let config = build_config(&args);
    config.validate()?;
    log::debug!("Effective scan config: {config:?}");

    if !args.json {
        println!(
            "Scanning {} ({} fps sampling, {} analyzer(s)) at {}",
            args.video.display(),
            config.sampling_fps,
            config.analyzers.len(),
            get_timestamp()
        );
    }

    let report = scan_video(&args.video, &config, None)?;

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => return Err(CoreError::Other(format!("failed to render report: {e}"))),
        }
    } else {
        println!();
        print!("{report}");
    }

    Ok(if report.suspicious { EXIT_SUSPICIOUS } else { 0 })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let exit_code = match cli.command {
        Commands::Scan(args) => match run_scan(args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {e}");
                1
            }
        },
    };
    process::exit(exit_code);
}
