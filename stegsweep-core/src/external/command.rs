//! Bounded execution of external tools.
//!
//! Analyzer invocations must never stall the pipeline: the child process is
//! killed once the deadline passes and the caller gets a `Timeout` error
//! instead of a hang.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("process error: {0}")]
    Io(#[from] std::io::Error),

    #[error("command timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

/// Captured output of a finished external tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Stdout and stderr joined, for keyword scans over either stream.
    pub fn combined(&self) -> String {
        let mut text = self.stdout.clone();
        if !self.stderr.is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&self.stderr);
        }
        text
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs a command to completion, killing it once `timeout` elapses.
///
/// Stdout and stderr are drained on dedicated threads so a chatty tool
/// cannot deadlock on a full pipe while we wait for it to exit.
pub fn run_with_timeout(
    cmd: &mut Command,
    timeout: Duration,
) -> Result<CommandOutput, CommandError> {
    log::debug!("Running command: {:?}", cmd);

    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_handle = thread::spawn(move || read_stream(stdout));
    let stderr_handle = thread::spawn(move || read_stream(stderr));

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    kill_child(&mut child);
                    return Err(CommandError::Timeout(timeout));
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                kill_child(&mut child);
                return Err(CommandError::Io(e));
            }
        }
    };

    Ok(CommandOutput {
        stdout: stdout_handle.join().unwrap_or_default(),
        stderr: stderr_handle.join().unwrap_or_default(),
        exit_code: status.code(),
    })
}

fn read_stream<R: Read>(stream: Option<R>) -> String {
    let mut buf = String::new();
    if let Some(mut stream) = stream {
        let _ = stream.read_to_string(&mut buf);
    }
    buf
}

fn kill_child(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::warn!("Failed to kill timed-out process: {e}");
    }
    // Reap the child so it doesn't linger as a zombie.
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_joins_both_streams() {
        let output = CommandOutput {
            stdout: "out".to_string(),
            stderr: "err".to_string(),
            exit_code: Some(0),
        };
        assert_eq!(output.combined(), "out\nerr");
        assert!(output.success());
    }

    #[test]
    fn combined_skips_empty_streams() {
        let output = CommandOutput {
            stdout: String::new(),
            stderr: "only stderr".to_string(),
            exit_code: Some(1),
        };
        assert_eq!(output.combined(), "only stderr");
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[test]
    fn captures_output_of_fast_command() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo hello; echo oops >&2"]);
        let output = run_with_timeout(&mut cmd, Duration::from_secs(5)).unwrap();
        assert_eq!(output.stdout.trim(), "hello");
        assert_eq!(output.stderr.trim(), "oops");
        assert!(output.success());
    }

    #[cfg(unix)]
    #[test]
    fn kills_hanging_command() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        let started = Instant::now();
        let result = run_with_timeout(&mut cmd, Duration::from_millis(200));
        assert!(matches!(result, Err(CommandError::Timeout(_))));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
