//! Encoder process execution.
//!
//! [`CommandRunner`] is the only place that touches process lifecycle. Every
//! stage builds an argument vector and interprets the [`RunError`] it gets
//! back; tests swap in a scripted runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use vibe_common::config::EncoderConfig;
use vibe_common::error::VibeError;

/// Characters of stderr kept for diagnostics.
pub const STDERR_TAIL_CHARS: usize = 500;

/// Bytes of stderr retained while reading (UTF-8 is at most 4 bytes/char).
const STDERR_TAIL_BYTES: usize = STDERR_TAIL_CHARS * 4;

const READ_CHUNK_BYTES: usize = 8 * 1024;
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure of a single encoder invocation.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("encoder binary not found: {binary}")]
    EncoderUnavailable { binary: String },

    #[error("failed to run encoder: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

impl From<RunError> for VibeError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::EncoderUnavailable { binary } => {
                VibeError::encoder_unavailable(format!("{binary} is not installed"))
            }
            RunError::Timeout { secs } => VibeError::Timeout { secs },
            RunError::Spawn(e) => VibeError::Io(e),
            failed @ RunError::Failed { .. } => VibeError::Other(anyhow::anyhow!(failed)),
        }
    }
}

/// Launches encoder invocations.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the encoder with `args` and wait at most `timeout`.
    async fn run(&self, args: &[String], timeout: Duration) -> Result<(), RunError>;

    /// First line of the encoder's version banner, or `None` if it cannot run.
    async fn version(&self) -> Option<String>;
}

/// Runs a real ffmpeg binary.
#[derive(Debug, Clone)]
pub struct FfmpegRunner {
    binary: PathBuf,
}

impl FfmpegRunner {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn from_config(config: &EncoderConfig) -> Self {
        Self::new(config.binary.clone())
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for FfmpegRunner {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl CommandRunner for FfmpegRunner {
    async fn run(&self, args: &[String], timeout: Duration) -> Result<(), RunError> {
        tracing::debug!(
            binary = %self.binary.display(),
            args = ?args,
            timeout_secs = timeout.as_secs(),
            "Running encoder"
        );

        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let started = Instant::now();
        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;

        // Drain stderr concurrently so the encoder never blocks on a full pipe.
        let stderr = child.stderr.take();
        let stderr_task = tokio::spawn(read_tail(stderr, STDERR_TAIL_BYTES));

        match tokio::time::timeout(timeout, child.wait()).await {
            Ok(Ok(status)) => {
                let tail = stderr_task.await.unwrap_or_default();
                if status.success() {
                    tracing::debug!(
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Encoder finished"
                    );
                    Ok(())
                } else {
                    let stderr = tail_chars(&String::from_utf8_lossy(&tail), STDERR_TAIL_CHARS);
                    Err(RunError::Failed {
                        status: status.to_string(),
                        stderr,
                    })
                }
            }
            Ok(Err(e)) => Err(RunError::Spawn(e)),
            Err(_elapsed) => {
                tracing::warn!(
                    timeout_secs = timeout.as_secs(),
                    pid = child.id(),
                    "Encoder timed out, killing"
                );
                if let Err(e) = child.kill().await {
                    tracing::warn!(error = %e, "Failed to kill timed-out encoder");
                }
                stderr_task.abort();
                Err(RunError::Timeout {
                    secs: timeout.as_secs(),
                })
            }
        }
    }

    async fn version(&self) -> Option<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-version")
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let output = tokio::time::timeout(VERSION_PROBE_TIMEOUT, cmd.output())
            .await
            .ok()?
            .ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .next()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
    }
}

impl FfmpegRunner {
    fn spawn_error(&self, err: std::io::Error) -> RunError {
        if err.kind() == std::io::ErrorKind::NotFound {
            RunError::EncoderUnavailable {
                binary: self.binary.display().to_string(),
            }
        } else {
            RunError::Spawn(err)
        }
    }
}

/// Read a stream to the end, keeping only the last `cap` bytes.
async fn read_tail<R: AsyncRead + Unpin>(handle: Option<R>, cap: usize) -> Vec<u8> {
    let mut buf = Vec::new();
    let Some(mut reader) = handle else {
        return buf;
    };

    let mut chunk = vec![0u8; READ_CHUNK_BYTES];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.len() > cap * 2 {
                    buf.drain(..buf.len() - cap);
                }
            }
        }
    }

    if buf.len() > cap {
        buf.drain(..buf.len() - cap);
    }
    buf
}

/// Last `max_chars` characters of `text`, trimmed.
pub fn tail_chars(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    let count = text.chars().count();
    text.chars()
        .skip(count.saturating_sub(max_chars))
        .collect::<String>()
        .trim_start()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_tail_chars_keeps_the_end() {
        assert_eq!(tail_chars("abcdef", 3), "def");
        assert_eq!(tail_chars("  short \n", 500), "short");
        assert_eq!(tail_chars("ééééé", 2), "éé");
    }

    #[tokio::test]
    async fn test_read_tail_bounds_buffer() {
        let data = vec![b'x'; 100_000];
        let tail = read_tail(Some(&data[..]), 64).await;
        assert_eq!(tail.len(), 64);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_run() {
        let runner = FfmpegRunner::new("sh");
        runner
            .run(&sh("exit 0"), Duration::from_secs(5))
            .await
            .unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failure_carries_stderr_tail() {
        let runner = FfmpegRunner::new("sh");
        let script = "i=0; while [ $i -lt 400 ]; do printf 'line%03d\\n' $i >&2; i=$((i+1)); done; exit 3";
        let err = runner
            .run(&sh(script), Duration::from_secs(10))
            .await
            .unwrap_err();

        match err {
            RunError::Failed { stderr, .. } => {
                assert!(stderr.chars().count() <= STDERR_TAIL_CHARS);
                assert!(stderr.ends_with("line399"));
                assert!(!stderr.contains("line000"));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_process() {
        let runner = FfmpegRunner::new("sh");
        let started = Instant::now();
        let err = runner
            .run(&sh("sleep 30"), Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_missing_binary_is_encoder_unavailable() {
        let runner = FfmpegRunner::new("/nonexistent/vibe-ffmpeg-binary");
        let err = runner
            .run(&[], Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::EncoderUnavailable { .. }));
        assert!(runner.version().await.is_none());
    }

    #[test]
    fn test_run_error_maps_to_vibe_error() {
        let err: VibeError = RunError::Timeout { secs: 90 }.into();
        assert!(matches!(err, VibeError::Timeout { secs: 90 }));
        let err: VibeError = RunError::EncoderUnavailable {
            binary: "ffmpeg".into(),
        }
        .into();
        assert!(matches!(err, VibeError::EncoderUnavailable { .. }));
    }
}
