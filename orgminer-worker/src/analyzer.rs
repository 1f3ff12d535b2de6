//! Analysis tool boundary
//!
//! The external pattern-detection tool is an opaque executable: it reads
//! three lines from stdin, writes result files on disk, and reports domain
//! failures only as free text on stdout/stderr. Exit codes carry no
//! meaning for this service. The trait keeps the executor substitutable
//! with a fake in tests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Outcome of one tool invocation.
#[derive(Debug)]
pub enum ToolOutcome {
    /// The process exited within the timeout.
    Completed {
        /// Captured stdout and stderr, joined with a newline.
        combined_output: String,
    },
    /// The wall-clock limit expired and the process was killed.
    TimedOut,
}

/// Capability interface for running the external analysis tool.
#[async_trait]
pub trait AnalysisTool: Send + Sync {
    /// Runs the tool with stdin redirected from the prepared stdin file,
    /// bounded by a hard wall-clock timeout.
    async fn run(&self, stdin_file: &Path, timeout: Duration) -> Result<ToolOutcome>;
}

/// Runs the configured command as a subprocess.
pub struct SubprocessTool {
    program: String,
    args: Vec<String>,
}

impl SubprocessTool {
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command
            .split_first()
            .context("Analysis tool command is empty")?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl AnalysisTool for SubprocessTool {
    async fn run(&self, stdin_file: &Path, timeout: Duration) -> Result<ToolOutcome> {
        let stdin = std::fs::File::open(stdin_file)
            .with_context(|| format!("Failed to open stdin file {}", stdin_file.display()))?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!("Spawning analysis tool: {} {:?}", self.program, self.args);

        let child = command
            .spawn()
            .with_context(|| format!("Failed to spawn analysis tool '{}'", self.program))?;

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => {
                let output = output.context("Failed to collect analysis tool output")?;
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);

                debug!(
                    "Analysis tool exited (code: {:?}, stdout: {} bytes, stderr: {} bytes)",
                    output.status.code(),
                    stdout.len(),
                    stderr.len()
                );

                Ok(ToolOutcome::Completed {
                    combined_output: format!("{stdout}\n{stderr}"),
                })
            }
            Err(_) => {
                // Dropping the wait future drops the child handle, which
                // kills the process (kill_on_drop).
                warn!("Analysis tool exceeded timeout of {:?}, killed", timeout);
                Ok(ToolOutcome::TimedOut)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn stdin_fixture(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("stdin.txt");
        fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_captures_both_streams() {
        let dir = TempDir::new().unwrap();
        let stdin_file = stdin_fixture(&dir, "");

        let tool = SubprocessTool::new(&[
            "sh".to_string(),
            "-c".to_string(),
            "echo on-stdout; echo on-stderr >&2".to_string(),
        ])
        .unwrap();

        let outcome = tool
            .run(&stdin_file, Duration::from_secs(10))
            .await
            .unwrap();

        match outcome {
            ToolOutcome::Completed { combined_output } => {
                assert!(combined_output.contains("on-stdout"));
                assert!(combined_output.contains("on-stderr"));
            }
            ToolOutcome::TimedOut => panic!("tool should not time out"),
        }
    }

    #[tokio::test]
    async fn test_reads_stdin_from_file() {
        let dir = TempDir::new().unwrap();
        let stdin_file = stdin_fixture(&dir, "first-line\nsecond-line\n");

        let tool = SubprocessTool::new(&["head".to_string(), "-n".to_string(), "1".to_string()])
            .unwrap();

        let outcome = tool
            .run(&stdin_file, Duration::from_secs(10))
            .await
            .unwrap();

        match outcome {
            ToolOutcome::Completed { combined_output } => {
                assert!(combined_output.contains("first-line"));
                assert!(!combined_output.contains("second-line"));
            }
            ToolOutcome::TimedOut => panic!("tool should not time out"),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_the_process() {
        let dir = TempDir::new().unwrap();
        let stdin_file = stdin_fixture(&dir, "");

        let tool =
            SubprocessTool::new(&["sleep".to_string(), "30".to_string()]).unwrap();

        let outcome = tool
            .run(&stdin_file, Duration::from_millis(100))
            .await
            .unwrap();

        assert!(matches!(outcome, ToolOutcome::TimedOut));
    }

    #[test]
    fn test_empty_command_is_rejected() {
        assert!(SubprocessTool::new(&[]).is_err());
    }
}
