//! Working directory management
//!
//! Each job owns an isolated directory under the csv root holding the
//! tool's input parameters and a simulated-stdin script. The tool itself
//! writes per-repository artifacts under the data, graphs, and repositories
//! roots; all four locations fall under the same cleanup contract and are
//! removed when the job terminates, whatever the outcome.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use uuid::Uuid;

use orgminer_core::domain::job::Job;

/// Base filename the tool is told to write its pattern results under.
const OUTPUT_BASE_NAME: &str = "output";

/// Filesystem layout for job workspaces and tool artifacts.
#[derive(Debug, Clone)]
pub struct DirectoryLayout {
    csv_dir: PathBuf,
    data_dir: PathBuf,
    graphs_dir: PathBuf,
    repositories_dir: PathBuf,
}

/// Paths produced by [`DirectoryLayout::prepare`].
#[derive(Debug)]
pub struct PreparedInputs {
    pub job_dir: PathBuf,
    pub input_csv: PathBuf,
    pub stdin_file: PathBuf,
}

impl DirectoryLayout {
    pub fn new(
        csv_dir: PathBuf,
        data_dir: PathBuf,
        graphs_dir: PathBuf,
        repositories_dir: PathBuf,
    ) -> Self {
        Self {
            csv_dir,
            data_dir,
            graphs_dir,
            repositories_dir,
        }
    }

    /// The job's working directory.
    pub fn job_dir(&self, job_id: Uuid) -> PathBuf {
        self.csv_dir.join(job_id.to_string())
    }

    /// The tool's metrics document for one repository.
    pub fn metrics_path(&self, author: &str, repository: &str) -> PathBuf {
        self.data_dir.join(author).join(repository).join("metrics.json")
    }

    /// The tool's graph fragment directory for one repository.
    pub fn graph_dir(&self, author: &str, repository: &str) -> PathBuf {
        self.graphs_dir.join(author).join(repository)
    }

    /// Creates the job's working directory and writes the tool inputs.
    ///
    /// `input.csv` carries the three request parameters in a fixed delimited
    /// format; the stdin file carries, line by line, the input file path,
    /// the working directory path, and the output base name. Directory
    /// creation is idempotent; file contents are overwritten on
    /// re-invocation.
    pub fn prepare(&self, job: &Job) -> Result<PreparedInputs> {
        let job_dir = self.job_dir(job.id);
        fs::create_dir_all(&job_dir)
            .with_context(|| format!("Failed to create job directory {}", job_dir.display()))?;

        // The stdin protocol wants absolute paths; resolve after creation.
        let job_dir = job_dir
            .canonicalize()
            .with_context(|| format!("Failed to resolve job directory {}", job_dir.display()))?;

        let input_csv = job_dir.join("input.csv");
        fs::write(
            &input_csv,
            format!("{},{},{}\n", job.author, job.repository, job.end_date),
        )
        .with_context(|| format!("Failed to write {}", input_csv.display()))?;

        let stdin_file = job_dir.join("tool_stdin.txt");
        fs::write(
            &stdin_file,
            format!(
                "{}\n{}\n{}\n",
                input_csv.display(),
                job_dir.display(),
                OUTPUT_BASE_NAME
            ),
        )
        .with_context(|| format!("Failed to write {}", stdin_file.display()))?;

        Ok(PreparedInputs {
            job_dir,
            input_csv,
            stdin_file,
        })
    }

    /// Removes the job's working directory and the tool's per-repository
    /// artifact locations.
    ///
    /// Advisory best-effort hygiene: each location is removed
    /// independently, read-only entries are forced writable first, and
    /// every failure is swallowed after a warning. Callers must not branch
    /// on the outcome.
    pub fn cleanup(&self, job_id: Uuid, author: &str, repository: &str) {
        let targets = [
            self.job_dir(job_id),
            self.data_dir.join(author).join(repository),
            self.graphs_dir.join(author).join(repository),
            self.repositories_dir.join(format!("{author}.{repository}")),
        ];

        for target in &targets {
            remove_path(target);
        }
    }
}

/// Removes a file or directory tree, tolerating read-only permissions.
fn remove_path(path: &Path) {
    if !path.exists() {
        return;
    }

    let removed = if path.is_dir() {
        fs::remove_dir_all(path).or_else(|_| {
            make_writable(path);
            fs::remove_dir_all(path)
        })
    } else {
        fs::remove_file(path).or_else(|_| {
            make_writable(path);
            fs::remove_file(path)
        })
    };

    if let Err(e) = removed {
        warn!("Failed to remove {}: {}", path.display(), e);
    }
}

/// Recursively clears read-only bits so removal can proceed.
fn make_writable(path: &Path) {
    let Ok(metadata) = path.symlink_metadata() else {
        return;
    };

    let mut permissions = metadata.permissions();
    if permissions.readonly() {
        permissions.set_readonly(false);
        let _ = fs::set_permissions(path, permissions);
    }

    if metadata.is_dir() {
        let Ok(entries) = fs::read_dir(path) else {
            return;
        };
        for entry in entries.flatten() {
            make_writable(&entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgminer_core::dates;
    use tempfile::TempDir;

    fn layout(root: &TempDir) -> DirectoryLayout {
        DirectoryLayout::new(
            root.path().join("csv"),
            root.path().join("data"),
            root.path().join("graphs"),
            root.path().join("repositories"),
        )
    }

    fn sample_job() -> Job {
        let end = dates::parse_end_date("2025-07-01").unwrap();
        Job::new("alice".to_string(), "sample-repo".to_string(), end)
    }

    #[test]
    fn test_prepare_writes_inputs() {
        let root = TempDir::new().unwrap();
        let layout = layout(&root);
        let job = sample_job();

        let inputs = layout.prepare(&job).unwrap();

        assert!(inputs.job_dir.is_dir());
        assert!(inputs.job_dir.is_absolute());
        assert_eq!(
            inputs.job_dir.file_name().unwrap().to_str().unwrap(),
            job.id.to_string()
        );

        let content = fs::read_to_string(&inputs.input_csv).unwrap();
        assert_eq!(content, "alice,sample-repo,2025-07-01\n");

        let stdin = fs::read_to_string(&inputs.stdin_file).unwrap();
        let lines: Vec<&str> = stdin.lines().collect();
        assert_eq!(
            lines,
            vec![
                inputs.input_csv.display().to_string(),
                inputs.job_dir.display().to_string(),
                "output".to_string(),
            ]
        );
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let root = TempDir::new().unwrap();
        let layout = layout(&root);
        let job = sample_job();

        layout.prepare(&job).unwrap();
        let inputs = layout.prepare(&job).unwrap();

        let content = fs::read_to_string(&inputs.input_csv).unwrap();
        assert_eq!(content, "alice,sample-repo,2025-07-01\n");
    }

    #[test]
    fn test_cleanup_removes_all_locations() {
        let root = TempDir::new().unwrap();
        let layout = layout(&root);
        let job = sample_job();

        let targets = [
            root.path().join("csv").join(job.id.to_string()),
            root.path().join("data").join("alice").join("sample-repo"),
            root.path().join("graphs").join("alice").join("sample-repo"),
            root.path().join("repositories").join("alice.sample-repo"),
        ];

        for target in &targets {
            fs::create_dir_all(target).unwrap();
            fs::write(target.join("dummy.txt"), "test").unwrap();
        }

        layout.cleanup(job.id, "alice", "sample-repo");

        for target in &targets {
            assert!(!target.exists(), "{} still exists", target.display());
        }
    }

    #[test]
    fn test_cleanup_tolerates_read_only_entries() {
        let root = TempDir::new().unwrap();
        let layout = layout(&root);
        let job = sample_job();

        let data_dir = root.path().join("data").join("alice").join("sample-repo");
        fs::create_dir_all(&data_dir).unwrap();
        let locked = data_dir.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::write(locked.join("dummy.txt"), "test").unwrap();

        let mut permissions = fs::metadata(&locked).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&locked, permissions).unwrap();

        layout.cleanup(job.id, "alice", "sample-repo");

        assert!(!data_dir.exists());
    }

    #[test]
    fn test_cleanup_tolerates_missing_locations() {
        let root = TempDir::new().unwrap();
        let layout = layout(&root);
        let job = sample_job();

        // Nothing was ever created; cleanup must not panic.
        layout.cleanup(job.id, "alice", "sample-repo");
    }
}
