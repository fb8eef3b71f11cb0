//! Thin async wrapper over the `git` (and `gh`) binaries.
//!
//! Every command runs in the configured repository directory with stdin closed,
//! output captured, and a timeout. A non-zero exit is an error carrying stderr.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::publish::PublishError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone)]
pub struct GitRunner {
    program: String,
    repo_dir: PathBuf,
    timeout: Duration,
}

impl GitRunner {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: "git".to_string(),
            repo_dir: repo_dir.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different git executable.
    #[cfg(test)]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    #[cfg(test)]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    pub async fn git(&self, args: &[&str]) -> Result<CommandOutput, PublishError> {
        self.run(&self.program, args).await
    }

    /// Runs an arbitrary program (e.g. `gh`) in the repository directory.
    pub async fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, PublishError> {
        let command_line = format!("{} {}", program, args.join(" "));
        debug!("Running `{}` in {}", command_line, self.repo_dir.display());

        let child = Command::new(program)
            .args(args)
            .current_dir(&self.repo_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PublishError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| PublishError::Timeout {
                command: command_line.clone(),
                timeout: self.timeout,
            })?
            .map_err(|source| PublishError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(PublishError::CommandFailed {
                command: command_line,
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(CommandOutput { stdout, stderr })
    }

    /// Stages `file`. Relative paths are resolved against the process working
    /// directory, not the repository, so git always receives an absolute path.
    pub async fn add(&self, file: &Path) -> Result<(), PublishError> {
        let absolute = tokio::fs::canonicalize(file)
            .await
            .map_err(|_| PublishError::FileNotFound(file.to_path_buf()))?;
        let absolute = absolute.to_string_lossy();
        self.git(&["add", absolute.as_ref()]).await?;
        Ok(())
    }

    /// Commits staged changes. Returns `false` without committing when the tree is clean.
    pub async fn commit_if_changed(&self, message: &str) -> Result<bool, PublishError> {
        let status = self.git(&["status", "--porcelain"]).await?;
        if status.stdout.trim().is_empty() {
            return Ok(false);
        }
        self.git(&["commit", "-m", message]).await?;
        Ok(true)
    }

    /// `git push`, or `git push -u origin <branch>` when a branch is given.
    pub async fn push(&self, branch: Option<&str>) -> Result<(), PublishError> {
        let output = match branch {
            Some(branch) => self.git(&["push", "-u", "origin", branch]).await?,
            None => self.git(&["push"]).await?,
        };
        debug!("git push: {}", output.stderr.trim());
        Ok(())
    }

    /// Switches to `branch`, creating it first if it does not exist.
    /// Returns `true` when the branch was created.
    pub async fn checkout_branch(&self, branch: &str) -> Result<bool, PublishError> {
        let existing = self.git(&["branch", "--list", branch]).await?;
        if existing.stdout.trim().is_empty() {
            self.git(&["checkout", "-b", branch]).await?;
            Ok(true)
        } else {
            self.git(&["checkout", branch]).await?;
            Ok(false)
        }
    }
}
