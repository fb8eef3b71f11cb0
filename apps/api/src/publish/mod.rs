//! Publishing: commits a rendered portfolio and pushes it to the git remote.
//!
//! `AppState` holds an `Option<Arc<dyn Publisher>>`, chosen at startup from `PUBLISH_MODE`:
//! - `CurrentBranchPublisher`: add, commit, push on whatever branch is checked out
//! - `BranchPublisher`: one branch per person (`<prefix>-<slug>`), pushed with upstream,
//!   optionally enabling GitHub Pages for it
//!
//! A publish failure never fails the pipeline run; the caller records it as a status.

pub mod git;

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::templates::render::slugify;
use git::GitRunner;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {code:?}: {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishReport {
    /// Branch pushed with upstream tracking; `None` for the current-branch publisher.
    pub branch: Option<String>,
    /// False when there was nothing to commit.
    pub committed: bool,
    pub pages_enabled: bool,
}

/// What happened to the publish step of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishStatus {
    Pushed(PublishReport),
    Failed { reason: String },
    /// Publishing was requested but no publisher is configured.
    Disabled,
}

#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, artifact: &Path, person: &str) -> Result<PublishReport, PublishError>;
}

/// Runs the publisher and folds any error into a `Failed` status.
pub async fn publish_or_report(
    publisher: &dyn Publisher,
    artifact: &Path,
    person: &str,
) -> PublishStatus {
    match publisher.publish(artifact, person).await {
        Ok(report) => PublishStatus::Pushed(report),
        Err(e) => {
            warn!("Git push failed: {e}");
            PublishStatus::Failed {
                reason: e.to_string(),
            }
        }
    }
}

pub fn commit_message(person: &str) -> String {
    format!("Add portfolio for {person}")
}

pub fn branch_name(prefix: &str, person: &str) -> String {
    format!("{}-{}", prefix, slugify(person))
}

pub struct CurrentBranchPublisher {
    git: GitRunner,
    /// One working tree and index: publishes run one at a time.
    lock: Mutex<()>,
}

impl CurrentBranchPublisher {
    pub fn new(git: GitRunner) -> Self {
        Self {
            git,
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl Publisher for CurrentBranchPublisher {
    async fn publish(&self, artifact: &Path, person: &str) -> Result<PublishReport, PublishError> {
        let _guard = self.lock.lock().await;

        self.git.add(artifact).await?;
        info!("Added {} to git", artifact.display());

        let message = commit_message(person);
        let committed = self.git.commit_if_changed(&message).await?;
        if committed {
            info!("Committed: {message}");
        } else {
            info!("No changes to commit");
        }

        self.git.push(None).await?;
        info!("Pushed {} to remote", self.git.repo_dir().display());

        Ok(PublishReport {
            branch: None,
            committed,
            pages_enabled: false,
        })
    }
}

pub struct BranchPublisher {
    git: GitRunner,
    branch_prefix: String,
    enable_gh_pages: bool,
    /// Held from checkout through push so concurrent runs cannot swap branches mid-commit.
    lock: Mutex<()>,
}

impl BranchPublisher {
    pub fn new(git: GitRunner, branch_prefix: impl Into<String>, enable_gh_pages: bool) -> Self {
        Self {
            git,
            branch_prefix: branch_prefix.into(),
            enable_gh_pages,
            lock: Mutex::new(()),
        }
    }

    /// GitHub Pages is best-effort: it needs the `gh` CLI and repo admin access.
    async fn enable_pages(&self, branch: &str) -> bool {
        match self
            .git
            .run("gh", &["pages", "enable", "--branch", branch])
            .await
        {
            Ok(_) => {
                info!("GitHub Pages enabled for {branch}");
                true
            }
            Err(e) => {
                warn!("GitHub Pages setup requires the gh CLI and repo access: {e}");
                false
            }
        }
    }
}

#[async_trait]
impl Publisher for BranchPublisher {
    async fn publish(&self, artifact: &Path, person: &str) -> Result<PublishReport, PublishError> {
        let slug = slugify(person);
        let branch = branch_name(&self.branch_prefix, person);
        let _guard = self.lock.lock().await;

        if self.git.checkout_branch(&branch).await? {
            info!("Created branch: {branch}");
        } else {
            info!("Switched to branch: {branch}");
        }

        self.git.add(artifact).await?;
        let committed = self.git.commit_if_changed(&commit_message(&slug)).await?;
        self.git.push(Some(&branch)).await?;
        info!("Portfolio pushed to branch: {branch}");

        let pages_enabled = self.enable_gh_pages && self.enable_pages(&branch).await;

        Ok(PublishReport {
            branch: Some(branch),
            committed,
            pages_enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn broken_git(dir: &Path) -> GitRunner {
        GitRunner::new(dir).with_program("definitely-not-a-git-binary")
    }

    #[test]
    fn test_commit_message() {
        assert_eq!(commit_message("Arjun Sharma"), "Add portfolio for Arjun Sharma");
    }

    #[test]
    fn test_branch_name_uses_slug() {
        assert_eq!(branch_name("portfolio", "Arjun Sharma"), "portfolio-arjun-sharma");
        assert_eq!(branch_name("site", ""), "site-user");
    }

    #[test]
    fn test_status_serialization() {
        let pushed = PublishStatus::Pushed(PublishReport {
            branch: Some("portfolio-ada".to_string()),
            committed: true,
            pages_enabled: false,
        });
        assert_eq!(
            serde_json::to_value(&pushed).unwrap(),
            json!({"status": "pushed", "branch": "portfolio-ada", "committed": true, "pages_enabled": false})
        );
        assert_eq!(
            serde_json::to_value(PublishStatus::Disabled).unwrap(),
            json!({"status": "disabled"})
        );
    }

    #[tokio::test]
    async fn test_missing_artifact_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = CurrentBranchPublisher::new(broken_git(dir.path()));
        let status =
            publish_or_report(&publisher, &dir.path().join("missing.html"), "Ada").await;
        match status {
            PublishStatus::Failed { reason } => assert!(reason.contains("File not found")),
            other => panic!("expected failure status, got {other:?}"),
        }
    }

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn sh_git(dir: &Path, args: &[&str]) -> String {
        let out = std::process::Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(out.status.success(), "git {args:?}: {}", String::from_utf8_lossy(&out.stderr));
        String::from_utf8_lossy(&out.stdout).to_string()
    }

    /// Working repo at `<root>/work` with a bare `origin` at `<root>/remote.git`.
    fn local_repo_with_remote(root: &Path) -> (PathBuf, PathBuf) {
        let remote = root.join("remote.git");
        let work = root.join("work");
        std::fs::create_dir_all(&work).unwrap();

        sh_git(root, &["init", "--bare", remote.to_str().unwrap()]);
        sh_git(&work, &["init"]);
        sh_git(&work, &["config", "user.name", "Portfolio Bot"]);
        sh_git(&work, &["config", "user.email", "bot@example.com"]);
        sh_git(&work, &["config", "commit.gpgsign", "false"]);
        sh_git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);
        (work, remote)
    }

    #[tokio::test]
    async fn test_branch_publisher_against_local_remote() {
        if !git_available() {
            return;
        }
        let root = tempfile::tempdir().unwrap();
        let (work, remote) = local_repo_with_remote(root.path());

        let artifact = work.join("arjun-sharma.html");
        std::fs::write(&artifact, "<html>v1</html>").unwrap();

        let publisher = BranchPublisher::new(GitRunner::new(&work), "portfolio", false);
        let first = publisher.publish(&artifact, "Arjun Sharma").await.unwrap();
        assert_eq!(first.branch.as_deref(), Some("portfolio-arjun-sharma"));
        assert!(first.committed);
        assert!(!first.pages_enabled);

        let pushed = sh_git(root.path(), &["--git-dir", remote.to_str().unwrap(), "branch", "--list"]);
        assert!(pushed.contains("portfolio-arjun-sharma"));
        let log = sh_git(&work, &["log", "-1", "--pretty=%s"]);
        assert_eq!(log.trim(), "Add portfolio for arjun-sharma");

        // Same content again: branch exists, nothing to commit, push is a no-op.
        let second = publisher.publish(&artifact, "Arjun Sharma").await.unwrap();
        assert!(!second.committed);
    }

    #[tokio::test]
    async fn test_concurrent_branch_publishes_stay_on_their_own_branch() {
        if !git_available() {
            return;
        }
        let root = tempfile::tempdir().unwrap();
        let (work, _remote) = local_repo_with_remote(root.path());

        let ada = work.join("ada-lovelace.html");
        let grace = work.join("grace-hopper.html");
        std::fs::write(&ada, "<html>ada</html>").unwrap();
        std::fs::write(&grace, "<html>grace</html>").unwrap();

        let publisher = BranchPublisher::new(GitRunner::new(&work), "portfolio", false);
        let (first, second) = tokio::join!(
            publisher.publish(&ada, "Ada Lovelace"),
            publisher.publish(&grace, "Grace Hopper"),
        );
        assert!(first.unwrap().committed);
        assert!(second.unwrap().committed);

        for (branch, file) in [
            ("portfolio-ada-lovelace", "ada-lovelace.html"),
            ("portfolio-grace-hopper", "grace-hopper.html"),
        ] {
            let changed = sh_git(&work, &["show", "--name-only", "--pretty=format:", branch]);
            assert_eq!(changed.trim(), file, "tip of {branch}");
        }
    }

    #[tokio::test]
    async fn test_branch_publisher_surfaces_git_failure() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = dir.path().join("ada.html");
        std::fs::write(&artifact, "<html></html>").unwrap();

        let publisher = BranchPublisher::new(broken_git(dir.path()), "portfolio", true);
        assert!(matches!(
            publisher.publish(&artifact, "Ada").await,
            Err(PublishError::Spawn { .. })
        ));
    }
}
