use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// How (and whether) rendered portfolios are pushed to git.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishMode {
    Disabled,
    CurrentBranch,
    Branch,
}

impl FromStr for PublishMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "disabled" | "off" | "none" => Ok(PublishMode::Disabled),
            "current-branch" | "current_branch" | "simple" => Ok(PublishMode::CurrentBranch),
            "branch" | "per-branch" => Ok(PublishMode::Branch),
            other => bail!("unknown publish mode '{other}' (expected disabled, current-branch or branch)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub template_registry_path: PathBuf,
    pub output_dir: PathBuf,
    pub publish_mode: PublishMode,
    pub git_repo_dir: PathBuf,
    pub git_branch_prefix: String,
    pub enable_gh_pages: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            template_registry_path: env_or("TEMPLATE_REGISTRY_PATH", "templates/registry.json").into(),
            output_dir: env_or("OUTPUT_DIR", "output").into(),
            publish_mode: env_or("PUBLISH_MODE", "disabled")
                .parse()
                .context("PUBLISH_MODE is invalid")?,
            git_repo_dir: env_or("GIT_REPO_DIR", ".").into(),
            git_branch_prefix: env_or("GIT_BRANCH_PREFIX", "portfolio"),
            enable_gh_pages: parse_bool(&env_or("ENABLE_GH_PAGES", "false"))
                .context("ENABLE_GH_PAGES must be true or false")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }

    /// When publishing is on, `OUTPUT_DIR` must sit inside `GIT_REPO_DIR` or git cannot
    /// stage the rendered files. Both directories must already exist.
    pub fn check_publish_paths(&self) -> Result<()> {
        if self.publish_mode == PublishMode::Disabled {
            return Ok(());
        }
        let repo = std::fs::canonicalize(&self.git_repo_dir).with_context(|| {
            format!("GIT_REPO_DIR {} does not exist", self.git_repo_dir.display())
        })?;
        let output = std::fs::canonicalize(&self.output_dir).with_context(|| {
            format!("OUTPUT_DIR {} does not exist", self.output_dir.display())
        })?;
        if !output.starts_with(&repo) {
            bail!(
                "OUTPUT_DIR {} must be inside GIT_REPO_DIR {} when publishing is enabled",
                output.display(),
                repo.display()
            );
        }
        Ok(())
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("not a boolean: '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_mode_parsing() {
        assert_eq!("disabled".parse::<PublishMode>().unwrap(), PublishMode::Disabled);
        assert_eq!(" Current-Branch ".parse::<PublishMode>().unwrap(), PublishMode::CurrentBranch);
        assert_eq!("branch".parse::<PublishMode>().unwrap(), PublishMode::Branch);
        assert!("gh-pages".parse::<PublishMode>().is_err());
    }

    fn config_with(publish_mode: PublishMode, output_dir: &std::path::Path, git_repo_dir: &std::path::Path) -> Config {
        Config {
            anthropic_api_key: "test".to_string(),
            template_registry_path: "templates/registry.json".into(),
            output_dir: output_dir.to_path_buf(),
            publish_mode,
            git_repo_dir: git_repo_dir.to_path_buf(),
            git_branch_prefix: "portfolio".to_string(),
            enable_gh_pages: false,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_output_outside_repo_rejected_when_publishing() {
        let repo = tempfile::tempdir().unwrap();
        let elsewhere = tempfile::tempdir().unwrap();

        let config = config_with(PublishMode::Branch, elsewhere.path(), repo.path());
        let err = config.check_publish_paths().unwrap_err();
        assert!(err.to_string().contains("must be inside GIT_REPO_DIR"));

        let disabled = config_with(PublishMode::Disabled, elsewhere.path(), repo.path());
        assert!(disabled.check_publish_paths().is_ok());
    }

    #[test]
    fn test_output_inside_repo_accepted() {
        let repo = tempfile::tempdir().unwrap();
        let output = repo.path().join("output");
        std::fs::create_dir_all(&output).unwrap();

        let config = config_with(PublishMode::CurrentBranch, &output, repo.path());
        assert!(config.check_publish_paths().is_ok());
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
