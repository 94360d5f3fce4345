//! Git operations
//!
//! SHA discovery for image tagging. Pipeline runners pin the SHA through
//! the environment; direct CLI usage falls back to rev-parse.

use std::path::PathBuf;

use tokio::process::Command;

use crate::error::GitError;
use crate::tools::{get_tool_path, tools};

/// Client for git operations
pub struct GitClient {
    /// Working directory for git commands
    working_dir: Option<PathBuf>,
}

impl Default for GitClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GitClient {
    /// Create a new git client for the current directory
    pub fn new() -> Self {
        Self { working_dir: None }
    }

    /// Create a git client for a specific directory
    pub fn in_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(path.into()),
        }
    }

    /// Get git SHA for tagging
    ///
    /// Priority:
    /// 1. RELEASE_GIT_SHA env var (set by the pipeline runner at release start)
    /// 2. GIT_SHA env var (alternative)
    /// 3. git rev-parse --short HEAD (fallback for direct CLI usage)
    pub async fn get_sha(&self) -> Result<String, GitError> {
        if let Ok(sha) = std::env::var("RELEASE_GIT_SHA") {
            if !sha.is_empty() {
                return Ok(sha);
            }
        }

        if let Ok(sha) = std::env::var("GIT_SHA") {
            if !sha.is_empty() {
                return Ok(sha);
            }
        }

        self.rev_parse_short().await
    }

    /// Get short git SHA via rev-parse
    async fn rev_parse_short(&self) -> Result<String, GitError> {
        let git = get_tool_path(tools::GIT);
        let mut cmd = Command::new(&git);
        cmd.args(["rev-parse", "--short", "HEAD"]);

        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().await.map_err(|_| GitError::NotARepository)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::ShaFailed(stderr.trim().to_string()));
        }

        let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if sha.is_empty() {
            return Err(GitError::ShaFailed("Empty SHA returned".to_string()));
        }

        Ok(sha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests below touch the SHA env vars; serialize them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn test_env_var_wins_over_rev_parse() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("RELEASE_GIT_SHA", "abc1234");
        let client = GitClient::new();
        let sha = client.get_sha().await;
        std::env::remove_var("RELEASE_GIT_SHA");
        assert_eq!(sha.unwrap(), "abc1234");
    }

    #[tokio::test]
    async fn test_rev_parse_outside_repository_fails() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::remove_var("RELEASE_GIT_SHA");
        std::env::remove_var("GIT_SHA");
        let dir = tempfile::TempDir::new().unwrap();
        let client = GitClient::in_dir(dir.path());
        assert!(client.get_sha().await.is_err());
    }
}
