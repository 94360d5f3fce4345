//! Flake8 lint collaborator
//!
//! Runs flake8 inside a pinned python container with the derived view
//! bind-mounted read-only. Violations stream to the caller's terminal;
//! only the exit status comes back through the error type.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::domain::SourceView;
use crate::error::LintError;
use crate::services::pipeline::{LintOptions, LintRunner};
use crate::tools::{get_tool_path, tools};

/// Lint collaborator backed by `docker run` + flake8.
pub struct Flake8Runner {
    image_base: String,
}

impl Flake8Runner {
    pub fn new() -> Self {
        Self {
            image_base: "python".to_string(),
        }
    }

    /// Builder: pull the python image from a different base (e.g. a mirror).
    pub fn with_image_base(mut self, image_base: impl Into<String>) -> Self {
        self.image_base = image_base.into();
        self
    }

    fn image(&self, python_version: &str) -> String {
        format!("{}:{}-slim", self.image_base, python_version)
    }
}

impl Default for Flake8Runner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LintRunner for Flake8Runner {
    async fn lint(&self, view: &SourceView, options: &LintOptions) -> Result<(), LintError> {
        let docker = get_tool_path(tools::DOCKER);
        let image = self.image(&options.python_version);
        let mount = format!("{}:/src:ro", view.root().display());

        info!("🔍 Linting with flake8 ({})", image);

        let status = Command::new(&docker)
            .args([
                "run",
                "--rm",
                "-v",
                &mount,
                "-w",
                "/src",
                &image,
                "sh",
                "-c",
                "pip install --quiet flake8 && flake8 .",
            ])
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| LintError::RunnerFailed {
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(LintError::Failed {
                code: status.code().unwrap_or(-1),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_is_pinned_to_python_version() {
        let runner = Flake8Runner::new();
        let options = LintOptions {
            python_version: "3.10".to_string(),
        };
        assert_eq!(runner.image(&options.python_version), "python:3.10-slim");
    }

    #[test]
    fn test_image_base_override() {
        let runner = Flake8Runner::new().with_image_base("mirror.example.org/python");
        assert_eq!(runner.image("3.10"), "mirror.example.org/python:3.10-slim");
    }
}
