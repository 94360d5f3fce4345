//! Container build and publish collaborator
//!
//! Wraps the docker CLI: build with the target environment as a build
//! argument and the Infisical client secret exposed as a build secret,
//! then push and report the published reference.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::error::{BuildError, PublishError};
use crate::infrastructure::git::GitClient;
use crate::services::pipeline::{BuildArtifact, BuildRequest, ContainerBuilder};
use crate::tools::{get_tool_path, tools};

/// Env var the build secret is exposed under for `docker build --secret`.
const SECRET_ENV_VAR: &str = "INFISICAL_CLIENT_SECRET";

/// Build collaborator backed by the docker CLI.
pub struct DockerBuilder {
    registry_base: String,
}

impl DockerBuilder {
    pub fn new(registry_base: impl Into<String>) -> Self {
        Self {
            registry_base: registry_base.into(),
        }
    }

    fn reference(&self, repository: &str, tag: &str) -> String {
        format!("{}/{}:{}", self.registry_base, repository, tag)
    }
}

#[async_trait]
impl ContainerBuilder for DockerBuilder {
    async fn build(&self, request: &BuildRequest) -> Result<Box<dyn BuildArtifact>, BuildError> {
        let docker = get_tool_path(tools::DOCKER);

        let sha = GitClient::in_dir(request.source.root())
            .get_sha()
            .await
            .map_err(|e| BuildError::ShaUnavailable {
                message: e.to_string(),
            })?;

        let tag = format!("{}-{}", request.environment, sha);
        let reference = self.reference(&request.repository, &tag);

        info!("🔨 Building {} for {}", reference, request.environment);

        let mut cmd = Command::new(&docker);
        cmd.args([
            "build",
            "--build-arg",
            &format!("ENVIRONMENT={}", request.environment),
            "--secret",
            &format!("id=infisical-client-secret,env={}", SECRET_ENV_VAR),
            "-t",
            &reference,
        ]);
        request.secret.expose_to_command(&mut cmd, SECRET_ENV_VAR);
        cmd.arg(request.source.root());

        let status = cmd
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| BuildError::DaemonUnavailable {
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(BuildError::BuildFailed {
                image: reference,
                message: format!("Exit code: {:?}", status.code()),
            });
        }

        Ok(Box::new(DockerArtifact { docker, reference }))
    }
}

/// A locally built image, ready to push.
pub struct DockerArtifact {
    docker: String,
    reference: String,
}

impl DockerArtifact {
    /// Digest-qualified reference, when the daemon reports one after push.
    async fn digest_reference(&self) -> Option<String> {
        let output = Command::new(&self.docker)
            .args([
                "image",
                "inspect",
                "--format",
                "{{index .RepoDigests 0}}",
                &self.reference,
            ])
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let digest = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!digest.is_empty()).then_some(digest)
    }
}

#[async_trait]
impl BuildArtifact for DockerArtifact {
    async fn publish(&self) -> Result<String, PublishError> {
        info!("📤 Pushing {}", self.reference);

        let status = Command::new(&self.docker)
            .args(["push", &self.reference])
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| PublishError::PushFailed {
                reference: self.reference.clone(),
                message: e.to_string(),
            })?;

        if !status.success() {
            return Err(PublishError::PushFailed {
                reference: self.reference.clone(),
                message: format!("Exit code: {:?}", status.code()),
            });
        }

        // Prefer the digest-qualified form when the daemon can report it.
        Ok(self
            .digest_reference()
            .await
            .unwrap_or_else(|| self.reference.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_format() {
        let builder = DockerBuilder::new("ghcr.io/mocbot");
        assert_eq!(
            builder.reference("mocbot-bot", "staging-abc1234"),
            "ghcr.io/mocbot/mocbot-bot:staging-abc1234"
        );
    }

    #[test]
    fn test_reference_with_custom_registry() {
        let builder = DockerBuilder::new("registry.example.org/bots");
        assert_eq!(
            builder.reference("mocbot-bot", "production-def5678"),
            "registry.example.org/bots/mocbot-bot:production-def5678"
        );
    }
}
