//! Pipeline context and collaborator seams.
//!
//! The pipeline is declarative glue: each operation assembles its inputs,
//! hands them to an external collaborator, and surfaces the result
//! verbatim. Collaborators sit behind traits so invocations can target
//! the docker-backed implementations or test doubles.

use async_trait::async_trait;
use tracing::info;

use crate::config::{PipelineConfig, DEFAULT_ENVIRONMENT, REPO_NAME};
use crate::domain::{Secret, SourceView};
use crate::error::{BuildError, LintError, PipelineError, PublishError};
use crate::infrastructure::docker::DockerBuilder;
use crate::infrastructure::lint::Flake8Runner;

/// Options forwarded to the lint collaborator.
#[derive(Debug, Clone)]
pub struct LintOptions {
    /// Python toolchain version for the lint container.
    pub python_version: String,
}

/// Inputs forwarded to the build collaborator.
pub struct BuildRequest {
    pub source: SourceView,
    pub secret: Secret,
    pub repository: String,
    pub environment: String,
}

/// External lint collaborator.
#[async_trait]
pub trait LintRunner: Send + Sync {
    async fn lint(&self, view: &SourceView, options: &LintOptions) -> Result<(), LintError>;
}

/// External build collaborator.
///
/// Build produces an artifact; publishing the artifact pushes it and
/// yields the published reference.
#[async_trait]
pub trait ContainerBuilder: Send + Sync {
    async fn build(&self, request: &BuildRequest) -> Result<Box<dyn BuildArtifact>, BuildError>;
}

/// A built image, ready to publish.
#[async_trait]
pub trait BuildArtifact: Send + Sync {
    async fn publish(&self) -> Result<String, PublishError>;
}

/// Pipeline context: the immutable inputs captured once per invocation.
pub struct Pipeline {
    source: SourceView,
    infisical_client_secret: Secret,
    python_version: String,
    lint_runner: Box<dyn LintRunner>,
    builder: Box<dyn ContainerBuilder>,
}

impl Pipeline {
    /// Create a pipeline with docker-backed collaborators.
    pub fn new(source: SourceView, infisical_client_secret: Secret, config: &PipelineConfig) -> Self {
        Self {
            source,
            infisical_client_secret,
            python_version: config.python_version.clone(),
            lint_runner: Box::new(Flake8Runner::new()),
            builder: Box::new(DockerBuilder::new(config.registry_base.clone())),
        }
    }

    /// Builder: replace the lint collaborator.
    pub fn with_lint_runner(mut self, runner: Box<dyn LintRunner>) -> Self {
        self.lint_runner = runner;
        self
    }

    /// Builder: replace the build collaborator.
    pub fn with_builder(mut self, builder: Box<dyn ContainerBuilder>) -> Self {
        self.builder = builder;
        self
    }

    /// Run lint checks over the library subtree.
    ///
    /// The derived view holds exactly the `lib` subtree plus the `.flake8`
    /// configuration overlaid at its root; the lint tooling reads that
    /// file from its working directory.
    pub async fn ci(&self) -> Result<(), PipelineError> {
        let src_dir = self
            .source
            .subdirectory("lib")?
            .overlay_file(&self.source.file(".flake8"))?;

        let options = LintOptions {
            python_version: self.python_version.clone(),
        };
        info!("Running lint checks (python {})", options.python_version);
        self.lint_runner.lint(&src_dir, &options).await?;
        Ok(())
    }

    /// Build the container image and push it to the registry.
    ///
    /// Build must complete successfully before publish is attempted; the
    /// published reference is returned exactly as the collaborator
    /// produced it.
    pub async fn build_and_push(&self, env: Option<String>) -> Result<String, PipelineError> {
        let environment = env.unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
        let request = BuildRequest {
            source: self.source.clone(),
            secret: self.infisical_client_secret.clone(),
            repository: REPO_NAME.to_string(),
            environment,
        };

        let artifact = self.builder.build(&request).await?;
        let reference = artifact.publish().await?;
        Ok(reference)
    }
}
