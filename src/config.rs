//! Pipeline configuration
//!
//! Fixed identifiers plus optional overrides from a `ci.yaml` file at the
//! source root. Environment variables win over file values.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Repository identifier reported to the build collaborator.
pub const REPO_NAME: &str = "mocbot-bot";

/// Python toolchain version used by the lint container.
pub const PYTHON_VERSION: &str = "3.10";

/// Environment used when the caller does not specify one.
pub const DEFAULT_ENVIRONMENT: &str = "staging";

/// Optional overrides loaded from `ci.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Container registry base (host/namespace, no trailing slash)
    #[serde(default = "default_registry_base")]
    pub registry_base: String,

    /// Python version for the lint container
    #[serde(default = "default_python_version")]
    pub python_version: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            registry_base: default_registry_base(),
            python_version: default_python_version(),
        }
    }
}

fn default_registry_base() -> String {
    "ghcr.io/mocbot".to_string()
}

fn default_python_version() -> String {
    PYTHON_VERSION.to_string()
}

impl PipelineConfig {
    /// Load configuration for a source tree.
    ///
    /// A missing `ci.yaml` yields defaults. `REGISTRY_BASE` always wins
    /// over the file value.
    pub fn load(source_root: &Path) -> Result<Self> {
        let path = source_root.join("ci.yaml");
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(base) = std::env::var("REGISTRY_BASE") {
            if !base.is_empty() {
                config.registry_base = base;
            }
        }

        Ok(config)
    }
}
