//! Centralized error types for mocbot-ci
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use thiserror::Error;

/// Top-level error type for pipeline operations
///
/// Collaborator errors pass through transparently: callers see the
/// original message, never a rewrapped one.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Lint(#[from] LintError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Lint collaborator errors
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Lint checks failed with exit code {code}")]
    Failed { code: i32 },

    #[error("Lint runner failed: {message}")]
    RunnerFailed { message: String },
}

/// Build stage errors
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Docker daemon unavailable: {message}")]
    DaemonUnavailable { message: String },

    #[error("Image build failed for {image}: {message}")]
    BuildFailed { image: String, message: String },

    #[error("Failed to resolve git SHA for image tagging: {message}")]
    ShaUnavailable { message: String },
}

/// Publish stage errors
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Push failed for {reference}: {message}")]
    PushFailed { reference: String, message: String },
}

/// Source view errors
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Not a directory: {path}")]
    NotADirectory { path: String },

    #[error("Subtree not found: {path}")]
    MissingSubtree { path: String },

    #[error("Overlay failed for {path}: {message}")]
    OverlayFailed { path: String, message: String },
}

/// Git operation errors
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Failed to get git SHA: {0}")]
    ShaFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lint_error_display() {
        let err = LintError::Failed { code: 1 };
        assert!(err.to_string().contains("exit code 1"));
    }

    #[test]
    fn test_error_conversion() {
        let lint_err = LintError::Failed { code: 2 };
        let pipeline_err: PipelineError = lint_err.into();
        assert!(matches!(pipeline_err, PipelineError::Lint(_)));
    }

    #[test]
    fn test_transparent_propagation() {
        let inner = PublishError::PushFailed {
            reference: "ghcr.io/mocbot/mocbot-bot:staging-abc1234".to_string(),
            message: "denied".to_string(),
        };
        let inner_msg = inner.to_string();
        let err: PipelineError = inner.into();
        assert_eq!(err.to_string(), inner_msg);
    }
}
