//! Runtime tool path resolution
//!
//! External tools are resolved through `{TOOL}_BIN` environment variables
//! with a PATH fallback, so pipeline runners can pin exact binaries while
//! local runs keep working.

use std::env;

/// Get the path to an external tool
///
/// Checks `{TOOL}_BIN` (uppercase tool name + "_BIN"), falling back to
/// the tool name itself, which relies on PATH.
pub fn get_tool_path(tool: &str) -> String {
    let env_var = format!("{}_BIN", tool.to_uppercase());
    env::var(&env_var).unwrap_or_else(|_| tool.to_string())
}

/// Verify the docker client is present before a stage starts
///
/// Returns the resolved binary path. Failing here keeps the collaborator
/// error paths for real pipeline failures rather than missing tooling.
pub fn docker_preflight() -> anyhow::Result<String> {
    let docker = get_tool_path(tools::DOCKER);
    which::which(&docker).map_err(|_| {
        anyhow::anyhow!(
            "docker not found ({}). Install docker or set DOCKER_BIN to the binary path.",
            docker
        )
    })?;
    Ok(docker)
}

/// Common tool names
pub mod tools {
    pub const DOCKER: &str = "docker";
    pub const GIT: &str = "git";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_tool_path_from_env() {
        env::set_var("FAKETOOL_BIN", "/custom/path/to/faketool");
        assert_eq!(get_tool_path("faketool"), "/custom/path/to/faketool");
        env::remove_var("FAKETOOL_BIN");
    }

    #[test]
    fn test_get_tool_path_fallback() {
        env::remove_var("MISSINGTOOL_BIN");
        assert_eq!(get_tool_path("missingtool"), "missingtool");
    }
}
