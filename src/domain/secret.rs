//! Opaque secret handle.
//!
//! Credential material is captured once at CLI construction and passed by
//! reference to the build collaborator. The value is never logged or
//! serialized; the only egress is injection into a child-process
//! environment.

use std::fmt;
use std::str::FromStr;

use tokio::process::Command;

/// An opaque credential handle.
///
/// Implements neither `Display` nor serde traits, and `Debug` is redacted,
/// so the value cannot leak through logs or error formatting.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    /// Wrap a credential value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Inject the value into a child process environment variable.
    ///
    /// The only way the material leaves the handle.
    pub fn expose_to_command(&self, cmd: &mut Command, var: &str) {
        cmd.env(var, &self.0);
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(****)")
    }
}

impl FromStr for Secret {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}
