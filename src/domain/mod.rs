//! Domain types
//!
//! The immutable values a pipeline invocation is built from: the source
//! tree view and the credential handle.

pub mod secret;
pub mod source;

pub use secret::Secret;
pub use source::{SourceFile, SourceView};
