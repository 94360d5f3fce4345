//! Immutable source tree views.
//!
//! A `SourceView` is a read-only handle to a directory tree. Derivations
//! (`subdirectory`, `overlay_file`) produce new, independent views and
//! never touch the parent. Views that required materialization own their
//! staging directory, kept alive for as long as the view or anything
//! derived from it exists.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::error::SourceError;

/// Read-only handle to a directory tree.
#[derive(Clone, Debug)]
pub struct SourceView {
    root: PathBuf,
    // Staging guard for copy-on-derive views; shared with derivations.
    staging: Option<Arc<TempDir>>,
}

impl SourceView {
    /// Open a view over an existing directory.
    ///
    /// The path is canonicalized so the view can be bind-mounted by
    /// container collaborators.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let root = root.into();
        let root = root.canonicalize().map_err(|_| SourceError::NotADirectory {
            path: root.display().to_string(),
        })?;
        if !root.is_dir() {
            return Err(SourceError::NotADirectory {
                path: root.display().to_string(),
            });
        }
        Ok(Self {
            root,
            staging: None,
        })
    }

    /// Path of the view root on the host filesystem.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Handle to a single file inside the view.
    pub fn file(&self, rel: impl AsRef<Path>) -> SourceFile {
        SourceFile {
            path: self.root.join(rel.as_ref()),
            _staging: self.staging.clone(),
        }
    }

    /// Derive a view rooted at a subdirectory.
    ///
    /// A cheap re-root: no copying, and the parent's staging guard is
    /// shared so the underlying tree outlives the parent handle.
    pub fn subdirectory(&self, rel: impl AsRef<Path>) -> Result<Self, SourceError> {
        let root = self.root.join(rel.as_ref());
        if !root.is_dir() {
            return Err(SourceError::MissingSubtree {
                path: root.display().to_string(),
            });
        }
        Ok(Self {
            root,
            staging: self.staging.clone(),
        })
    }

    /// Derive a new view with one extra file overlaid at the root.
    ///
    /// Copy-on-derive: the current contents are copied into a fresh
    /// staging directory and the file lands at the staged root under its
    /// original name. The parent view is unaffected.
    pub fn overlay_file(&self, file: &SourceFile) -> Result<Self, SourceError> {
        let staging = TempDir::new().map_err(|e| SourceError::OverlayFailed {
            path: self.root.display().to_string(),
            message: e.to_string(),
        })?;

        copy_tree(&self.root, staging.path()).map_err(|e| SourceError::OverlayFailed {
            path: self.root.display().to_string(),
            message: e.to_string(),
        })?;

        let name = file
            .path
            .file_name()
            .ok_or_else(|| SourceError::OverlayFailed {
                path: file.path.display().to_string(),
                message: "overlay source has no file name".to_string(),
            })?;
        fs::copy(&file.path, staging.path().join(name)).map_err(|e| {
            SourceError::OverlayFailed {
                path: file.path.display().to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Self {
            root: staging.path().to_path_buf(),
            staging: Some(Arc::new(staging)),
        })
    }
}

/// Handle to a single file inside a view.
#[derive(Clone)]
pub struct SourceFile {
    path: PathBuf,
    // Keeps the owning view's staging alive while the handle exists.
    _staging: Option<Arc<TempDir>>,
}

impl SourceFile {
    /// Path of the file on the host filesystem.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn copy_tree(src: &Path, dst: &Path) -> io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            fs::create_dir(&target)?;
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Lay out a miniature bot repository:
    /// lib/{bot/__init__.py, cogs/music.py}, .flake8, Dockerfile, README.md
    fn fixture_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("lib/bot")).unwrap();
        fs::create_dir_all(dir.path().join("lib/cogs")).unwrap();
        fs::write(dir.path().join("lib/bot/__init__.py"), "BOT = True\n").unwrap();
        fs::write(dir.path().join("lib/cogs/music.py"), "COG = True\n").unwrap();
        fs::write(dir.path().join(".flake8"), "[flake8]\nmax-line-length = 120\n").unwrap();
        fs::write(dir.path().join("Dockerfile"), "FROM python:3.10\n").unwrap();
        fs::write(dir.path().join("README.md"), "# bot\n").unwrap();
        dir
    }

    fn relative_files(root: &Path) -> BTreeSet<String> {
        fn walk(root: &Path, dir: &Path, out: &mut BTreeSet<String>) {
            for entry in fs::read_dir(dir).unwrap() {
                let entry = entry.unwrap();
                if entry.file_type().unwrap().is_dir() {
                    walk(root, &entry.path(), out);
                } else {
                    let rel = entry.path().strip_prefix(root).unwrap().to_path_buf();
                    out.insert(rel.to_string_lossy().into_owned());
                }
            }
        }
        let mut out = BTreeSet::new();
        walk(root, root, &mut out);
        out
    }

    #[test]
    fn test_open_rejects_missing_directory() {
        let err = SourceView::open("/does/not/exist").unwrap_err();
        assert!(matches!(err, SourceError::NotADirectory { .. }));
    }

    #[test]
    fn test_subdirectory_reroots_without_copying() {
        let tree = fixture_tree();
        let view = SourceView::open(tree.path()).unwrap();
        let lib = view.subdirectory("lib").unwrap();

        assert!(lib.root().ends_with("lib"));
        assert_eq!(
            relative_files(lib.root()),
            ["bot/__init__.py", "cogs/music.py"]
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn test_subdirectory_missing_subtree() {
        let tree = fixture_tree();
        let view = SourceView::open(tree.path()).unwrap();
        let err = view.subdirectory("nope").unwrap_err();
        assert!(matches!(err, SourceError::MissingSubtree { .. }));
    }

    #[test]
    fn test_overlay_places_file_at_root_with_original_name() {
        let tree = fixture_tree();
        let view = SourceView::open(tree.path()).unwrap();

        let derived = view
            .subdirectory("lib")
            .unwrap()
            .overlay_file(&view.file(".flake8"))
            .unwrap();

        // Exactly the lib subtree plus the overlaid config, nothing else
        // from the source root.
        assert_eq!(
            relative_files(derived.root()),
            [".flake8", "bot/__init__.py", "cogs/music.py"]
                .iter()
                .map(|s| s.to_string())
                .collect::<BTreeSet<_>>()
        );
        let overlaid = fs::read_to_string(derived.root().join(".flake8")).unwrap();
        assert!(overlaid.contains("max-line-length"));
    }

    #[test]
    fn test_overlay_leaves_parent_untouched() {
        let tree = fixture_tree();
        let view = SourceView::open(tree.path()).unwrap();
        let before = relative_files(view.root());

        let _derived = view
            .subdirectory("lib")
            .unwrap()
            .overlay_file(&view.file(".flake8"))
            .unwrap();

        assert_eq!(relative_files(view.root()), before);
        // Deriving again from the unchanged parent yields the same result.
        let again = view
            .subdirectory("lib")
            .unwrap()
            .overlay_file(&view.file(".flake8"))
            .unwrap();
        assert!(again.root().join(".flake8").exists());
    }

    #[test]
    fn test_overlay_missing_file_fails() {
        let tree = fixture_tree();
        let view = SourceView::open(tree.path()).unwrap();
        let err = view
            .subdirectory("lib")
            .unwrap()
            .overlay_file(&view.file(".does-not-exist"))
            .unwrap_err();
        assert!(matches!(err, SourceError::OverlayFailed { .. }));
    }

    #[test]
    fn test_derived_staging_outlives_parent_handle() {
        let tree = fixture_tree();
        let view = SourceView::open(tree.path()).unwrap();

        let overlaid = view
            .subdirectory("lib")
            .unwrap()
            .overlay_file(&view.file(".flake8"))
            .unwrap();
        let cogs = overlaid.subdirectory("cogs").unwrap();
        drop(overlaid);

        // The staged tree is shared, not re-copied, so the child keeps it
        // alive after the parent handle is gone.
        assert!(cogs.root().join("music.py").exists());
    }
}
