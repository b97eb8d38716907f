use crate::error::{BuildError, Result};
use std::env as stdenv;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Directory that relative paths are resolved against.
///
/// By default this is the process's current working directory, captured once when
/// a config is built. Callers that need reproducible output independent of the
/// process state (tests, settings files) pass an explicit directory instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolver {
    base_dir: PathBuf,
}

impl Resolver {
    /// Capture the current working directory of the process.
    pub fn current() -> Result<Self> {
        let base_dir = stdenv::current_dir().map_err(|e| {
            BuildError::invalid_path(".", format!("can't read current directory: {}", e))
        })?;
        Self::with_base(base_dir)
    }

    /// Resolve against `base_dir`, which must itself be absolute.
    pub fn with_base(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        if !base_dir.is_absolute() {
            return Err(BuildError::invalid_path(
                base_dir,
                "resolution directory must be absolute",
            ));
        }
        let base_dir = lexical_normalize(&base_dir);
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Turn `path` into an absolute, lexically normalized path.
    ///
    /// `.` components are dropped and `..` pops the previous component, without
    /// consulting the filesystem, so symlinks are left untouched. The result must
    /// be valid UTF-8 since it ends up inside a command-line flag.
    pub fn normalize(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(BuildError::invalid_path(path, "path is empty"));
        }
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        };
        let normalized = lexical_normalize(&joined);
        if normalized.to_str().is_none() {
            return Err(BuildError::invalid_path(path, "path is not valid UTF-8"));
        }
        debug!(from = %path.display(), to = %normalized.display(), "normalized path");
        Ok(normalized)
    }
}

fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            // `..` at the root stays at the root, as the OS resolves it.
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
