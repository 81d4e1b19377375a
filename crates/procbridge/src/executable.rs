//! Location of the child executable.
//!
//! The path is fixed at deployment time. Relative paths are anchored to the
//! directory holding the running server binary, so a sibling binary installed
//! next to `procbridge` is found regardless of the working directory.

use std::path::{Path, PathBuf};

/// Executable used when none is configured: the sibling `procbridge-cli` binary.
pub const DEFAULT_EXECUTABLE: &str = "procbridge-cli";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("executable path is empty")]
    EmptyPath,
    #[error("failed to locate the running binary: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("running binary {0} has no parent directory")]
    NoInstallDir(PathBuf),
}

/// A resolved path to the child executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executable {
    path: PathBuf,
}

impl Executable {
    /// Resolve a configured path against the server's installation directory.
    pub fn resolve(configured: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let configured = configured.as_ref();
        if configured.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if configured.is_absolute() {
            return Ok(Self::from_path(configured));
        }

        let current = std::env::current_exe().map_err(ConfigError::CurrentExe)?;
        let install_dir = current
            .parent()
            .ok_or_else(|| ConfigError::NoInstallDir(current.clone()))?;
        Self::resolve_against(configured, install_dir)
    }

    /// Resolve a configured path against an explicit base directory.
    pub fn resolve_against(
        configured: impl AsRef<Path>,
        base: impl AsRef<Path>,
    ) -> Result<Self, ConfigError> {
        let configured = configured.as_ref();
        if configured.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if configured.is_absolute() {
            return Ok(Self::from_path(configured));
        }
        Ok(Self::from_path(base.as_ref().join(configured)))
    }

    /// Use a path verbatim, without resolution.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name shown to callers in `"<name> failed"` messages.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Whether the file exists and can be executed.
    ///
    /// Only used for health reporting; the bridge itself never pre-checks and
    /// relies on the spawn error instead.
    pub fn is_available(&self) -> bool {
        let Ok(metadata) = std::fs::metadata(&self.path) else {
            return false;
        };
        if !metadata.is_file() {
            return false;
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            metadata.permissions().mode() & 0o111 != 0
        }

        #[cfg(not(unix))]
        {
            true
        }
    }
}
