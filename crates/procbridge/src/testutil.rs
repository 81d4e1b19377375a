//! Throwaway child executables for tests.

use std::os::unix::fs::PermissionsExt;

use tempfile::TempDir;

use crate::executable::Executable;

/// A `/bin/sh` script on disk. The directory is removed on drop.
pub struct Script {
    _dir: TempDir,
    pub executable: Executable,
}

pub fn script(body: &str) -> Script {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("child");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    Script {
        _dir: dir,
        executable: Executable::from_path(path),
    }
}
