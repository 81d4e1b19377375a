//! Version information for procbridge.

/// procbridge version from Cargo.toml
pub const PROCBRIDGE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version information reported by the health check.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VersionInfo {
    pub procbridge: &'static str,
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self {
            procbridge: PROCBRIDGE_VERSION,
        }
    }
}

impl VersionInfo {
    pub fn new() -> Self {
        Self::default()
    }
}
