//! Health status of the bridge.

use serde::{Deserialize, Serialize};

use crate::executable::Executable;

/// Whether the bridge can currently serve requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Health {
    /// Executable present and runnable
    Ready,
    /// Executable missing or lacks execute permission
    Unavailable,
}

impl Health {
    pub fn of(executable: &Executable) -> Self {
        if executable.is_available() {
            Health::Ready
        } else {
            Health::Unavailable
        }
    }
}
