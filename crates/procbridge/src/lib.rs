//! procbridge: runs one child process per HTTP request over stdio.

mod health;
mod version;

pub mod bridge;
pub mod config;
pub mod executable;
pub mod transport;

#[cfg(all(test, unix))]
mod testutil;

pub use bridge::{Bridge, BridgeConfig, BridgeError, BridgeResponse, Captured, ExitOutcome, Stage};
pub use config::Cli;
pub use executable::{ConfigError, DEFAULT_EXECUTABLE, Executable};
pub use health::Health;
pub use version::{PROCBRIDGE_VERSION, VersionInfo};
