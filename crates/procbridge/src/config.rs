//! Deployment-time configuration for the server binary.
//!
//! Every option can come from a flag or an environment variable. None of it
//! is ever derived from request content.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::bridge::BridgeConfig;
use crate::executable::{ConfigError, DEFAULT_EXECUTABLE, Executable};
use crate::transport::ServerConfig;

/// HTTP bridge that runs one child process per request over stdio.
#[derive(Debug, Parser)]
#[command(name = "procbridge", version)]
pub struct Cli {
    /// Address to bind
    #[arg(long, env = "PROCBRIDGE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PROCBRIDGE_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Child executable; relative paths resolve against the directory of this binary
    #[arg(long, env = "PROCBRIDGE_EXECUTABLE", default_value = DEFAULT_EXECUTABLE)]
    pub executable: PathBuf,

    /// Kill the child and fail the request after this many milliseconds
    #[arg(
        long,
        env = "PROCBRIDGE_TIMEOUT_MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_ms: Option<u64>,

    /// Ignore SIGTERM; only SIGINT stops the server
    #[arg(long, env = "PROCBRIDGE_AWAIT_EXPLICIT_SHUTDOWN")]
    pub await_explicit_shutdown: bool,
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            await_explicit_shutdown: self.await_explicit_shutdown,
        }
    }

    pub fn bridge_config(&self) -> Result<BridgeConfig, ConfigError> {
        let config = BridgeConfig::new(Executable::resolve(&self.executable)?);
        Ok(match self.timeout_ms {
            Some(ms) => config.with_timeout(Duration::from_millis(ms)),
            None => config,
        })
    }
}
