use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use procbridge::{Bridge, Cli, PROCBRIDGE_VERSION, transport::serve};

/// Initialize tracing with PROCBRIDGE_LOG and LOG_FORMAT support.
fn init_tracing() {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match std::env::var("PROCBRIDGE_LOG").as_deref() {
            Ok("trace") => "trace",
            Ok("debug") => "debug",
            Ok("warn") | Ok("warning") => "warn",
            Ok("error") => "error",
            _ => "info",
        };
        EnvFilter::new(format!("procbridge={level}"))
    };

    let use_json = std::env::var("LOG_FORMAT").as_deref() == Ok("json");

    if use_json {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr));
        let _ = subscriber.try_init();
    } else {
        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr));
        let _ = subscriber.try_init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    info!("procbridge {}", PROCBRIDGE_VERSION);

    let bridge = Bridge::new(cli.bridge_config()?);
    let executable = bridge.executable().path().display().to_string();
    if bridge.executable().is_available() {
        info!(%executable, timeout = ?bridge.timeout(), "Bridge configured");
    } else {
        warn!(%executable, "Executable missing or not executable; requests will fail until it is installed");
    }

    serve(cli.server_config(), Arc::new(bridge)).await
}
