#![forbid(unsafe_code)]

use std::sync::Arc;

use clap::Parser;
use cors_relay_lib::config::{build_config, RelaySettings};
use cors_relay_lib::telemetry::{init_tracing, log_startup};
use tracing::error;

#[tokio::main]
async fn main() {
    let settings = match RelaySettings::try_parse() {
        Ok(settings) => settings,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };

    if let Err(err) = init_tracing(settings.debug_enabled()) {
        eprintln!("failed to initialize logging: {err}");
    }

    let config = match build_config(&settings) {
        Ok(config) => Arc::new(config),
        Err(err) => {
            error!(%err, "failed to load configuration");
            std::process::exit(1);
        }
    };

    log_startup(&config);

    if let Err(err) = cors_relay_lib::run(config).await {
        error!(%err, "relay exited with error");
        std::process::exit(1);
    }
}
