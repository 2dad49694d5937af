use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise the level is `debug` with `debug` on and
/// `info` without.
pub fn init_tracing(debug: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(debug);

    let subscriber = Registry::default().with(env_filter).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| format!("Failed to set global tracing subscriber: {e}"))?;

    Ok(())
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug,hyper=info,hyper_util=info,reqwest=info"
    } else {
        "info"
    }
}
