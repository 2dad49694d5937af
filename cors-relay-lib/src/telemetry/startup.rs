use std::fmt;

use tracing::{debug, info, warn};

use crate::config::{env, OperatingMode, RelayConfig, UpstreamAgent};

/// Conditions worth telling the operator about once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupWarning {
    /// Direct mode without rotating proxy credentials
    DirectWithoutTunnel,
}

impl fmt::Display for StartupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupWarning::DirectWithoutTunnel => write!(
                f,
                "{} / {} not set; outbound requests go out directly without the rotating proxy",
                env::SMARTPROXY_USER,
                env::SMARTPROXY_PASS
            ),
        }
    }
}

pub fn startup_warnings(config: &RelayConfig) -> Vec<StartupWarning> {
    let mut warnings = Vec::new();
    if matches!(config.mode, OperatingMode::DirectWithAgent(UpstreamAgent::NoProxy)) {
        warnings.push(StartupWarning::DirectWithoutTunnel);
    }
    warnings
}

/// Environment variables and their values as shown at startup; secrets are masked
pub fn env_summary<F>(lookup: F) -> Vec<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    env::all_env_vars()
        .iter()
        .map(|&name| {
            let shown = match lookup(name) {
                Some(_) if env::is_secret(name) => "[CONFIGURED]".to_string(),
                Some(value) => value,
                None => "[NOT SET]".to_string(),
            };
            (name, shown)
        })
        .collect()
}

/// Log the startup banner and any warnings, once per process
pub fn log_startup(config: &RelayConfig) {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen = %config.listen,
        mode = config.mode.name(),
        "cors relay starting"
    );

    match &config.mode {
        OperatingMode::DirectWithAgent(agent) => match agent.proxy_url() {
            Some(proxy) => info!(proxy = %proxy, "rotating proxy tunnel enabled"),
            None => info!("rotating proxy tunnel disabled"),
        },
        OperatingMode::RelayViaEndpoint(worker) => info!(
            endpoint = %worker.url,
            policy = ?worker.policy,
            encode_target = worker.encode_target,
            "relaying every request to the worker endpoint"
        ),
    }

    let origins = &config.security.origins;
    info!(
        whitelist = origins.whitelist.len(),
        blacklist = origins.blacklist.len(),
        require_headers = ?origins.require_headers,
        rate_limited = config.security.rate_limit.is_some(),
        redirect_same_origin = config.security.redirect_same_origin,
        "origin policy"
    );

    for (name, value) in env_summary(|name| std::env::var(name).ok()) {
        debug!("{name:<28} = {value}");
    }

    for warning in startup_warnings(config) {
        warn!("{warning}");
    }
}
