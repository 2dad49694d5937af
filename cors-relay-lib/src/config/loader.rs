use std::collections::HashSet;
use std::net::{IpAddr, SocketAddr};

use clap::Parser;
use http::HeaderName;
use url::Url;

use super::mode::{ModeKind, OperatingMode, ProxyCredentials, UpstreamAgent, WorkerEndpoint};
use super::security::{OriginPolicy, SecurityConfig};
use super::settings::RelaySettings;
use super::timeout::TimeoutConfig;
use super::types::RelayConfig;
use super::validator::validate;
use crate::error::{RelayError, Result};
use crate::security::rate_limit::RateLimitSpec;

/// Read settings from the process environment and build the relay configuration
pub fn load_from_env() -> Result<RelayConfig> {
    let settings = RelaySettings::try_parse_from(["cors-relay"])
        .map_err(|e| RelayError::Config(e.to_string()))?;
    build_config(&settings)
}

/// Turn raw settings into a validated, immutable configuration
pub fn build_config(settings: &RelaySettings) -> Result<RelayConfig> {
    let listen = parse_listen(&settings.host, settings.port)?;

    let mode = match settings.mode {
        ModeKind::Direct => OperatingMode::DirectWithAgent(select_agent(settings)),
        ModeKind::Worker => OperatingMode::RelayViaEndpoint(build_worker(settings)?),
    };

    let rate_limit = match settings.rate_limit.as_deref() {
        Some(spec) => RateLimitSpec::parse(spec)?,
        None => None,
    };

    let security = SecurityConfig {
        origins: OriginPolicy {
            blacklist: parse_list(&settings.blacklist).collect::<HashSet<_>>(),
            whitelist: parse_list(&settings.whitelist).collect::<HashSet<_>>(),
            require_headers: parse_header_names(&settings.require_headers)?,
        },
        remove_headers: parse_header_names(&settings.remove_headers)?,
        redirect_same_origin: settings.redirect_same_origin,
        rate_limit,
        cors_max_age: settings.cors_max_age,
        max_connections: settings.max_connections,
    };

    let timeout = TimeoutConfig {
        connect_ms: settings.connect_timeout_ms,
        request_secs: settings.request_timeout_secs,
        pool_idle_secs: settings.pool_idle_secs,
        shutdown_secs: settings.shutdown_secs,
    };

    let config =
        RelayConfig { listen, mode, security, timeout, debug: settings.debug_enabled() };
    validate(&config)?;
    Ok(config)
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn parse_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
}

fn parse_header_names(raw: &str) -> Result<Vec<HeaderName>> {
    parse_list(raw)
        .map(|name| {
            HeaderName::from_bytes(name.to_ascii_lowercase().as_bytes())
                .map_err(|e| RelayError::Config(format!("Invalid header name '{name}': {e}")))
        })
        .collect()
}

fn parse_listen(host: &str, port: u16) -> Result<SocketAddr> {
    let host = host.trim().trim_start_matches('[').trim_end_matches(']');
    let ip = match host {
        "localhost" => IpAddr::from([127, 0, 0, 1]),
        other => other
            .parse::<IpAddr>()
            .map_err(|e| RelayError::Config(format!("Invalid HOST '{other}': {e}")))?,
    };
    Ok(SocketAddr::new(ip, port))
}

/// The tunnel is used only when both user and password are present
fn select_agent(settings: &RelaySettings) -> UpstreamAgent {
    let user = settings.smartproxy_user.as_deref().filter(|v| !v.is_empty());
    let pass = settings.smartproxy_pass.as_deref().filter(|v| !v.is_empty());
    match (user, pass) {
        (Some(username), Some(password)) => UpstreamAgent::TunnelProxy {
            host: settings.smartproxy_host.clone(),
            port: settings.smartproxy_port,
            credentials: ProxyCredentials {
                username: username.to_string(),
                password: password.to_string(),
            },
        },
        _ => UpstreamAgent::NoProxy,
    }
}

fn build_worker(settings: &RelaySettings) -> Result<WorkerEndpoint> {
    let raw = settings
        .worker_endpoint
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(RelayError::MissingWorkerEndpoint)?;

    let url = Url::parse(raw).map_err(|e| RelayError::InvalidWorkerEndpoint {
        endpoint: raw.to_string(),
        reason: e.to_string(),
    })?;

    Ok(WorkerEndpoint {
        url,
        policy: settings.worker_url_policy,
        encode_target: settings.worker_encode_target,
    })
}
