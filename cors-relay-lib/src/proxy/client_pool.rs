use reqwest::{redirect, Client, Proxy};

use crate::config::{RelayConfig, UpstreamAgent};
use crate::error::{RelayError, Result};

/// Shared HTTP client for upstream connections
///
/// One client is built at startup and cloned into every request; clones share
/// the same connection pool, so outbound and tunnel connections are reused.
///
/// - `NoProxy`: direct connections. Proxy environment variables are ignored.
/// - `TunnelProxy`: every connection goes through `http://host:port` with basic
///   auth (`CONNECT` for https targets, absolute-form requests for http).
///
/// Redirects are never followed; the caller sees the upstream 3xx.
pub fn build_upstream_client(config: &RelayConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .redirect(redirect::Policy::none())
        .connect_timeout(config.timeout.connect())
        .pool_idle_timeout(config.timeout.pool_idle());

    if let Some(total) = config.timeout.request() {
        builder = builder.timeout(total);
    }

    builder = match config.mode.agent() {
        UpstreamAgent::NoProxy => builder.no_proxy(),
        UpstreamAgent::TunnelProxy { host, port, credentials } => {
            let proxy_url = format!("http://{host}:{port}");
            let proxy = Proxy::all(&proxy_url)
                .map_err(|e| RelayError::Client(format!("invalid proxy {proxy_url}: {e}")))?
                .basic_auth(&credentials.username, &credentials.password);
            builder.proxy(proxy)
        }
    };

    builder
        .build()
        .map_err(|e| RelayError::Client(e.to_string()))
}
