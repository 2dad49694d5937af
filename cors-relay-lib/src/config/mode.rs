use std::fmt;

use clap::ValueEnum;
use url::Url;

/// Operating mode selected once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatingMode {
    /// Send each request to the target named in the path, optionally through a tunnel proxy
    DirectWithAgent(UpstreamAgent),
    /// Rewrite every request to one fixed worker endpoint
    RelayViaEndpoint(WorkerEndpoint),
}

impl OperatingMode {
    pub fn name(&self) -> &'static str {
        match self {
            OperatingMode::DirectWithAgent(_) => "direct-with-agent",
            OperatingMode::RelayViaEndpoint(_) => "relay-via-endpoint",
        }
    }

    /// Tunnel used for outbound connections, if any
    pub fn agent(&self) -> &UpstreamAgent {
        match self {
            OperatingMode::DirectWithAgent(agent) => agent,
            OperatingMode::RelayViaEndpoint(_) => &UpstreamAgent::NoProxy,
        }
    }
}

/// Mode name as written in `RELAY_MODE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ModeKind {
    #[default]
    Direct,
    Worker,
}

/// Outbound connection strategy for direct mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamAgent {
    NoProxy,
    /// HTTP forward proxy reached at `host:port`; https targets go through CONNECT
    TunnelProxy { host: String, port: u16, credentials: ProxyCredentials },
}

impl UpstreamAgent {
    /// Proxy URL without credentials, safe to log
    pub fn proxy_url(&self) -> Option<String> {
        match self {
            UpstreamAgent::NoProxy => None,
            UpstreamAgent::TunnelProxy { host, port, .. } => Some(format!("http://{host}:{port}")),
        }
    }
}

/// Basic-auth credentials for the tunnel proxy
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for ProxyCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyCredentials")
            .field("username", &"[CONFIGURED]")
            .field("password", &"[CONFIGURED]")
            .finish()
    }
}

/// How the original target URL is pulled out of the inbound path in worker mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExtractionPolicy {
    /// Path and query with the leading slash removed
    #[default]
    Slice,
    /// Understands `/http(s)://...` and `/?url=...`, otherwise behaves like `Slice`
    PrefixAware,
}

/// Fixed endpoint every request is relayed to in worker mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerEndpoint {
    pub url: Url,
    pub policy: ExtractionPolicy,
    /// Percent-encode the target before placing it in the `url` query parameter.
    /// Some deployments pass it raw; the worker must then parse it leniently.
    pub encode_target: bool,
}

impl WorkerEndpoint {
    pub fn new(url: Url) -> Self {
        Self { url, policy: ExtractionPolicy::default(), encode_target: true }
    }
}
