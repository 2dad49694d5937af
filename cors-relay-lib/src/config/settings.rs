use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};

use super::env;
use super::mode::{ExtractionPolicy, ModeKind};

/// Raw settings as given on the command line or in the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "cors-relay", version, about = "CORS forwarding relay")]
pub struct RelaySettings {
    /// Address to bind
    #[arg(long, env = env::HOST, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = env::PORT, default_value_t = 8080)]
    pub port: u16,

    /// Comma-separated origins that are always rejected
    #[arg(long, env = env::BLACKLIST, default_value = "")]
    pub blacklist: String,

    /// Comma-separated origins that are accepted (empty accepts all)
    #[arg(long, env = env::WHITELIST, default_value = "")]
    pub whitelist: String,

    /// "<max-requests> <period-minutes> [exempt ...]"
    #[arg(long, env = env::RATE_LIMIT, hide_env_values = true)]
    pub rate_limit: Option<String>,

    /// Comma-separated headers every request must carry
    #[arg(long, env = env::REQUIRE_HEADERS, default_value = "origin,x-requested-with")]
    pub require_headers: String,

    /// Comma-separated headers stripped from requests and responses
    #[arg(
        long,
        env = env::REMOVE_HEADERS,
        default_value = "cookie,cookie2,x-request-start,x-request-id,via,connect-time,total-route-time"
    )]
    pub remove_headers: String,

    /// Redirect instead of relaying when the target shares the caller's origin
    #[arg(long, env = env::REDIRECT_SAME_ORIGIN, default_value = "true", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub redirect_same_origin: bool,

    /// Access-Control-Max-Age for preflight responses, in seconds
    #[arg(long, env = env::CORS_MAX_AGE)]
    pub cors_max_age: Option<u64>,

    #[arg(long, env = env::SMARTPROXY_USER, hide_env_values = true)]
    pub smartproxy_user: Option<String>,

    #[arg(long, env = env::SMARTPROXY_PASS, hide_env_values = true)]
    pub smartproxy_pass: Option<String>,

    #[arg(long, env = env::SMARTPROXY_HOST, default_value = "gate.decodo.com")]
    pub smartproxy_host: String,

    #[arg(long, env = env::SMARTPROXY_PORT, default_value_t = 10000)]
    pub smartproxy_port: u16,

    /// Operating mode
    #[arg(long, env = env::RELAY_MODE, value_enum, default_value_t = ModeKind::Direct)]
    pub mode: ModeKind,

    /// Worker URL every request is relayed to (worker mode)
    #[arg(long, env = env::WORKER_ENDPOINT)]
    pub worker_endpoint: Option<String>,

    /// How the target is extracted from the path (worker mode)
    #[arg(long, env = env::WORKER_URL_POLICY, value_enum, default_value_t = ExtractionPolicy::Slice)]
    pub worker_url_policy: ExtractionPolicy,

    /// Percent-encode the target in the `url` parameter (worker mode)
    #[arg(long, env = env::WORKER_ENCODE_TARGET, default_value = "true", action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub worker_encode_target: bool,

    #[arg(long, env = env::CONNECT_TIMEOUT_MS, default_value_t = 5000)]
    pub connect_timeout_ms: u64,

    /// 0 disables the total request timeout
    #[arg(long, env = env::REQUEST_TIMEOUT_SECS, default_value_t = 0)]
    pub request_timeout_secs: u64,

    #[arg(long, env = env::POOL_IDLE_SECS, default_value_t = 90)]
    pub pool_idle_secs: u64,

    #[arg(long, env = env::SHUTDOWN_SECS, default_value_t = 30)]
    pub shutdown_secs: u64,

    #[arg(long, env = env::MAX_CONNECTIONS, default_value_t = 512)]
    pub max_connections: usize,

    /// Verbose per-request logging; any value except "0", "false" or "no" enables it
    #[arg(long, env = env::DEBUG, num_args = 0..=1, default_missing_value = "true")]
    pub debug: Option<String>,
}

impl RelaySettings {
    pub fn debug_enabled(&self) -> bool {
        match self.debug.as_deref().map(str::trim) {
            None | Some("") => false,
            Some(value) => !matches!(value.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"),
        }
    }
}
