//! Environment variable names read at startup

/// Bind address
pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";

/// Origin policy and rate limiting
pub const BLACKLIST: &str = "CORSANYWHERE_BLACKLIST";
pub const WHITELIST: &str = "CORSANYWHERE_WHITELIST";
pub const RATE_LIMIT: &str = "CORSANYWHERE_RATELIMIT";
pub const REQUIRE_HEADERS: &str = "REQUIRE_HEADERS";
pub const REMOVE_HEADERS: &str = "REMOVE_HEADERS";
pub const REDIRECT_SAME_ORIGIN: &str = "REDIRECT_SAME_ORIGIN";
pub const CORS_MAX_AGE: &str = "CORS_MAX_AGE";

/// Rotating proxy tunnel (direct mode)
pub const SMARTPROXY_USER: &str = "SMARTPROXY_USER";
pub const SMARTPROXY_PASS: &str = "SMARTPROXY_PASS";
pub const SMARTPROXY_HOST: &str = "SMARTPROXY_HOST";
pub const SMARTPROXY_PORT: &str = "SMARTPROXY_PORT";

/// Operating mode and worker endpoint
pub const RELAY_MODE: &str = "RELAY_MODE";
pub const WORKER_ENDPOINT: &str = "WORKER_ENDPOINT";
pub const WORKER_URL_POLICY: &str = "WORKER_URL_POLICY";
pub const WORKER_ENCODE_TARGET: &str = "WORKER_ENCODE_TARGET";

/// Timeouts and limits
pub const CONNECT_TIMEOUT_MS: &str = "RELAY_CONNECT_TIMEOUT_MS";
pub const REQUEST_TIMEOUT_SECS: &str = "RELAY_REQUEST_TIMEOUT_SECS";
pub const POOL_IDLE_SECS: &str = "RELAY_POOL_IDLE_SECS";
pub const SHUTDOWN_SECS: &str = "RELAY_SHUTDOWN_SECS";
pub const MAX_CONNECTIONS: &str = "RELAY_MAX_CONNECTIONS";

pub const DEBUG: &str = "DEBUG";

/// Variables whose values must never be printed
pub fn is_secret(var_name: &str) -> bool {
    matches!(var_name, SMARTPROXY_USER | SMARTPROXY_PASS | RATE_LIMIT)
}

/// All variable names, for the startup summary
pub fn all_env_vars() -> &'static [&'static str] {
    &[
        HOST,
        PORT,
        BLACKLIST,
        WHITELIST,
        RATE_LIMIT,
        REQUIRE_HEADERS,
        REMOVE_HEADERS,
        REDIRECT_SAME_ORIGIN,
        CORS_MAX_AGE,
        SMARTPROXY_USER,
        SMARTPROXY_PASS,
        SMARTPROXY_HOST,
        SMARTPROXY_PORT,
        RELAY_MODE,
        WORKER_ENDPOINT,
        WORKER_URL_POLICY,
        WORKER_ENCODE_TARGET,
        CONNECT_TIMEOUT_MS,
        REQUEST_TIMEOUT_SECS,
        POOL_IDLE_SECS,
        SHUTDOWN_SECS,
        MAX_CONNECTIONS,
        DEBUG,
    ]
}
