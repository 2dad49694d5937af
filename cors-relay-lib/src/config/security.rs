use std::collections::HashSet;

use http::HeaderName;

use crate::security::rate_limit::RateLimitSpec;

/// Headers a request must carry before it is relayed
pub const DEFAULT_REQUIRE_HEADERS: &[&str] = &["origin", "x-requested-with"];

/// Headers stripped from relayed requests and responses
pub const DEFAULT_REMOVE_HEADERS: &[&str] = &[
    "cookie",
    "cookie2",
    "x-request-start",
    "x-request-id",
    "via",
    "connect-time",
    "total-route-time",
];

/// Origin policy applied before anything is forwarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPolicy {
    /// Origins that are always rejected, even when whitelisted
    pub blacklist: HashSet<String>,
    /// When non-empty, only these origins are accepted
    pub whitelist: HashSet<String>,
    /// Every one of these headers must be present
    pub require_headers: Vec<HeaderName>,
}

impl Default for OriginPolicy {
    fn default() -> Self {
        Self {
            blacklist: HashSet::new(),
            whitelist: HashSet::new(),
            require_headers: DEFAULT_REQUIRE_HEADERS
                .iter()
                .copied()
                .map(HeaderName::from_static)
                .collect(),
        }
    }
}

/// Security-related settings
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub origins: OriginPolicy,
    /// Removed from outbound requests and from relayed responses
    pub remove_headers: Vec<HeaderName>,
    /// Answer with a redirect when the target has the caller's own origin
    pub redirect_same_origin: bool,
    /// `None` disables rate limiting
    pub rate_limit: Option<RateLimitSpec>,
    /// `Access-Control-Max-Age` sent on preflight responses
    pub cors_max_age: Option<u64>,
    /// Maximum number of concurrent client connections
    pub max_connections: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            origins: OriginPolicy::default(),
            remove_headers: default_remove_headers(),
            redirect_same_origin: true,
            rate_limit: None,
            cors_max_age: None,
            max_connections: default_max_connections(),
        }
    }
}

pub fn default_remove_headers() -> Vec<HeaderName> {
    DEFAULT_REMOVE_HEADERS
        .iter()
        .copied()
        .map(HeaderName::from_static)
        .collect()
}

pub(crate) fn default_max_connections() -> usize {
    512
}
