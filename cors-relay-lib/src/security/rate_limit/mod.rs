//! Per-client request rate limiting.
//!
//! The relay only depends on the [`RateLimit`] trait. Two implementations ship:
//!
//! - [`Unlimited`]: every request is allowed; used when no limit is configured.
//! - [`WindowRateLimiter`]: fixed window per client IP, configured with the
//!   `"<max-requests> <period-minutes> [exempt ...]"` string.
//!
//! # Example Usage
//!
//! ```ignore
//! use cors_relay_lib::security::rate_limit::{ClientIdentity, RateLimit, RateLimitSpec};
//!
//! let spec = RateLimitSpec::parse("50 3 trusted.example")?.expect("non-empty");
//! let limiter = spec.build();
//! let decision = limiter.check(&ClientIdentity::from_ip("203.0.113.7".parse()?));
//! if let Some(retry) = decision.retry_after() {
//!     // answer 429 with Retry-After
//! }
//! ```

mod limiter;

pub use limiter::WindowRateLimiter;

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{RelayError, Result};

/// Who is making the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Remote address of the connection
    pub ip: IpAddr,
    /// Host part of the `Origin` header, when present and parseable
    pub origin_host: Option<String>,
}

impl ClientIdentity {
    pub fn from_ip(ip: IpAddr) -> Self {
        Self { ip, origin_host: None }
    }

    /// Identity for a connection, taking the origin host from an `Origin` header value
    pub fn new(ip: IpAddr, origin: Option<&str>) -> Self {
        let origin_host = origin
            .and_then(|value| url::Url::parse(value).ok())
            .and_then(|url| url.host_str().map(str::to_ascii_lowercase));
        Self { ip, origin_host }
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateDecision {
    /// Request is allowed to proceed.
    Allowed {
        /// Maximum number of requests allowed in the window
        limit: u64,
        /// Number of requests remaining in the current window
        remaining: u64,
    },
    /// Request is rate limited and must not be forwarded.
    Limited {
        /// Maximum number of requests allowed in the window
        limit: u64,
        /// Time until the current window ends
        retry_after: Duration,
    },
}

impl RateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateDecision::Allowed { .. })
    }

    /// Retry hint, only set when limited
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            RateDecision::Limited { retry_after, .. } => Some(*retry_after),
            RateDecision::Allowed { .. } => None,
        }
    }
}

/// Decides whether a client may issue another request.
///
/// Implementations own and synchronize their counters; the relay shares one
/// instance across all connections.
pub trait RateLimit: Send + Sync {
    fn check(&self, client: &ClientIdentity) -> RateDecision;
}

/// Allows every request
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlimited;

impl RateLimit for Unlimited {
    fn check(&self, _client: &ClientIdentity) -> RateDecision {
        RateDecision::Allowed { limit: u64::MAX, remaining: u64::MAX }
    }
}

/// Parsed `"<max-requests> <period-minutes> [exempt ...]"` string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitSpec {
    pub max_requests: u64,
    pub period: Duration,
    /// IP addresses or origin hosts that are never limited
    pub exempt: Vec<String>,
}

impl RateLimitSpec {
    /// Parse the configuration string. Blank input means no limit.
    ///
    /// Exempt entries are plain IP addresses or host names, compared exactly
    /// (case-insensitive for hosts). Entries wrapped in slashes (`/pattern/`)
    /// are rejected since patterns are not supported.
    ///
    /// Error messages never echo the input, which may be treated as a secret.
    pub fn parse(raw: &str) -> Result<Option<Self>> {
        let mut parts = raw.split_whitespace();
        let Some(max) = parts.next() else {
            return Ok(None);
        };

        let max_requests = max
            .parse::<u64>()
            .map_err(|_| RelayError::InvalidRateLimit("max-requests is not a number".into()))?;
        let minutes = parts
            .next()
            .ok_or_else(|| RelayError::InvalidRateLimit("period-minutes is missing".into()))?
            .parse::<u64>()
            .map_err(|_| RelayError::InvalidRateLimit("period-minutes is not a number".into()))?;
        if minutes == 0 {
            return Err(RelayError::InvalidRateLimit("period-minutes must be > 0".into()));
        }
        let period_secs = minutes
            .checked_mul(60)
            .ok_or_else(|| RelayError::InvalidRateLimit("period-minutes is too large".into()))?;

        let exempt = parts
            .map(|entry| {
                if entry.len() > 1 && entry.starts_with('/') && entry.ends_with('/') {
                    return Err(RelayError::InvalidRateLimit(
                        "exempt patterns (/.../) are not supported, list hosts or IPs".into(),
                    ));
                }
                Ok(entry.to_ascii_lowercase())
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Self { max_requests, period: Duration::from_secs(period_secs), exempt }))
    }

    pub fn build(&self) -> WindowRateLimiter {
        WindowRateLimiter::new(self.max_requests, self.period, self.exempt.clone())
    }
}

/// Limiter for the configured limit, or [`Unlimited`] when none is set
pub fn build_rate_limiter(spec: Option<&RateLimitSpec>) -> Arc<dyn RateLimit> {
    match spec {
        Some(spec) => Arc::new(spec.build()),
        None => Arc::new(Unlimited),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blank_is_none() {
        assert!(matches!(RateLimitSpec::parse("   "), Ok(None)));
    }

    #[test]
    fn test_parse_with_exempt() {
        let spec = RateLimitSpec::parse("50 3 Trusted.Example 10.0.0.1").ok().flatten();
        assert_eq!(
            spec,
            Some(RateLimitSpec {
                max_requests: 50,
                period: Duration::from_secs(180),
                exempt: vec!["trusted.example".into(), "10.0.0.1".into()],
            })
        );
    }

    #[test]
    fn test_parse_error_does_not_echo_input() {
        let err = RateLimitSpec::parse("secret-value 3").err().map(|e| e.to_string());
        assert!(err.is_some_and(|msg| !msg.contains("secret-value")));
    }

    #[test]
    fn test_parse_slash_wrapped_exempt_rejected() {
        let err = RateLimitSpec::parse("50 3 /trusted\\.example/").err().map(|e| e.to_string());
        assert!(err.is_some_and(|msg| msg.contains("not supported") && !msg.contains("trusted")));
    }

    #[test]
    fn test_parse_zero_period_rejected() {
        assert!(RateLimitSpec::parse("10 0").is_err());
    }

    #[test]
    fn test_unlimited_always_allows() {
        let decision = Unlimited.check(&ClientIdentity::from_ip(IpAddr::from([127, 0, 0, 1])));
        assert!(decision.is_allowed());
        assert_eq!(decision.retry_after(), None);
    }

    #[test]
    fn test_identity_origin_host() {
        let id = ClientIdentity::new(IpAddr::from([127, 0, 0, 1]), Some("https://App.Example:8443"));
        assert_eq!(id.origin_host.as_deref(), Some("app.example"));
    }
}
