pub mod cors;
pub mod origin_filter;
pub mod rate_limit;

pub use cors::{apply_cors_headers, CorsRequest};
pub use origin_filter::{evaluate, origin_of, DenyReason, OriginDecision};
pub use rate_limit::{
    build_rate_limiter, ClientIdentity, RateDecision, RateLimit, RateLimitSpec, Unlimited,
    WindowRateLimiter,
};
