use std::net::SocketAddr;

use http::HeaderMap;
use tracing::debug;

use crate::proxy::http_result::{HttpError, HttpResult};
use crate::security::{origin_of, ClientIdentity, RateDecision, RateLimit};

/// Check rate limiting for incoming request.
///
/// Returns:
/// - `Ok(())` if request is allowed to proceed
/// - `Err(HttpError::RateLimited)` if the client exceeded its limit
pub fn check_rate_limit(
    limiter: &dyn RateLimit,
    peer: SocketAddr,
    headers: &HeaderMap,
) -> HttpResult<()> {
    let client = ClientIdentity::new(peer.ip(), origin_of(headers));

    match limiter.check(&client) {
        RateDecision::Limited { limit, retry_after } => {
            debug!(
                client = %client.ip,
                limit = limit,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            Err(HttpError::RateLimited { retry_after })
        }
        RateDecision::Allowed { limit, remaining } => {
            debug!(limit = limit, remaining = remaining, "Rate limit check passed");
            Ok(())
        }
    }
}
