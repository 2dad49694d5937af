//! Fixed-window rate limiter keyed by client IP.

use std::net::IpAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use ahash::AHashMap;

use super::{ClientIdentity, RateDecision, RateLimit};

/// Evict windows that ended this many periods ago
const SWEEP_EVERY: u32 = 2;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u64,
}

struct State {
    windows: AHashMap<IpAddr, Window>,
    last_sweep: Instant,
}

/// A rate limiter that allows `max_requests` per client IP in each window.
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use cors_relay_lib::security::rate_limit::{ClientIdentity, RateLimit, WindowRateLimiter};
///
/// let limiter = WindowRateLimiter::new(100, Duration::from_secs(60), vec![]);
/// let decision = limiter.check(&ClientIdentity::from_ip("192.168.1.1".parse()?));
/// ```
pub struct WindowRateLimiter {
    max_requests: u64,
    window: Duration,
    exempt: Vec<String>,
    state: Mutex<State>,
}

impl WindowRateLimiter {
    /// `exempt` entries are compared against the client IP and the origin host
    pub fn new(max_requests: u64, window: Duration, exempt: Vec<String>) -> Self {
        Self {
            max_requests,
            window,
            exempt,
            state: Mutex::new(State { windows: AHashMap::new(), last_sweep: Instant::now() }),
        }
    }

    fn is_exempt(&self, client: &ClientIdentity) -> bool {
        let ip = client.ip.to_string();
        self.exempt.iter().any(|entry| {
            *entry == ip || client.origin_host.as_deref().is_some_and(|host| host == entry)
        })
    }

    /// Record one request at `now` and decide
    pub fn check_at(&self, client: &ClientIdentity, now: Instant) -> RateDecision {
        if self.is_exempt(client) {
            return RateDecision::Allowed { limit: self.max_requests, remaining: self.max_requests };
        }

        let mut state = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Rate limiter lock poisoned, recovering");
                poisoned.into_inner()
            }
        };

        let sweep_interval = self.window.saturating_mul(SWEEP_EVERY);
        if now.saturating_duration_since(state.last_sweep) >= sweep_interval {
            let window = self.window;
            state
                .windows
                .retain(|_, w| now.saturating_duration_since(w.started) < window);
            state.last_sweep = now;
        }

        let entry = state
            .windows
            .entry(client.ip)
            .or_insert(Window { started: now, count: 0 });
        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = Window { started: now, count: 0 };
        }

        if entry.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(entry.started);
            return RateDecision::Limited {
                limit: self.max_requests,
                retry_after: self.window.saturating_sub(elapsed),
            };
        }

        entry.count += 1;
        RateDecision::Allowed {
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(entry.count),
        }
    }

    /// Number of tracked client windows
    pub fn tracked_clients(&self) -> usize {
        self.state.lock().map(|s| s.windows.len()).unwrap_or(0)
    }
}

impl RateLimit for WindowRateLimiter {
    fn check(&self, client: &ClientIdentity) -> RateDecision {
        self.check_at(client, Instant::now())
    }
}
