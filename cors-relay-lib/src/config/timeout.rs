use std::time::Duration;

/// Timeout configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Outbound connection timeout in milliseconds
    /// Default: 5000 (5 seconds)
    pub connect_ms: u64,
    /// Total outbound request timeout in seconds, 0 disables it
    /// Default: 0 (transport defaults only)
    pub request_secs: u64,
    /// How long idle pooled upstream connections are kept
    /// Default: 90 seconds
    pub pool_idle_secs: u64,
    /// Graceful shutdown timeout in seconds
    /// Default: 30
    pub shutdown_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: default_connect_timeout(),
            request_secs: 0,
            pool_idle_secs: default_pool_idle(),
            shutdown_secs: default_shutdown_timeout(),
        }
    }
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_millis(self.connect_ms)
    }

    pub fn request(&self) -> Option<Duration> {
        (self.request_secs > 0).then(|| Duration::from_secs(self.request_secs))
    }

    pub fn pool_idle(&self) -> Duration {
        Duration::from_secs(self.pool_idle_secs)
    }

    pub fn shutdown(&self) -> Duration {
        Duration::from_secs(self.shutdown_secs)
    }
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_pool_idle() -> u64 {
    90
}

fn default_shutdown_timeout() -> u64 {
    30
}
