use std::sync::Arc;

use crate::config::RelayConfig;
use crate::error::Result;
use crate::proxy::client_pool::build_upstream_client;
use crate::security::{build_rate_limiter, RateLimit};

/// State shared by every connection
#[derive(Clone)]
pub struct RelayContext {
    pub config: Arc<RelayConfig>,
    pub rate_limiter: Arc<dyn RateLimit>,
    pub client: reqwest::Client,
}

impl RelayContext {
    /// Build the rate limiter and upstream client for a configuration
    pub fn new(config: Arc<RelayConfig>) -> Result<Self> {
        let rate_limiter = build_rate_limiter(config.security.rate_limit.as_ref());
        let client = build_upstream_client(&config)?;
        Ok(Self { config, rate_limiter, client })
    }

    /// Replace the rate limiter built from the configuration
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimit>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }
}
