use std::net::SocketAddr;

pub use super::mode::{
    ExtractionPolicy, ModeKind, OperatingMode, ProxyCredentials, UpstreamAgent, WorkerEndpoint,
};
pub use super::security::{OriginPolicy, SecurityConfig};
pub use super::timeout::TimeoutConfig;

/// Process-wide relay configuration, built once at startup and shared read-only
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the relay binds to
    pub listen: SocketAddr,
    /// Fixed for the lifetime of the process
    pub mode: OperatingMode,
    pub security: SecurityConfig,
    pub timeout: TimeoutConfig,
    /// Per-request logging of method, URL, headers and destination
    pub debug: bool,
}

impl RelayConfig {
    /// Configuration with default policy for the given mode
    pub fn new(listen: SocketAddr, mode: OperatingMode) -> Self {
        Self {
            listen,
            mode,
            security: SecurityConfig::default(),
            timeout: TimeoutConfig::default(),
            debug: false,
        }
    }
}
