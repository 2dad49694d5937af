use crate::config::types::{OperatingMode, RelayConfig, UpstreamAgent};
use crate::error::{RelayError, Result};

pub fn validate(config: &RelayConfig) -> Result<()> {
    if config.timeout.connect_ms == 0 {
        return Err(RelayError::Config("connect timeout must be > 0".into()));
    }
    if config.security.max_connections == 0 {
        return Err(RelayError::Config("max connections must be > 0".into()));
    }
    match &config.mode {
        OperatingMode::DirectWithAgent(UpstreamAgent::TunnelProxy { host, port, .. }) => {
            if host.trim().is_empty() {
                return Err(RelayError::Config("tunnel proxy host cannot be empty".into()));
            }
            if *port == 0 {
                return Err(RelayError::Config("tunnel proxy port must be > 0".into()));
            }
        }
        OperatingMode::DirectWithAgent(UpstreamAgent::NoProxy) => {}
        OperatingMode::RelayViaEndpoint(worker) => {
            if !matches!(worker.url.scheme(), "http" | "https") {
                return Err(RelayError::InvalidWorkerEndpoint {
                    endpoint: worker.url.to_string(),
                    reason: "scheme must be http or https".into(),
                });
            }
            if worker.url.host_str().is_none() {
                return Err(RelayError::InvalidWorkerEndpoint {
                    endpoint: worker.url.to_string(),
                    reason: "missing host".into(),
                });
            }
        }
    }
    Ok(())
}
