#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod proxy;
pub mod security;
pub mod telemetry;

pub use config::{build_config, load_from_env, RelayConfig, RelaySettings};
pub use error::{RelayError, Result};
pub use proxy::{run, serve, RelayContext};
