pub mod env;
mod loader;
mod mode;
mod security;
mod settings;
mod timeout;
pub mod types;
mod validator;

pub use loader::{build_config, load_from_env, parse_list};
pub use security::{default_remove_headers, DEFAULT_REMOVE_HEADERS, DEFAULT_REQUIRE_HEADERS};
pub use settings::RelaySettings;
pub use types::{
    ExtractionPolicy, ModeKind, OperatingMode, OriginPolicy, ProxyCredentials, RelayConfig,
    SecurityConfig, TimeoutConfig, UpstreamAgent, WorkerEndpoint,
};
pub use validator::validate;
