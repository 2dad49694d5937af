pub mod startup;
pub mod tracing;

pub use startup::{env_summary, log_startup, startup_warnings, StartupWarning};
pub use self::tracing::init_tracing;
