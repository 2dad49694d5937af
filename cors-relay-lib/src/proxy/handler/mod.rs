pub mod header_manipulation;
pub mod headers;
pub mod rate_limit_validation;
pub mod request;

pub use request::handle_relay_request;
