pub mod client_pool;
pub mod connection;
pub mod context;
pub mod forwarding;
pub mod handler;
pub mod http_result;
pub mod server;
pub mod synthetic_response;
pub mod target;

use bytes::Bytes;
use http_body_util::combinators::UnsyncBoxBody;

/// Error type carried by response bodies
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Body of every response the relay sends
pub type RespBody = UnsyncBoxBody<Bytes, BoxError>;

pub use client_pool::build_upstream_client;
pub use context::RelayContext;
pub use forwarding::{forward, OutboundRequest};
pub use http_result::{HttpError, HttpResult};
pub use server::{run, serve};
pub use target::{
    extract_target, parse_target_url, resolve_request_target, resolve_target, worker_destination,
    ResolvedTarget,
};
