use std::time::Duration;

use http::StatusCode;
use thiserror::Error;

/// HTTP result type, T is typically a hyper::Response
/// HttpError is used to generate a synthetic error response
pub type HttpResult<T> = std::result::Result<T, HttpError>;

/// Describes things that can go wrong while relaying one request
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpError {
    #[error("Missing required request header: {0}")]
    MissingRequiredHeader(String),

    #[error("The origin \"{0}\" is not allowed by the operator of this relay")]
    OriginNotAllowed(String),

    #[error("Too many requests, retry after {} seconds", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },

    #[error("Invalid target URL: {0}")]
    InvalidTarget(String),

    #[error("Failed to generate upstream request: {0}")]
    FailedToGenerateUpstreamRequest(String),

    #[error("Upstream timed out: {0}")]
    UpstreamTimeout(String),

    #[error("No response from upstream: {0}")]
    UpstreamUnavailable(String),

    #[error("Failed to generate downstream response: {0}")]
    FailedToGenerateDownstreamResponse(String),
}

impl HttpError {
    /// Short label for structured logs
    pub fn error_type(&self) -> &'static str {
        match self {
            HttpError::MissingRequiredHeader(_) => "missing_required_header",
            HttpError::OriginNotAllowed(_) => "origin_not_allowed",
            HttpError::RateLimited { .. } => "rate_limited",
            HttpError::InvalidTarget(_) => "invalid_target",
            HttpError::FailedToGenerateUpstreamRequest(_) => "upstream_request",
            HttpError::UpstreamTimeout(_) => "upstream_timeout",
            HttpError::UpstreamUnavailable(_) => "upstream_unavailable",
            HttpError::FailedToGenerateDownstreamResponse(_) => "downstream_response",
        }
    }
}

impl From<HttpError> for StatusCode {
    fn from(e: HttpError) -> StatusCode {
        StatusCode::from(&e)
    }
}

impl From<&HttpError> for StatusCode {
    fn from(e: &HttpError) -> StatusCode {
        match e {
            HttpError::MissingRequiredHeader(_) => StatusCode::BAD_REQUEST,
            HttpError::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
            HttpError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            HttpError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            HttpError::FailedToGenerateUpstreamRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            HttpError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            HttpError::FailedToGenerateDownstreamResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
