use http::header::{CACHE_CONTROL, CONTENT_TYPE, LOCATION, RETRY_AFTER, VARY};
use http::{HeaderValue, StatusCode};
use hyper::Response;

use crate::proxy::forwarding::{empty_body, full_body};
use crate::proxy::http_result::HttpError;
use crate::proxy::RespBody;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

const USAGE: &str = "\
This relay forwards cross-origin requests and adds CORS headers to the response.

Usage:
  /                      Shows this help
  /<url>                 Relays the request to <url>, e.g. /https://example.com/data.json

The request must carry the headers the operator requires (by default Origin and
X-Requested-With). Cookies are not relayed. Redirects are returned to the caller.
";

/// Build HTTP response with status code of 4xx and 5xx
///
/// The body is the error message as plain text. Rate limited responses carry
/// `Retry-After` in whole seconds, rounded up.
pub(crate) fn synthetic_error_response(error: &HttpError) -> Response<RespBody> {
    let mut response = text_response(StatusCode::from(error), error.to_string());
    if let HttpError::RateLimited { retry_after } = error {
        let mut secs = retry_after.as_secs();
        if retry_after.subsec_nanos() > 0 {
            secs = secs.saturating_add(1);
        }
        response
            .headers_mut()
            .insert(RETRY_AFTER, HeaderValue::from(secs));
    }
    response
}

/// 200 with instructions, for requests that name no target
pub(crate) fn usage_response() -> Response<RespBody> {
    text_response(StatusCode::OK, USAGE)
}

/// Empty 200 answering a CORS preflight
pub(crate) fn preflight_response() -> Response<RespBody> {
    Response::new(empty_body())
}

/// 301 sending the caller straight to the target
pub(crate) fn redirect_response(location: &str) -> Response<RespBody> {
    let location = match HeaderValue::from_str(location) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "redirect location is not a valid header value");
            return synthetic_error_response(&HttpError::FailedToGenerateDownstreamResponse(
                e.to_string(),
            ));
        }
    };

    let mut response = Response::new(empty_body());
    *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
    let headers = response.headers_mut();
    headers.insert(LOCATION, location);
    headers.insert(VARY, HeaderValue::from_static("origin"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("private"));
    response
}

fn text_response(status: StatusCode, body: impl Into<bytes::Bytes>) -> Response<RespBody> {
    let mut response = Response::new(full_body(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN));
    response
}
