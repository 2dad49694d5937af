use http::header::{HOST, LOCATION};
use http::{HeaderMap, HeaderValue, StatusCode, Uri};
use url::Url;

/// Response header naming the target the caller asked for
pub const REQUEST_URL: &str = "x-request-url";
/// Response header naming the URL that produced the response
pub const FINAL_URL: &str = "x-final-url";

/// Base URL of this relay as the caller sees it, e.g. `http://relay.example:8080`
///
/// Uses the inbound `Host` header, or the request authority when there is none
/// (HTTP/2 sends `:authority` instead). The scheme is `https` only when
/// `X-Forwarded-Proto` or the request URI says so.
pub fn relay_base(inbound: &HeaderMap, uri: &Uri) -> Option<String> {
    let host = match inbound.get(HOST) {
        Some(value) => value.to_str().ok()?,
        None => uri.authority()?.as_str(),
    };
    let proto = inbound
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase())
        .or_else(|| uri.scheme_str().map(str::to_ascii_lowercase));
    let scheme = match proto {
        Some(p) if p.starts_with("https") => "https",
        _ => "http",
    };
    Some(format!("{scheme}://{host}"))
}

/// Point an upstream redirect back through the relay
///
/// The `Location` of a 3xx response is resolved against `destination` and
/// prefixed with the relay base, so the caller's next request is relayed too.
/// Returns `true` when the header was rewritten.
pub fn rewrite_redirect_location(
    status: StatusCode,
    headers: &mut HeaderMap,
    destination: &Url,
    base: Option<&str>,
) -> bool {
    if !status.is_redirection() {
        return false;
    }
    let Some(base) = base else {
        return false;
    };
    let Some(location) = headers.get(LOCATION).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let Ok(absolute) = destination.join(location) else {
        return false;
    };

    match HeaderValue::from_str(&format!("{base}/{absolute}")) {
        Ok(value) => {
            headers.insert(LOCATION, value);
            true
        }
        Err(_) => false,
    }
}
