use http::header::{CONNECTION, HOST};
use http::{HeaderMap, HeaderName, HeaderValue};

/// Connection-scoped headers that are never relayed
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Stripped from responses only
const RESPONSE_ONLY_REMOVALS: &[&str] = &["set-cookie", "set-cookie2"];

/// Headers for the outbound request, derived from the inbound ones
///
/// Drops hop-by-hop headers, `Host` (the client sets it from the destination)
/// and every header in `remove`. No `X-Forwarded-*` headers are added.
pub fn outbound_headers(inbound: &HeaderMap, remove: &[HeaderName]) -> HeaderMap {
    let mut headers = inbound.clone();
    strip_hop_by_hop(&mut headers);
    headers.remove(HOST);
    remove_headers(&mut headers, remove);
    headers
}

/// Clean upstream response headers before they reach the client
pub fn sanitize_response_headers(headers: &mut HeaderMap, remove: &[HeaderName]) {
    strip_hop_by_hop(headers);
    remove_headers(headers, remove);
    for name in RESPONSE_ONLY_REMOVALS {
        headers.remove(*name);
    }
}

/// Remove hop-by-hop headers, including any named in `Connection`
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

/// Remove specific headers from a header map
///
/// # Example
/// ```
/// use http::{HeaderMap, HeaderName};
/// use cors_relay_lib::proxy::handler::header_manipulation::remove_headers;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("cookie", "a=b".parse().unwrap());
///
/// remove_headers(&mut headers, &[HeaderName::from_static("cookie")]);
/// assert!(headers.get("cookie").is_none());
/// ```
pub fn remove_headers(headers: &mut HeaderMap, headers_to_remove: &[HeaderName]) -> u64 {
    let mut removed_count = 0u64;
    for name in headers_to_remove {
        if headers.remove(name).is_some() {
            removed_count = removed_count.saturating_add(1);
            tracing::trace!(header = %name, "Removed header");
        }
    }
    removed_count
}

/// Add headers to a header map (overwrite if exists)
///
/// # Example
/// ```
/// use http::HeaderMap;
/// use cors_relay_lib::proxy::handler::header_manipulation::add_headers;
///
/// let mut headers = HeaderMap::new();
/// add_headers(&mut headers, &[("x-request-url", "https://example.com/")]);
/// assert_eq!(headers.get("x-request-url").unwrap(), "https://example.com/");
/// ```
pub fn add_headers(headers: &mut HeaderMap, headers_to_add: &[(&str, &str)]) -> u64 {
    let mut added_count = 0u64;
    for (name, value) in headers_to_add {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(header_name), Ok(header_value)) => {
                headers.insert(header_name, header_value);
                added_count = added_count.saturating_add(1);
                tracing::trace!(header = %name, value = %value, "Added header");
            }
            (Err(e), _) => {
                tracing::warn!(header = %name, error = %e, "Failed to parse header name");
            }
            (_, Err(e)) => {
                tracing::warn!(
                    header = %name,
                    value = %value,
                    error = %e,
                    "Failed to parse header value"
                );
            }
        }
    }
    added_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_listed_headers_removed() {
        let mut headers = HeaderMap::new();
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive, x-private"));
        headers.insert("x-private", HeaderValue::from_static("1"));
        headers.insert("x-public", HeaderValue::from_static("1"));
        strip_hop_by_hop(&mut headers);
        assert!(headers.get("x-private").is_none());
        assert!(headers.get(CONNECTION).is_none());
        assert!(headers.get("x-public").is_some());
    }

    #[test]
    fn test_outbound_drops_host() {
        let mut inbound = HeaderMap::new();
        inbound.insert(HOST, HeaderValue::from_static("relay.local:8080"));
        inbound.insert("accept", HeaderValue::from_static("*/*"));
        let outbound = outbound_headers(&inbound, &[]);
        assert!(outbound.get(HOST).is_none());
        assert!(outbound.get("accept").is_some());
    }

    #[test]
    fn test_response_drops_set_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("set-cookie", HeaderValue::from_static("a=b"));
        headers.insert("content-type", HeaderValue::from_static("text/plain"));
        sanitize_response_headers(&mut headers, &[]);
        assert!(headers.get("set-cookie").is_none());
        assert!(headers.get("content-type").is_some());
    }
}
