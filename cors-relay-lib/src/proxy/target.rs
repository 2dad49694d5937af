//! Computes where a relayed request goes.
//!
//! In direct mode the inbound path *is* the target (`/https://example.com/api`).
//! In worker mode every request goes to one fixed endpoint and the original
//! target travels in its `url` query parameter.

use std::borrow::Cow;
use std::net::IpAddr;

use http::Uri;
use url::Url;

use crate::config::{ExtractionPolicy, OperatingMode, WorkerEndpoint};
use crate::proxy::http_result::{HttpError, HttpResult};

const URL_PARAM_PREFIX: &str = "/?url=";

/// Where one inbound request is relayed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Target exactly as extracted from the inbound request
    pub original: String,
    /// Parsed absolute target, when the original is a usable http(s) URL
    pub target_url: Option<Url>,
    /// URL the outbound request is sent to
    pub destination: Url,
}

impl ResolvedTarget {
    /// `scheme://host[:port]` of the original target
    pub fn target_origin(&self) -> Option<String> {
        self.target_url
            .as_ref()
            .map(|url| url.origin().ascii_serialization())
    }
}

/// Pull the raw target out of the inbound request URI.
///
/// Returns `None` when the request names no target at all.
pub fn extract_target(uri: &Uri, mode: &OperatingMode) -> Option<String> {
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let raw = match mode {
        OperatingMode::DirectWithAgent(_) => slice(path_and_query),
        OperatingMode::RelayViaEndpoint(worker) => match worker.policy {
            ExtractionPolicy::Slice => slice(path_and_query),
            ExtractionPolicy::PrefixAware => prefix_aware(path_and_query),
        },
    };

    (!raw.is_empty()).then(|| raw.to_string())
}

/// Path and query with the leading slash removed
fn slice(path_and_query: &str) -> &str {
    path_and_query.strip_prefix('/').unwrap_or(path_and_query)
}

fn prefix_aware(path_and_query: &str) -> &str {
    if starts_with_ignore_case(path_and_query, "/http://")
        || starts_with_ignore_case(path_and_query, "/https://")
    {
        return slice(path_and_query);
    }
    if let Some(rest) = path_and_query.strip_prefix(URL_PARAM_PREFIX) {
        return rest;
    }
    slice(path_and_query)
}

/// Compute the destination for an extracted target
pub fn resolve_target(raw: &str, mode: &OperatingMode) -> HttpResult<ResolvedTarget> {
    match mode {
        OperatingMode::DirectWithAgent(_) => {
            let url = parse_target_url(raw)?;
            Ok(ResolvedTarget {
                original: raw.to_string(),
                target_url: Some(url.clone()),
                destination: url,
            })
        }
        OperatingMode::RelayViaEndpoint(worker) => Ok(ResolvedTarget {
            original: raw.to_string(),
            target_url: parse_target_url(raw).ok(),
            destination: worker_destination(worker, raw),
        }),
    }
}

/// Extract and resolve in one step; `Ok(None)` means no target was given
pub fn resolve_request_target(
    uri: &Uri,
    mode: &OperatingMode,
) -> HttpResult<Option<ResolvedTarget>> {
    extract_target(uri, mode)
        .map(|raw| resolve_target(&raw, mode))
        .transpose()
}

/// Parse a target as an absolute http(s) URL.
///
/// A target without a scheme (`example.com/a`, `//example.com/a`) gets
/// `http://`, or `https://` when it names port 443. Scheme-less targets must
/// name a plausible host.
pub fn parse_target_url(raw: &str) -> HttpResult<Url> {
    let has_scheme =
        starts_with_ignore_case(raw, "http://") || starts_with_ignore_case(raw, "https://");

    let candidate: Cow<'_, str> = if has_scheme {
        Cow::Borrowed(raw)
    } else {
        let rest = raw.trim_start_matches('/');
        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        let scheme = if authority.ends_with(":443") { "https" } else { "http" };
        Cow::Owned(format!("{scheme}://{rest}"))
    };

    let url =
        Url::parse(&candidate).map_err(|e| HttpError::InvalidTarget(format!("{raw}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(HttpError::InvalidTarget(format!("{raw}: unsupported scheme")));
    }
    let Some(host) = url.host_str() else {
        return Err(HttpError::InvalidTarget(format!("{raw}: missing host")));
    };
    if !has_scheme && !is_plausible_host(host) {
        return Err(HttpError::InvalidTarget(format!("{raw}: invalid host")));
    }
    Ok(url)
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

/// `localhost`, an IP literal or a dotted name
fn is_plausible_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("localhost")
        || host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>().is_ok()
        || (host.contains('.') && !host.starts_with('.') && !host.ends_with('.'))
}

/// Worker endpoint with `url=<target>` appended to its query
pub fn worker_destination(worker: &WorkerEndpoint, target: &str) -> Url {
    let value: Cow<'_, str> = if worker.encode_target {
        urlencoding::encode(target)
    } else {
        Cow::Borrowed(target)
    };

    let query = match worker.url.query() {
        Some(existing) if !existing.is_empty() => format!("{existing}&url={value}"),
        _ => format!("url={value}"),
    };

    let mut destination = worker.url.clone();
    destination.set_query(Some(&query));
    destination
}
