use http::header::ORIGIN;
use http::{HeaderMap, HeaderName};

use crate::config::OriginPolicy;

/// Outcome of the origin policy for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    Allow,
    Deny(DenyReason),
}

impl OriginDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, OriginDecision::Allow)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    /// A header from the required list is absent
    MissingRequiredHeader(HeaderName),
    /// The whitelist is non-empty and does not contain the origin
    NotWhitelisted(String),
    /// The origin is blacklisted
    Blacklisted(String),
}

/// Decide whether a request may be relayed
///
/// # Logic:
/// - Every required header must be present and non-empty
/// - A non-empty whitelist admits only the origins it lists; a missing `Origin`
///   header is treated as the empty origin
/// - A blacklisted origin is always rejected, even when it is also whitelisted
pub fn evaluate(headers: &HeaderMap, policy: &OriginPolicy) -> OriginDecision {
    if let Some(missing) = policy
        .require_headers
        .iter()
        .find(|name| !has_value(headers, name))
    {
        return OriginDecision::Deny(DenyReason::MissingRequiredHeader(missing.clone()));
    }

    let origin = origin_of(headers).unwrap_or_default();

    if !policy.whitelist.is_empty() && !policy.whitelist.contains(origin) {
        return OriginDecision::Deny(DenyReason::NotWhitelisted(origin.to_string()));
    }

    if policy.blacklist.contains(origin) {
        return OriginDecision::Deny(DenyReason::Blacklisted(origin.to_string()));
    }

    OriginDecision::Allow
}

/// The `Origin` header value, if present and valid ASCII
pub fn origin_of(headers: &HeaderMap) -> Option<&str> {
    headers.get(ORIGIN).and_then(|v| v.to_str().ok())
}

fn has_value(headers: &HeaderMap, name: &HeaderName) -> bool {
    headers
        .get_all(name)
        .iter()
        .any(|value| !value.as_bytes().iter().all(u8::is_ascii_whitespace))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use std::collections::HashSet;

    fn policy(whitelist: &[&str], blacklist: &[&str]) -> OriginPolicy {
        OriginPolicy {
            whitelist: whitelist.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
            blacklist: blacklist.iter().map(|s| s.to_string()).collect::<HashSet<_>>(),
            ..OriginPolicy::default()
        }
    }

    fn request_headers(origin: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
        if let Some(origin) = origin {
            headers.insert(ORIGIN, HeaderValue::from_static(origin));
        }
        headers
    }

    #[test]
    fn test_no_lists_allows() {
        let decision = evaluate(&request_headers(Some("https://a.test")), &policy(&[], &[]));
        assert_eq!(decision, OriginDecision::Allow);
    }

    #[test]
    fn test_missing_origin_header_denied() {
        let decision = evaluate(&request_headers(None), &policy(&[], &[]));
        assert_eq!(
            decision,
            OriginDecision::Deny(DenyReason::MissingRequiredHeader(ORIGIN))
        );
    }

    #[test]
    fn test_all_required_headers_needed() {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, HeaderValue::from_static("https://a.test"));
        let decision = evaluate(&headers, &policy(&[], &[]));
        assert_eq!(
            decision,
            OriginDecision::Deny(DenyReason::MissingRequiredHeader(HeaderName::from_static(
                "x-requested-with"
            )))
        );
    }

    #[test]
    fn test_empty_required_header_counts_as_absent() {
        let mut headers = request_headers(Some("https://a.test"));
        headers.insert("x-requested-with", HeaderValue::from_static(""));
        assert!(!evaluate(&headers, &policy(&[], &[])).is_allowed());
    }

    #[test]
    fn test_no_required_headers() {
        let policy = OriginPolicy { require_headers: vec![], ..policy(&[], &[]) };
        assert!(evaluate(&HeaderMap::new(), &policy).is_allowed());
    }

    #[test]
    fn test_whitelist() {
        let policy = policy(&["https://a.test"], &[]);
        assert!(evaluate(&request_headers(Some("https://a.test")), &policy).is_allowed());
        assert_eq!(
            evaluate(&request_headers(Some("https://b.test")), &policy),
            OriginDecision::Deny(DenyReason::NotWhitelisted("https://b.test".into()))
        );
    }

    #[test]
    fn test_whitelist_rejects_absent_origin() {
        let policy = OriginPolicy { require_headers: vec![], ..policy(&["https://a.test"], &[]) };
        assert!(!evaluate(&HeaderMap::new(), &policy).is_allowed());
    }

    #[test]
    fn test_blacklist() {
        let policy = policy(&[], &["https://evil.test"]);
        assert!(!evaluate(&request_headers(Some("https://evil.test")), &policy).is_allowed());
        assert!(evaluate(&request_headers(Some("https://good.test")), &policy).is_allowed());
    }

    #[test]
    fn test_blacklist_wins_over_whitelist() {
        let policy = policy(&["https://both.test"], &["https://both.test"]);
        assert_eq!(
            evaluate(&request_headers(Some("https://both.test")), &policy),
            OriginDecision::Deny(DenyReason::Blacklisted("https://both.test".into()))
        );
    }
}
