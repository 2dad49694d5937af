use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE, ACCESS_CONTROL_REQUEST_HEADERS,
    ACCESS_CONTROL_REQUEST_METHOD,
};
use http::{HeaderMap, HeaderValue, Method, Response};

/// CORS-relevant parts of the inbound request, captured before the request is consumed
#[derive(Debug, Clone, Default)]
pub struct CorsRequest {
    pub preflight: bool,
    pub request_method: Option<HeaderValue>,
    pub request_headers: Option<HeaderValue>,
}

impl CorsRequest {
    pub fn capture(method: &Method, headers: &HeaderMap) -> Self {
        Self {
            preflight: method == Method::OPTIONS,
            request_method: headers.get(ACCESS_CONTROL_REQUEST_METHOD).cloned(),
            request_headers: headers.get(ACCESS_CONTROL_REQUEST_HEADERS).cloned(),
        }
    }
}

/// Add CORS headers to a response
///
/// Headers are applied in the following order:
/// 1. `Access-Control-Allow-Origin: *`
/// 2. `Access-Control-Max-Age` (preflight only, when configured)
/// 3. Echo of the requested method and headers
/// 4. `Access-Control-Expose-Headers` listing every header already on the response
pub fn apply_cors_headers<T>(response: &mut Response<T>, cors: &CorsRequest, max_age: Option<u64>) {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

    if cors.preflight {
        if let Some(age) = max_age {
            headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(age));
        }
    }
    if let Some(method) = &cors.request_method {
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, method.clone());
    }
    if let Some(requested) = &cors.request_headers {
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
    }

    let exposed = headers
        .keys()
        .map(|name| name.as_str())
        .collect::<Vec<_>>()
        .join(",");
    if let Ok(value) = HeaderValue::from_str(&exposed) {
        headers.insert(ACCESS_CONTROL_EXPOSE_HEADERS, value);
    }
}
