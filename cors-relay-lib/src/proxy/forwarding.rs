use bytes::Bytes;
use futures_util::TryStreamExt;
use http::{HeaderMap, Method, Response};
use http_body_util::{BodyDataStream, BodyExt, StreamBody};
use hyper::body::{Body, Frame, Incoming};
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::proxy::http_result::{HttpError, HttpResult};
use crate::proxy::{BoxError, RespBody};

/// Request as it leaves the relay
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    /// Scheme, host, port, path and query of the outbound request
    pub destination: Url,
    /// Already sanitized; `Host` is derived from `destination`
    pub headers: HeaderMap,
}

/// Send the request upstream and stream the response back
///
/// The inbound body is streamed, not buffered. Dropping the returned future
/// aborts the upstream request and releases its connection.
pub async fn forward(
    client: &reqwest::Client,
    outbound: OutboundRequest,
    body: Incoming,
) -> HttpResult<Response<RespBody>> {
    let start = Instant::now();
    let OutboundRequest { method, destination, headers } = outbound;

    let mut request = client
        .request(method, destination.clone())
        .headers(headers);
    if !body.is_end_stream() {
        request = request.body(reqwest::Body::wrap_stream(BodyDataStream::new(body)));
    }

    let upstream = request.send().await.map_err(upstream_error)?;

    let status = upstream.status();
    debug!(
        destination = %destination,
        status = status.as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "upstream responded"
    );

    let headers = upstream.headers().clone();
    let frames = upstream
        .bytes_stream()
        .map_ok(Frame::data)
        .map_err(|e| Box::new(e) as BoxError);

    let mut response = Response::new(StreamBody::new(frames).boxed_unsync());
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

fn upstream_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::UpstreamTimeout(e.to_string())
    } else if e.is_builder() {
        HttpError::FailedToGenerateUpstreamRequest(e.to_string())
    } else {
        HttpError::UpstreamUnavailable(e.to_string())
    }
}

/// Body of an empty response
pub fn empty_body() -> RespBody {
    full_body(Bytes::new())
}

pub fn full_body(bytes: impl Into<Bytes>) -> RespBody {
    http_body_util::Full::new(bytes.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}
