//! In-process upstream servers and relay helpers for integration tests
#![allow(dead_code)]

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::Request;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use cors_relay_lib::config::RelayConfig;
use cors_relay_lib::security::RateLimit;
use cors_relay_lib::{serve, RelayContext};

pub type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

pub const ORIGIN: &str = "https://app.test";

/// What an upstream saw
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone, Default)]
pub struct Recorder {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Recorder {
    pub fn count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn last(&self) -> Option<RecordedRequest> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }

    async fn handle(&self, req: Request<Incoming>) -> Response<Full<Bytes>> {
        let (parts, body) = req.into_parts();
        let body = body
            .collect()
            .await
            .map(|collected| collected.to_bytes())
            .unwrap_or_default();
        let recorded = RecordedRequest {
            method: parts.method.to_string(),
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
        };
        let path = parts.uri.path().to_string();
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(recorded);
        }
        respond(&path)
    }
}

/// Canned upstream behaviour, chosen by path
fn respond(path: &str) -> Response<Full<Bytes>> {
    if let Some(code) = path.strip_prefix("/status/") {
        let status = code.parse::<u16>().ok().and_then(|c| StatusCode::from_u16(c).ok());
        let mut response = Response::new(Full::new(Bytes::from("upstream-status")));
        *response.status_mut() = status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return response;
    }

    if path == "/redirect" {
        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = StatusCode::FOUND;
        response
            .headers_mut()
            .insert("location", HeaderValue::from_static("/final"));
        return response;
    }

    let mut response = Response::new(Full::new(Bytes::from("upstream-ok")));
    let headers = response.headers_mut();
    headers.insert("content-type", HeaderValue::from_static("text/plain"));
    headers.insert("x-upstream", HeaderValue::from_static("yes"));
    headers.insert("set-cookie", HeaderValue::from_static("session=abc"));
    headers.insert("via", HeaderValue::from_static("1.1 upstream"));
    headers.insert("x-request-id", HeaderValue::from_static("req-1"));
    headers.insert("connect-time", HeaderValue::from_static("3"));
    response
}

/// Start a recording HTTP server on an ephemeral port.
///
/// It answers origin-form and absolute-form requests alike, so it also stands
/// in for a forward proxy.
pub async fn spawn_upstream() -> std::io::Result<(SocketAddr, Recorder)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let recorder = Recorder::default();
    let server_recorder = recorder.clone();

    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let recorder = server_recorder.clone();
            tokio::spawn(async move {
                let svc = hyper::service::service_fn(move |req: Request<Incoming>| {
                    let recorder = recorder.clone();
                    async move { Ok::<_, Infallible>(recorder.handle(req).await) }
                });
                let _ = ConnBuilder::new(TokioExecutor::new())
                    .serve_connection(TokioIo::new(stream), svc)
                    .await;
            });
        }
    });

    Ok((addr, recorder))
}

/// A port with nothing listening on it
pub async fn closed_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(port)
}

/// Relay serving `config` on an ephemeral port; abort the handle to stop it
pub async fn spawn_relay(
    config: RelayConfig,
    rate_limiter: Option<Arc<dyn RateLimit>>,
) -> Result<(SocketAddr, JoinHandle<()>), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let mut ctx = RelayContext::new(Arc::new(config))?;
    if let Some(limiter) = rate_limiter {
        ctx = ctx.with_rate_limiter(limiter);
    }

    let handle = tokio::spawn(async move {
        let _ = serve(listener, ctx, std::future::pending::<()>()).await;
    });
    Ok((addr, handle))
}

/// Test client that talks to the relay directly and never follows redirects
pub fn client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

/// Listen address placeholder for configs handed to `spawn_relay`
pub fn any_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}
