use std::net::SocketAddr;

use http::{HeaderMap, Response, StatusCode};
use hyper::body::Incoming;
use hyper::Request;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{OperatingMode, OriginPolicy};
use crate::proxy::context::RelayContext;
use crate::proxy::forwarding::{forward, OutboundRequest};
use crate::proxy::handler::header_manipulation::{
    add_headers, outbound_headers, sanitize_response_headers,
};
use crate::proxy::handler::headers::{
    relay_base, rewrite_redirect_location, FINAL_URL, REQUEST_URL,
};
use crate::proxy::handler::rate_limit_validation::check_rate_limit;
use crate::proxy::http_result::{HttpError, HttpResult};
use crate::proxy::synthetic_response::{
    preflight_response, redirect_response, synthetic_error_response, usage_response,
};
use crate::proxy::target::{extract_target, resolve_target};
use crate::proxy::RespBody;
use crate::security::{
    apply_cors_headers, evaluate, origin_of, CorsRequest, DenyReason, OriginDecision,
};

fn check_origin(headers: &HeaderMap, policy: &OriginPolicy) -> HttpResult<()> {
    match evaluate(headers, policy) {
        OriginDecision::Allow => Ok(()),
        OriginDecision::Deny(DenyReason::MissingRequiredHeader(name)) => {
            Err(HttpError::MissingRequiredHeader(name.to_string()))
        }
        OriginDecision::Deny(DenyReason::NotWhitelisted(origin))
        | OriginDecision::Deny(DenyReason::Blacklisted(origin)) => {
            Err(HttpError::OriginNotAllowed(origin))
        }
    }
}

/// Handle one inbound request
///
/// Every response, relayed or synthetic, leaves with CORS headers.
pub async fn handle_relay_request(
    req: Request<Incoming>,
    peer: SocketAddr,
    ctx: &RelayContext,
) -> Response<RespBody> {
    let start = Instant::now();
    let method = req.method().clone();
    let cors = CorsRequest::capture(req.method(), req.headers());

    let mut response = match relay(req, peer, ctx, &cors).await {
        Ok(response) => response,
        Err(error) => {
            let status = StatusCode::from(&error);
            if status.is_server_error() {
                warn!(?peer, error = %error, error_type = error.error_type(), "relay failed");
            } else {
                debug!(?peer, error = %error, error_type = error.error_type(), "request rejected");
            }
            synthetic_error_response(&error)
        }
    };

    apply_cors_headers(&mut response, &cors, ctx.config.security.cors_max_age);

    debug!(
        ?peer,
        method = %method,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );
    response
}

async fn relay(
    req: Request<Incoming>,
    peer: SocketAddr,
    ctx: &RelayContext,
    cors: &CorsRequest,
) -> HttpResult<Response<RespBody>> {
    let config = &ctx.config;

    if cors.preflight {
        return Ok(preflight_response());
    }

    let Some(raw_target) = extract_target(req.uri(), &config.mode) else {
        return Ok(usage_response());
    };

    check_origin(req.headers(), &config.security.origins)?;
    check_rate_limit(ctx.rate_limiter.as_ref(), peer, req.headers())?;

    let target = resolve_target(&raw_target, &config.mode)?;

    if config.security.redirect_same_origin {
        if let (Some(origin), Some(target_url)) = (origin_of(req.headers()), &target.target_url) {
            if target.target_origin().as_deref() == Some(origin) {
                debug!(?peer, target = %target_url, "same-origin target, redirecting");
                return Ok(redirect_response(target_url.as_str()));
            }
        }
    }

    let (parts, body) = req.into_parts();
    let outbound = OutboundRequest {
        method: parts.method.clone(),
        destination: target.destination.clone(),
        headers: outbound_headers(&parts.headers, &config.security.remove_headers),
    };

    if config.debug {
        info!(
            ?peer,
            method = %parts.method,
            url = %parts.uri,
            headers = ?parts.headers,
            destination = %outbound.destination,
            mode = config.mode.name(),
            "relaying request"
        );
    }

    let mut response = forward(&ctx.client, outbound, body).await?;

    let status = response.status();
    let headers = response.headers_mut();
    sanitize_response_headers(headers, &config.security.remove_headers);

    let request_url = target
        .target_url
        .as_ref()
        .map(|url| url.to_string())
        .unwrap_or_else(|| target.original.clone());
    match &config.mode {
        OperatingMode::DirectWithAgent(_) => {
            let base = relay_base(&parts.headers, &parts.uri);
            rewrite_redirect_location(status, headers, &target.destination, base.as_deref());
            add_headers(
                headers,
                &[(REQUEST_URL, request_url.as_str()), (FINAL_URL, target.destination.as_str())],
            );
        }
        OperatingMode::RelayViaEndpoint(_) => {
            add_headers(headers, &[(REQUEST_URL, request_url.as_str())]);
        }
    }

    Ok(response)
}
