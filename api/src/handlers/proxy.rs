//! The gateway pipeline: resolve -> classify -> authenticate ->
//! authorize -> forward.
//!
//! Every stage returns a typed failure that maps onto the error taxonomy;
//! the stages run linearly inside the per-request task, so dropping the
//! inbound connection cancels whatever stage is in flight, including the
//! upstream call.

use authz::{Decision, DenyReason};
use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request, Response},
};
use directory::{classify, ClassifyError, RouteTier};
use tracing::{debug, info};

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

/// Bodies larger than this are rejected rather than buffered.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Handle one proxied request: `ANY /{prefix}/{sub_path...}`.
pub async fn proxy_request(
    State(state): State<AppState>,
    request: Request<Body>,
) -> ApiResult<Response<Body>> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let headers = request.headers().clone();

    let (prefix, sub_path) = split_prefix(uri.path())?;
    info!(%method, %prefix, %sub_path, "gateway request");

    let record = state
        .directory
        .resolve(prefix)
        .await?
        .ok_or_else(|| ApiError::ApplicationNotFound(prefix.to_string()))?;
    if !record.has_host() {
        return Err(ApiError::UndefinedHost(record.prefix.clone()));
    }

    let body = parse_body(request.into_body()).await?;

    let tier = match classify(&record, &sub_path, method.as_str()) {
        Ok(tier) => tier,
        Err(ClassifyError::AmbiguousLookup { .. }) => {
            return Err(DenyReason::ConfigurationAmbiguous.into());
        }
    };
    debug!(tier = tier_name(&tier), "route classified");

    // Anonymous requests still pick up an identity when a valid token with
    // a live session happens to be present, so the upstream sees the user;
    // failures there never reject the request. Every other tier requires
    // authentication outright.
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    let identity = match &tier {
        RouteTier::Anonymous => state.authenticator.authenticate(authorization).await.ok(),
        _ => Some(state.authenticator.authenticate(authorization).await?),
    };

    let username = identity.as_ref().map(|i| i.username.as_str());
    match state.decisions.decide(&tier, username, body.as_ref()).await {
        Decision::Allow => {}
        Decision::Deny(reason) => {
            info!(%prefix, %sub_path, reason = ?reason, "access denied");
            return Err(reason.into());
        }
    }

    state
        .forwarder
        .forward(
            &record.host,
            &sub_path,
            uri.query(),
            method,
            &headers,
            inbound_scheme(&uri, &headers),
            identity.as_ref(),
            body.as_ref(),
        )
        .await
}

/// Split the request path into the tenant prefix and the remaining
/// sub-path. The prefix is mandatory.
fn split_prefix(path: &str) -> ApiResult<(&str, String)> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(ApiError::InvalidPrefix);
    }
    let (prefix, rest) = trimmed.split_once('/').unwrap_or((trimmed, ""));
    if prefix.is_empty() {
        return Err(ApiError::InvalidPrefix);
    }
    Ok((prefix, format!("/{}", rest)))
}

async fn parse_body(body: Body) -> ApiResult<Option<serde_json::Value>> {
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| ApiError::InvalidBody)?;
    if bytes.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|_| ApiError::InvalidBody)
}

fn inbound_scheme<'a>(uri: &'a axum::http::Uri, headers: &'a HeaderMap) -> &'a str {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.scheme_str())
        .unwrap_or("http")
}

fn tier_name(tier: &RouteTier) -> &'static str {
    match tier {
        RouteTier::Anonymous => "anonymous",
        RouteTier::Lookup(_) => "lookup",
        RouteTier::RoleBased { .. } => "role_based",
    }
}
