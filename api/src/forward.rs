//! Request forwarding to the tenant's real host.
//!
//! The forwarder owns the only outbound network leg in the gateway: it
//! rewrites trust-sensitive headers, re-serializes the parsed body as
//! JSON, streams the request upstream with a bounded timeout, and relays
//! the upstream response back to the caller.

use std::time::Duration;

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Method, Response},
};
use session::Identity;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

/// Header carrying the authenticated username to the upstream host.
pub const GATEWAY_USER_HEADER: &str = "x-relay-user";

const X_FORWARDED_HOST: &str = "x-forwarded-host";
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Hop-by-hop headers never relayed in either direction. The body is
/// fully buffered before relay, so transfer framing headers would lie;
/// content-length is recomputed from the relayed bytes.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
    "content-length",
];

/// Inbound headers the gateway owns and never passes through as-is:
/// `host` belongs to the upstream connection, the body headers are
/// recomputed from the re-serialized JSON, the bearer credential stays at
/// the gateway, and the trust headers are rewritten explicitly (a caller
/// must not be able to spoof the identity header).
const GATEWAY_OWNED: &[&str] = &[
    "host",
    "content-type",
    "content-length",
    "authorization",
    X_FORWARDED_HOST,
    X_FORWARDED_PROTO,
    GATEWAY_USER_HEADER,
];

/// Forwards allowed requests to tenant hosts over a shared HTTP client.
#[derive(Clone)]
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    /// Build a forwarder with a bounded total timeout for upstream calls.
    pub fn new(upstream_timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(upstream_timeout)
            .build()
            .map_err(|e| {
                warn!(error = %e, "failed to build upstream client");
                ApiError::Internal
            })?;
        Ok(Self { client })
    }

    /// Forward a request and relay the upstream response verbatim
    /// (status, headers minus hop-by-hop, body).
    #[allow(clippy::too_many_arguments)]
    pub async fn forward(
        &self,
        host: &str,
        sub_path: &str,
        query: Option<&str>,
        method: Method,
        inbound_headers: &HeaderMap,
        inbound_scheme: &str,
        identity: Option<&Identity>,
        body: Option<&serde_json::Value>,
    ) -> ApiResult<Response<Body>> {
        let mut url = format!("{}{}", normalize_host(host), sub_path);
        if let Some(q) = query {
            url.push('?');
            url.push_str(q);
        }
        debug!(%url, %method, "forwarding upstream");

        // Everything the gateway does not own passes through untouched, so
        // the upstream still sees accept headers, request ids, cookies and
        // tenant API keys.
        let mut headers = HeaderMap::new();
        for (name, value) in inbound_headers {
            if !HOP_BY_HOP.contains(&name.as_str()) && !GATEWAY_OWNED.contains(&name.as_str()) {
                headers.append(name.clone(), value.clone());
            }
        }

        // Never overwrite a forwarded value set by an earlier proxy hop.
        let forwarded_host = inbound_headers
            .get(X_FORWARDED_HOST)
            .or_else(|| inbound_headers.get("host"));
        if let Some(value) = forwarded_host {
            headers.insert(X_FORWARDED_HOST, value.clone());
        }
        match inbound_headers.get(X_FORWARDED_PROTO) {
            Some(value) => {
                headers.insert(X_FORWARDED_PROTO, value.clone());
            }
            None => {
                if let Ok(value) = HeaderValue::from_str(inbound_scheme) {
                    headers.insert(X_FORWARDED_PROTO, value);
                }
            }
        }

        if let Some(identity) = identity {
            if let Ok(value) = HeaderValue::from_str(&identity.username) {
                headers.insert(GATEWAY_USER_HEADER, value);
            }
        }

        let mut request = self.client.request(method, &url).headers(headers);

        // The body was already parsed; re-serialize as JSON regardless of
        // the inbound content type. reqwest sets Content-Type and an
        // accurate Content-Length from the serialized bytes.
        if let Some(body) = body {
            request = request.json(body);
        }

        let upstream = request.send().await.map_err(map_upstream_error)?;

        let status = upstream.status();
        let mut headers = HeaderMap::new();
        for (name, value) in upstream.headers() {
            if !HOP_BY_HOP.contains(&name.as_str()) {
                // append, not insert: repeated headers such as set-cookie
                // must survive the relay.
                headers.append(name.clone(), value.clone());
            }
        }
        let bytes = upstream.bytes().await.map_err(map_upstream_error)?;

        let mut response = Response::builder()
            .status(status)
            .body(Body::from(bytes))
            .map_err(|_| ApiError::Internal)?;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// Normalize a configured host to exactly one scheme prefix and no
/// trailing slash.
pub fn normalize_host(host: &str) -> String {
    let mut rest = host.trim().trim_end_matches('/');
    let mut scheme: Option<&str> = None;
    loop {
        if let Some(stripped) = rest.strip_prefix("http://") {
            scheme.get_or_insert("http");
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("https://") {
            scheme.get_or_insert("https");
            rest = stripped;
        } else {
            break;
        }
    }
    format!("{}://{}", scheme.unwrap_or("http"), rest)
}

fn map_upstream_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        warn!("upstream call timed out");
        ApiError::UpstreamTimeout
    } else {
        warn!(error = %err, "upstream call failed");
        ApiError::UpstreamUnavailable
    }
}
