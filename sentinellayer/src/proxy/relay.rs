//! The range-preserving relay handler.
//!
//! One inbound request maps to one upstream request: the `Range`
//! header is forwarded verbatim when present, the upstream status
//! passes through unchanged (206 stays 206), exactly four upstream
//! headers are mirrored back, and the body is streamed through
//! without buffering. COG range fetches can span many megabytes, so
//! bytes become available to the caller as they arrive upstream.

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_RANGES, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_LENGTH, CONTENT_RANGE,
    CONTENT_TYPE, RANGE,
};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::error::ProxyError;

/// Upstream response headers mirrored to the caller when present.
/// Everything else the upstream sends is dropped.
const MIRRORED_HEADERS: [HeaderName; 4] =
    [CONTENT_TYPE, CONTENT_LENGTH, CONTENT_RANGE, ACCEPT_RANGES];

/// Shared relay state: the upstream HTTP client.
///
/// The proxy holds no other resources across requests; every exchange
/// is independent.
#[derive(Clone)]
pub struct ProxyState {
    client: reqwest::Client,
}

impl ProxyState {
    /// Creates relay state around an existing client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Creates relay state with a fresh client using the given
    /// upstream timeout.
    ///
    /// The client never follows redirects: a 301/302 from the object
    /// store belongs to the caller verbatim, like every other
    /// upstream status.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, super::error::ProxyServerError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| super::error::ProxyServerError::Client(e.to_string()))?;
        Ok(Self::new(client))
    }
}

/// Query parameters of the relay endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct RelayParams {
    /// URL-encoded absolute upstream URL.
    url: Option<String>,
}

/// `GET`/`HEAD /sentinel-proxy/cog` handler.
pub(crate) async fn relay(
    State(state): State<ProxyState>,
    method: Method,
    Query(params): Query<RelayParams>,
    headers: HeaderMap,
) -> Response {
    match forward(&state, method, params.url.as_deref(), headers.get(RANGE)).await {
        Ok(response) => response,
        Err(err) => {
            warn!(error = %err, "relay failed");
            err.into_response()
        }
    }
}

/// `OPTIONS /sentinel-proxy/*` handler: CORS preflight short-circuit.
///
/// Answers 200 with the fixed CORS headers and an empty body without
/// contacting the upstream, regardless of path suffix.
pub(crate) async fn preflight() -> Response {
    let mut response = StatusCode::OK.into_response();
    apply_cors(response.headers_mut());
    response
}

/// Validates the target, performs the upstream request, and assembles
/// the relayed response.
async fn forward(
    state: &ProxyState,
    method: Method,
    target: Option<&str>,
    range: Option<&HeaderValue>,
) -> Result<Response, ProxyError> {
    let target = target.ok_or(ProxyError::MissingTarget)?;
    let url = Url::parse(target).map_err(|e| ProxyError::InvalidTarget(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ProxyError::InvalidTarget(format!(
            "unsupported scheme {:?}",
            url.scheme()
        )));
    }

    info!(target = %url, method = %method, "proxying request");

    let mut request = match method {
        Method::HEAD => state.client.head(url),
        _ => state.client.get(url),
    };
    if let Some(range) = range {
        debug!(range = ?range, "forwarding Range header");
        request = request.header(RANGE, range.clone());
    }

    let upstream = request
        .send()
        .await
        .map_err(|e| ProxyError::Upstream(e.to_string()))?;

    // Copy what we mirror before the response is consumed as a stream.
    let status = upstream.status();
    let mirrored: Vec<(HeaderName, HeaderValue)> = MIRRORED_HEADERS
        .iter()
        .filter_map(|name| {
            upstream
                .headers()
                .get(name)
                .map(|value| (name.clone(), value.clone()))
        })
        .collect();

    debug!(status = %status, "upstream response");

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    for (name, value) in mirrored {
        response.headers_mut().insert(name, value);
    }
    apply_cors(response.headers_mut());
    Ok(response)
}

/// Adds the fixed CORS header triple to a response.
pub(crate) fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, HEAD, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Range, Content-Type"),
    );
}
