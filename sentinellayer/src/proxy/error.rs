//! Proxy error types.

use std::io;
use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::relay::apply_cors;

/// Errors local to one proxied HTTP exchange.
///
/// These surface directly as the proxy's HTTP response; the `Display`
/// text is the plain-text response body. None of them is retried by
/// the proxy itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProxyError {
    /// The `url` query parameter was absent.
    #[error("Missing url parameter")]
    MissingTarget,

    /// The `url` query parameter did not parse as an absolute
    /// HTTP(S) URL.
    #[error("Invalid url parameter: {0}")]
    InvalidTarget(String),

    /// Transport-level failure reaching the upstream object store.
    #[error("Proxy error: {0}")]
    Upstream(String),
}

impl ProxyError {
    /// The HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MissingTarget | ProxyError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        // CORS headers go on every response, error responses included,
        // so browser callers can read the failure.
        let mut response = (self.status_code(), self.to_string()).into_response();
        apply_cors(response.headers_mut());
        response
    }
}

/// Errors starting or running the proxy server itself.
#[derive(Debug, Error)]
pub enum ProxyServerError {
    /// Could not bind the listen address.
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The accept loop failed.
    #[error("Server error: {0}")]
    Serve(#[from] io::Error),

    /// Could not construct the upstream HTTP client.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}
