//! Band-source access: HTTP client abstraction and band providers.
//!
//! The controller fetches the red, green, and blue sources of a scene
//! through the [`BandProvider`] trait. The shipped implementation
//! downloads bytes with reqwest and delegates decoding to an injected
//! function, keeping raster-format knowledge out of this core.

mod band;
mod http;

use thiserror::Error;

pub use band::{BandProvider, DecodingBandProvider};
pub use http::{AsyncHttpClient, AsyncReqwestClient, DEFAULT_TIMEOUT_SECS};

#[cfg(test)]
pub use band::tests::MockBandProvider;
#[cfg(test)]
pub use http::tests::MockAsyncHttpClient;

/// Errors fetching or decoding a band source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Transport-level failure (connection, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The band host answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The fetched bytes could not be decoded into a pixel buffer.
    #[error("Failed to decode band data: {0}")]
    Decode(String),
}
