//! RangeProxy: byte-range-preserving relay to the object store.
//!
//! Browsers cannot fetch COG tiles from the object store directly
//! (no CORS, no cross-origin range access), so the viewer routes tile
//! requests through this proxy. The proxy is a transparent relay: it
//! forwards the caller's `Range` header verbatim, passes the upstream
//! status through unchanged, mirrors the range-related response
//! headers, adds CORS headers, and streams the body without buffering.
//! It validates nothing about the response content.
//!
//! # Example
//!
//! ```ignore
//! use sentinellayer::proxy::{ProxyServer, ProxyState};
//!
//! let state = ProxyState::with_timeout(30)?;
//! let server = ProxyServer::bind("127.0.0.1:3000".parse()?, state).await?;
//! server.run().await?;
//! ```

mod error;
mod relay;
mod server;

pub use error::{ProxyError, ProxyServerError};
pub use relay::ProxyState;
pub use server::{router, ProxyServer};
