//! Proxy server assembly and lifecycle.

use std::future::Future;
use std::net::SocketAddr;

use axum::routing::{get, options};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::error::ProxyServerError;
use super::relay::{preflight, relay, ProxyState};

/// Builds the proxy router.
///
/// - `GET`/`HEAD /sentinel-proxy/cog?url=…` relays to the upstream.
/// - `OPTIONS /sentinel-proxy/*` short-circuits CORS preflight for
///   any path suffix.
pub fn router(state: ProxyState) -> Router {
    Router::new()
        .route("/sentinel-proxy/cog", get(relay).options(preflight))
        .route("/sentinel-proxy/*rest", options(preflight))
        .with_state(state)
}

/// A bound, not-yet-running proxy server.
pub struct ProxyServer {
    listener: TcpListener,
    router: Router,
}

impl ProxyServer {
    /// Binds the proxy to an address.
    ///
    /// Binding to port 0 picks an ephemeral port; use
    /// [`local_addr`](Self::local_addr) to discover it.
    pub async fn bind(addr: SocketAddr, state: ProxyState) -> Result<Self, ProxyServerError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ProxyServerError::Bind { addr, source })?;
        Ok(Self {
            listener,
            router: router(state),
        })
    }

    /// The address the server is listening on.
    pub fn local_addr(&self) -> Result<SocketAddr, ProxyServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves requests until the process ends.
    pub async fn run(self) -> Result<(), ProxyServerError> {
        info!(addr = %self.listener.local_addr()?, "proxy listening");
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Serves requests until `shutdown` resolves, then drains.
    pub async fn run_until(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<(), ProxyServerError> {
        info!(addr = %self.listener.local_addr()?, "proxy listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
