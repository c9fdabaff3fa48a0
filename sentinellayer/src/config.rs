//! Application configuration.
//!
//! One flat configuration surface shared by the proxy server and the
//! imagery controller, with documented defaults and builder-style
//! setters.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::pixel::DEFAULT_MAX_REFLECTANCE;

/// Default proxy listen port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default upstream request timeout in seconds.
///
/// COG range fetches against the object store can stall; this bounds
/// how long one relayed request may hang.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Default cloud-cover threshold, in percent.
///
/// Scenes at or below this cover count as "clear" for selection
/// purposes. The threshold is configuration, not a constant baked
/// into scene handling.
pub const DEFAULT_CLOUD_COVER_THRESHOLD: f64 = 30.0;

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Address the proxy listens on.
    pub bind_addr: SocketAddr,

    /// Timeout for upstream object-store and band-source requests,
    /// in seconds.
    pub upstream_timeout_secs: u64,

    /// Stretch reference for band normalization.
    pub max_reflectance: f32,

    /// Cloud-cover threshold for scene matching, in percent.
    pub cloud_cover_threshold: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_PORT),
            upstream_timeout_secs: DEFAULT_UPSTREAM_TIMEOUT_SECS,
            max_reflectance: DEFAULT_MAX_REFLECTANCE,
            cloud_cover_threshold: DEFAULT_CLOUD_COVER_THRESHOLD,
        }
    }
}

impl AppConfig {
    /// Creates a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the proxy listen address.
    pub fn with_bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Sets the upstream request timeout.
    pub fn with_upstream_timeout_secs(mut self, secs: u64) -> Self {
        self.upstream_timeout_secs = secs;
        self
    }

    /// Sets the band normalization stretch reference.
    pub fn with_max_reflectance(mut self, max_reflectance: f32) -> Self {
        self.max_reflectance = max_reflectance;
        self
    }

    /// Sets the cloud-cover threshold.
    pub fn with_cloud_cover_threshold(mut self, threshold: f64) -> Self {
        self.cloud_cover_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.bind_addr.ip().is_loopback());
        assert_eq!(config.upstream_timeout_secs, 30);
        assert_eq!(config.max_reflectance, 3000.0);
        assert_eq!(config.cloud_cover_threshold, 30.0);
    }

    #[test]
    fn test_builder_setters() {
        let config = AppConfig::new()
            .with_bind_addr("0.0.0.0:8080".parse().unwrap())
            .with_upstream_timeout_secs(10)
            .with_max_reflectance(4000.0)
            .with_cloud_cover_threshold(50.0);

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.upstream_timeout_secs, 10);
        assert_eq!(config.max_reflectance, 4000.0);
        assert_eq!(config.cloud_cover_threshold, 50.0);
    }
}
