//! SentinelLayer - Sentinel-2 imagery delivery for map viewers
//!
//! This library delivers remote-sensing raster imagery to a viewer in
//! two ways:
//!
//! - a byte-range-preserving HTTP proxy ([`proxy`]) that relays COG
//!   tile requests to a cloud object store that grants the browser
//!   neither CORS nor range access, and
//! - an on-the-fly true-color pipeline ([`pixel`], [`controller`])
//!   that reconstructs an RGB image from three independently hosted
//!   single-band sources when no pre-rendered visual asset exists.
//!
//! Scene metadata and asset resolution live in [`scene`]; band-source
//! access behind injectable HTTP clients lives in [`provider`].

pub mod config;
pub mod controller;
pub mod pixel;
pub mod provider;
pub mod proxy;
pub mod scene;

pub use config::AppConfig;
