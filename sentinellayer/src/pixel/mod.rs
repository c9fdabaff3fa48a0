//! Pixel pipeline: raw band buffers, normalization, and composition.
//!
//! This module holds the CPU-bound half of the imagery core. All
//! transforms are pure functions over plain buffers, so the three
//! bands of one scene can be normalized concurrently and each stage
//! unit-tested in isolation.
//!
//! # Example
//!
//! ```ignore
//! use sentinellayer::pixel::{normalize, compose, DEFAULT_MAX_REFLECTANCE};
//!
//! let r = normalize(&red_buffer, DEFAULT_MAX_REFLECTANCE);
//! let g = normalize(&green_buffer, DEFAULT_MAX_REFLECTANCE);
//! let b = normalize(&blue_buffer, DEFAULT_MAX_REFLECTANCE);
//! let image = compose(&r, &g, &b)?;
//! ```

mod buffer;
mod composite;
mod normalize;

pub use buffer::{BufferError, CompositeImage, NormalizedChannel, PixelBuffer, SampleType};
pub use composite::{compose, CompositeError};
pub use normalize::{normalize, DEFAULT_MAX_REFLECTANCE};
