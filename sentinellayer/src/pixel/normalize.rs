//! Band normalization: linear stretch of raw reflectance into 8 bits.
//!
//! Raw band samples arrive in their source range (typically 16-bit
//! surface reflectance). Display needs one byte per pixel, so each
//! sample is stretched linearly from `[0, max_value]` to `[0, 255]`
//! and clamped. The stretch reference is a fixed caller-supplied
//! constant rather than a per-scene histogram so that scenes remain
//! visually comparable across selections.

use super::buffer::{NormalizedChannel, PixelBuffer};

/// Default stretch reference for Sentinel-2 L2A reflectance bands.
///
/// Reflectance values cluster well below the nominal 10000 ceiling;
/// 3000 gives a natural-looking true-color stretch.
pub const DEFAULT_MAX_REFLECTANCE: f32 = 3000.0;

/// Converts one raw band into an 8-bit single-channel image.
///
/// Per pixel: `clamp(round(sample / max_value * 255), 0, 255)`.
/// Samples at or above `max_value` saturate to 255; samples at or
/// below zero (negative sentinel values occur in some sources)
/// saturate to 0.
///
/// An empty input buffer yields an empty channel, signaling "nothing
/// to render" to the compositor rather than failing.
///
/// Pure function: no shared state, no I/O, safe to invoke
/// concurrently on independent buffers.
pub fn normalize(buf: &PixelBuffer, max_value: f32) -> NormalizedChannel {
    debug_assert!(max_value > 0.0, "stretch reference must be positive");

    if buf.is_empty() {
        return NormalizedChannel::empty();
    }

    let bytes = buf
        .samples
        .iter()
        .map(|&sample| (sample / max_value * 255.0).round().clamp(0.0, 255.0) as u8)
        .collect();

    NormalizedChannel {
        width: buf.width,
        height: buf.height,
        bytes,
    }
}
