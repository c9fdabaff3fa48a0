//! RGB composition of three normalized single-channel images.
//!
//! Each band source populates exactly one channel of the final image,
//! so "screen" blending of the three layers reduces to per-channel
//! assignment: final R is the red channel, final G the green channel,
//! final B the blue channel. The compositor makes that assignment
//! explicit instead of evaluating a generic blend formula.

use thiserror::Error;

use super::buffer::{CompositeImage, NormalizedChannel};

/// Errors combining normalized channels into a composite.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeError {
    /// The three channels disagree in width or height.
    ///
    /// No partial, cropped, or stretched image is ever produced.
    #[error(
        "band dimensions disagree: red {red:?}, green {green:?}, blue {blue:?}"
    )]
    DimensionMismatch {
        red: (u32, u32),
        green: (u32, u32),
        blue: (u32, u32),
    },
}

/// Combines three normalized channels into one RGB image.
///
/// All three inputs must share identical dimensions; a mismatch is a
/// reported error, never a silent crop. Three empty channels compose
/// into an empty image (the "nothing to render" case propagates).
pub fn compose(
    red: &NormalizedChannel,
    green: &NormalizedChannel,
    blue: &NormalizedChannel,
) -> Result<CompositeImage, CompositeError> {
    if red.dimensions() != green.dimensions() || red.dimensions() != blue.dimensions() {
        return Err(CompositeError::DimensionMismatch {
            red: red.dimensions(),
            green: green.dimensions(),
            blue: blue.dimensions(),
        });
    }

    let pixels = red.bytes.len();
    let mut data = Vec::with_capacity(pixels * 3);
    for i in 0..pixels {
        data.push(red.bytes[i]);
        data.push(green.bytes[i]);
        data.push(blue.bytes[i]);
    }

    Ok(CompositeImage::from_interleaved(red.width, red.height, data))
}
