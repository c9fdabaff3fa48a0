//! Raster buffer types for the band compositing pipeline.
//!
//! Three buffer types flow through the pipeline:
//!
//! ```text
//! PixelBuffer ──► NormalizedChannel ──► CompositeImage
//! (raw band)      (8-bit, stretched)    (RGB, display-ready)
//! ```
//!
//! `PixelBuffer` is produced by an external tile decoder and consumed,
//! never retained, by the normalizer. `CompositeImage` is the terminal
//! artifact handed to the display surface.

use thiserror::Error;

/// Numeric type of the samples in a raw band buffer.
///
/// Sentinel-2 L2A reflectance bands are 16-bit unsigned, but other
/// catalog versions ship 8-bit previews and float products.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    /// 8-bit unsigned samples.
    U8,
    /// 16-bit unsigned samples (typical surface reflectance).
    U16,
    /// 16-bit signed samples (may carry negative sentinel values).
    I16,
    /// 32-bit float samples.
    F32,
}

/// Errors constructing raster buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Sample count does not match the stated dimensions.
    #[error("sample count {samples} does not match {width}x{height}")]
    SampleCountMismatch {
        width: u32,
        height: u32,
        samples: usize,
    },
}

/// One decoded single-band raster tile.
///
/// Samples are stored as `f32` regardless of [`SampleType`]; `f32`
/// represents every 16-bit reflectance value exactly and preserves
/// negative sentinel values that some sources contain.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major samples, length `width * height` (or empty).
    pub samples: Vec<f32>,
    /// Numeric type of the source the samples were decoded from.
    pub sample_type: SampleType,
}

impl PixelBuffer {
    /// Creates a buffer, validating that the sample count matches the
    /// dimensions.
    pub fn new(
        width: u32,
        height: u32,
        samples: Vec<f32>,
        sample_type: SampleType,
    ) -> Result<Self, BufferError> {
        if samples.len() != (width as usize) * (height as usize) {
            return Err(BufferError::SampleCountMismatch {
                width,
                height,
                samples: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            samples,
            sample_type,
        })
    }

    /// A buffer with no samples, signaling "nothing to render".
    pub fn empty(sample_type: SampleType) -> Self {
        Self {
            width: 0,
            height: 0,
            samples: Vec::new(),
            sample_type,
        }
    }

    /// Whether this buffer carries no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One 8-bit single-channel image produced by the band normalizer.
///
/// Immutable once produced. Dimensions are inherited from the source
/// [`PixelBuffer`]; an empty channel (all dimensions zero) signals
/// "nothing to render" to the compositor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedChannel {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// One byte per pixel, row-major, length `width * height`.
    pub bytes: Vec<u8>,
}

impl NormalizedChannel {
    /// Creates a channel, validating that the byte count matches the
    /// dimensions.
    pub fn new(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, BufferError> {
        if bytes.len() != (width as usize) * (height as usize) {
            return Err(BufferError::SampleCountMismatch {
                width,
                height,
                samples: bytes.len(),
            });
        }
        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    /// A channel with no pixels.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            bytes: Vec::new(),
        }
    }

    /// Whether this channel carries no pixels.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Dimensions as a `(width, height)` pair.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// The display-ready true-color image: three interleaved 8-bit
/// channels (R, G, B).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeImage {
    width: u32,
    height: u32,
    /// Interleaved RGB, length `width * height * 3`.
    data: Vec<u8>,
}

impl CompositeImage {
    /// Creates a composite from interleaved RGB data.
    ///
    /// Only the compositor constructs these; consumers read them.
    pub(crate) fn from_interleaved(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), (width as usize) * (height as usize) * 3);
        Self {
            width,
            height,
            data,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The interleaved RGB bytes.
    pub fn as_interleaved(&self) -> &[u8] {
        &self.data
    }

    /// The `(r, g, b)` triple at pixel index `i` (row-major).
    ///
    /// # Panics
    ///
    /// Panics if `i >= width * height`.
    pub fn pixel(&self, i: usize) -> (u8, u8, u8) {
        let base = i * 3;
        (self.data[base], self.data[base + 1], self.data[base + 2])
    }

    /// Whether this image carries no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
