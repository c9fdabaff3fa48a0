//! Band sources: fetching one spectral band as a decoded buffer.
//!
//! The imagery core does not decode raster container formats itself;
//! decoding is the tile collaborator's concern. `DecodingBandProvider`
//! therefore pairs an HTTP client with an injected decoder function
//! and hands the controller ready-made [`PixelBuffer`]s.

use crate::pixel::PixelBuffer;

use super::http::AsyncHttpClient;
use super::ProviderError;

/// Trait for fetching one band source into a decoded buffer.
///
/// Implementations must be safe to invoke concurrently: the three
/// channels of one scene are fetched at the same time.
pub trait BandProvider: Send + Sync {
    /// Fetches and decodes the band hosted at `url`.
    fn fetch_band(
        &self,
        url: &str,
    ) -> impl std::future::Future<Output = Result<PixelBuffer, ProviderError>> + Send;
}

/// Band provider that downloads raw bytes over HTTP and decodes them
/// with an injected function.
pub struct DecodingBandProvider<C, D> {
    client: C,
    decode: D,
}

impl<C, D> DecodingBandProvider<C, D>
where
    C: AsyncHttpClient,
    D: Fn(&[u8]) -> Result<PixelBuffer, ProviderError> + Send + Sync,
{
    /// Creates a band provider from an HTTP client and a decoder.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client used to fetch band bytes
    /// * `decode` - turns one band's raw bytes into a `PixelBuffer`
    pub fn new(client: C, decode: D) -> Self {
        Self { client, decode }
    }
}

impl<C, D> BandProvider for DecodingBandProvider<C, D>
where
    C: AsyncHttpClient,
    D: Fn(&[u8]) -> Result<PixelBuffer, ProviderError> + Send + Sync,
{
    async fn fetch_band(&self, url: &str) -> Result<PixelBuffer, ProviderError> {
        let bytes = self.client.get(url).await?;
        (self.decode)(&bytes)
    }
}
