//! Port for the raster codec used by image ingestion.
//!
//! Codec calls are CPU bound and synchronous; callers on an async runtime
//! dispatch them to blocking threads.

use crate::domain::{EncodeOptions, EncodedImage};

use super::define_port_error;

define_port_error! {
    /// Failures raised by codec adapters.
    pub enum ImageCodecError {
        /// Input bytes are not an image format the codec recognises.
        UnsupportedFormat { message: String } => "unsupported image format: {message}",
        /// Input claimed a known format but could not be decoded.
        Decode { message: String } => "image could not be decoded: {message}",
        /// Re-encoding the decoded pixels failed.
        Encode { message: String } => "image could not be encoded: {message}",
    }
}

/// Decode arbitrary image bytes and re-encode them as the stored format.
///
/// Implementations must be pure with respect to their inputs: the same bytes
/// and options always produce an equivalent result. When
/// [`EncodeOptions::bounds`] is set, the image is scaled proportionally so
/// neither dimension exceeds the box. Images already inside the box are never
/// enlarged.
#[cfg_attr(test, mockall::automock)]
pub trait ImageCodec: Send + Sync {
    /// Produce a new encoded buffer from `source`.
    fn encode(
        &self,
        source: &[u8],
        options: EncodeOptions,
    ) -> Result<EncodedImage, ImageCodecError>;
}
