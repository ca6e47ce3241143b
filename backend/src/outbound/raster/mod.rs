//! Image codec adapter backed by the `image` crate.
//!
//! Accepts every format enabled in the crate features (JPEG, PNG, GIF, WebP,
//! BMP, TIFF) and always emits baseline JPEG. Decoding is guarded by
//! [`DecodeLimits`] so a forged header cannot trigger an unbounded
//! allocation.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, ImageReader, Limits};

use crate::domain::ports::{ImageCodec, ImageCodecError};
use crate::domain::{EncodeOptions, EncodedImage};

/// Decoder guard rails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_width: u32,
    pub max_height: u32,
    pub max_alloc_bytes: u64,
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_width: 16_384,
            max_height: 16_384,
            max_alloc_bytes: 512 * 1024 * 1024,
        }
    }
}

impl DecodeLimits {
    fn to_image_limits(self) -> Limits {
        let mut limits = Limits::default();
        limits.max_image_width = Some(self.max_width);
        limits.max_image_height = Some(self.max_height);
        limits.max_alloc = Some(self.max_alloc_bytes);
        limits
    }
}

/// [`ImageCodec`] that decodes with `image` and encodes JPEG.
#[derive(Debug, Clone, Copy)]
pub struct RasterImageCodec {
    limits: DecodeLimits,
    filter: FilterType,
}

impl Default for RasterImageCodec {
    fn default() -> Self {
        Self::new(DecodeLimits::default())
    }
}

impl RasterImageCodec {
    /// Codec with the given decode limits and Lanczos downscaling.
    pub fn new(limits: DecodeLimits) -> Self {
        Self {
            limits,
            filter: FilterType::Lanczos3,
        }
    }

    /// Override the resampling filter.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    fn decode(&self, source: &[u8]) -> Result<DynamicImage, ImageCodecError> {
        let mut reader = ImageReader::new(Cursor::new(source))
            .with_guessed_format()
            .map_err(|err| ImageCodecError::decode(err.to_string()))?;
        if reader.format().is_none() {
            return Err(ImageCodecError::unsupported_format(
                "unrecognised image signature",
            ));
        }
        reader.limits(self.limits.to_image_limits());
        reader.decode().map_err(map_decode_error)
    }
}

fn map_decode_error(error: ImageError) -> ImageCodecError {
    match error {
        ImageError::Unsupported(err) => ImageCodecError::unsupported_format(err.to_string()),
        ImageError::Limits(err) => {
            ImageCodecError::decode(format!("image exceeds decoding limits: {err}"))
        }
        other => ImageCodecError::decode(other.to_string()),
    }
}

impl ImageCodec for RasterImageCodec {
    fn encode(
        &self,
        source: &[u8],
        options: EncodeOptions,
    ) -> Result<EncodedImage, ImageCodecError> {
        let decoded = self.decode(source)?;
        let bounds = options.bounds;
        let image = if bounds.contains(decoded.width(), decoded.height()) {
            decoded
        } else {
            decoded.resize(bounds.max_width, bounds.max_height, self.filter)
        };

        let rgb = image.to_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, options.quality.value().clamp(1, 100))
            .encode_image(&rgb)
            .map_err(|err| ImageCodecError::encode(err.to_string()))?;

        Ok(EncodedImage::new(bytes, rgb.width(), rgb.height()))
    }
}
