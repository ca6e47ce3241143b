//! Image value types shared by the codec port, the ingestion pipeline and
//! task storage.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Media type of every image the pipeline emits.
pub const STORED_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Lossy encoder quality on a 0..=100 scale; lower is smaller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
    /// Highest accepted quality.
    pub const MAX: u8 = 100;

    /// Construct a quality value, clamping anything above [`Quality::MAX`].
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX))
    }

    /// Raw quality value.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

/// Bounding box an image must fit inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl ImageBounds {
    /// Construct a bounding box.
    #[must_use]
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
        }
    }

    /// Whether the given dimensions already fit.
    #[must_use]
    pub fn contains(&self, width: u32, height: u32) -> bool {
        width <= self.max_width && height <= self.max_height
    }
}

/// Options for a single encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Shrink-to-fit box; sources already inside it keep their dimensions.
    pub bounds: ImageBounds,
    pub quality: Quality,
}

impl EncodeOptions {
    /// Resize to fit `bounds` and encode at `quality`.
    #[must_use]
    pub fn fit(bounds: ImageBounds, quality: Quality) -> Self {
        Self { bounds, quality }
    }
}

/// Encoded image payload together with its pixel dimensions.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

/// Error raised when a stored image payload cannot be decoded from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored image is not valid base64: {message}")]
pub struct ImageTextDecodeError {
    message: String,
}

impl EncodedImage {
    /// Wrap encoded bytes and the dimensions they decode to.
    #[must_use]
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
        }
    }

    /// Restore an image from its text-safe storage form.
    pub fn from_base64(
        encoded: &str,
        width: u32,
        height: u32,
    ) -> Result<Self, ImageTextDecodeError> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|err| ImageTextDecodeError {
                message: err.to_string(),
            })?;
        Ok(Self::new(bytes, width, height))
    }

    /// Text-safe storage form of the payload.
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Encoded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encoded length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Pixel width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl std::fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedImage")
            .field("len", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
