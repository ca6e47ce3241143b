//! Image ingestion: turn an arbitrary upload into a stored-image payload.
//!
//! The pipeline rejects non-image content types, fits the picture inside the
//! display box at the initial quality, then walks a strictly decreasing
//! quality ladder until the encoded size is within budget. Running out of
//! ladder fails with [`ImageIngestionError::CompressionBudgetExceeded`], so
//! every call terminates after at most `ladder.len() + 1` codec passes.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use super::ports::{ImageCodec, ImageCodecError};
use super::{EncodeOptions, EncodedImage, Error, ImageBounds, Quality, TraceId};

/// Default encoded-size ceiling in bytes.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 600_000;
/// Default display box width.
pub const DEFAULT_MAX_WIDTH: u32 = 600;
/// Default display box height.
pub const DEFAULT_MAX_HEIGHT: u32 = 300;
/// Quality of the first candidate.
pub const DEFAULT_INITIAL_QUALITY: u8 = 70;
/// Qualities tried, in order, while the candidate is over budget.
pub const DEFAULT_QUALITY_LADDER: [u8; 6] = [60, 50, 40, 30, 20, 10];

/// Uploaded file as received from an inbound adapter.
#[derive(Clone)]
pub struct ImageUpload {
    bytes: Vec<u8>,
    content_type: Option<String>,
}

impl ImageUpload {
    /// Wrap raw bytes with the content type the client declared, if any.
    #[must_use]
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            bytes,
            content_type,
        }
    }

    /// Raw uploaded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Declared content type.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Whether the declared media type is in the `image/*` family.
    ///
    /// Parameters such as `; charset=` are ignored and the comparison is
    /// case-insensitive.
    #[must_use]
    pub fn declares_image(&self) -> bool {
        self.content_type.as_deref().is_some_and(|raw| {
            let essence = raw.split(';').next().unwrap_or_default().trim();
            essence
                .get(..6)
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
                && essence.len() > 6
        })
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Errors surfaced by the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageIngestionError {
    /// Declared content type is not an image.
    #[error("content type {content_type} is not an image")]
    UnsupportedFormat { content_type: String },
    /// Bytes could not be decoded as an image.
    #[error("image could not be decoded: {message}")]
    Decode { message: String },
    /// The ladder ran out before the payload fit the byte budget.
    #[error(
        "image could not be compressed below {max_bytes} bytes (smallest attempt was {smallest} bytes)"
    )]
    CompressionBudgetExceeded { max_bytes: usize, smallest: usize },
    /// Encoding failed or produced an out-of-bounds image.
    #[error("image could not be encoded: {message}")]
    Encode { message: String },
    /// No worker could run the job.
    #[error("image workers are unavailable")]
    WorkerUnavailable,
}

impl From<ImageCodecError> for ImageIngestionError {
    fn from(value: ImageCodecError) -> Self {
        match value {
            ImageCodecError::UnsupportedFormat { message } | ImageCodecError::Decode { message } => {
                Self::Decode { message }
            }
            ImageCodecError::Encode { message } => Self::Encode { message },
        }
    }
}

impl From<ImageIngestionError> for Error {
    fn from(value: ImageIngestionError) -> Self {
        let message = value.to_string();
        match value {
            ImageIngestionError::UnsupportedFormat { .. } => Error::unsupported_media_type(message),
            ImageIngestionError::Decode { .. } => Error::unprocessable_entity(message),
            ImageIngestionError::CompressionBudgetExceeded { max_bytes, smallest } => {
                Error::unprocessable_entity(message).with_details(serde_json::json!({
                    "maxBytes": max_bytes,
                    "smallestAttempt": smallest,
                }))
            }
            ImageIngestionError::Encode { .. } => Error::internal(message),
            ImageIngestionError::WorkerUnavailable => Error::service_unavailable(message),
        }
    }
}

/// Rejections raised while building a [`CompressionPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompressionPolicyError {
    #[error("byte budget must be greater than zero")]
    ZeroBudget,
    #[error("display box must have non-zero dimensions")]
    ZeroBounds,
    #[error("quality ladder must strictly decrease below the initial quality {initial}")]
    LadderNotDecreasing { initial: u8 },
}

/// Limits and quality schedule applied to every upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionPolicy {
    max_bytes: usize,
    bounds: ImageBounds,
    initial_quality: Quality,
    ladder: Vec<Quality>,
}

impl Default for CompressionPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_IMAGE_BYTES,
            bounds: ImageBounds::new(DEFAULT_MAX_WIDTH, DEFAULT_MAX_HEIGHT),
            initial_quality: Quality::new(DEFAULT_INITIAL_QUALITY),
            ladder: DEFAULT_QUALITY_LADDER.into_iter().map(Quality::new).collect(),
        }
    }
}

impl CompressionPolicy {
    /// Policy with the given budget and box and the default quality schedule.
    pub fn new(max_bytes: usize, bounds: ImageBounds) -> Result<Self, CompressionPolicyError> {
        if max_bytes == 0 {
            return Err(CompressionPolicyError::ZeroBudget);
        }
        if bounds.max_width == 0 || bounds.max_height == 0 {
            return Err(CompressionPolicyError::ZeroBounds);
        }
        Ok(Self {
            max_bytes,
            bounds,
            ..Self::default()
        })
    }

    /// Replace the quality schedule.
    ///
    /// Every ladder step must be strictly lower than the one before it and
    /// than `initial`.
    pub fn with_schedule(
        self,
        initial: u8,
        ladder: impl IntoIterator<Item = u8>,
    ) -> Result<Self, CompressionPolicyError> {
        let initial_quality = Quality::new(initial);
        let ladder: Vec<Quality> = ladder.into_iter().map(Quality::new).collect();
        let mut previous = initial_quality;
        for step in &ladder {
            if *step >= previous {
                return Err(CompressionPolicyError::LadderNotDecreasing {
                    initial: initial_quality.value(),
                });
            }
            previous = *step;
        }
        Ok(Self {
            initial_quality,
            ladder,
            ..self
        })
    }

    /// Encoded-size ceiling in bytes.
    #[must_use]
    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Display box.
    #[must_use]
    pub fn bounds(&self) -> ImageBounds {
        self.bounds
    }

    /// Quality of the first candidate.
    #[must_use]
    pub fn initial_quality(&self) -> Quality {
        self.initial_quality
    }

    /// Fallback qualities in the order they are tried.
    #[must_use]
    pub fn ladder(&self) -> &[Quality] {
        &self.ladder
    }
}

/// Drives an [`ImageCodec`] until the output satisfies a [`CompressionPolicy`].
///
/// ## Invariants
/// - Output dimensions never exceed [`CompressionPolicy::bounds`].
/// - Output length never exceeds [`CompressionPolicy::max_bytes`].
/// - Decode failures abort immediately; nothing is retried past them.
pub struct SizeConstrainedCompressor {
    codec: Arc<dyn ImageCodec>,
    policy: CompressionPolicy,
}

impl SizeConstrainedCompressor {
    /// Create a compressor over `codec`.
    pub fn new(codec: Arc<dyn ImageCodec>, policy: CompressionPolicy) -> Self {
        Self { codec, policy }
    }

    /// Active policy.
    pub fn policy(&self) -> &CompressionPolicy {
        &self.policy
    }

    /// Run the full pipeline on one upload.
    ///
    /// Blocks for the duration of every codec pass.
    pub fn compress(&self, upload: &ImageUpload) -> Result<EncodedImage, ImageIngestionError> {
        if !upload.declares_image() {
            let content_type = upload.content_type().unwrap_or("<missing>").to_owned();
            warn!(%content_type, "rejected non-image upload");
            return Err(ImageIngestionError::UnsupportedFormat { content_type });
        }

        let bounds = self.policy.bounds;
        let initial = self.policy.initial_quality;
        let mut candidate = self.pass(upload.bytes(), bounds, initial, 0)?;

        for (index, quality) in self.policy.ladder.iter().enumerate() {
            if candidate.len() <= self.policy.max_bytes {
                break;
            }
            candidate = self.pass(candidate.bytes(), bounds, *quality, index + 1)?;
        }

        if candidate.len() > self.policy.max_bytes {
            warn!(
                max_bytes = self.policy.max_bytes,
                smallest = candidate.len(),
                "compression ladder exhausted"
            );
            return Err(ImageIngestionError::CompressionBudgetExceeded {
                max_bytes: self.policy.max_bytes,
                smallest: candidate.len(),
            });
        }
        Ok(candidate)
    }

    fn pass(
        &self,
        source: &[u8],
        bounds: ImageBounds,
        quality: Quality,
        step: usize,
    ) -> Result<EncodedImage, ImageIngestionError> {
        let candidate = self
            .codec
            .encode(source, EncodeOptions::fit(bounds, quality))?;
        if !bounds.contains(candidate.width(), candidate.height()) {
            return Err(ImageIngestionError::Encode {
                message: format!(
                    "codec produced {}x{} outside {}x{}",
                    candidate.width(),
                    candidate.height(),
                    bounds.max_width,
                    bounds.max_height
                ),
            });
        }
        debug!(
            step,
            quality = quality.value(),
            bytes = candidate.len(),
            width = candidate.width(),
            height = candidate.height(),
            "compression candidate"
        );
        Ok(candidate)
    }
}

/// Runs compression jobs on blocking threads with bounded parallelism.
///
/// At most `workers` uploads are decoded at once; further callers wait for a
/// permit without occupying an async worker thread.
#[derive(Clone)]
pub struct ImageIngestionPool {
    compressor: Arc<SizeConstrainedCompressor>,
    permits: Arc<Semaphore>,
}

impl ImageIngestionPool {
    /// Create a pool allowing `workers` concurrent jobs (at least one).
    pub fn new(compressor: SizeConstrainedCompressor, workers: usize) -> Self {
        Self {
            compressor: Arc::new(compressor),
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Active policy.
    pub fn policy(&self) -> &CompressionPolicy {
        self.compressor.policy()
    }

    /// Compress `upload` on a blocking thread, keeping the caller's trace id.
    pub async fn ingest(&self, upload: ImageUpload) -> Result<EncodedImage, ImageIngestionError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| ImageIngestionError::WorkerUnavailable)?;
        let compressor = Arc::clone(&self.compressor);
        let trace_id = TraceId::current();

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            TraceId::sync_scope(trace_id, || compressor.compress(&upload))
        })
        .await
        .map_err(|err| {
            error!(error = %err, "image worker failed");
            ImageIngestionError::WorkerUnavailable
        })?
    }
}
