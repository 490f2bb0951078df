//! One user action, end to end.

use std::time::Instant;

use chrono::Utc;
use image::DynamicImage;
use tracing::{info, warn};

use likh_inference::{EncodedPayload, VisionBackend};

use super::Extractor;
use crate::error::DecodeError;
use crate::models::config::LikhConfig;
use crate::models::flags::{OutputFlags, Source};
use crate::models::outcome::{ActionMetadata, ActionReport, FailureReport, PresentationOutcome};
use crate::normalize::{self, ImageNormalizer};
use crate::present::present;

/// Decode, normalize, select the prompt, extract and present.
///
/// Image and extraction errors end up in the returned report as a failed
/// outcome; the pipeline itself stays usable.
pub struct Pipeline<B: VisionBackend> {
    normalizer: ImageNormalizer,
    extractor: Extractor<B>,
}

impl<B: VisionBackend> Pipeline<B> {
    pub fn new(extractor: Extractor<B>) -> Self {
        Self {
            normalizer: ImageNormalizer::new(),
            extractor,
        }
    }

    /// Build a pipeline around `backend` using the image and token settings in `config`.
    pub fn from_config(backend: B, config: &LikhConfig) -> Self {
        Self {
            normalizer: ImageNormalizer::from_config(&config.image),
            extractor: Extractor::new(backend).with_max_output_tokens(config.api.max_output_tokens),
        }
    }

    pub fn with_normalizer(mut self, normalizer: ImageNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn extractor(&self) -> &Extractor<B> {
        &self.extractor
    }

    /// Decode and encode `bytes` without calling the backend.
    pub fn prepare(&self, bytes: &[u8]) -> Result<EncodedPayload, DecodeError> {
        self.normalizer.normalize_bytes(bytes)
    }

    /// Run one action on raw image bytes.
    pub async fn process(&self, bytes: &[u8], flags: OutputFlags, source: Source) -> ActionReport {
        let start = Instant::now();
        let started_at = Utc::now();

        match normalize::decode(bytes) {
            Ok(image) => self.run(&image, flags, source, start, started_at).await,
            Err(e) => self.decode_failure(&e, flags, source, start, started_at),
        }
    }

    /// Run one action on an already decoded image.
    pub async fn process_image(
        &self,
        image: &DynamicImage,
        flags: OutputFlags,
        source: Source,
    ) -> ActionReport {
        self.run(image, flags, source, Instant::now(), Utc::now()).await
    }

    async fn run(
        &self,
        image: &DynamicImage,
        flags: OutputFlags,
        source: Source,
        start: Instant,
        started_at: chrono::DateTime<Utc>,
    ) -> ActionReport {
        info!(
            "Processing {} image {}x{} ({:?} prompt)",
            source,
            image.width(),
            image.height(),
            flags.prompt_kind()
        );

        let payload = match self.normalizer.normalize(image) {
            Ok(payload) => payload,
            Err(e) => return self.decode_failure(&e, flags, source, start, started_at),
        };
        let payload_bytes = payload.len();

        let result = self.extractor.extract(flags.prompt(), payload).await;
        if let Err(e) = &result {
            warn!("Extraction from {} image failed: {}", source, e);
        }

        ActionReport {
            outcome: present(&result, flags, source),
            metadata: ActionMetadata {
                started_at,
                prompt: flags.prompt_kind(),
                model: self.extractor.backend().model().to_string(),
                processing_time_ms: start.elapsed().as_millis() as u64,
                payload_bytes: Some(payload_bytes),
            },
        }
    }

    fn decode_failure(
        &self,
        error: &DecodeError,
        flags: OutputFlags,
        source: Source,
        start: Instant,
        started_at: chrono::DateTime<Utc>,
    ) -> ActionReport {
        warn!("Could not read {} image: {}", source, error);

        ActionReport {
            outcome: PresentationOutcome::Failed {
                source,
                failure: FailureReport::from(error),
            },
            metadata: ActionMetadata {
                started_at,
                prompt: flags.prompt_kind(),
                model: self.extractor.backend().model().to_string(),
                processing_time_ms: start.elapsed().as_millis() as u64,
                payload_bytes: None,
            },
        }
    }
}
