//! Inference backend implementations.

pub mod openai;

use std::future::Future;

use crate::{ExtractionRequest, Result};

/// Trait for hosted vision-model backends.
///
/// This trait abstracts over the provider that turns an instruction plus an
/// image into generated text, so the extraction flow can run against the real
/// endpoint or against a stub in tests.
pub trait VisionBackend: Send + Sync {
    /// Send one request and return the generated text verbatim.
    ///
    /// Implementations make exactly one attempt.
    fn complete(&self, request: &ExtractionRequest) -> impl Future<Output = Result<String>> + Send;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
