//! Hosted vision-model inference layer for likh.
//!
//! This crate owns the boundary with the inference provider:
//! - request types (`EncodedPayload`, `ExtractionRequest`)
//! - the `VisionBackend` trait and its chat-completions implementation
//! - the API `Credential`
//! - the error taxonomy for a failed call

mod backend;
mod credential;
mod error;
mod payload;

pub use backend::VisionBackend;
pub use backend::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL, OpenAiBackend, OpenAiOptions};
pub use credential::Credential;
pub use error::{ErrorKind, ExtractionError, MissingCredential};
pub use payload::{EncodedPayload, ExtractionRequest, JPEG_MIME};

/// Result type for inference operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;
