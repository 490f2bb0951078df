//! Core library for likh image text extraction.
//!
//! This crate provides:
//! - image normalization to an opaque JPEG payload
//! - selection of one of three fixed extraction instructions
//! - the extraction client over an injected vision backend
//! - presentation of the result, including the CSV download artifact
//! - an advisory checker for structured invoice CSV

pub mod error;
pub mod extract;
pub mod invoice;
pub mod models;
pub mod normalize;
pub mod present;
pub mod prompt;

pub use error::{DecodeError, ExtractionError, LikhError, MissingCredential, Result};
pub use extract::{Extractor, Pipeline};
pub use invoice::{INVOICE_COLUMNS, check_invoice_csv};
pub use models::{
    ActionReport, DownloadArtifact, FailureKind, FailureReport, LikhConfig, OutputFlags,
    PresentationOutcome, Source,
};
pub use normalize::{ImageNormalizer, decode};
pub use present::{ExtractionResult, present};
pub use prompt::{PromptKind, select_prompt};

/// Re-export inference types.
pub use likh_inference::{
    Credential, EncodedPayload, ErrorKind, ExtractionRequest, OpenAiBackend, OpenAiOptions,
    VisionBackend,
};
