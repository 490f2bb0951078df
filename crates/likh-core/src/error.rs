//! Error types for the likh-core library.

use thiserror::Error;

pub use likh_inference::{ExtractionError, MissingCredential};

/// Main error type for the likh library.
///
/// Per-action image and extraction failures are reported in the outcome
/// instead; this covers what happens around an action.
#[derive(Error, Debug)]
pub enum LikhError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A config file that is not valid JSON for [`crate::LikhConfig`].
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading and normalizing an input image.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The bytes are not in a recognized raster format.
    #[error("unsupported image format: {0}")]
    Unsupported(String),

    /// The format was recognized but the data is damaged.
    #[error("corrupt image data: {0}")]
    Corrupt(String),

    /// The image decoded but could not be re-encoded for transport.
    #[error("failed to encode image: {0}")]
    Encode(String),
}

impl From<image::ImageError> for DecodeError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::Unsupported(_) => DecodeError::Unsupported(e.to_string()),
            image::ImageError::Encoding(_) | image::ImageError::Parameter(_) => {
                DecodeError::Encode(e.to_string())
            }
            _ => DecodeError::Corrupt(e.to_string()),
        }
    }
}

/// Result type for the likh library.
pub type Result<T> = std::result::Result<T, LikhError>;
