//! Request types for a single extraction call.

use base64::{Engine, engine::general_purpose::STANDARD};

/// MIME type of every payload this crate produces.
pub const JPEG_MIME: &str = "image/jpeg";

/// An encoded image ready to be embedded in a request.
///
/// Payloads are always opaque three-channel images; there is no alpha channel
/// to carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    bytes: Vec<u8>,
    mime_type: &'static str,
    width: u32,
    height: u32,
}

impl EncodedPayload {
    /// Wrap JPEG bytes of the given pixel dimensions.
    pub fn jpeg(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            mime_type: JPEG_MIME,
            width,
            height,
        }
    }

    /// The encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// Pixel dimensions (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of color channels carried by the payload.
    pub fn channels(&self) -> u8 {
        3
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Render as a `data:` URL with a base64 body.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.bytes))
    }
}

/// A single-turn request: one instruction and one image.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    instruction: String,
    payload: EncodedPayload,
    max_output_tokens: u32,
}

impl ExtractionRequest {
    pub fn new(instruction: impl Into<String>, payload: EncodedPayload, max_output_tokens: u32) -> Self {
        Self {
            instruction: instruction.into(),
            payload,
            max_output_tokens,
        }
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn payload(&self) -> &EncodedPayload {
        &self.payload
    }

    /// Upper bound on generated tokens.
    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_data_url() {
        let payload = EncodedPayload::jpeg(vec![0xFF, 0xD8, 0xFF], 1, 1);
        assert_eq!(payload.to_data_url(), "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_payload_metadata() {
        let payload = EncodedPayload::jpeg(vec![1, 2, 3, 4], 640, 480);
        assert_eq!(payload.mime_type(), "image/jpeg");
        assert_eq!(payload.dimensions(), (640, 480));
        assert_eq!(payload.channels(), 3);
        assert_eq!(payload.len(), 4);
        assert!(!payload.is_empty());
    }
}
