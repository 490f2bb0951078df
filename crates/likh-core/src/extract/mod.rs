//! Extraction client and the end-to-end action pipeline.

mod pipeline;

pub use pipeline::Pipeline;

use tracing::{debug, info};

use likh_inference::{EncodedPayload, ExtractionRequest, VisionBackend};

use crate::error::ExtractionError;
use crate::models::config::DEFAULT_MAX_OUTPUT_TOKENS;

/// Sends one instruction and one image to a vision backend.
///
/// The backend is injected; the extractor holds no other state.
pub struct Extractor<B: VisionBackend> {
    backend: B,
    max_output_tokens: u32,
}

impl<B: VisionBackend> Extractor<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    /// Set the cap on generated tokens.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn max_output_tokens(&self) -> u32 {
        self.max_output_tokens
    }

    /// Run one extraction. The generated text is returned verbatim.
    pub async fn extract(
        &self,
        instruction: &str,
        payload: EncodedPayload,
    ) -> Result<String, ExtractionError> {
        let request = ExtractionRequest::new(instruction, payload, self.max_output_tokens);

        info!("Extracting text with {}", self.backend.model());
        let text = self.backend.complete(&request).await?;
        debug!("Extraction returned {} chars", text.len());

        Ok(text)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Stub backends shared by the extraction tests.

    use std::sync::Mutex;

    use likh_inference::{ExtractionError, ExtractionRequest, VisionBackend};

    /// Always answers with the same text and records what it was sent.
    pub struct FixedBackend {
        pub reply: String,
        pub seen: Mutex<Vec<SeenRequest>>,
    }

    #[derive(Debug, Clone)]
    pub struct SeenRequest {
        pub instruction: String,
        pub dimensions: (u32, u32),
        pub max_output_tokens: u32,
        pub data_url_prefix: String,
    }

    impl FixedBackend {
        pub fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> Vec<SeenRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl VisionBackend for FixedBackend {
        async fn complete(&self, request: &ExtractionRequest) -> likh_inference::Result<String> {
            let url = request.payload().to_data_url();
            self.seen.lock().unwrap().push(SeenRequest {
                instruction: request.instruction().to_string(),
                dimensions: request.payload().dimensions(),
                max_output_tokens: request.max_output_tokens(),
                data_url_prefix: url.chars().take(23).collect(),
            });
            Ok(self.reply.clone())
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    /// Always fails with a transport error.
    pub struct DownBackend;

    impl VisionBackend for DownBackend {
        async fn complete(&self, _request: &ExtractionRequest) -> likh_inference::Result<String> {
            Err(ExtractionError::Transport("connection refused".to_string()))
        }

        fn model(&self) -> &str {
            "down"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{DownBackend, FixedBackend};
    use super::*;
    use likh_inference::ErrorKind;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_extract_returns_text_verbatim() {
        let extractor = Extractor::new(FixedBackend::new("a,b\n1,2\n")).with_max_output_tokens(512);
        let payload = EncodedPayload::jpeg(vec![0xFF, 0xD8], 3, 2);

        let text = extractor.extract("Extract.", payload).await.unwrap();
        assert_eq!(text, "a,b\n1,2\n");

        let calls = extractor.backend().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].instruction, "Extract.");
        assert_eq!(calls[0].dimensions, (3, 2));
        assert_eq!(calls[0].max_output_tokens, 512);
        assert_eq!(calls[0].data_url_prefix, "data:image/jpeg;base64,");
    }

    #[tokio::test]
    async fn test_extract_propagates_failure() {
        let extractor = Extractor::new(DownBackend);
        let payload = EncodedPayload::jpeg(vec![0xFF, 0xD8], 1, 1);

        let err = extractor.extract("Extract.", payload).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_default_token_cap() {
        let extractor = Extractor::new(DownBackend);
        assert_eq!(extractor.max_output_tokens(), 10024);
    }
}
