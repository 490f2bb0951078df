//! OpenAI-compatible chat-completions backend.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::credential::Credential;
use crate::error::ExtractionError;
use crate::{ExtractionRequest, Result, VisionBackend};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default vision-capable model.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Connection settings for [`OpenAiBackend`].
#[derive(Debug, Clone)]
pub struct OpenAiOptions {
    /// API root, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Model name sent with every request.
    pub model: String,
    /// Whole-request timeout. `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl Default for OpenAiOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }
}

/// Backend that talks to `POST {base_url}/chat/completions`.
pub struct OpenAiBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    credential: Credential,
}

impl OpenAiBackend {
    /// Build a backend for the given credential.
    ///
    /// Idle connections are not pooled, so each call opens and releases its own.
    pub fn new(credential: Credential, options: OpenAiOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ExtractionError::Transport(format!("failed to build HTTP client: {e}")))?;

        let endpoint = format!("{}/chat/completions", options.base_url.trim_end_matches('/'));
        debug!("Chat completions endpoint: {}", endpoint);

        Ok(Self {
            client,
            endpoint,
            model: options.model,
            credential,
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl VisionBackend for OpenAiBackend {
    async fn complete(&self, request: &ExtractionRequest) -> Result<String> {
        let body = ChatRequest::single_turn(&self.model, request);

        debug!(
            "Sending {} byte payload ({}x{}) to {} with max_tokens={}",
            request.payload().len(),
            request.payload().dimensions().0,
            request.payload().dimensions().1,
            self.model,
            request.max_output_tokens()
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.credential.secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        debug!(
            "Chat completion returned {} in {}ms",
            status,
            start.elapsed().as_millis()
        );

        if !status.is_success() {
            let err = classify_failure(status.as_u16(), &text);
            warn!("Chat completion failed: {}", err);
            return Err(err);
        }

        parse_completion(&text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: [ContentPart<'a>; 2],
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

impl<'a> ChatRequest<'a> {
    fn single_turn(model: &'a str, request: &'a ExtractionRequest) -> Self {
        Self {
            model,
            max_tokens: request.max_output_tokens(),
            messages: [ChatMessage {
                role: "user",
                content: [
                    ContentPart::Text {
                        text: request.instruction(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: request.payload().to_data_url(),
                        },
                    },
                ],
            }],
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
}

/// Map a non-success status and its body to an error kind.
fn classify_failure(status: u16, body: &str) -> ExtractionError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {status}")
            } else {
                trimmed.to_string()
            }
        });

    match status {
        401 | 403 => ExtractionError::Auth(message),
        429 => ExtractionError::RateLimit(message),
        500..=599 => ExtractionError::Transport(format!("provider error {status}: {message}")),
        _ => ExtractionError::Rejected { status, message },
    }
}

/// Pull the generated text out of a success body.
fn parse_completion(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ExtractionError::EmptyResponse(format!("malformed response body: {e}")))?;

    let content = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ExtractionError::EmptyResponse("response has no choices".to_string()))?
        .message
        .content
        .ok_or_else(|| ExtractionError::EmptyResponse("response message has no content".to_string()))?;

    if content.trim().is_empty() {
        return Err(ExtractionError::EmptyResponse(
            "response content is blank".to_string(),
        ));
    }

    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EncodedPayload;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn sample_request() -> ExtractionRequest {
        ExtractionRequest::new(
            "Extract all text.",
            EncodedPayload::jpeg(vec![0xFF, 0xD8, 0xFF], 2, 2),
            10024,
        )
    }

    #[test]
    fn test_request_body_shape() {
        let request = sample_request();
        let body = serde_json::to_value(ChatRequest::single_turn("gpt-4o", &request)).unwrap();

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 10024);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"][0]["type"], "text");
        assert_eq!(body["messages"][0]["content"][0]["text"], "Extract all text.");
        assert_eq!(body["messages"][0]["content"][1]["type"], "image_url");
        assert_eq!(
            body["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,/9j/"
        );
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"a,b\n1,2\n"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "a,b\n1,2\n");
    }

    #[test]
    fn test_parse_completion_keeps_text_verbatim() {
        let body = r#"{"choices":[{"message":{"content":"  padded\n"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "  padded\n");
    }

    #[test]
    fn test_parse_completion_empty() {
        for body in [
            r#"{"choices":[]}"#,
            r#"{}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[{"message":{"content":"   "}}]}"#,
            "not json",
        ] {
            let err = parse_completion(body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::EmptyResponse, "body: {body}");
        }
    }

    #[test]
    fn test_classify_failure() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        let err = classify_failure(401, body);
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert!(err.to_string().contains("Incorrect API key provided"));

        assert_eq!(classify_failure(403, "").kind(), ErrorKind::Auth);
        assert_eq!(classify_failure(429, "").kind(), ErrorKind::RateLimit);
        assert_eq!(classify_failure(503, "").kind(), ErrorKind::Transport);
        assert_eq!(classify_failure(400, "bad image").kind(), ErrorKind::Rejected);
    }

    #[test]
    fn test_classify_failure_message_fallback() {
        let err = classify_failure(418, "");
        assert_eq!(err.to_string(), "request rejected (418): HTTP 418");

        let err = classify_failure(400, "plain text body");
        assert!(err.to_string().contains("plain text body"));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let credential = Credential::new("sk-test", "TEST").unwrap();
        let backend = OpenAiBackend::new(
            credential,
            OpenAiOptions {
                base_url: "http://localhost:8080/v1/".to_string(),
                ..OpenAiOptions::default()
            },
        )
        .unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(backend.model(), "gpt-4o");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport() {
        let credential = Credential::new("sk-test", "TEST").unwrap();
        let backend = OpenAiBackend::new(
            credential,
            OpenAiOptions {
                base_url: "http://127.0.0.1:1".to_string(),
                timeout: Some(Duration::from_secs(5)),
                ..OpenAiOptions::default()
            },
        )
        .unwrap();

        let err = backend.complete(&sample_request()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
    }
}
