//! What one extraction action shows the user.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use likh_inference::ErrorKind;
use serde::{Deserialize, Serialize};

use super::flags::Source;
use crate::error::{DecodeError, ExtractionError};
use crate::prompt::PromptKind;

/// Content type of every download artifact.
pub const CSV_MIME: &str = "text/csv";

/// A file offered for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadArtifact {
    /// Suggested file name, e.g. `structured_bill_upload.csv`.
    pub file_name: String,

    /// File content, byte-for-byte the extracted text.
    pub content: String,

    /// MIME type.
    pub mime_type: String,
}

impl DownloadArtifact {
    pub fn csv(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
            mime_type: CSV_MIME.to_string(),
        }
    }

    /// Write the artifact into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.content.as_bytes())?;
        Ok(path)
    }
}

/// Kind of a failed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The input image could not be read or encoded.
    Decode,
    Transport,
    Auth,
    RateLimit,
    EmptyResponse,
    Rejected,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Decode => "decode",
            FailureKind::Transport => "transport",
            FailureKind::Auth => "auth",
            FailureKind::RateLimit => "rate-limit",
            FailureKind::EmptyResponse => "empty-response",
            FailureKind::Rejected => "rejected",
        }
    }
}

impl From<ErrorKind> for FailureKind {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Transport => FailureKind::Transport,
            ErrorKind::Auth => FailureKind::Auth,
            ErrorKind::RateLimit => FailureKind::RateLimit,
            ErrorKind::EmptyResponse => FailureKind::EmptyResponse,
            ErrorKind::Rejected => FailureKind::Rejected,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReport {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&ExtractionError> for FailureReport {
    fn from(e: &ExtractionError) -> Self {
        Self {
            kind: e.kind().into(),
            message: e.to_string(),
        }
    }
}

impl From<&DecodeError> for FailureReport {
    fn from(e: &DecodeError) -> Self {
        Self {
            kind: FailureKind::Decode,
            message: e.to_string(),
        }
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Result of presenting an extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PresentationOutcome {
    /// Text to display, plus a download in CSV mode.
    Extracted {
        source: Source,
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        download: Option<DownloadArtifact>,
    },

    /// Error to display. Never carries a download.
    Failed {
        source: Source,
        failure: FailureReport,
    },
}

impl PresentationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PresentationOutcome::Extracted { .. })
    }

    /// Extracted text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            PresentationOutcome::Extracted { text, .. } => Some(text),
            PresentationOutcome::Failed { .. } => None,
        }
    }

    pub fn download(&self) -> Option<&DownloadArtifact> {
        match self {
            PresentationOutcome::Extracted { download, .. } => download.as_ref(),
            PresentationOutcome::Failed { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReport> {
        match self {
            PresentationOutcome::Extracted { .. } => None,
            PresentationOutcome::Failed { failure, .. } => Some(failure),
        }
    }

    pub fn source(&self) -> Source {
        match self {
            PresentationOutcome::Extracted { source, .. }
            | PresentationOutcome::Failed { source, .. } => *source,
        }
    }
}

/// Bookkeeping for one action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionMetadata {
    /// When the action started.
    pub started_at: DateTime<Utc>,

    /// Which instruction was sent.
    pub prompt: PromptKind,

    /// Model that served the request.
    pub model: String,

    /// Wall time of the whole action in milliseconds.
    pub processing_time_ms: u64,

    /// Encoded payload size in bytes (absent if encoding failed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_bytes: Option<usize>,
}

/// Outcome plus metadata, as produced by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReport {
    #[serde(flatten)]
    pub outcome: PresentationOutcome,
    pub metadata: ActionMetadata,
}
