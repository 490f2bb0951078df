//! Per-action output options and acquisition source.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::prompt::{self, PromptKind};

/// Output options for one extraction action.
///
/// Structured invoice mode is a sub-mode of CSV output, so it is forced off
/// whenever CSV output is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "StoredFlags")]
pub struct OutputFlags {
    want_csv: bool,
    want_structured_invoice: bool,
}

/// Flags as stored or sent; may hold a structured choice without CSV.
#[derive(Default, Deserialize)]
#[serde(default)]
struct StoredFlags {
    want_csv: bool,
    want_structured_invoice: bool,
}

impl From<StoredFlags> for OutputFlags {
    fn from(stored: StoredFlags) -> Self {
        Self::new(stored.want_csv, stored.want_structured_invoice)
    }
}

impl OutputFlags {
    pub fn new(want_csv: bool, want_structured_invoice: bool) -> Self {
        Self {
            want_csv,
            want_structured_invoice: want_csv && want_structured_invoice,
        }
    }

    /// Plain transcription, no CSV.
    pub fn plain() -> Self {
        Self::new(false, false)
    }

    pub fn want_csv(&self) -> bool {
        self.want_csv
    }

    pub fn want_structured_invoice(&self) -> bool {
        self.want_structured_invoice
    }

    pub fn prompt_kind(&self) -> PromptKind {
        PromptKind::from_flags(self.want_csv, self.want_structured_invoice)
    }

    /// The instruction these flags select.
    pub fn prompt(&self) -> &'static str {
        prompt::select_prompt(self.want_csv, self.want_structured_invoice)
    }
}

/// Raster formats accepted from the upload path.
pub const UPLOAD_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// How the image was acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Live capture.
    Camera,
    /// File selection.
    Upload,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Camera => "camera",
            Source::Upload => "upload",
        }
    }

    /// Whether a file at `path` may enter through this path.
    ///
    /// Uploads are restricted by extension; captures are whatever the camera
    /// produced and are left to the decoder.
    pub fn accepts(&self, path: &Path) -> bool {
        match self {
            Source::Camera => true,
            Source::Upload => path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| UPLOAD_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
