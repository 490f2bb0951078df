//! Turning an extraction result into what the user sees.

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::flags::{OutputFlags, Source};
use crate::models::outcome::{DownloadArtifact, FailureReport, PresentationOutcome};

/// Outcome of one extraction call.
pub type ExtractionResult = Result<String, ExtractionError>;

/// File name of the CSV artifact for a given mode and source.
pub fn download_file_name(flags: OutputFlags, source: Source) -> String {
    let label = if flags.want_structured_invoice() {
        "structured_bill"
    } else {
        "unstructured_data"
    };
    format!("{}_{}.csv", label, source.as_str())
}

/// Decide what to show for an extraction result.
///
/// The text is passed through untouched. In CSV mode it is also offered as a
/// download; whether it is valid CSV is not checked.
pub fn present(result: &ExtractionResult, flags: OutputFlags, source: Source) -> PresentationOutcome {
    match result {
        Ok(text) => {
            let download = flags
                .want_csv()
                .then(|| DownloadArtifact::csv(download_file_name(flags, source), text.as_str()));

            debug!(
                "Presenting {} chars from {}, download: {}",
                text.len(),
                source,
                download.as_ref().map(|d| d.file_name.as_str()).unwrap_or("none")
            );

            PresentationOutcome::Extracted {
                source,
                text: text.clone(),
                download,
            }
        }
        Err(e) => PresentationOutcome::Failed {
            source,
            failure: FailureReport::from(e),
        },
    }
}
