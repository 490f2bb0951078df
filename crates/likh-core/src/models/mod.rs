//! Data models: configuration, per-action flags and outcomes.

pub mod config;
pub mod flags;
pub mod outcome;

pub use config::LikhConfig;
pub use flags::{OutputFlags, Source};
pub use outcome::{ActionReport, DownloadArtifact, FailureKind, FailureReport, PresentationOutcome};
