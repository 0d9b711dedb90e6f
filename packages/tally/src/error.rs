//! Error types for the tally crate.
//!
//! `TallyError` is returned by the library API. Failures that are contained
//! to a single source file never surface as errors of `ingest`; they are
//! recorded in the [`IngestReport`](crate::ingest::IngestReport) instead.

use thiserror::Error;

use crate::registry::EventKind;

/// Main error type for the tally library.
#[derive(Debug, Error)]
pub enum TallyError {
    /// Election identifier does not look like `TK2023`.
    #[error("Invalid election id: '{0}'. Expected letters followed by a year (e.g., TK2023)")]
    InvalidElectionId(String),

    /// The XML tokenizer rejected the document.
    #[error("XML parsing failed: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document is well-tokenized but structurally incomplete.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed while discovering resources.
    #[error("Failed to walk resource directory: {0}")]
    Walk(#[from] walkdir::Error),

    /// The resource resolver could not produce a resource list at all.
    #[error("Failed to resolve resources for {election_id}: {reason}")]
    ResourceResolution { election_id: String, reason: String },

    /// An event reached a registry with no handler for its kind.
    #[error("No handler for {kind} event{}", .file.as_ref().map(|f| format!(" in {f}")).unwrap_or_default())]
    UnhandledEvent {
        kind: EventKind,
        file: Option<String>,
    },

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tally operations.
pub type Result<T> = std::result::Result<T, TallyError>;
