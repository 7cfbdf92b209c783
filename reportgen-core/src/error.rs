//! Error types shared across the report pipeline.

use thiserror::Error;

/// Rejection of a report request before any generation work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Every required field that was absent or blank, in declaration order.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// A strategy name that is neither `template` nor `delegated` (or an alias).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown synthesis strategy '{0}', expected 'template' or 'delegated'")]
pub struct UnknownStrategy(pub String);

/// Failure of the external text-generation collaborator.
///
/// Never fatal for a job: the delegated synthesizer substitutes placeholder text.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("No content generated by the text service")]
    NoCandidates,

    #[error("Empty content generated")]
    Empty,

    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Failure while encoding the assembled document.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("ZIP packaging error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Character U+{code:04X} is not allowed in a document")]
    InvalidChar { code: u32 },
}

/// Terminal failure of a generation job.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Document serialization failed: {0}")]
    Serialize(#[from] SerializeError),
}
