//! Error taxonomy
//!
//! Terminal pipeline failures are classified so the capture layer can phrase
//! user guidance: re-frame the shot, aim at a clearer cover region, retry
//! later, or fall back to manual entry.

use thiserror::Error;

use crate::catalog::CatalogError;

/// Terminal identification failure
#[derive(Debug, Error)]
pub enum IdentifyError {
    /// The recognition engine produced nothing inside the scan region
    #[error("no text detected in the scan region")]
    NoTextDetected,

    /// Text was detected but no title candidate could be extracted
    #[error("no title could be identified from the detected text")]
    NoTitleIdentified,

    /// The catalog collaborator failed at the transport level
    #[error("catalog unavailable")]
    CatalogUnavailable(#[from] CatalogError),

    /// Catalog queries succeeded but nothing usable came back
    #[error("no matching book found")]
    NoMatchFound,

    /// Manual entry contained no checksum-valid ISBN
    #[error("no valid ISBN found in input")]
    InvalidIsbnFormat,

    /// A previous frame's pipeline is still running; this frame was ignored
    #[error("identification already in progress")]
    PipelineBusy,
}
