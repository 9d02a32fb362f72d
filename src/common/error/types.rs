//! Unified error type for the crate.
//!
//! Each layer keeps its own error enum (`OoxmlError` for XML handling,
//! `EditError` for tracked-change editing); this type folds them into one
//! surface for callers that do not care which layer failed.
use thiserror::Error;

use crate::ooxml::docx::writer::revise::EditError;

/// Main error type for docx-redline operations.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing or serialization error
    #[error("XML error: {0}")]
    XmlError(String),

    /// Input that is well-formed XML but not the expected WordprocessingML
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Tracked-change editing failure
    #[error(transparent)]
    Edit(#[from] EditError),

    /// Options could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for docx-redline operations.
pub type Result<T> = std::result::Result<T, Error>;
