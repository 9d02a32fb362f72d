/// Error types for tracked-change editing.
use thiserror::Error;

/// Result type for editing operations.
pub type Result<T> = std::result::Result<T, EditError>;

/// Why an edit was refused.
///
/// Every variant is raised before the paragraph is touched, so a failed edit
/// leaves the document exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Range is empty, reversed, or extends past the paragraph text
    #[error("Invalid range [{start}, {end}) for paragraph of {len} characters")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// Insertion offset past the end of the paragraph text
    #[error("Invalid offset {offset} for paragraph of {len} characters")]
    InvalidOffset { offset: usize, len: usize },

    /// Search text does not occur in the paragraph
    #[error("Text not found in paragraph: {query:?}")]
    TextNotFound { query: String },

    /// No run covers one of the range boundaries
    #[error("Range [{start}, {end}) could not be mapped onto runs")]
    RangeUnresolved { start: usize, end: usize },

    /// End boundary resolved to an element before the begin boundary
    #[error("End element {end} precedes begin element {begin}")]
    InvalidSpan { begin: usize, end: usize },

    /// An explicit id is already in use in this document
    #[error("Id {id} is already in use")]
    DuplicateId { id: u32 },

    /// The document has no free ids left
    #[error("No free revision ids left in document")]
    IdsExhausted,

    /// Range cuts into or across an existing insertion
    #[error("Range [{start}, {end}) overlaps an existing tracked insertion")]
    RevisionOverlap { start: usize, end: usize },

    /// Range would move the start or end marker of an existing comment
    #[error("Range [{start}, {end}) would move a range marker of comment {id}")]
    CommentOverlap { id: u32, start: usize, end: usize },

    /// Run index out of bounds
    #[error("Run {index} not found in paragraph")]
    RunNotFound { index: usize },

    /// Paragraph index out of bounds
    #[error("Paragraph {index} not found")]
    ParagraphNotFound { index: usize },
}
