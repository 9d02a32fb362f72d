//! Mutable document writer components for DOCX.
//!
//! This module provides the in-memory model for editing Word paragraphs and
//! serializing them back to WordprocessingML.

pub mod comment;
pub mod doc;
pub mod paragraph;
pub mod revise;
pub mod revision;
pub mod run;

// Re-export main document type
pub use doc::MutableDocument;

// Re-export paragraph types
pub use paragraph::{MutableParagraph, ParagraphElement};

// Re-export run types
pub use run::{MutableRun, RunContent, RunProperties};

// Re-export revision wrapper types
pub use revision::{MutableRevision, RevisionKind};

// Re-export comment types
pub use comment::{CommentStore, MutableComment};

// Re-export editing entry points
pub use revise::{
    CharacterRange, CommentHandle, CommentRequest, DeletionHandle, EditError, InsertionHandle,
    InsertionPoint, InteriorRunPolicy, ReviseOptions, RevisionContext, TextTarget,
};
