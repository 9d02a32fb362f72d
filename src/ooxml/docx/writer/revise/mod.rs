//! Comments and tracked changes over arbitrary character ranges.
//!
//! Word stores a paragraph as a flat sequence of runs, each with one set of
//! character formatting. Attaching a comment or a tracked change to a span of
//! text means first reshaping that sequence so the span sits in a run of its
//! own. The pieces here do that in four steps:
//!
//! 1. [`run_index`] maps the paragraph's logical text onto its elements
//! 2. [`resolver`] turns a range, offset or search string into run boundaries
//! 3. [`splicer`] plans and applies the run splits
//! 4. [`attacher`] wraps the isolated run in comment markers or a
//!    `w:ins`/`w:del` wrapper and records ids and comment bodies
//!
//! Offsets count Unicode scalar values (`char`s), not bytes or UTF-16 units.
//! Most callers use these through
//! [`MutableDocument`](crate::ooxml::docx::writer::MutableDocument) or
//! [`MutableParagraph`](crate::ooxml::docx::writer::MutableParagraph).
pub mod attacher;
pub mod error;
pub mod options;
pub mod resolver;
pub mod run_index;
pub mod splicer;

pub use attacher::{
    CommentHandle, CommentRequest, DeletionHandle, InsertionHandle, RevisionContext,
};
pub use error::{EditError, Result};
pub use options::{DEFAULT_DATE_FORMAT, InteriorRunPolicy, ReviseOptions};
pub use resolver::{CharacterRange, InsertionPoint, TextTarget};
