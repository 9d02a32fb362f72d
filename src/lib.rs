//! docx-redline - comments and tracked changes for Word paragraphs
//!
//! This library edits WordprocessingML paragraphs at character granularity:
//! it anchors comments on arbitrary text ranges and records insertions and
//! deletions as tracked changes, splitting runs as needed while keeping each
//! piece's character formatting.
//!
//! # Features
//!
//! - **Range mapping**: character ranges, offsets or search strings are mapped
//!   onto the runs that hold them
//! - **Run splitting**: boundaries are isolated into their own runs with the
//!   original formatting copied over
//! - **Tracked changes**: `w:ins`/`w:del` wrappers and comment range markers
//!   with document-unique ids
//! - **Atomic edits**: a refused edit leaves the paragraph untouched
//! - **XML round trip**: load `document.xml`/`comments.xml`, edit, write back
//!
//! # Example - Commenting across runs
//!
//! ```
//! use docx_redline::ooxml::docx::writer::{CommentRequest, MutableDocument};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = MutableDocument::new();
//! let para = doc.add_paragraph();
//! para.add_run_with_text("Hello ").bold(true);
//! para.add_run_with_text("World");
//!
//! // "llo Wo" spans both runs
//! let handle = doc.add_comment(0, (2..8).into(), CommentRequest::new("Typo?").author("Ann"))?;
//! assert_eq!(handle.text, "llo Wo");
//!
//! let runs: Vec<String> = doc.paragraph(0).unwrap().runs().map(|r| r.get_text()).collect();
//! assert_eq!(runs, ["He", "llo Wo", "", "rld"]);
//!
//! let document_xml = doc.to_xml()?;
//! let comments_xml = doc.comments_xml()?;
//! assert!(document_xml.contains("w:commentRangeStart"));
//! assert!(comments_xml.is_some());
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Editing an existing document body
//!
//! ```
//! use docx_redline::ooxml::docx::writer::{InsertionPoint, MutableDocument};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
//!   <w:body><w:p><w:r><w:t>Payment is due in 30 days.</w:t></w:r></w:p></w:body>
//! </w:document>"#;
//!
//! let mut doc = MutableDocument::from_xml(xml, None)?;
//! doc.add_deletion(0, "30".into(), Some("Legal"), None)?;
//! doc.add_insertion(0, InsertionPoint::After("due in "), Some("Legal"), None, "45")?;
//! assert_eq!(doc.paragraph_text(0).as_deref(), Some("Payment is due in 45 days."));
//! # Ok(())
//! # }
//! ```

/// Common types and utilities shared across the crate
///
/// Errors, id allocation and XML escaping.
pub mod common;

/// OOXML (Office Open XML) support
///
/// The WordprocessingML paragraph model and the revision-editing core.
pub mod ooxml;

// Re-export commonly used types for convenience
pub use common::{Error, IdAllocator, Result};
pub use ooxml::docx::writer::{
    CommentRequest, EditError, InsertionPoint, MutableDocument, MutableParagraph, MutableRun,
    ReviseOptions, TextTarget,
};
