//! Office Open XML (OOXML) support.
//!
//! Only the WordprocessingML (`docx`) side is implemented, and within it the
//! pieces needed to edit paragraphs with tracked changes: an in-memory
//! paragraph/run model, its XML serialization, and the revision-editing core.
//!
//! # Example
//!
//! ```rust
//! use docx_redline::ooxml::docx::writer::MutableDocument;
//! use docx_redline::ooxml::docx::writer::revise::{CommentRequest, InsertionPoint};
//!
//! let mut doc = MutableDocument::new();
//! let para = doc.add_paragraph();
//! para.add_run_with_text("Hello ");
//! para.add_run_with_text("World");
//!
//! let handle = doc.add_insertion(0, InsertionPoint::Offset(6), Some("Reviewer"), None, "There ")?;
//! assert_eq!(doc.paragraph_text(0), Some("Hello There World".to_string()));
//! assert!(handle.id > 0);
//!
//! doc.add_comment(0, "World".into(), CommentRequest::new("Capitalized?"))?;
//! assert_eq!(doc.comments().len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod docx;
pub mod error;

// Re-export error types
pub use error::{OoxmlError, Result};
