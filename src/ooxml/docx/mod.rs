/// Word (.docx) document support.
///
/// Reading and writing of WordprocessingML body content with tracked changes.
///
/// # Architecture
///
/// - `writer`: the mutable paragraph/run model, its serialization, and the
///   `revise` core that attaches comments, insertions and deletions to
///   arbitrary character ranges
/// - `revision`: lists tracked changes found in serialized XML
/// - `comment`: reads a `comments.xml` part
/// - `format`: formatting values shared by reading and writing
///
/// # Example
///
/// ```rust
/// use docx_redline::ooxml::docx::writer::MutableDocument;
/// use docx_redline::ooxml::docx::revision::parse_revisions;
///
/// let mut doc = MutableDocument::new();
/// doc.add_paragraph_with_text("The quick brown fox");
/// doc.add_deletion(0, "quick ".into(), Some("Editor"), None)?;
/// assert_eq!(doc.paragraph_text(0).as_deref(), Some("The brown fox"));
///
/// let xml = doc.to_xml()?;
/// let revisions = parse_revisions(xml.as_bytes())?;
/// assert_eq!(revisions[0].text(), "quick ");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod comment;
pub mod format;
pub mod revision;
pub mod writer;

pub use comment::Comment;
pub use format::UnderlineStyle;
pub use revision::{Revision, RevisionType, parse_revisions};
pub use writer::{MutableDocument, MutableParagraph, MutableRun};
