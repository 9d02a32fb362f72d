/// Reading tracked changes back out of serialized WordprocessingML.
///
/// The writer side builds `w:ins`/`w:del` wrappers in memory; this module
/// lists them from XML, which is how a saved document is checked or
/// summarized without loading it into the editing model.
use crate::common::xml::predefined_entity;
use crate::ooxml::error::Result;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;
use std::fmt;

/// Type of tracked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevisionType {
    /// Text insertion (`w:ins`)
    Insert,
    /// Text deletion (`w:del`)
    Delete,
}

impl fmt::Display for RevisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "Insert"),
            Self::Delete => write!(f, "Delete"),
        }
    }
}

/// A tracked change found in XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    author: String,
    /// Date/time of the change, if recorded
    date: Option<String>,
    /// Text wrapped by the change
    text: String,
    id: u32,
    /// Zero-based index of the enclosing `w:p`
    paragraph: usize,
    revision_type: RevisionType,
}

impl Revision {
    #[inline]
    pub fn new(
        revision_type: RevisionType,
        id: u32,
        author: String,
        date: Option<String>,
        paragraph: usize,
    ) -> Self {
        Self {
            author,
            date,
            text: String::new(),
            id,
            paragraph,
            revision_type,
        }
    }

    #[inline]
    pub fn revision_type(&self) -> RevisionType {
        self.revision_type
    }

    #[inline]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[inline]
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn paragraph(&self) -> usize {
        self.paragraph
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn append_text(&mut self, text: &str) {
        self.text.push_str(text);
    }
}

fn start_revision(
    e: &BytesStart<'_>,
    reader: &Reader<&[u8]>,
    revision_type: RevisionType,
    paragraph: usize,
) -> Revision {
    let mut author = String::new();
    let mut date = None;
    let mut id = 0;

    for attr in e.attributes().flatten() {
        let Ok(value) = attr.decode_and_unescape_value(reader.decoder()) else {
            continue;
        };
        match attr.key.local_name().as_ref() {
            b"author" => author = value.into_owned(),
            b"date" => date = Some(value.into_owned()),
            b"id" => id = atoi_simd::parse::<u32, false, false>(value.as_bytes()).unwrap_or(0),
            _ => {},
        }
    }

    Revision::new(revision_type, id, author, date, paragraph)
}

/// List every `w:ins` and `w:del` in `xml_bytes`, in document order.
///
/// Accepts a single paragraph, a body or a whole `document.xml`. Tabs, breaks
/// and carriage returns inside a change read back as `\t`, `\n` and `\r`.
/// Nested wrappers are reported as part of the outermost one.
///
/// # Example
///
/// ```rust
/// use docx_redline::ooxml::docx::revision::{parse_revisions, RevisionType};
///
/// let xml = br#"<w:body><w:p><w:r><w:t>Hello </w:t></w:r>
///     <w:ins w:id="4" w:author="Ann"><w:r><w:t>brave </w:t></w:r></w:ins>
///     <w:r><w:t>World</w:t></w:r></w:p></w:body>"#;
///
/// let revisions = parse_revisions(xml)?;
/// assert_eq!(revisions.len(), 1);
/// assert_eq!(revisions[0].revision_type(), RevisionType::Insert);
/// assert_eq!(revisions[0].text(), "brave ");
/// # Ok::<(), docx_redline::ooxml::OoxmlError>(())
/// ```
pub fn parse_revisions(xml_bytes: &[u8]) -> Result<SmallVec<[Revision; 4]>> {
    let mut reader = Reader::from_reader(xml_bytes);
    let mut revisions = SmallVec::new();

    let mut current: Option<Revision> = None;
    let mut depth = 0usize;
    let mut in_text = false;
    // Incremented at each w:p start, so the first paragraph is 0
    let mut paragraph = 0usize;
    let mut seen_paragraph = false;

    let mut buf = Vec::with_capacity(1024);

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    if seen_paragraph {
                        paragraph += 1;
                    }
                    seen_paragraph = true;
                },
                tag @ (b"ins" | b"del") => {
                    depth += 1;
                    if current.is_none() {
                        let kind = if tag == b"ins" {
                            RevisionType::Insert
                        } else {
                            RevisionType::Delete
                        };
                        current = Some(start_revision(&e, &reader, kind, paragraph));
                    }
                },
                b"t" | b"delText" => in_text = current.is_some(),
                _ => {},
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"p" => {
                    if seen_paragraph {
                        paragraph += 1;
                    }
                    seen_paragraph = true;
                },
                b"tab" | b"br" | b"cr" => {
                    if let Some(rev) = current.as_mut() {
                        rev.append_text(match e.local_name().as_ref() {
                            b"tab" => "\t",
                            b"br" => "\n",
                            _ => "\r",
                        });
                    }
                },
                _ => {},
            },
            Event::Text(e) if in_text => {
                if let Some(rev) = current.as_mut()
                    && let Ok(text) = std::str::from_utf8(e.as_ref())
                {
                    rev.append_text(text);
                }
            },
            Event::GeneralRef(e) if in_text => {
                let ch = e.resolve_char_ref().ok().flatten().or_else(|| {
                    std::str::from_utf8(e.as_ref())
                        .ok()
                        .and_then(predefined_entity)
                });
                if let (Some(rev), Some(ch)) = (current.as_mut(), ch) {
                    let mut tmp = [0u8; 4];
                    rev.append_text(ch.encode_utf8(&mut tmp));
                }
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"ins" | b"del" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0
                        && let Some(revision) = current.take()
                    {
                        revisions.push(revision);
                    }
                },
                b"t" | b"delText" => in_text = false,
                _ => {},
            },
            Event::Eof => break,
            _ => {},
        }
    }

    Ok(revisions)
}
