/// Paragraph types and implementation for DOCX documents.
use crate::common::xml::{escape_attr, predefined_entity};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fmt::Write as FmtWrite;

use super::revise::attacher::{
    self, CommentHandle, CommentRequest, DeletionHandle, InsertionHandle, RevisionContext,
};
use super::revise::{InsertionPoint, TextTarget};
use super::revision::{MutableRevision, RevisionKind};
use super::run::{MutableRun, RunContent, RunProperties, UnderlineStyle};

/// Elements that can appear in a paragraph, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParagraphElement {
    Run(MutableRun),
    /// A `w:ins` or `w:del` wrapper
    Revision(MutableRevision),
    /// `<w:commentRangeStart w:id/>`
    CommentRangeStart(u32),
    /// `<w:commentRangeEnd w:id/>`
    CommentRangeEnd(u32),
}

impl ParagraphElement {
    /// Characters this element contributes to the paragraph's logical text.
    pub fn logical_len(&self) -> usize {
        match self {
            Self::Run(run) => run.char_len(),
            Self::Revision(rev) => rev.logical_len(),
            Self::CommentRangeStart(_) | Self::CommentRangeEnd(_) => 0,
        }
    }

    fn to_xml(&self, xml: &mut String) -> Result<()> {
        match self {
            Self::Run(run) => run.to_xml(xml, false)?,
            Self::Revision(rev) => rev.to_xml(xml)?,
            Self::CommentRangeStart(id) => {
                write!(xml, "<w:commentRangeStart w:id=\"{}\"/>", id)?;
            },
            Self::CommentRangeEnd(id) => {
                write!(xml, "<w:commentRangeEnd w:id=\"{}\"/>", id)?;
            },
        }
        Ok(())
    }
}

/// A mutable paragraph in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutableParagraph {
    /// Runs, revision wrappers and comment markers
    pub(crate) elements: Vec<ParagraphElement>,
    /// Paragraph style ID
    pub(crate) style: Option<String>,
}

impl MutableParagraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single `<w:p>` element.
    ///
    /// Runs nested in wrappers this model does not keep (hyperlinks, smart
    /// tags) are read as top-level runs; other content is skipped.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.local_name().as_ref() == b"p" => {
                    return read_paragraph(&mut reader, &mut buf);
                },
                Event::Empty(e) if e.local_name().as_ref() == b"p" => return Ok(Self::new()),
                Event::Eof => {
                    return Err(OoxmlError::InvalidFormat(
                        "no w:p element found".to_string(),
                    ));
                },
                _ => {},
            }
        }
    }

    /// Add a new run to the paragraph.
    pub fn add_run(&mut self) -> &mut MutableRun {
        self.elements.push(ParagraphElement::Run(MutableRun::new()));
        match self.elements.last_mut() {
            Some(ParagraphElement::Run(r)) => r,
            _ => unreachable!(),
        }
    }

    /// Add a run with text.
    pub fn add_run_with_text(&mut self, text: &str) -> &mut MutableRun {
        let run = self.add_run();
        run.set_text(text);
        run
    }

    /// Replace all content with a single run holding `text`.
    ///
    /// Revision wrappers and comment markers go away with the old runs.
    pub fn set_text(&mut self, text: &str) {
        self.clear();
        self.add_run_with_text(text);
    }

    /// Set the paragraph style.
    pub fn set_style(&mut self, style_id: &str) {
        self.style = Some(style_id.to_string());
    }

    #[inline]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    #[inline]
    pub fn elements(&self) -> &[ParagraphElement] {
        &self.elements
    }

    /// Top-level runs, excluding runs inside revision wrappers.
    pub fn runs(&self) -> impl Iterator<Item = &MutableRun> {
        self.elements.iter().filter_map(|e| match e {
            ParagraphElement::Run(run) => Some(run),
            _ => None,
        })
    }

    pub fn runs_mut(&mut self) -> impl Iterator<Item = &mut MutableRun> {
        self.elements.iter_mut().filter_map(|e| match e {
            ParagraphElement::Run(run) => Some(run),
            _ => None,
        })
    }

    /// Logical text: top-level runs plus inserted text, without deleted text.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for element in &self.elements {
            match element {
                ParagraphElement::Run(run) => out.push_str(&run.get_text()),
                ParagraphElement::Revision(rev) if rev.kind() == RevisionKind::Insertion => {
                    out.push_str(&rev.text());
                },
                _ => {},
            }
        }
        out
    }

    /// Ids of the comments anchored in this paragraph, in order.
    pub fn comments(&self) -> Vec<u32> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                ParagraphElement::CommentRangeStart(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    /// Get the number of elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Clear all elements from the paragraph.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Append `other`'s content after a single space run. `other`'s style is
    /// discarded.
    pub fn merge(&mut self, other: MutableParagraph) {
        self.add_run_with_text(" ");
        self.elements.extend(other.elements);
    }

    /// Anchor a comment on the text selected by `target`.
    pub fn add_comment(
        &mut self,
        ctx: &mut RevisionContext<'_>,
        target: TextTarget<'_>,
        request: CommentRequest<'_>,
    ) -> super::revise::Result<CommentHandle> {
        attacher::attach_comment(&mut self.elements, ctx, target, request)
    }

    /// Anchor a comment on the whole `run`-th top-level run.
    pub fn add_run_comment(
        &mut self,
        ctx: &mut RevisionContext<'_>,
        run: usize,
        request: CommentRequest<'_>,
    ) -> super::revise::Result<CommentHandle> {
        attacher::attach_run_comment(&mut self.elements, ctx, run, request)
    }

    /// Insert `text` as a tracked insertion at `point`.
    pub fn add_insertion(
        &mut self,
        ctx: &mut RevisionContext<'_>,
        point: InsertionPoint<'_>,
        author: Option<&str>,
        date: Option<&str>,
        text: &str,
    ) -> super::revise::Result<InsertionHandle> {
        attacher::attach_insertion(&mut self.elements, ctx, point, author, date, text)
    }

    /// Mark the text selected by `target` as a tracked deletion.
    pub fn add_deletion(
        &mut self,
        ctx: &mut RevisionContext<'_>,
        target: TextTarget<'_>,
        author: Option<&str>,
        date: Option<&str>,
    ) -> super::revise::Result<DeletionHandle> {
        attacher::attach_deletion(&mut self.elements, ctx, target, author, date)
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:p>");
        if let Some(ref style) = self.style {
            write!(
                xml,
                "<w:pPr><w:pStyle w:val=\"{}\"/></w:pPr>",
                escape_attr(style)
            )?;
        }
        for element in &self.elements {
            element.to_xml(xml)?;
        }
        xml.push_str("</w:p>");
        Ok(())
    }
}

/// Value of the attribute with local name `key`.
fn attr_value(e: &BytesStart<'_>, reader: &Reader<&[u8]>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == key)
        .and_then(|attr| {
            attr.decode_and_unescape_value(reader.decoder())
                .ok()
                .map(|v| v.into_owned())
        })
}

fn attr_id(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Option<u32> {
    attr_value(e, reader, b"id").and_then(|v| atoi_simd::parse::<u32, false, false>(v.as_bytes()).ok())
}

/// `w:b`, `w:i`: absent `w:val` means on.
fn toggle(val: Option<String>) -> bool {
    !matches!(val.as_deref(), Some("0" | "false" | "off"))
}

fn apply_run_property(props: &mut RunProperties, e: &BytesStart<'_>, reader: &Reader<&[u8]>) {
    let val = || attr_value(e, reader, b"val");
    match e.local_name().as_ref() {
        b"rStyle" => props.style = val(),
        b"b" => props.bold = Some(toggle(val())),
        b"i" => props.italic = Some(toggle(val())),
        b"u" => {
            props.underline = Some(val().map_or(UnderlineStyle::Single, |v| UnderlineStyle::from_val(&v)));
        },
        b"sz" => props.font_size = val().and_then(|v| atoi_simd::parse::<u32, false, false>(v.as_bytes()).ok()),
        b"rFonts" => {
            props.font_name = attr_value(e, reader, b"ascii").or_else(|| attr_value(e, reader, b"hAnsi"));
        },
        b"color" => props.color = val(),
        _ => {},
    }
}

/// Append text to the run, merging with a trailing text item.
fn push_text(run: &mut MutableRun, text: &str) {
    if let Some(RunContent::Text(last)) = run.content.last_mut() {
        last.push_str(text);
    } else {
        run.content.push(RunContent::Text(text.to_string()));
    }
}

/// Read paragraph content after its `<w:p>` start tag, up to the matching end.
pub(crate) fn read_paragraph(
    reader: &mut Reader<&[u8]>,
    buf: &mut Vec<u8>,
) -> Result<MutableParagraph> {
    let mut para = MutableParagraph::new();
    let mut run: Option<MutableRun> = None;
    let mut revision: Option<MutableRevision> = None;
    // Nested w:ins/w:del fold into the outermost wrapper
    let mut revision_depth = 0usize;
    let mut in_ppr = false;
    let mut in_rpr = false;
    let mut in_text = false;

    loop {
        buf.clear();
        match reader.read_event_into(buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"pPr" => in_ppr = true,
                _ if in_ppr => {},
                b"r" => run = Some(MutableRun::new()),
                b"rPr" if run.is_some() => in_rpr = true,
                b"t" | b"delText" if run.is_some() && !in_rpr => in_text = true,
                tag @ (b"ins" | b"del") => {
                    revision_depth += 1;
                    if revision.is_none() {
                        let kind = if tag == b"ins" {
                            RevisionKind::Insertion
                        } else {
                            RevisionKind::Deletion
                        };
                        revision = Some(MutableRevision::new(
                            kind,
                            attr_id(&e, reader).unwrap_or(0),
                            attr_value(&e, reader, b"author").unwrap_or_default(),
                            attr_value(&e, reader, b"date").unwrap_or_default(),
                        ));
                    }
                },
                _ if in_rpr => {
                    if let Some(r) = run.as_mut() {
                        apply_run_property(&mut r.properties, &e, reader);
                    }
                },
                _ => {},
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"pStyle" if in_ppr => para.style = attr_value(&e, reader, b"val"),
                _ if in_ppr => {},
                _ if in_rpr => {
                    if let Some(r) = run.as_mut() {
                        apply_run_property(&mut r.properties, &e, reader);
                    }
                },
                b"r" => {
                    let empty = MutableRun::new();
                    match revision.as_mut() {
                        Some(rev) => {
                            rev.push_run(empty);
                        },
                        None => para.elements.push(ParagraphElement::Run(empty)),
                    }
                },
                b"tab" | b"br" | b"cr" | b"commentReference" => {
                    if let Some(r) = run.as_mut() {
                        let item = match e.local_name().as_ref() {
                            b"tab" => RunContent::Tab,
                            b"br" => RunContent::Break,
                            b"cr" => RunContent::CarriageReturn,
                            _ => match attr_id(&e, reader) {
                                Some(id) => RunContent::CommentReference(id),
                                None => continue,
                            },
                        };
                        r.content.push(item);
                    }
                },
                b"commentRangeStart" => {
                    if let Some(id) = attr_id(&e, reader) {
                        para.elements.push(ParagraphElement::CommentRangeStart(id));
                    }
                },
                b"commentRangeEnd" => {
                    if let Some(id) = attr_id(&e, reader) {
                        para.elements.push(ParagraphElement::CommentRangeEnd(id));
                    }
                },
                _ => {},
            },
            Event::Text(e) if in_text => {
                if let Some(r) = run.as_mut() {
                    let text = std::str::from_utf8(e.as_ref())
                        .map_err(|err| OoxmlError::Xml(err.to_string()))?;
                    push_text(r, text);
                }
            },
            Event::GeneralRef(e) if in_text => {
                let ch = match e.resolve_char_ref().ok().flatten() {
                    Some(ch) => Some(ch),
                    None => std::str::from_utf8(e.as_ref())
                        .ok()
                        .and_then(predefined_entity),
                };
                if let (Some(ch), Some(r)) = (ch, run.as_mut()) {
                    let mut tmp = [0u8; 4];
                    push_text(r, ch.encode_utf8(&mut tmp));
                }
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"pPr" => in_ppr = false,
                _ if in_ppr => {},
                b"rPr" => in_rpr = false,
                b"t" | b"delText" => in_text = false,
                b"r" => {
                    if let Some(r) = run.take() {
                        match revision.as_mut() {
                            Some(rev) => {
                                rev.push_run(r);
                            },
                            None => para.elements.push(ParagraphElement::Run(r)),
                        }
                    }
                },
                b"ins" | b"del" => {
                    revision_depth = revision_depth.saturating_sub(1);
                    if revision_depth == 0
                        && let Some(rev) = revision.take()
                    {
                        para.elements.push(ParagraphElement::Revision(rev));
                    }
                },
                b"p" => break,
                _ => {},
            },
            Event::Eof => {
                return Err(OoxmlError::InvalidFormat(
                    "unterminated w:p element".to_string(),
                ));
            },
            _ => {},
        }
    }

    Ok(para)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::IdAllocator;
    use crate::ooxml::docx::writer::comment::CommentStore;
    use crate::ooxml::docx::writer::revise::{EditError, ReviseOptions};

    const W: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn run_texts(para: &MutableParagraph) -> Vec<String> {
        para.runs().map(MutableRun::get_text).collect()
    }

    #[test]
    fn test_add_run_and_text() {
        let mut para = MutableParagraph::new();
        para.add_run_with_text("Hello ").bold(true);
        para.add_run_with_text("World");
        assert_eq!(para.text(), "Hello World");
        assert_eq!(para.element_count(), 2);
        assert_eq!(para.runs().next().unwrap().formatting().bold, Some(true));

        para.clear();
        assert_eq!(para.text(), "");
        assert_eq!(para.element_count(), 0);
    }

    #[test]
    fn test_set_text_replaces_content() {
        let mut para = MutableParagraph::new();
        para.add_run_with_text("old ").bold(true);
        para.elements.push(ParagraphElement::CommentRangeStart(2));
        para.add_run_with_text("text");
        para.set_style("Heading1");

        para.set_text("new\ttext");
        assert_eq!(para.text(), "new\ttext");
        assert_eq!(para.element_count(), 1);
        assert!(para.comments().is_empty());
        assert_eq!(para.runs().next().unwrap().formatting(), &RunProperties::default());
        assert_eq!(para.style(), Some("Heading1"));
    }

    #[test]
    fn test_parse_character_style() {
        let xml = format!(
            r#"<w:p {}><w:r><w:rPr><w:rStyle w:val="Strong"/></w:rPr><w:t>x</w:t></w:r></w:p>"#,
            W
        );
        let para = MutableParagraph::from_xml(&xml).unwrap();
        assert_eq!(
            para.runs().next().unwrap().formatting().style.as_deref(),
            Some("Strong")
        );

        let mut out = String::new();
        para.to_xml(&mut out).unwrap();
        assert_eq!(MutableParagraph::from_xml(&out).unwrap(), para);
    }

    #[test]
    fn test_merge_appends_space_and_elements() {
        let mut a = MutableParagraph::new();
        a.add_run_with_text("First.");
        let mut b = MutableParagraph::new();
        b.add_run_with_text("Second.");
        b.elements.push(ParagraphElement::CommentRangeStart(4));

        a.merge(b);
        assert_eq!(a.text(), "First. Second.");
        assert_eq!(a.comments(), vec![4]);
    }

    #[test]
    fn test_parse_runs_formatting_and_markers() {
        let xml = format!(
            concat!(
                r#"<w:p {}><w:pPr><w:pStyle w:val="Body"/><w:rPr><w:b/></w:rPr></w:pPr>"#,
                r#"<w:r><w:rPr><w:rFonts w:ascii="Arial" w:hAnsi="Arial"/><w:b/><w:i w:val="0"/>"#,
                r#"<w:color w:val="FF0000"/><w:sz w:val="28"/><w:u w:val="double"/></w:rPr>"#,
                r#"<w:t xml:space="preserve">A &amp; B </w:t><w:tab/><w:t>c</w:t></w:r>"#,
                r#"<w:commentRangeStart w:id="3"/><w:r><w:t>mid</w:t></w:r><w:commentRangeEnd w:id="3"/>"#,
                r#"<w:r><w:commentReference w:id="3"/></w:r>"#,
                r#"<w:ins w:id="4" w:author="Ann" w:date="2024-01-01T00:00:00"><w:r><w:t>new</w:t></w:r></w:ins>"#,
                r#"<w:del w:id="5" w:author="Bob"><w:r><w:delText>old</w:delText></w:r></w:del>"#,
                r#"<w:r><w:br/><w:t>&#x41;</w:t></w:r></w:p>"#
            ),
            W
        );
        let para = MutableParagraph::from_xml(&xml).unwrap();

        assert_eq!(para.style(), Some("Body"));
        assert_eq!(para.text(), "A & B \tcmidnew\nA");
        assert_eq!(para.comments(), vec![3]);

        let first = para.runs().next().unwrap().formatting();
        assert_eq!(first.bold, Some(true));
        assert_eq!(first.italic, Some(false));
        assert_eq!(first.font_name.as_deref(), Some("Arial"));
        assert_eq!(first.color.as_deref(), Some("FF0000"));
        assert_eq!(first.font_size, Some(28));
        assert_eq!(first.underline, Some(UnderlineStyle::Double));

        let revisions: Vec<_> = para
            .elements()
            .iter()
            .filter_map(|e| match e {
                ParagraphElement::Revision(rev) => Some(rev),
                _ => None,
            })
            .collect();
        assert_eq!(revisions.len(), 2);
        assert_eq!(revisions[0].kind(), RevisionKind::Insertion);
        assert_eq!(revisions[0].author(), "Ann");
        assert_eq!(revisions[1].kind(), RevisionKind::Deletion);
        assert_eq!(revisions[1].id(), 5);
        assert_eq!(revisions[1].text(), "old");
        assert_eq!(revisions[1].date(), "");
    }

    #[test]
    fn test_xml_round_trip_keeps_structure() {
        let xml = format!(
            concat!(
                r#"<w:p {}><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Hi </w:t></w:r>"#,
                r#"<w:ins w:id="1" w:author="A"><w:r><w:t>there</w:t></w:r></w:ins>"#,
                r#"<w:r><w:t xml:space="preserve">  x</w:t></w:r></w:p>"#
            ),
            W
        );
        let para = MutableParagraph::from_xml(&xml).unwrap();
        let mut out = String::new();
        para.to_xml(&mut out).unwrap();
        let again = MutableParagraph::from_xml(&out).unwrap();
        assert_eq!(again, para);
        assert_eq!(again.text(), "Hi there  x");
    }

    #[test]
    fn test_unterminated_paragraph_is_an_error() {
        assert!(matches!(
            MutableParagraph::from_xml("<w:p><w:r><w:t>x</w:t></w:r>"),
            Err(OoxmlError::InvalidFormat(_))
        ));
        assert!(MutableParagraph::from_xml("<w:body/>").is_err());
        assert_eq!(
            MutableParagraph::from_xml("<w:p/>").unwrap(),
            MutableParagraph::new()
        );
    }

    #[test]
    fn test_edits_through_paragraph() {
        let mut ids = IdAllocator::new();
        let mut comments = CommentStore::new();
        let options = ReviseOptions::default();
        let mut ctx = RevisionContext {
            ids: &mut ids,
            comments: &mut comments,
            options: &options,
        };

        let mut para = MutableParagraph::new();
        para.add_run_with_text("Hello ");
        para.add_run_with_text("World");

        let c = para
            .add_comment(&mut ctx, (2..8).into(), CommentRequest::new("why?"))
            .unwrap();
        assert_eq!(run_texts(&para), vec!["He", "llo Wo", "", "rld"]);

        let i = para
            .add_insertion(&mut ctx, InsertionPoint::Offset(11), None, None, "!")
            .unwrap();
        let d = para.add_deletion(&mut ctx, "He".into(), None, None).unwrap();
        assert_eq!(para.text(), "llo World!");
        assert!(c.id < i.id && i.id < d.id);

        let err = para
            .add_deletion(&mut ctx, (0..99).into(), None, None)
            .unwrap_err();
        assert!(matches!(err, EditError::InvalidRange { .. }));

        let mut xml = String::new();
        para.to_xml(&mut xml).unwrap();
        assert!(xml.contains("<w:delText xml:space=\"preserve\">He</w:delText>"));
        assert!(xml.contains(&format!("<w:commentRangeStart w:id=\"{}\"/>", c.id)));
        assert!(xml.contains(&format!("<w:commentReference w:id=\"{}\"/>", c.id)));
        assert!(xml.contains(&format!("<w:ins w:id=\"{}\"", i.id)));
    }
}
