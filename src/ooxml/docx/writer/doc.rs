/// Document writer implementation for DOCX.
use crate::common::IdAllocator;
use crate::ooxml::docx::comment::Comment;
use crate::ooxml::error::Result;
use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::debug;

use super::comment::{CommentStore, MutableComment};
use super::paragraph::{MutableParagraph, ParagraphElement, read_paragraph};
use super::revise::{
    self, CommentHandle, CommentRequest, DeletionHandle, EditError, InsertionHandle,
    InsertionPoint, ReviseOptions, RevisionContext, TextTarget,
};

/// A mutable Word document body with its comments.
///
/// Owns the paragraphs, the comments part and the id allocator shared by
/// comments and tracked changes, so every id handed out is unique within the
/// document.
#[derive(Debug, Clone, Default)]
pub struct MutableDocument {
    paragraphs: Vec<MutableParagraph>,
    comments: CommentStore,
    ids: IdAllocator,
    options: ReviseOptions,
}

impl MutableDocument {
    /// Create a new empty mutable document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with the given editing options.
    pub fn with_options(options: ReviseOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Load `document.xml` and, if present, `comments.xml`.
    ///
    /// Every `w:p` is read in order; content outside paragraphs is not kept.
    /// All comment and revision ids found are reserved so newly allocated ids
    /// never collide with them.
    pub fn from_xml(document_xml: &str, comments_xml: Option<&str>) -> Result<Self> {
        let mut doc = Self::new();

        let mut reader = Reader::from_str(document_xml);
        let mut buf = Vec::with_capacity(1024);
        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.local_name().as_ref() == b"p" => {
                    let para = read_paragraph(&mut reader, &mut buf)?;
                    doc.paragraphs.push(para);
                },
                Event::Empty(e) if e.local_name().as_ref() == b"p" => {
                    doc.paragraphs.push(MutableParagraph::new());
                },
                Event::Eof => break,
                _ => {},
            }
        }

        for para in &doc.paragraphs {
            for element in para.elements() {
                match element {
                    ParagraphElement::Run(run) => {
                        run.comment_references().for_each(|id| doc.ids.observe(id));
                    },
                    ParagraphElement::Revision(rev) => {
                        doc.ids.observe(rev.id());
                        for run in rev.runs() {
                            run.comment_references().for_each(|id| doc.ids.observe(id));
                        }
                    },
                    ParagraphElement::CommentRangeStart(id) | ParagraphElement::CommentRangeEnd(id) => {
                        doc.ids.observe(*id);
                    },
                }
            }
        }

        if let Some(xml) = comments_xml {
            for comment in Comment::parse_all(xml.as_bytes())? {
                doc.ids.observe(comment.id());
                doc.comments.push(MutableComment::from(comment));
            }
        }

        debug!(
            paragraphs = doc.paragraphs.len(),
            comments = doc.comments.len(),
            ids = doc.ids.len(),
            "document loaded"
        );
        Ok(doc)
    }

    #[inline]
    pub fn options(&self) -> &ReviseOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: ReviseOptions) {
        self.options = options;
    }

    /// Add a paragraph at the end of the document.
    pub fn add_paragraph(&mut self) -> &mut MutableParagraph {
        let index = self.paragraphs.len();
        self.paragraphs.push(MutableParagraph::new());
        &mut self.paragraphs[index]
    }

    /// Add a paragraph holding a single run of `text`.
    pub fn add_paragraph_with_text(&mut self, text: &str) -> &mut MutableParagraph {
        let para = self.add_paragraph();
        para.add_run_with_text(text);
        para
    }

    /// Insert a new paragraph holding `text` before the paragraph at `index`,
    /// optionally with a paragraph style.
    pub fn insert_paragraph_before(
        &mut self,
        index: usize,
        text: &str,
        style: Option<&str>,
    ) -> revise::Result<&mut MutableParagraph> {
        if index >= self.paragraphs.len() {
            return Err(EditError::ParagraphNotFound { index });
        }
        let mut para = MutableParagraph::new();
        para.add_run_with_text(text);
        if let Some(style) = style {
            para.set_style(style);
        }
        self.paragraphs.insert(index, para);
        Ok(&mut self.paragraphs[index])
    }

    /// Remove the paragraph at `index` together with the comments anchored
    /// in it. Their ids stay reserved.
    pub fn remove_paragraph(&mut self, index: usize) -> revise::Result<MutableParagraph> {
        if index >= self.paragraphs.len() {
            return Err(EditError::ParagraphNotFound { index });
        }
        let para = self.paragraphs.remove(index);
        for id in para.comments() {
            self.comments.remove(id);
        }
        debug!(index, comments = para.comments().len(), "paragraph removed");
        Ok(para)
    }

    /// Get the number of paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn paragraph(&self, index: usize) -> Option<&MutableParagraph> {
        self.paragraphs.get(index)
    }

    pub fn paragraph_mut(&mut self, index: usize) -> Option<&mut MutableParagraph> {
        self.paragraphs.get_mut(index)
    }

    pub fn paragraphs(&self) -> &[MutableParagraph] {
        &self.paragraphs
    }

    /// Logical text of the paragraph at `index`.
    pub fn paragraph_text(&self, index: usize) -> Option<String> {
        self.paragraphs.get(index).map(MutableParagraph::text)
    }

    #[inline]
    pub fn comments(&self) -> &CommentStore {
        &self.comments
    }

    /// Split borrows: the paragraph at `index` and an edit context over the
    /// rest of the document.
    fn edit_context(
        &mut self,
        index: usize,
    ) -> revise::Result<(&mut MutableParagraph, RevisionContext<'_>)> {
        let Self {
            paragraphs,
            comments,
            ids,
            options,
        } = self;
        let para = paragraphs
            .get_mut(index)
            .ok_or(EditError::ParagraphNotFound { index })?;
        Ok((
            para,
            RevisionContext {
                ids,
                comments,
                options,
            },
        ))
    }

    /// Anchor a comment on text in paragraph `paragraph`.
    pub fn add_comment(
        &mut self,
        paragraph: usize,
        target: TextTarget<'_>,
        request: CommentRequest<'_>,
    ) -> revise::Result<CommentHandle> {
        let (para, mut ctx) = self.edit_context(paragraph)?;
        para.add_comment(&mut ctx, target, request)
    }

    /// Anchor a comment on the whole `run`-th run of paragraph `paragraph`.
    pub fn add_run_comment(
        &mut self,
        paragraph: usize,
        run: usize,
        request: CommentRequest<'_>,
    ) -> revise::Result<CommentHandle> {
        let (para, mut ctx) = self.edit_context(paragraph)?;
        para.add_run_comment(&mut ctx, run, request)
    }

    /// Insert tracked text into paragraph `paragraph`.
    pub fn add_insertion(
        &mut self,
        paragraph: usize,
        point: InsertionPoint<'_>,
        author: Option<&str>,
        date: Option<&str>,
        text: &str,
    ) -> revise::Result<InsertionHandle> {
        let (para, mut ctx) = self.edit_context(paragraph)?;
        para.add_insertion(&mut ctx, point, author, date, text)
    }

    /// Mark text in paragraph `paragraph` as a tracked deletion.
    pub fn add_deletion(
        &mut self,
        paragraph: usize,
        target: TextTarget<'_>,
        author: Option<&str>,
        date: Option<&str>,
    ) -> revise::Result<DeletionHandle> {
        let (para, mut ctx) = self.edit_context(paragraph)?;
        para.add_deletion(&mut ctx, target, author, date)
    }

    /// Serialize the document to `word/document.xml`.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
        );
        xml.push_str("<w:body>");
        for para in &self.paragraphs {
            para.to_xml(&mut xml)?;
        }
        xml.push_str("</w:body></w:document>");
        Ok(xml)
    }

    /// Serialize the comments to `word/comments.xml`, or `None` if there are
    /// no comments.
    pub fn comments_xml(&self) -> Result<Option<String>> {
        if self.comments.is_empty() {
            return Ok(None);
        }
        self.comments.to_xml().map(Some)
    }
}
