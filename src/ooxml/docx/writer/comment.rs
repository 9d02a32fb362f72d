/// Comment writer support for DOCX documents.
use crate::common::xml::{escape_attr, escape_text};
use crate::ooxml::docx::comment::Comment;
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

/// A mutable comment in a Word document.
///
/// The comment body lives in the comments part; the paragraph only carries
/// range markers and a reference run pointing at `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutableComment {
    /// Comment ID, shared id space with revisions
    id: u32,
    /// Author name
    author: String,
    /// Comment date (`YYYY-MM-DDTHH:MM:SS`)
    date: Option<String>,
    /// Comment text/content
    text: String,
    /// Initials (optional)
    initials: Option<String>,
}

impl MutableComment {
    /// Create a new comment with no date or initials.
    pub fn new(id: u32, author: String, text: String) -> Self {
        Self {
            id,
            author,
            date: None,
            text,
            initials: None,
        }
    }

    /// Get the comment ID.
    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Get the author name.
    #[inline]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Set the author name.
    pub fn set_author(&mut self, author: String) {
        self.author = author;
    }

    /// Get the comment text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Set the comment text.
    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    #[inline]
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn set_date(&mut self, date: Option<String>) {
        self.date = date;
    }

    #[inline]
    pub fn initials(&self) -> Option<&str> {
        self.initials.as_deref()
    }

    pub fn set_initials(&mut self, initials: Option<String>) {
        self.initials = initials;
    }

    /// Write the `<w:comment>` element.
    ///
    /// Each line of the text becomes its own paragraph.
    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        write!(
            xml,
            r#"<w:comment w:id="{}" w:author="{}""#,
            self.id,
            escape_attr(&self.author)
        )?;
        if let Some(date) = &self.date {
            write!(xml, r#" w:date="{}""#, escape_attr(date))?;
        }
        if let Some(initials) = &self.initials {
            write!(xml, r#" w:initials="{}""#, escape_attr(initials))?;
        }
        xml.push('>');

        for line in self.text.split('\n') {
            write!(
                xml,
                r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
                escape_text(line)
            )?;
        }

        xml.push_str("</w:comment>");
        Ok(())
    }
}

impl From<Comment> for MutableComment {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author,
            date: comment.date,
            text: comment.text,
            initials: comment.initials,
        }
    }
}

/// The document's comments part, in creation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentStore {
    comments: Vec<MutableComment>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comment whose id has already been reserved.
    pub(crate) fn push(&mut self, comment: MutableComment) {
        self.comments.push(comment);
    }

    /// Remove a comment, returning it if it was present.
    pub(crate) fn remove(&mut self, id: u32) -> Option<MutableComment> {
        let index = self.comments.iter().position(|c| c.id == id)?;
        Some(self.comments.remove(index))
    }

    /// Look up a comment by id.
    pub fn get(&self, id: u32) -> Option<&MutableComment> {
        self.comments.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut MutableComment> {
        self.comments.iter_mut().find(|c| c.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MutableComment> {
        self.comments.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Serialize as a complete `word/comments.xml` part.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(256 + self.comments.len() * 256);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<w:comments xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
        );
        for comment in &self.comments {
            comment.to_xml(&mut xml)?;
        }
        xml.push_str("</w:comments>");
        Ok(xml)
    }
}

impl<'a> IntoIterator for &'a CommentStore {
    type Item = &'a MutableComment;
    type IntoIter = std::slice::Iter<'a, MutableComment>;

    fn into_iter(self) -> Self::IntoIter {
        self.comments.iter()
    }
}
