/// Tracked-change wrappers (`w:ins` / `w:del`) for DOCX paragraphs.
use crate::common::xml::escape_attr;
use crate::ooxml::docx::revision::RevisionType;
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

use super::run::MutableRun;

/// Kind of revision wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevisionKind {
    /// Wrapped runs were inserted
    Insertion,
    /// Wrapped runs were removed
    Deletion,
}

impl RevisionKind {
    #[inline]
    fn tag(&self) -> &'static str {
        match self {
            Self::Insertion => "w:ins",
            Self::Deletion => "w:del",
        }
    }
}

impl From<RevisionKind> for RevisionType {
    fn from(kind: RevisionKind) -> Self {
        match kind {
            RevisionKind::Insertion => RevisionType::Insert,
            RevisionKind::Deletion => RevisionType::Delete,
        }
    }
}

/// A revision wrapper holding one or more runs.
///
/// Metadata is fixed at creation; afterwards runs may only be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutableRevision {
    kind: RevisionKind,
    id: u32,
    author: String,
    date: String,
    pub(crate) runs: Vec<MutableRun>,
}

impl MutableRevision {
    /// Create an empty wrapper.
    pub fn new(kind: RevisionKind, id: u32, author: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            author: author.into(),
            date: date.into(),
            runs: Vec::new(),
        }
    }

    /// Create a wrapper around a single run.
    pub(crate) fn with_run(
        kind: RevisionKind,
        id: u32,
        author: impl Into<String>,
        date: impl Into<String>,
        run: MutableRun,
    ) -> Self {
        let mut revision = Self::new(kind, id, author, date);
        revision.runs.push(run);
        revision
    }

    #[inline]
    pub fn kind(&self) -> RevisionKind {
        self.kind
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[inline]
    pub fn date(&self) -> &str {
        &self.date
    }

    #[inline]
    pub fn runs(&self) -> &[MutableRun] {
        &self.runs
    }

    /// Append a run to the wrapper.
    pub fn push_run(&mut self, run: MutableRun) -> &mut Self {
        self.runs.push(run);
        self
    }

    /// Concatenated text of the wrapped runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(MutableRun::get_text).collect()
    }

    /// Characters this wrapper contributes to the paragraph's logical text.
    ///
    /// Deleted text is not part of the logical text.
    pub fn logical_len(&self) -> usize {
        match self.kind {
            RevisionKind::Insertion => self.runs.iter().map(MutableRun::char_len).sum(),
            RevisionKind::Deletion => 0,
        }
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        let tag = self.kind.tag();
        write!(
            xml,
            "<{} w:id=\"{}\" w:author=\"{}\"",
            tag,
            self.id,
            escape_attr(&self.author)
        )?;
        if !self.date.is_empty() {
            write!(xml, " w:date=\"{}\"", escape_attr(&self.date))?;
        }
        xml.push('>');
        let deleted = self.kind == RevisionKind::Deletion;
        for run in &self.runs {
            run.to_xml(xml, deleted)?;
        }
        write!(xml, "</{}>", tag)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::writer::run::RunProperties;

    #[test]
    fn test_insertion_xml() {
        let run = MutableRun::with_text("new", RunProperties::default());
        let rev = MutableRevision::with_run(
            RevisionKind::Insertion,
            4,
            "Jane <QA>",
            "2024-11-05T10:30:00",
            run,
        );
        let mut xml = String::new();
        rev.to_xml(&mut xml).unwrap();
        assert_eq!(
            xml,
            "<w:ins w:id=\"4\" w:author=\"Jane &lt;QA&gt;\" w:date=\"2024-11-05T10:30:00\">\
             <w:r><w:t xml:space=\"preserve\">new</w:t></w:r></w:ins>"
        );
        assert_eq!(rev.logical_len(), 3);
    }

    #[test]
    fn test_deletion_contributes_no_text() {
        let run = MutableRun::with_text("old", RunProperties::default());
        let mut rev = MutableRevision::with_run(RevisionKind::Deletion, 2, "A", "", run);
        rev.push_run(MutableRun::with_text("er", RunProperties::default()));
        assert_eq!(rev.text(), "older");
        assert_eq!(rev.logical_len(), 0);

        let mut xml = String::new();
        rev.to_xml(&mut xml).unwrap();
        assert!(xml.starts_with("<w:del w:id=\"2\" w:author=\"A\">"));
        assert!(xml.contains("<w:delText xml:space=\"preserve\">old</w:delText>"));
        assert!(xml.ends_with("</w:del>"));
    }
}
