//! Mapping of caller-supplied ranges, offsets and search strings onto runs.
use std::ops::Range;

use super::error::{EditError, Result};
use super::run_index::{RunIndex, SegmentKind};

/// Half-open character range `[start, end)` in a paragraph's logical text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacterRange {
    pub start: usize,
    pub end: usize,
}

impl CharacterRange {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check `0 <= start < end <= len`.
    pub fn validate(&self, len: usize) -> Result<()> {
        if self.start >= self.end || self.end > len {
            return Err(EditError::InvalidRange {
                start: self.start,
                end: self.end,
                len,
            });
        }
        Ok(())
    }
}

impl From<Range<usize>> for CharacterRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Text selected for a comment or deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTarget<'a> {
    /// Explicit character range
    Range(CharacterRange),
    /// First occurrence of a literal string
    Query(&'a str),
}

impl From<Range<usize>> for TextTarget<'_> {
    fn from(range: Range<usize>) -> Self {
        Self::Range(range.into())
    }
}

impl From<CharacterRange> for TextTarget<'_> {
    fn from(range: CharacterRange) -> Self {
        Self::Range(range)
    }
}

impl<'a> From<&'a str> for TextTarget<'a> {
    fn from(query: &'a str) -> Self {
        Self::Query(query)
    }
}

/// Where inserted text goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionPoint<'a> {
    /// Character offset, `0..=len`
    Offset(usize),
    /// Right after the first occurrence of a literal string
    After(&'a str),
}

impl From<usize> for InsertionPoint<'_> {
    fn from(offset: usize) -> Self {
        Self::Offset(offset)
    }
}

impl<'a> From<&'a str> for InsertionPoint<'a> {
    fn from(query: &'a str) -> Self {
        Self::After(query)
    }
}

/// A range boundary expressed as (element, character offset inside it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub element: usize,
    pub offset: usize,
}

/// A range whose boundaries have been mapped onto runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRange {
    pub range: CharacterRange,
    pub begin: Boundary,
    pub end: Boundary,
    /// The selected text
    pub text: String,
}

impl ResolvedRange {
    /// Whether both boundaries fall in the same run.
    #[inline]
    pub fn is_single_run(&self) -> bool {
        self.begin.element == self.end.element
    }
}

/// How an insertion fits into the existing elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionSite {
    /// Offset 0: becomes the first child
    Prepend,
    /// Offset is exactly the end of this element
    After { element: usize },
    /// Offset falls inside this run at `offset`
    Split { element: usize, offset: usize },
}

/// An insertion point mapped onto the paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedInsertion {
    /// Logical-text offset of the insertion
    pub offset: usize,
    pub site: InsertionSite,
}

/// Locate the first occurrence of `query`, as a character range.
fn find_query(index: &RunIndex, query: &str) -> Result<CharacterRange> {
    let byte = memchr::memmem::find(index.text().as_bytes(), query.as_bytes()).ok_or_else(|| {
        EditError::TextNotFound {
            query: query.to_string(),
        }
    })?;
    let start = index.char_offset(byte);
    Ok(CharacterRange::new(start, start + query.chars().count()))
}

/// Map a range or search string onto its begin and end runs.
///
/// Only the first occurrence of a query is considered. Boundaries inside an
/// insertion, or a range spanning one, are refused: wrappers are never split.
pub fn resolve_range(index: &RunIndex, target: TextTarget<'_>) -> Result<ResolvedRange> {
    let range = match target {
        TextTarget::Range(range) => range,
        TextTarget::Query(query) => find_query(index, query)?,
    };
    range.validate(index.len())?;

    let unresolved = || EditError::RangeUnresolved {
        start: range.start,
        end: range.end,
    };
    let begin = index.find_start(range.start).ok_or_else(unresolved)?;
    let end = index.find_end(range.end).ok_or_else(unresolved)?;

    let overlap = begin.kind == SegmentKind::Insertion
        || end.kind == SegmentKind::Insertion
        || index
            .between(begin.element, end.element)
            .any(|iv| iv.kind == SegmentKind::Insertion);
    if overlap {
        return Err(EditError::RevisionOverlap {
            start: range.start,
            end: range.end,
        });
    }

    Ok(ResolvedRange {
        range,
        begin: Boundary {
            element: begin.element,
            offset: range.start - begin.start,
        },
        end: Boundary {
            element: end.element,
            offset: range.end - end.start,
        },
        text: index.slice(range.start, range.end),
    })
}

/// Map an insertion point onto the paragraph.
pub fn resolve_insertion(index: &RunIndex, point: InsertionPoint<'_>) -> Result<ResolvedInsertion> {
    let offset = match point {
        InsertionPoint::Offset(offset) => offset,
        InsertionPoint::After("") => {
            return Err(EditError::TextNotFound {
                query: String::new(),
            });
        },
        InsertionPoint::After(query) => find_query(index, query)?.end,
    };
    if offset > index.len() {
        return Err(EditError::InvalidOffset {
            offset,
            len: index.len(),
        });
    }

    let site = if offset == 0 {
        InsertionSite::Prepend
    } else if let Some(iv) = index.first_ending_at(offset) {
        InsertionSite::After {
            element: iv.element,
        }
    } else {
        let iv = index
            .find_start(offset)
            .ok_or(EditError::RangeUnresolved {
                start: offset,
                end: offset,
            })?;
        if iv.kind == SegmentKind::Insertion {
            return Err(EditError::RevisionOverlap {
                start: offset,
                end: offset,
            });
        }
        InsertionSite::Split {
            element: iv.element,
            offset: offset - iv.start,
        }
    };

    Ok(ResolvedInsertion { offset, site })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::writer::paragraph::{MutableParagraph, ParagraphElement};
    use crate::ooxml::docx::writer::revision::{MutableRevision, RevisionKind};
    use crate::ooxml::docx::writer::run::{MutableRun, RunProperties};

    fn index_of(texts: &[&str]) -> RunIndex {
        let mut para = MutableParagraph::new();
        for text in texts {
            para.add_run_with_text(text);
        }
        RunIndex::build(para.elements())
    }

    #[test]
    fn test_cross_run_range() {
        let index = index_of(&["Hello ", "World"]);
        let resolved = resolve_range(&index, (2..8).into()).unwrap();
        assert_eq!(resolved.begin, Boundary { element: 0, offset: 2 });
        assert_eq!(resolved.end, Boundary { element: 1, offset: 2 });
        assert_eq!(resolved.text, "llo Wo");
        assert!(!resolved.is_single_run());
    }

    #[test]
    fn test_range_ending_on_run_boundary_stays_in_run() {
        let index = index_of(&["Hello ", "World"]);
        let resolved = resolve_range(&index, (0..6).into()).unwrap();
        assert!(resolved.is_single_run());
        assert_eq!(resolved.end, Boundary { element: 0, offset: 6 });
    }

    #[test]
    fn test_query_uses_first_occurrence() {
        let index = index_of(&["abc ", "abc"]);
        let resolved = resolve_range(&index, "abc".into()).unwrap();
        assert_eq!(resolved.range, CharacterRange::new(0, 3));
    }

    #[test]
    fn test_query_offsets_are_in_chars() {
        let index = index_of(&["naïve ", "café"]);
        let resolved = resolve_range(&index, "café".into()).unwrap();
        assert_eq!(resolved.range, CharacterRange::new(6, 10));
        assert_eq!(resolved.begin, Boundary { element: 1, offset: 0 });
    }

    #[test]
    fn test_invalid_ranges() {
        let index = index_of(&["Hello ", "World"]);
        assert_eq!(
            resolve_range(&index, (5..5).into()),
            Err(EditError::InvalidRange { start: 5, end: 5, len: 11 })
        );
        assert!(matches!(
            resolve_range(&index, (7..3).into()),
            Err(EditError::InvalidRange { .. })
        ));
        assert!(matches!(
            resolve_range(&index, (3..12).into()),
            Err(EditError::InvalidRange { .. })
        ));
        assert!(matches!(
            resolve_range(&index, "".into()),
            Err(EditError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_missing_query() {
        let index = index_of(&["Hello ", "World"]);
        assert_eq!(
            resolve_range(&index, "Moon".into()),
            Err(EditError::TextNotFound {
                query: "Moon".to_string()
            })
        );
    }

    #[test]
    fn test_range_over_insertion_is_refused() {
        let mut para = MutableParagraph::new();
        para.add_run_with_text("ab");
        para.elements.push(ParagraphElement::Revision(MutableRevision::with_run(
            RevisionKind::Insertion,
            1,
            "A",
            "",
            MutableRun::with_text("XY", RunProperties::default()),
        )));
        para.add_run_with_text("cd");
        let index = RunIndex::build(para.elements());

        assert!(matches!(
            resolve_range(&index, (1..5).into()),
            Err(EditError::RevisionOverlap { start: 1, end: 5 })
        ));
        assert!(matches!(
            resolve_range(&index, (2..3).into()),
            Err(EditError::RevisionOverlap { .. })
        ));
        assert!(resolve_range(&index, (4..6).into()).is_ok());
        assert!(matches!(
            resolve_insertion(&index, InsertionPoint::Offset(3)),
            Err(EditError::RevisionOverlap { .. })
        ));
        assert_eq!(
            resolve_insertion(&index, InsertionPoint::Offset(4)).unwrap().site,
            InsertionSite::After { element: 1 }
        );
    }

    #[test]
    fn test_insertion_sites() {
        let index = index_of(&["Hello ", "World"]);
        assert_eq!(resolve_insertion(&index, InsertionPoint::Offset(0)).unwrap().site, InsertionSite::Prepend);
        assert_eq!(
            resolve_insertion(&index, InsertionPoint::Offset(6)).unwrap().site,
            InsertionSite::After { element: 0 }
        );
        assert_eq!(
            resolve_insertion(&index, InsertionPoint::Offset(11)).unwrap().site,
            InsertionSite::After { element: 1 }
        );
        assert_eq!(
            resolve_insertion(&index, InsertionPoint::Offset(8)).unwrap().site,
            InsertionSite::Split { element: 1, offset: 2 }
        );
        assert_eq!(
            resolve_insertion(&index, InsertionPoint::Offset(12)),
            Err(EditError::InvalidOffset { offset: 12, len: 11 })
        );
    }

    #[test]
    fn test_insertion_after_query() {
        let index = index_of(&["Hello ", "World"]);
        let resolved = resolve_insertion(&index, "Hel".into()).unwrap();
        assert_eq!(resolved.offset, 3);
        assert_eq!(resolved.site, InsertionSite::Split { element: 0, offset: 3 });
        assert!(matches!(
            resolve_insertion(&index, "".into()),
            Err(EditError::TextNotFound { .. })
        ));
    }

    #[test]
    fn test_insertion_into_empty_paragraph() {
        let index = index_of(&[]);
        assert_eq!(resolve_insertion(&index, InsertionPoint::Offset(0)).unwrap().site, InsertionSite::Prepend);
    }
}
