//! Character-offset index over a paragraph's text-bearing elements.
//!
//! Offsets are counted in `char`s of the paragraph's logical text. The index
//! is a throwaway view: any structural change to the paragraph invalidates it,
//! so it is rebuilt per operation rather than stored.
use smallvec::SmallVec;

use super::super::paragraph::ParagraphElement;
use super::super::revision::RevisionKind;

/// What kind of element an interval belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// A top-level run, which may be split
    Run,
    /// A tracked insertion, which is never split
    Insertion,
}

/// Half-open `[start, end)` span of one element in logical-text coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunInterval {
    /// Index of the element in the paragraph
    pub element: usize,
    pub start: usize,
    pub end: usize,
    pub kind: SegmentKind,
}

impl RunInterval {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Opening rule: `start <= pos < end`.
    #[inline]
    pub fn covers_start(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Closing rule: `start < pos <= end`.
    #[inline]
    pub fn covers_end(&self, pos: usize) -> bool {
        self.start < pos && pos <= self.end
    }
}

/// Ordered intervals covering `[0, len)` without gaps or overlaps.
#[derive(Debug, Clone)]
pub struct RunIndex {
    intervals: SmallVec<[RunInterval; 8]>,
    text: String,
    len: usize,
}

impl RunIndex {
    /// Index every top-level run (empty ones included) and every insertion.
    ///
    /// Deletions and comment range markers contribute no text and are left out.
    pub fn build(elements: &[ParagraphElement]) -> Self {
        let mut intervals = SmallVec::new();
        let mut text = String::new();
        let mut offset = 0;

        for (element, item) in elements.iter().enumerate() {
            let (kind, segment) = match item {
                ParagraphElement::Run(run) => (SegmentKind::Run, run.get_text()),
                ParagraphElement::Revision(rev) if rev.kind() == RevisionKind::Insertion => {
                    (SegmentKind::Insertion, rev.text())
                },
                _ => continue,
            };
            let len = segment.chars().count();
            intervals.push(RunInterval {
                element,
                start: offset,
                end: offset + len,
                kind,
            });
            text.push_str(&segment);
            offset += len;
        }

        Self {
            intervals,
            text,
            len: offset,
        }
    }

    #[inline]
    pub fn intervals(&self) -> &[RunInterval] {
        &self.intervals
    }

    /// The paragraph's logical text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Logical text length in characters.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Interval holding the character at `pos`.
    pub fn find_start(&self, pos: usize) -> Option<&RunInterval> {
        self.intervals.iter().find(|iv| iv.covers_start(pos))
    }

    /// Interval holding the character just before `pos`.
    pub fn find_end(&self, pos: usize) -> Option<&RunInterval> {
        self.intervals.iter().find(|iv| iv.covers_end(pos))
    }

    /// First interval, in document order, whose end is exactly `pos`.
    pub fn first_ending_at(&self, pos: usize) -> Option<&RunInterval> {
        self.intervals.iter().find(|iv| iv.end == pos)
    }

    /// Intervals belonging to elements strictly between two element indices.
    pub(crate) fn between(&self, begin: usize, end: usize) -> impl Iterator<Item = &RunInterval> {
        self.intervals
            .iter()
            .filter(move |iv| iv.element > begin && iv.element < end)
    }

    /// Convert a byte offset into `text()` to a character offset.
    pub(crate) fn char_offset(&self, byte: usize) -> usize {
        self.text[..byte].chars().count()
    }

    /// Characters `[start, end)` of the logical text.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.text.chars().skip(start).take(end - start).collect()
    }
}
