//! Run splitting.
//!
//! Splicing happens in two steps. Planning inspects the paragraph, checks
//! every precondition and precomputes all new text; it never mutates.
//! Applying a plan only moves elements around and cannot fail, so an edit
//! either happens completely or not at all.
use tracing::debug;

use super::super::paragraph::ParagraphElement;
use super::super::revision::RevisionKind;
use super::super::run::{MutableRun, RunProperties};
use super::error::{EditError, Result};
use super::options::InteriorRunPolicy;
use super::resolver::{InsertionSite, ResolvedInsertion, ResolvedRange};

/// Split `s` at character offset `at`.
pub(crate) fn split_chars(s: &str, at: usize) -> (&str, &str) {
    let byte = s.char_indices().nth(at).map_or(s.len(), |(i, _)| i);
    s.split_at(byte)
}

fn run_at(elements: &[ParagraphElement], element: usize) -> Option<&MutableRun> {
    match elements.get(element) {
        Some(ParagraphElement::Run(run)) => Some(run),
        _ => None,
    }
}

/// Truncate a boundary run. Comment references in it survive.
fn set_run_text(elements: &mut [ParagraphElement], element: usize, text: &str) {
    if let Some(ParagraphElement::Run(run)) = elements.get_mut(element) {
        run.replace_text(text);
    }
}

/// First comment marker strictly between two elements.
fn interior_comment(elements: &[ParagraphElement], begin: usize, end: usize) -> Option<u32> {
    elements
        .get(begin + 1..end)?
        .iter()
        .find_map(|element| match element {
            ParagraphElement::CommentRangeStart(id) | ParagraphElement::CommentRangeEnd(id) => {
                Some(*id)
            },
            _ => None,
        })
}

/// Precomputed restructuring that isolates a range in its own run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplicePlan {
    /// `[prefix][target][suffix]` out of one run
    SameRun {
        element: usize,
        prefix: String,
        target: String,
        suffix: String,
        formatting: RunProperties,
    },
    /// Truncate both boundary runs and put the target between them
    CrossRun {
        begin: usize,
        end: usize,
        begin_text: String,
        end_text: String,
        target: String,
        formatting: RunProperties,
        interior: InteriorRunPolicy,
    },
}

impl SplicePlan {
    /// Plan the splice for a resolved range.
    pub fn new(
        elements: &[ParagraphElement],
        resolved: &ResolvedRange,
        interior: InteriorRunPolicy,
    ) -> Result<Self> {
        let begin = resolved.begin.element;
        let end = resolved.end.element;
        if end < begin {
            return Err(EditError::InvalidSpan { begin, end });
        }
        let unresolved = || EditError::RangeUnresolved {
            start: resolved.range.start,
            end: resolved.range.end,
        };
        let begin_run = run_at(elements, begin).ok_or_else(unresolved)?;
        let end_run = run_at(elements, end).ok_or_else(unresolved)?;

        let begin_text = begin_run.get_text();
        let formatting = begin_run.formatting().clone();

        if begin == end {
            let (prefix, rest) = split_chars(&begin_text, resolved.begin.offset);
            let (target, suffix) =
                split_chars(rest, resolved.end.offset - resolved.begin.offset);
            return Ok(Self::SameRun {
                element: begin,
                prefix: prefix.to_string(),
                target: target.to_string(),
                suffix: suffix.to_string(),
                formatting,
            });
        }

        // Moving a marker would change the text its comment covers
        if let Some(id) = interior_comment(elements, begin, end) {
            return Err(EditError::CommentOverlap {
                id,
                start: resolved.range.start,
                end: resolved.range.end,
            });
        }

        let end_text = end_run.get_text();
        let (prefix, _) = split_chars(&begin_text, resolved.begin.offset);
        let (_, suffix) = split_chars(&end_text, resolved.end.offset);
        Ok(Self::CrossRun {
            begin,
            end,
            begin_text: prefix.to_string(),
            end_text: suffix.to_string(),
            target: resolved.text.clone(),
            formatting,
            interior,
        })
    }

    /// Text the new target run will hold.
    pub fn target(&self) -> &str {
        match self {
            Self::SameRun { target, .. } | Self::CrossRun { target, .. } => target,
        }
    }

    /// Apply to the elements the plan was made from. Returns the index of the
    /// new target run.
    pub fn apply(self, elements: &mut Vec<ParagraphElement>) -> usize {
        match self {
            Self::SameRun {
                element,
                prefix,
                target,
                suffix,
                formatting,
            } => {
                debug!(element, prefix_len = prefix.len(), "splitting run in three");
                set_run_text(elements, element, &prefix);
                let middle = MutableRun::with_text(&target, formatting.clone());
                let tail = MutableRun::with_text(&suffix, formatting);
                elements.splice(
                    element + 1..element + 1,
                    [ParagraphElement::Run(middle), ParagraphElement::Run(tail)],
                );
                element + 1
            },
            Self::CrossRun {
                begin,
                end,
                begin_text,
                end_text,
                target,
                formatting,
                interior,
            } => {
                debug!(begin, end, ?interior, "splicing across runs");
                set_run_text(elements, begin, &begin_text);
                set_run_text(elements, end, &end_text);

                let mut kept: Vec<ParagraphElement> = elements
                    .drain(begin + 1..end)
                    .filter_map(|element| match element {
                        ParagraphElement::Run(mut run) if run.char_len() > 0 => {
                            if interior == InteriorRunPolicy::Drop && !run.has_marks() {
                                return None;
                            }
                            run.replace_text("");
                            Some(ParagraphElement::Run(run))
                        },
                        other => Some(other),
                    })
                    .collect();

                let position = begin + 1 + kept.len();
                kept.push(ParagraphElement::Run(MutableRun::with_text(&target, formatting)));
                elements.splice(begin + 1..begin + 1, kept);
                position
            },
        }
    }
}

/// Precomputed placement of an insertion wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPlan {
    /// Index the wrapper will occupy once applied
    position: usize,
    /// Run to split as (element, prefix, suffix)
    split: Option<(usize, String, String)>,
    /// Formatting for the inserted run
    formatting: RunProperties,
}

/// Formatting a run inserted right after `element` should inherit.
fn trailing_formatting(element: &ParagraphElement) -> Option<&RunProperties> {
    match element {
        ParagraphElement::Run(run) => Some(run.formatting()),
        ParagraphElement::Revision(rev) if rev.kind() == RevisionKind::Insertion => {
            rev.runs().last().map(MutableRun::formatting)
        },
        _ => None,
    }
}

/// Formatting of the first text-bearing element, used for prepends.
fn leading_formatting(elements: &[ParagraphElement]) -> Option<&RunProperties> {
    elements.iter().find_map(|element| match element {
        ParagraphElement::Run(run) => Some(run.formatting()),
        ParagraphElement::Revision(rev) if rev.kind() == RevisionKind::Insertion => {
            rev.runs().first().map(MutableRun::formatting)
        },
        _ => None,
    })
}

impl InsertionPlan {
    /// Plan where an insertion goes and which run, if any, gets split.
    pub fn new(elements: &[ParagraphElement], resolved: &ResolvedInsertion) -> Result<Self> {
        match resolved.site {
            InsertionSite::Prepend => Ok(Self {
                position: 0,
                split: None,
                formatting: leading_formatting(elements).cloned().unwrap_or_default(),
            }),
            InsertionSite::After { element } => {
                let anchor = elements.get(element).ok_or(EditError::RangeUnresolved {
                    start: resolved.offset,
                    end: resolved.offset,
                })?;
                Ok(Self {
                    position: element + 1,
                    split: None,
                    formatting: trailing_formatting(anchor).cloned().unwrap_or_default(),
                })
            },
            InsertionSite::Split { element, offset } => {
                let run = run_at(elements, element).ok_or(EditError::RangeUnresolved {
                    start: resolved.offset,
                    end: resolved.offset,
                })?;
                let text = run.get_text();
                let (prefix, suffix) = split_chars(&text, offset);
                Ok(Self {
                    position: element + 1,
                    split: Some((element, prefix.to_string(), suffix.to_string())),
                    formatting: run.formatting().clone(),
                })
            },
        }
    }

    /// Formatting of the anchor run, to copy onto the inserted run.
    #[inline]
    pub fn formatting(&self) -> &RunProperties {
        &self.formatting
    }

    /// Whether applying the plan splits an existing run.
    #[inline]
    pub fn splits_run(&self) -> bool {
        self.split.is_some()
    }

    /// Place `wrapper`, splitting the anchor run first if needed. Returns the
    /// wrapper's index.
    pub fn apply(self, elements: &mut Vec<ParagraphElement>, wrapper: ParagraphElement) -> usize {
        if let Some((element, prefix, suffix)) = self.split {
            debug!(element, "splitting run for insertion");
            set_run_text(elements, element, &prefix);
            let tail = MutableRun::with_text(&suffix, self.formatting);
            elements.insert(element + 1, ParagraphElement::Run(tail));
        }
        elements.insert(self.position, wrapper);
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::writer::paragraph::MutableParagraph;
    use crate::ooxml::docx::writer::revise::resolver::{
        InsertionPoint, TextTarget, resolve_insertion, resolve_range,
    };
    use crate::ooxml::docx::writer::revise::run_index::RunIndex;
    use crate::ooxml::docx::writer::revision::MutableRevision;
    use crate::ooxml::docx::writer::run::{RunContent, UnderlineStyle};
    use proptest::prelude::*;

    fn paragraph(texts: &[&str]) -> MutableParagraph {
        let mut para = MutableParagraph::new();
        for text in texts {
            para.add_run_with_text(text);
        }
        para
    }

    fn run_texts(para: &MutableParagraph) -> Vec<String> {
        para.runs().map(MutableRun::get_text).collect()
    }

    fn splice(para: &mut MutableParagraph, target: TextTarget<'_>, policy: InteriorRunPolicy) -> usize {
        let index = RunIndex::build(para.elements());
        let resolved = resolve_range(&index, target).unwrap();
        let plan = SplicePlan::new(para.elements(), &resolved, policy).unwrap();
        plan.apply(&mut para.elements)
    }

    #[test]
    fn test_split_chars() {
        assert_eq!(split_chars("héllo", 2), ("hé", "llo"));
        assert_eq!(split_chars("abc", 0), ("", "abc"));
        assert_eq!(split_chars("abc", 3), ("abc", ""));
    }

    #[test]
    fn test_same_run_three_way_split() {
        let mut para = paragraph(&["The quick fox", " jumps"]);
        para.runs_mut().next().unwrap().bold(true).font_name("Georgia").color("00FF00");
        let original = para.runs().next().unwrap().formatting().clone();

        let target = splice(&mut para, (4..9).into(), InteriorRunPolicy::Drop);
        assert_eq!(target, 1);
        assert_eq!(run_texts(&para), vec!["The ", "quick", " fox", " jumps"]);
        for run in para.runs().take(3) {
            assert_eq!(run.formatting(), &original);
        }
        assert_eq!(para.runs().nth(3).unwrap().formatting(), &RunProperties::default());
    }

    #[test]
    fn test_cross_run_splice() {
        let mut para = paragraph(&["Hello ", "World"]);
        let target = splice(&mut para, (2..8).into(), InteriorRunPolicy::Drop);
        assert_eq!(target, 1);
        assert_eq!(run_texts(&para), vec!["He", "llo Wo", "rld"]);
    }

    #[test]
    fn test_cross_run_drops_interior_text_but_keeps_marks() {
        let mut para = paragraph(&["aa", "bb"]);
        para.elements.push(ParagraphElement::Run(MutableRun::comment_reference(9)));
        para.add_run_with_text("cc")
            .italic(true)
            .push_content(RunContent::CommentReference(8));
        para.elements.push(ParagraphElement::Revision(MutableRevision::with_run(
            RevisionKind::Deletion,
            4,
            "A",
            "",
            MutableRun::with_text("zz", RunProperties::default()),
        )));
        para.add_run_with_text("dd");

        let target = splice(&mut para, (1..7).into(), InteriorRunPolicy::Drop);
        assert_eq!(run_texts(&para), vec!["a", "", "", "abbccd", "d"]);
        assert_eq!(target, 4);
        match &para.elements()[2] {
            ParagraphElement::Run(run) => {
                assert_eq!(run.content(), &[RunContent::CommentReference(8)]);
                assert_eq!(run.formatting().italic, Some(true));
            },
            other => panic!("expected reference run, got {:?}", other),
        }
        assert!(matches!(para.elements()[3], ParagraphElement::Revision(_)));
        assert_eq!(para.text(), "aabbccdd");
    }

    #[test]
    fn test_boundary_runs_keep_comment_references() {
        let mut para = paragraph(&["ab", "cd"]);
        para.runs_mut()
            .next()
            .unwrap()
            .push_content(RunContent::CommentReference(3));

        splice(&mut para, (1..3).into(), InteriorRunPolicy::Drop);
        assert_eq!(run_texts(&para), vec!["a", "bc", "d"]);
        assert_eq!(
            para.runs().next().unwrap().comment_references().collect::<Vec<_>>(),
            vec![3]
        );
    }

    #[test]
    fn test_cross_run_refuses_to_move_comment_markers() {
        let mut para = paragraph(&["aa"]);
        para.elements.push(ParagraphElement::CommentRangeStart(9));
        para.add_run_with_text("bb");
        para.elements.push(ParagraphElement::CommentRangeEnd(9));
        para.add_run_with_text("cc");
        let index = RunIndex::build(para.elements());

        // Crossing the end of the comment
        let resolved = resolve_range(&index, (3..6).into()).unwrap();
        assert_eq!(
            SplicePlan::new(para.elements(), &resolved, InteriorRunPolicy::Drop),
            Err(EditError::CommentOverlap { id: 9, start: 3, end: 6 })
        );

        // Enclosing the whole comment
        let resolved = resolve_range(&index, (1..5).into()).unwrap();
        assert!(matches!(
            SplicePlan::new(para.elements(), &resolved, InteriorRunPolicy::KeepEmpty),
            Err(EditError::CommentOverlap { id: 9, .. })
        ));

        // Inside the commented run is fine
        let target = splice(&mut para, (2..4).into(), InteriorRunPolicy::Drop);
        assert_eq!(target, 3);
        assert!(matches!(para.elements()[1], ParagraphElement::CommentRangeStart(9)));
        assert!(matches!(para.elements()[5], ParagraphElement::CommentRangeEnd(9)));
    }

    #[test]
    fn test_cross_run_keep_empty_preserves_interior_formatting() {
        let mut para = paragraph(&["aa", "bb", "cc"]);
        para.runs_mut().nth(1).unwrap().italic(true);

        let target = splice(&mut para, (1..5).into(), InteriorRunPolicy::KeepEmpty);
        assert_eq!(run_texts(&para), vec!["a", "", "abbc", "c"]);
        assert_eq!(target, 2);
        assert_eq!(para.runs().nth(1).unwrap().formatting().italic, Some(true));
        assert_eq!(para.runs().nth(2).unwrap().formatting().italic, None);
    }

    #[test]
    fn test_cross_run_copies_begin_formatting() {
        let mut para = paragraph(&["Hello ", "World"]);
        para.runs_mut().next().unwrap().underline(UnderlineStyle::Single);
        para.runs_mut().nth(1).unwrap().font_size(40);

        splice(&mut para, "lo Wo".into(), InteriorRunPolicy::Drop);
        let new_run = para.runs().nth(1).unwrap();
        assert_eq!(new_run.get_text(), "lo Wo");
        assert_eq!(new_run.formatting().font_size, None);
        assert!(new_run.formatting().underline.is_some());
    }

    #[test]
    fn test_reversed_span_is_refused() {
        let para = paragraph(&["ab", "cd"]);
        let index = RunIndex::build(para.elements());
        let mut resolved = resolve_range(&index, (1..3).into()).unwrap();
        std::mem::swap(&mut resolved.begin, &mut resolved.end);
        assert_eq!(
            SplicePlan::new(para.elements(), &resolved, InteriorRunPolicy::Drop),
            Err(EditError::InvalidSpan { begin: 1, end: 0 })
        );
    }

    #[test]
    fn test_insertion_split() {
        let mut para = paragraph(&["Hello World"]);
        para.runs_mut().next().unwrap().bold(true);
        let index = RunIndex::build(para.elements());
        let resolved = resolve_insertion(&index, InsertionPoint::Offset(5)).unwrap();
        let plan = InsertionPlan::new(para.elements(), &resolved).unwrap();
        assert!(plan.splits_run());
        assert_eq!(plan.formatting().bold, Some(true));

        let position = plan.apply(&mut para.elements, ParagraphElement::CommentRangeEnd(1));
        assert_eq!(position, 1);
        assert_eq!(run_texts(&para), vec!["Hello", " World"]);
        assert!(matches!(para.elements()[1], ParagraphElement::CommentRangeEnd(1)));
        assert_eq!(para.runs().nth(1).unwrap().formatting().bold, Some(true));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Removing the target run leaves the original text minus the range,
        /// and the full text is unchanged.
        #[test]
        fn prop_splice_conserves_text(
            texts in proptest::collection::vec("[a-zé\t]{0,6}", 1..6),
            a in 0usize..40,
            b in 0usize..40,
            keep_empty in any::<bool>(),
        ) {
            let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
            let mut para = paragraph(&refs);
            let before = para.text();
            let len = before.chars().count();
            prop_assume!(len > 0);
            let (start, end) = (a.min(b) % len, (a.max(b) % len) + 1);
            prop_assume!(start < end);

            let policy = if keep_empty { InteriorRunPolicy::KeepEmpty } else { InteriorRunPolicy::Drop };
            let target = splice(&mut para, (start..end).into(), policy);

            prop_assert_eq!(para.text(), before.clone());
            let selected: String = before.chars().skip(start).take(end - start).collect();
            match &para.elements()[target] {
                ParagraphElement::Run(run) => prop_assert_eq!(run.get_text(), selected),
                other => prop_assert!(false, "target is not a run: {:?}", other),
            }

            para.elements.remove(target);
            let expected: String = before.chars().take(start).chain(before.chars().skip(end)).collect();
            prop_assert_eq!(para.text(), expected);
        }
    }
}
