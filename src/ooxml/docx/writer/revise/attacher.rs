//! Attaching comments and tracked changes to resolved text.
//!
//! Each operation resolves, plans and reserves its id before touching the
//! paragraph; only infallible steps follow.
use tracing::debug;

use super::super::comment::{CommentStore, MutableComment};
use super::super::paragraph::ParagraphElement;
use super::super::revision::{MutableRevision, RevisionKind};
use super::super::run::MutableRun;
use super::error::{EditError, Result};
use super::options::ReviseOptions;
use super::resolver::{CharacterRange, InsertionPoint, TextTarget, resolve_insertion, resolve_range};
use super::run_index::RunIndex;
use super::splicer::{InsertionPlan, SplicePlan};
use crate::common::IdAllocator;

/// Document-wide state an edit needs besides the paragraph itself.
#[derive(Debug)]
pub struct RevisionContext<'a> {
    pub ids: &'a mut IdAllocator,
    pub comments: &'a mut CommentStore,
    pub options: &'a ReviseOptions,
}

/// Comment content and metadata. Unset fields fall back to [`ReviseOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentRequest<'a> {
    pub text: &'a str,
    pub author: Option<&'a str>,
    pub initials: Option<&'a str>,
    pub date: Option<&'a str>,
    /// Explicit comment id; must not be in use
    pub id: Option<u32>,
}

impl<'a> CommentRequest<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            author: None,
            initials: None,
            date: None,
            id: None,
        }
    }

    pub fn author(mut self, author: &'a str) -> Self {
        self.author = Some(author);
        self
    }

    pub fn initials(mut self, initials: &'a str) -> Self {
        self.initials = Some(initials);
        self
    }

    pub fn date(mut self, date: &'a str) -> Self {
        self.date = Some(date);
        self
    }

    pub fn id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }
}

/// A comment anchored in a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentHandle {
    pub id: u32,
    /// Element index of the run holding the commented text
    pub element: usize,
    pub range: CharacterRange,
    /// The commented text
    pub text: String,
}

/// A tracked insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionHandle {
    pub id: u32,
    /// Element index of the `w:ins` wrapper
    pub element: usize,
    /// Logical-text offset the text was inserted at
    pub offset: usize,
}

/// A tracked deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionHandle {
    pub id: u32,
    /// Element index of the `w:del` wrapper
    pub element: usize,
    pub range: CharacterRange,
    /// The deleted text
    pub text: String,
}

/// Take an explicit id or the next free one.
fn reserve_id(ids: &mut IdAllocator, explicit: Option<u32>) -> Result<u32> {
    match explicit {
        Some(id) if ids.claim(id) => Ok(id),
        Some(id) => Err(EditError::DuplicateId { id }),
        None => ids.next_id().ok_or(EditError::IdsExhausted),
    }
}

fn new_comment(ctx: &RevisionContext<'_>, id: u32, request: &CommentRequest<'_>) -> MutableComment {
    let mut comment = MutableComment::new(
        id,
        ctx.options.resolve_author(request.author),
        request.text.to_string(),
    );
    comment.set_initials(Some(
        request.initials.unwrap_or(&ctx.options.initials).to_string(),
    ));
    comment.set_date(Some(ctx.options.resolve_date(request.date)));
    comment
}

/// Frame the run at `element` with range markers and follow it with a
/// reference run. Returns the run's new index.
fn frame_comment(elements: &mut Vec<ParagraphElement>, element: usize, id: u32) -> usize {
    elements.insert(element, ParagraphElement::CommentRangeStart(id));
    elements.insert(element + 2, ParagraphElement::CommentRangeEnd(id));
    elements.insert(
        element + 3,
        ParagraphElement::Run(MutableRun::comment_reference(id)),
    );
    element + 1
}

/// Anchor a comment on `target`.
///
/// The selected text is isolated in its own run, framed by
/// `commentRangeStart`/`commentRangeEnd`, and followed by a run carrying the
/// `commentReference`.
pub fn attach_comment(
    elements: &mut Vec<ParagraphElement>,
    ctx: &mut RevisionContext<'_>,
    target: TextTarget<'_>,
    request: CommentRequest<'_>,
) -> Result<CommentHandle> {
    let index = RunIndex::build(elements);
    let resolved = resolve_range(&index, target)?;
    let plan = SplicePlan::new(elements, &resolved, ctx.options.interior_runs)?;
    let id = reserve_id(ctx.ids, request.id)?;
    let comment = new_comment(ctx, id, &request);

    let target_run = plan.apply(elements);
    let element = frame_comment(elements, target_run, id);
    ctx.comments.push(comment);

    debug!(
        id,
        start = resolved.range.start,
        end = resolved.range.end,
        "comment attached"
    );
    Ok(CommentHandle {
        id,
        element,
        range: resolved.range,
        text: resolved.text,
    })
}

/// Anchor a comment on the whole `run`-th top-level run, without splitting.
pub fn attach_run_comment(
    elements: &mut Vec<ParagraphElement>,
    ctx: &mut RevisionContext<'_>,
    run: usize,
    request: CommentRequest<'_>,
) -> Result<CommentHandle> {
    let (element, text) = elements
        .iter()
        .enumerate()
        .filter_map(|(i, e)| match e {
            ParagraphElement::Run(r) => Some((i, r.get_text())),
            _ => None,
        })
        .nth(run)
        .ok_or(EditError::RunNotFound { index: run })?;
    let start: usize = elements[..element]
        .iter()
        .map(ParagraphElement::logical_len)
        .sum();
    let range = CharacterRange::new(start, start + text.chars().count());

    let id = reserve_id(ctx.ids, request.id)?;
    let comment = new_comment(ctx, id, &request);
    let element = frame_comment(elements, element, id);
    ctx.comments.push(comment);

    debug!(id, run, element, "run comment attached");
    Ok(CommentHandle {
        id,
        element,
        range,
        text,
    })
}

/// Insert `text` as a tracked insertion at `point`.
///
/// At offset 0 the wrapper becomes the first child; at a run boundary it
/// follows that run; otherwise the run is split in two around it. The
/// inserted run copies the formatting of the run it is inserted into.
pub fn attach_insertion(
    elements: &mut Vec<ParagraphElement>,
    ctx: &mut RevisionContext<'_>,
    point: InsertionPoint<'_>,
    author: Option<&str>,
    date: Option<&str>,
    text: &str,
) -> Result<InsertionHandle> {
    let index = RunIndex::build(elements);
    let resolved = resolve_insertion(&index, point)?;
    let plan = InsertionPlan::new(elements, &resolved)?;
    let id = reserve_id(ctx.ids, None)?;

    let run = MutableRun::with_text(text, plan.formatting().clone());
    let wrapper = MutableRevision::with_run(
        RevisionKind::Insertion,
        id,
        ctx.options.resolve_author(author),
        ctx.options.resolve_date(date),
        run,
    );
    let element = plan.apply(elements, ParagraphElement::Revision(wrapper));

    debug!(id, offset = resolved.offset, element, "insertion attached");
    Ok(InsertionHandle {
        id,
        element,
        offset: resolved.offset,
    })
}

/// Mark `target` as a tracked deletion.
///
/// The selected text is isolated in its own run, which is then moved into a
/// `w:del` wrapper at the same position.
pub fn attach_deletion(
    elements: &mut Vec<ParagraphElement>,
    ctx: &mut RevisionContext<'_>,
    target: TextTarget<'_>,
    author: Option<&str>,
    date: Option<&str>,
) -> Result<DeletionHandle> {
    let index = RunIndex::build(elements);
    let resolved = resolve_range(&index, target)?;
    let plan = SplicePlan::new(elements, &resolved, ctx.options.interior_runs)?;
    let id = reserve_id(ctx.ids, None)?;
    let author = ctx.options.resolve_author(author);
    let date = ctx.options.resolve_date(date);

    let element = plan.apply(elements);
    if let Some(slot) = elements.get_mut(element)
        && let ParagraphElement::Run(run) = slot
    {
        let run = std::mem::take(run);
        *slot = ParagraphElement::Revision(MutableRevision::with_run(
            RevisionKind::Deletion,
            id,
            author,
            date,
            run,
        ));
    }

    debug!(
        id,
        start = resolved.range.start,
        end = resolved.range.end,
        "deletion attached"
    );
    Ok(DeletionHandle {
        id,
        element,
        range: resolved.range,
        text: resolved.text,
    })
}
