//! Greedy pagination of exercise blocks onto fixed-height pages
//!
//! Exercises are never split: a block either fits on the page being filled
//! or starts the next one. A block taller than a whole page still gets a page
//! of its own, overflowing it.

use crate::estimate::HeightProvider;
use crate::types::Exercise;
use std::ops::Range;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Capacities a renderer gives the paginator, all in the renderer's unit
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageBudget {
    /// Height left for exercises under the first-page header
    pub first_page: f32,
    /// Height left for exercises under the "continued" label
    pub continuation_page: f32,
    /// Gap between consecutive blocks on a page
    pub spacing: f32,
    /// Total-duration summary shown after the last exercise
    pub footer: f32,
}

impl PageBudget {
    pub fn for_kind(&self, kind: PageKind) -> f32 {
        match kind {
            PageKind::First => self.first_page,
            PageKind::Continuation => self.continuation_page,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PageKind {
    First,
    Continuation,
}

/// Exercises assigned to one output page.
///
/// Groups are contiguous runs of the exercise sequence, so a page is just a
/// range of indices. The index doubles as the display number (`#index+1`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageGroup {
    pub kind: PageKind,
    pub exercises: Range<usize>,
}

impl PageGroup {
    fn new(kind: PageKind, start: usize) -> Self {
        Self {
            kind,
            exercises: start..start,
        }
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// The exercises on this page
    pub fn slice<'a>(&self, exercises: &'a [Exercise]) -> &'a [Exercise] {
        &exercises[self.exercises.clone()]
    }

    /// Exercises on this page paired with their position in the session
    pub fn numbered<'a>(
        &self,
        exercises: &'a [Exercise],
    ) -> impl Iterator<Item = (usize, &'a Exercise)> + 'a {
        let start = self.exercises.start;
        self.slice(exercises)
            .iter()
            .enumerate()
            .map(move |(offset, ex)| (start + offset, ex))
    }
}

/// Result of a pagination run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pagination {
    pub pages: Vec<PageGroup>,
    /// The summary footer did not fit under the exercises and got its own page
    pub footer_page: bool,
}

impl Pagination {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PageGroup> {
        self.pages.iter()
    }
}

impl<'a> IntoIterator for &'a Pagination {
    type Item = &'a PageGroup;
    type IntoIter = std::slice::Iter<'a, PageGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Height a group of blocks occupies, including the gaps between them
pub fn used_height<P: HeightProvider + ?Sized>(
    exercises: &[Exercise],
    heights: &P,
    spacing: f32,
) -> f32 {
    let blocks: f32 = exercises.iter().map(|ex| heights.height(ex)).sum();
    let gaps = exercises.len().saturating_sub(1) as f32 * spacing;
    blocks + gaps
}

/// Distribute exercises across pages.
///
/// Single greedy pass: each block goes onto the current page unless the page
/// already holds something and the block would push it past its budget. The
/// first page and continuation pages have different budgets.
///
/// When everything lands on the first page, the footer is checked against
/// the remaining space and moved to an extra empty page if it does not fit.
/// An empty sequence always yields exactly one empty page.
pub fn paginate<P: HeightProvider + ?Sized>(
    exercises: &[Exercise],
    heights: &P,
    budget: &PageBudget,
) -> Pagination {
    let mut pages = Vec::new();
    let mut current = PageGroup::new(PageKind::First, 0);
    let mut running = 0.0_f32;

    for (index, exercise) in exercises.iter().enumerate() {
        let height = heights.height(exercise);
        let cost = if current.is_empty() {
            height
        } else {
            height + budget.spacing
        };

        if !current.is_empty() && running + cost > budget.for_kind(current.kind) {
            log::debug!(
                "Page {} full at {:.1}; exercise #{} ({:.1}) starts a new page",
                pages.len() + 1,
                running,
                index + 1,
                height
            );
            pages.push(current);
            current = PageGroup::new(PageKind::Continuation, index);
            current.exercises.end = index + 1;
            running = height;
        } else {
            current.exercises.end = index + 1;
            running += cost;
        }
    }

    let single_page = pages.is_empty();
    let has_content = !current.is_empty();
    if has_content || single_page {
        pages.push(current);
    }

    let mut footer_page = false;
    if single_page && has_content {
        let content = used_height(exercises, heights, budget.spacing);
        if content + budget.footer > budget.first_page {
            log::debug!(
                "Footer ({:.1}) does not fit under {:.1} of content; adding a page",
                budget.footer,
                content
            );
            pages.push(PageGroup::new(PageKind::Continuation, exercises.len()));
            footer_page = true;
        }
    }

    Pagination { pages, footer_page }
}
