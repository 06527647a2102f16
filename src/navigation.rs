//! Position within the book and everything derived from it.
//!
//! Navigation is a pure function of `(state, direction)`; presentation of
//! every page (active, flipped, stacking order) is recomputed from the
//! resulting state instead of being mutated transition by transition.

use crate::models::{Book, Direction, Layout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    position: usize,
    total: usize,
}

impl NavigationState {
    /// Start on the cover. `None` for a book with no units.
    pub fn new(total: usize) -> Option<Self> {
        (total > 0).then_some(Self { position: 0, total })
    }

    /// State at `position`, clamped into range.
    pub fn at(position: usize, total: usize) -> Option<Self> {
        (total > 0).then(|| Self {
            position: position.min(total - 1),
            total,
        })
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Next state, or `None` when the move would leave the book.
    pub fn turn(&self, direction: Direction) -> Option<Self> {
        let target = self.position.checked_add_signed(direction.delta())?;
        (target < self.total).then_some(Self {
            position: target,
            total: self.total,
        })
    }

    /// Apply a turn in place; out-of-range turns leave the state unchanged.
    pub fn apply(&mut self, direction: Direction) -> bool {
        match self.turn(direction) {
            Some(next) => {
                *self = next;
                true
            }
            None => false,
        }
    }

    pub fn prev_enabled(&self) -> bool {
        self.position > 0
    }

    pub fn next_enabled(&self) -> bool {
        self.position + 1 < self.total
    }

    pub fn indicator(&self) -> String {
        format!("{} / {}", self.position + 1, self.total)
    }
}

/// How a single page is presented for the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Single layout: the page being read
    Active,
    /// Single layout: already read
    Prev,
    /// Single layout: not reached yet
    Next,
    /// Spread layout: turned over, out of view
    Flipped,
    /// Spread layout: lying in its own place
    Unflipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub unit: usize,
    pub page: usize,
    pub presentation: Presentation,
    pub z_order: i64,
}

impl PageState {
    pub fn is_visible(&self, position: usize) -> bool {
        match self.presentation {
            Presentation::Active => true,
            Presentation::Unflipped => self.unit == position,
            _ => false,
        }
    }
}

/// Stacking order of a page: the current unit above everything, earlier and
/// later units behind it.
pub fn z_order(unit: usize, page_in_unit: usize, position: usize, total: usize) -> i64 {
    let total = total as i64;
    if unit == position {
        total + 10 - page_in_unit as i64
    } else {
        total - unit as i64
    }
}

fn presentation(book: &Book, unit: usize, page: usize, position: usize) -> Presentation {
    match book.layout {
        Layout::Spread => {
            let turned = unit < position && book.units[unit].turning_leaf() == Some(page);
            if turned {
                Presentation::Flipped
            } else {
                Presentation::Unflipped
            }
        }
        Layout::Single | Layout::Auto => match unit.cmp(&position) {
            std::cmp::Ordering::Less => Presentation::Prev,
            std::cmp::Ordering::Equal => Presentation::Active,
            std::cmp::Ordering::Greater => Presentation::Next,
        },
    }
}

/// Presentation of every page of the book, in book order.
pub fn page_states(book: &Book, state: &NavigationState) -> Vec<PageState> {
    let position = state.position();
    let total = book.total();
    book.units
        .iter()
        .enumerate()
        .flat_map(|(unit_index, unit)| {
            (0..unit.pages.len()).map(move |page_index| PageState {
                unit: unit_index,
                page: page_index,
                presentation: presentation(book, unit_index, page_index, position),
                z_order: z_order(unit_index, page_index, position, total),
            })
        })
        .collect()
}

/// Pages to draw, lowest in the stack first.
pub fn visible_pages(book: &Book, state: &NavigationState) -> Vec<PageState> {
    let mut visible: Vec<PageState> = page_states(book, state)
        .into_iter()
        .filter(|p| p.is_visible(state.position()))
        .collect();
    visible.sort_by_key(|p| p.z_order);
    visible
}

/// Minimum horizontal travel of a swipe, in pixels.
pub const SWIPE_THRESHOLD_PX: i32 = 50;

/// Turns a press/release pair of horizontal coordinates into a page turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwipeTracker {
    threshold_px: i32,
    start_x: Option<i32>,
}

impl SwipeTracker {
    pub fn new(threshold_px: i32) -> Self {
        Self {
            threshold_px: threshold_px.max(0),
            start_x: None,
        }
    }

    pub fn start(&mut self, x: i32) {
        self.start_x = Some(x);
    }

    /// Finish a gesture. Swiping left advances, swiping right goes back.
    pub fn end(&mut self, x: i32) -> Option<Direction> {
        let start = self.start_x.take()?;
        let diff = start.saturating_sub(x);
        if diff.saturating_abs() <= self.threshold_px {
            None
        } else if diff > 0 {
            Some(Direction::Forward)
        } else {
            Some(Direction::Backward)
        }
    }

    pub fn cancel(&mut self) {
        self.start_x = None;
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(SWIPE_THRESHOLD_PX)
    }
}
