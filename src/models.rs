use serde::{Deserialize, Serialize};

/// Literal token that marks an author-inserted page break.
pub const PAGE_BREAK_MARKER: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn delta(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowType {
    Reader,
    Help,
}

impl Default for WindowType {
    fn default() -> Self {
        WindowType::Reader
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Spread when the terminal is wide enough, single page otherwise
    #[default]
    Auto,
    Single,
    Spread,
}

impl Layout {
    /// Resolve `Auto` against the current terminal width.
    pub fn resolve(self, term_width: u16, spread_min_width: u16) -> Layout {
        match self {
            Layout::Auto if term_width >= spread_min_width => Layout::Spread,
            Layout::Auto => Layout::Single,
            other => other,
        }
    }

    pub fn toggled(self) -> Layout {
        match self {
            Layout::Spread => Layout::Single,
            _ => Layout::Spread,
        }
    }
}

impl std::str::FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Layout::Auto),
            "single" | "mobile" => Ok(Layout::Single),
            "spread" | "desktop" => Ok(Layout::Spread),
            other => Err(format!("unknown layout '{other}', expected auto, single or spread")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poem {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    Cover,
    /// Index into the loaded poem list
    Poem(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub kind: PageKind,
    pub title: String,
    pub lines: Vec<String>,
    pub show_title: bool,
    pub side: Option<Side>,
}

impl Page {
    pub fn cover(book_title: &str) -> Self {
        Self {
            kind: PageKind::Cover,
            title: book_title.to_string(),
            lines: Vec::new(),
            show_title: true,
            side: None,
        }
    }

    pub fn is_cover(&self) -> bool {
        self.kind == PageKind::Cover
    }

    pub fn poem_index(&self) -> Option<usize> {
        match self.kind {
            PageKind::Poem(index) => Some(index),
            PageKind::Cover => None,
        }
    }

    /// Text of the content block: the lines joined verbatim.
    pub fn content_text(&self) -> String {
        self.lines.join("\n")
    }
}

/// One navigation step: a single page, or a left/right pair in spread layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub pages: Vec<Page>,
}

impl Unit {
    pub fn single(page: Page) -> Self {
        Self { pages: vec![page] }
    }

    pub fn pair(left: Page, right: Page) -> Self {
        Self {
            pages: vec![left, right],
        }
    }

    pub fn is_cover(&self) -> bool {
        self.pages.len() == 1 && self.pages[0].is_cover()
    }

    /// Index of the page that turns when leaving this unit forward.
    pub fn turning_leaf(&self) -> Option<usize> {
        if self.pages.len() == 1 {
            return Some(0);
        }
        self.pages
            .iter()
            .position(|p| p.side == Some(Side::Right))
            .or_else(|| self.pages.len().checked_sub(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub title: String,
    pub layout: Layout,
    pub units: Vec<Unit>,
    pub poem_count: usize,
}

impl Book {
    pub fn total(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poem_count == 0
    }

    /// First unit holding a page of the given poem.
    pub fn first_unit_of(&self, poem: usize) -> Option<usize> {
        self.units
            .iter()
            .position(|u| u.pages.iter().any(|p| p.poem_index() == Some(poem)))
    }

    pub fn poem_at(&self, unit: usize) -> Option<usize> {
        self.units
            .get(unit)?
            .pages
            .iter()
            .find_map(Page::poem_index)
    }
}
