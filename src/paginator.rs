use crate::models::{Book, Layout, PAGE_BREAK_MARKER, Page, PageKind, Poem, Side, Unit};
use crate::settings::Settings;

pub const SINGLE_PAGE_LINES: usize = 20;
pub const SPREAD_TITLE_PAGE_LINES: usize = 10;
pub const SPREAD_PAGE_LINES: usize = 12;

/// How pages are sized and grouped into navigation units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePolicy {
    /// 1 for single-page navigation, 2 for left/right spreads
    pub pages_per_unit: usize,
    /// Line budget of a page that also carries the poem title
    pub title_page_lines: usize,
    pub page_lines: usize,
}

impl PagePolicy {
    pub fn single(page_lines: usize) -> Self {
        Self {
            pages_per_unit: 1,
            title_page_lines: page_lines.max(1),
            page_lines: page_lines.max(1),
        }
    }

    pub fn spread(title_page_lines: usize, page_lines: usize) -> Self {
        Self {
            pages_per_unit: 2,
            title_page_lines: title_page_lines.max(1),
            page_lines: page_lines.max(1),
        }
    }

    /// Policy for a resolved layout. `Auto` must be resolved beforehand and
    /// falls back to single pages.
    pub fn for_layout(layout: Layout, settings: &Settings) -> Self {
        match layout {
            Layout::Spread => Self::spread(
                settings.spread_title_page_lines,
                settings.spread_page_lines,
            ),
            Layout::Single | Layout::Auto => Self::single(settings.single_page_lines),
        }
    }

    pub fn is_spread(&self) -> bool {
        self.pages_per_unit > 1
    }

    fn lines_for(&self, show_title: bool) -> usize {
        if show_title {
            self.title_page_lines
        } else {
            self.page_lines
        }
    }
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self::single(SINGLE_PAGE_LINES)
    }
}

pub fn has_explicit_breaks(content: &str) -> bool {
    content.contains(PAGE_BREAK_MARKER)
}

/// Non-empty, trimmed segments between page break markers, in order.
pub fn explicit_segments(content: &str) -> Vec<&str> {
    content
        .split(PAGE_BREAK_MARKER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Line groups for one poem, before sides and titles are assigned.
fn line_groups(content: &str, policy: &PagePolicy) -> Vec<Vec<String>> {
    if has_explicit_breaks(content) {
        return explicit_segments(content)
            .into_iter()
            .map(|segment| segment.lines().map(str::to_string).collect())
            .collect();
    }

    let lines: Vec<&str> = content.lines().collect();
    let mut groups = Vec::new();
    let mut cursor = 0;
    while cursor < lines.len() {
        let take = policy.lines_for(groups.is_empty());
        let end = (cursor + take).min(lines.len());
        groups.push(lines[cursor..end].iter().map(|l| l.to_string()).collect());
        cursor = end;
    }
    groups
}

fn side_for(slot: usize, policy: &PagePolicy) -> Option<Side> {
    if !policy.is_spread() {
        None
    } else if slot % policy.pages_per_unit == 0 {
        Some(Side::Left)
    } else {
        Some(Side::Right)
    }
}

/// Split one poem into pages. Only the first page shows the title; in spread
/// layout pages alternate left/right starting on the left.
pub fn split_poem(poem: &Poem, poem_index: usize, policy: &PagePolicy) -> Vec<Page> {
    line_groups(&poem.content, policy)
        .into_iter()
        .enumerate()
        .map(|(i, lines)| Page {
            kind: PageKind::Poem(poem_index),
            title: poem.title.clone(),
            lines,
            show_title: i == 0,
            side: side_for(i, policy),
        })
        .collect()
}

/// Group a poem's pages into navigation units, padding a trailing spread
/// with a blank facing page.
pub fn group_units(pages: Vec<Page>, policy: &PagePolicy) -> Vec<Unit> {
    let per_unit = policy.pages_per_unit.max(1);
    let mut units = Vec::new();
    let mut iter = pages.into_iter().peekable();

    while let Some(first) = iter.next() {
        let mut unit_pages = vec![first];
        while unit_pages.len() < per_unit {
            match iter.next() {
                Some(page) => unit_pages.push(page),
                None => {
                    let slot = unit_pages.len();
                    let template = &unit_pages[0];
                    unit_pages.push(Page {
                        kind: template.kind.clone(),
                        title: template.title.clone(),
                        lines: Vec::new(),
                        show_title: false,
                        side: side_for(slot, policy),
                    });
                }
            }
        }
        units.push(Unit { pages: unit_pages });
    }
    units
}

/// Paginate one poem into its navigation units.
pub fn paginate_poem(poem: &Poem, poem_index: usize, policy: &PagePolicy) -> Vec<Unit> {
    group_units(split_poem(poem, poem_index, policy), policy)
}

/// Assemble the whole book: the cover first, then every poem in order.
pub fn paginate_book(poems: &[Poem], policy: &PagePolicy, book_title: &str) -> Book {
    let mut units = vec![Unit::single(Page::cover(book_title))];
    for (index, poem) in poems.iter().enumerate() {
        let poem_units = paginate_poem(poem, index, policy);
        log::debug!(
            "Paginated '{}' into {} unit(s)",
            poem.title,
            poem_units.len()
        );
        units.extend(poem_units);
    }

    Book {
        title: book_title.to_string(),
        layout: if policy.is_spread() {
            Layout::Spread
        } else {
            Layout::Single
        },
        units,
        poem_count: poems.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poem_with_lines(n: usize) -> Poem {
        Poem {
            title: "Numbers".to_string(),
            content: (1..=n)
                .map(|i| format!("line {i}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn all_lines(units: &[Unit]) -> Vec<String> {
        units
            .iter()
            .flat_map(|u| u.pages.iter())
            .flat_map(|p| p.lines.iter().cloned())
            .collect()
    }

    fn titled_pages(units: &[Unit]) -> usize {
        units
            .iter()
            .flat_map(|u| u.pages.iter())
            .filter(|p| p.show_title)
            .count()
    }

    #[test]
    fn test_twenty_lines_fit_one_single_page() {
        let poem = poem_with_lines(20);
        let units = paginate_poem(&poem, 0, &PagePolicy::single(20));
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].pages.len(), 1);
        let page = &units[0].pages[0];
        assert_eq!(page.lines.len(), 20);
        assert!(page.show_title);
        assert_eq!(page.side, None);
    }

    #[test]
    fn test_single_automatic_split_keeps_remainder() {
        let poem = poem_with_lines(45);
        let units = paginate_poem(&poem, 0, &PagePolicy::single(20));
        let sizes: Vec<usize> = units.iter().map(|u| u.pages[0].lines.len()).collect();
        assert_eq!(sizes, vec![20, 20, 5]);
        assert_eq!(titled_pages(&units), 1);
        assert!(units[0].pages[0].show_title);
    }

    #[test]
    fn test_spread_automatic_uses_smaller_title_page() {
        let poem = poem_with_lines(40);
        let units = paginate_poem(&poem, 3, &PagePolicy::spread(10, 12));
        let sizes: Vec<Vec<usize>> = units
            .iter()
            .map(|u| u.pages.iter().map(|p| p.lines.len()).collect())
            .collect();
        assert_eq!(sizes, vec![vec![10, 12], vec![12, 6]]);

        for unit in &units {
            assert_eq!(unit.pages[0].side, Some(Side::Left));
            assert_eq!(unit.pages[1].side, Some(Side::Right));
            assert!(unit.pages.iter().all(|p| p.poem_index() == Some(3)));
        }
        assert!(units[0].pages[0].show_title);
        assert_eq!(titled_pages(&units), 1);
    }

    #[test]
    fn test_spread_short_poem_gets_blank_right_page() {
        let poem = poem_with_lines(7);
        let units = paginate_poem(&poem, 0, &PagePolicy::spread(10, 12));
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].pages[0].lines.len(), 7);
        assert!(units[0].pages[1].lines.is_empty());
        assert!(!units[0].pages[1].show_title);
        assert_eq!(units[0].pages[1].side, Some(Side::Right));
    }

    #[test]
    fn test_automatic_mode_reproduces_all_lines() {
        for n in [1, 9, 10, 11, 22, 23, 57] {
            let poem = poem_with_lines(n);
            let expected: Vec<String> = poem.content.lines().map(str::to_string).collect();
            for policy in [PagePolicy::single(20), PagePolicy::spread(10, 12)] {
                let units = paginate_poem(&poem, 0, &policy);
                assert_eq!(all_lines(&units), expected, "n={n} policy={policy:?}");
                assert_eq!(titled_pages(&units), 1);
            }
        }
    }

    #[test]
    fn test_explicit_breaks_single() {
        let poem = Poem {
            title: "Breaks".to_string(),
            content: "one\ntwo\n---\n\n---\nthree\n---\nfour\nfive".to_string(),
        };
        let units = paginate_poem(&poem, 0, &PagePolicy::single(20));
        let texts: Vec<String> = units.iter().map(|u| u.pages[0].content_text()).collect();
        assert_eq!(texts, vec!["one\ntwo", "three", "four\nfive"]);
        assert!(units[0].pages[0].show_title);
        assert_eq!(titled_pages(&units), 1);
    }

    #[test]
    fn test_explicit_breaks_ignore_line_budget() {
        let mut content = (1..=30)
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        content.push_str("\n---\nlast");
        let poem = Poem {
            title: "Long".to_string(),
            content,
        };
        let units = paginate_poem(&poem, 0, &PagePolicy::single(20));
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].pages[0].lines.len(), 30);
    }

    #[test]
    fn test_explicit_breaks_spread_distribution() {
        let poem = Poem {
            title: "Breaks".to_string(),
            content: "a\n---\nb\n---\nc".to_string(),
        };
        let units = paginate_poem(&poem, 0, &PagePolicy::spread(10, 12));
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].pages[0].content_text(), "a");
        assert_eq!(units[0].pages[1].content_text(), "b");
        assert_eq!(units[1].pages[0].content_text(), "c");
        assert!(units[1].pages[1].lines.is_empty());
        assert!(units[0].pages[0].show_title);
        assert!(!units[1].pages[0].show_title);
    }

    #[test]
    fn test_explicit_segments_reconstructed_in_order() {
        let content = "  alpha \n---\n---\nbeta\ngamma\n---   \n delta";
        let expected = explicit_segments(content);
        assert_eq!(expected, vec!["alpha", "beta\ngamma", "delta"]);

        let poem = Poem {
            title: "Order".to_string(),
            content: content.to_string(),
        };
        for policy in [PagePolicy::single(20), PagePolicy::spread(10, 12)] {
            let texts: Vec<String> = paginate_poem(&poem, 0, &policy)
                .iter()
                .flat_map(|u| u.pages.iter())
                .filter(|p| !p.lines.is_empty())
                .map(Page::content_text)
                .collect();
            assert_eq!(texts, expected);
        }
    }

    #[test]
    fn test_book_starts_with_cover() {
        let poems = vec![poem_with_lines(5), poem_with_lines(25)];
        let book = paginate_book(&poems, &PagePolicy::single(20), "Collection");
        assert_eq!(book.total(), 4);
        assert!(book.units[0].is_cover());
        assert_eq!(book.units[0].pages[0].title, "Collection");
        assert_eq!(book.first_unit_of(1), Some(2));
        assert_eq!(book.layout, Layout::Single);
        assert_eq!(book.poem_count, 2);
    }

    #[test]
    fn test_book_without_poems_has_only_cover() {
        let book = paginate_book(&[], &PagePolicy::spread(10, 12), "Empty");
        assert_eq!(book.total(), 1);
        assert!(book.is_empty());
        assert_eq!(book.layout, Layout::Spread);
    }

    #[test]
    fn test_policy_for_layout() {
        let settings = Settings::default();
        assert_eq!(
            PagePolicy::for_layout(Layout::Spread, &settings),
            PagePolicy::spread(SPREAD_TITLE_PAGE_LINES, SPREAD_PAGE_LINES)
        );
        assert_eq!(
            PagePolicy::for_layout(Layout::Single, &settings),
            PagePolicy::single(SINGLE_PAGE_LINES)
        );
    }
}
