use std::fmt::Write;

use crate::models::{Book, Layout, Side};
use crate::navigation::NavigationState;

/// Layout for a dump. Without a terminal width (stdout is piped) `Auto`
/// falls back to the single layout so the output does not depend on the
/// controlling terminal.
pub fn dump_layout(layout: Layout, term_width: Option<u16>, spread_min_width: u16) -> Layout {
    match term_width {
        Some(width) => layout.resolve(width, spread_min_width),
        None if layout == Layout::Auto => Layout::Single,
        None => layout,
    }
}

/// Plain-text rendition of the paginated book, one block per navigation unit.
pub fn book_to_text(book: &Book) -> String {
    let mut out = String::new();
    if book.is_empty() {
        out.push_str("No poems found. Please check the poems directory.\n");
        return out;
    }

    for (index, unit) in book.units.iter().enumerate() {
        let indicator = NavigationState::at(index, book.total())
            .map(|n| n.indicator())
            .unwrap_or_default();
        let _ = writeln!(out, "=== {} ===", indicator);

        for page in &unit.pages {
            if page.is_cover() {
                let _ = writeln!(out, "[cover] {}", page.title);
                continue;
            }
            match page.side {
                Some(Side::Left) => out.push_str("[left]\n"),
                Some(Side::Right) => out.push_str("[right]\n"),
                None => {}
            }
            if page.show_title {
                let _ = writeln!(out, "# {}", page.title);
            }
            if !page.lines.is_empty() {
                out.push_str(&page.content_text());
                out.push('\n');
            }
        }
        out.push('\n');
    }
    out
}
