use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
};

use crate::models::Page;

/// Rows a title heading occupies, including the blank line below it.
pub const TITLE_OFFSET: u16 = 2;

const TREE_SIZES: &[usize] = &[1, 2, 3, 1];

/// Board widget for rendering one page of the book
pub struct Board<'a> {
    page: Option<&'a Page>,
    spread: bool,
    padding: u16,
}

impl<'a> Board<'a> {
    pub fn new() -> Self {
        Self {
            page: None,
            spread: false,
            padding: 1,
        }
    }

    pub fn with_page(mut self, page: &'a Page) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_spread(mut self, enabled: bool) -> Self {
        self.spread = enabled;
        self
    }

    /// Blank rows above the content block. Untitled pages of a spread keep
    /// the title space so both sides start on the same row.
    pub fn top_offset(&self) -> u16 {
        match self.page {
            Some(page) if self.spread && page.side.is_some() && !page.show_title => TITLE_OFFSET,
            _ => 0,
        }
    }

    /// Lines drawn inside the page frame.
    pub fn lines(&self) -> Vec<Line<'a>> {
        let Some(page) = self.page else {
            return Vec::new();
        };
        if page.is_cover() {
            return cover_lines(&page.title);
        }

        let mut lines = Vec::new();
        for _ in 0..self.top_offset() {
            lines.push(Line::from(""));
        }
        if page.show_title {
            lines.push(Line::from(Span::styled(
                page.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
        }
        lines.extend(page.lines.iter().map(|l| Line::from(l.as_str())));
        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .padding(Padding::horizontal(self.padding));
        let inner_area = block.inner(area);
        frame.render_widget(block, area);

        let alignment = match self.page {
            Some(page) if page.is_cover() => Alignment::Center,
            _ => Alignment::Left,
        };
        let paragraph = Paragraph::new(self.lines())
            .alignment(alignment)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner_area);
    }
}

impl Default for Board<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn cover_lines(book_title: &str) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            book_title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(""),
    ];

    // a row of trees, one layer per line
    let tallest = TREE_SIZES.iter().copied().max().unwrap_or(0);
    for row in 0..tallest {
        let mut spans = Vec::new();
        for &size in TREE_SIZES {
            let layer = (row + size).checked_sub(tallest);
            let text = match layer {
                Some(l) => format!("{:^9}", "^".repeat(2 * l + 1)),
                None => " ".repeat(9),
            };
            spans.push(Span::styled(text, Style::default().fg(Color::Green)));
        }
        lines.push(Line::from(spans));
    }
    lines
}

/// Shown in place of the book when no poem could be loaded.
pub fn render_error(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Error",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("No poems found. Please check the poems directory."),
    ];
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PageKind, Poem, Side};
    use crate::paginator::{PagePolicy, paginate_book};
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn page(side: Option<Side>, show_title: bool, lines: &[&str]) -> Page {
        Page {
            kind: PageKind::Poem(0),
            title: "Sanctuary".to_string(),
            lines: lines.iter().map(|s| s.to_string()).collect(),
            show_title,
            side,
        }
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_board_title_then_content() {
        let page = page(None, true, &["first", "  indented"]);
        let board = Board::new().with_page(&page);
        let lines: Vec<String> = board.lines().iter().map(|l| l.to_string()).collect();
        assert_eq!(lines, vec!["Sanctuary", "", "first", "  indented"]);
        assert_eq!(board.top_offset(), 0);
    }

    #[test]
    fn test_board_untitled_offset_only_in_spread() {
        let right = page(Some(Side::Right), false, &["later"]);
        let spread_board = Board::new().with_page(&right).with_spread(true);
        assert_eq!(spread_board.top_offset(), TITLE_OFFSET);
        let lines: Vec<String> = spread_board.lines().iter().map(|l| l.to_string()).collect();
        assert_eq!(lines, vec!["", "", "later"]);

        let left = page(Some(Side::Left), false, &["more"]);
        assert_eq!(
            Board::new().with_page(&left).with_spread(true).top_offset(),
            TITLE_OFFSET
        );
        let titled = page(Some(Side::Left), true, &["first"]);
        assert_eq!(Board::new().with_page(&titled).with_spread(true).top_offset(), 0);
        assert_eq!(Board::new().with_page(&right).top_offset(), 0);
        assert_eq!(Board::new().with_page(&left).top_offset(), 0);
    }

    #[test]
    fn test_board_facing_pages_start_on_same_row() {
        let poem = Poem {
            title: "Long".to_string(),
            content: (1..=40)
                .map(|i| format!("line {i}"))
                .collect::<Vec<_>>()
                .join("\n"),
        };
        let book = paginate_book(&[poem], &PagePolicy::spread(10, 12), "Book");
        let first_content_row = |unit: usize, page: usize| {
            Board::new()
                .with_page(&book.units[unit].pages[page])
                .with_spread(true)
                .lines()
                .iter()
                .position(|l| l.to_string().starts_with("line "))
        };

        // opening spread: title on the left, offset on the right
        assert_eq!(first_content_row(1, 0), Some(2));
        assert_eq!(first_content_row(1, 1), Some(2));
        // later spread: neither side has a title
        assert_eq!(first_content_row(2, 0), Some(2));
        assert_eq!(first_content_row(2, 0), first_content_row(2, 1));
    }

    #[test]
    fn test_board_cover_shows_book_title() {
        let cover = Page::cover("Collected Poems");
        let board = Board::new().with_page(&cover);
        assert!(
            board
                .lines()
                .iter()
                .any(|l| l.to_string() == "Collected Poems")
        );
    }

    #[test]
    fn test_board_renders_into_buffer() {
        let page = page(None, true, &["roses", "are red"]);
        let mut terminal = Terminal::new(TestBackend::new(30, 8)).unwrap();
        terminal
            .draw(|f| Board::new().with_page(&page).render(f, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer();
        assert!(row_text(buffer, 1).contains("Sanctuary"));
        assert!(row_text(buffer, 3).contains("roses"));
        assert!(row_text(buffer, 4).contains("are red"));
    }

    #[test]
    fn test_error_screen() {
        let mut terminal = Terminal::new(TestBackend::new(60, 8)).unwrap();
        terminal.draw(|f| render_error(f, f.area())).unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = (0..8).map(|y| row_text(buffer, y)).collect();
        assert!(text.contains("No poems found"));
    }

    #[test]
    fn test_board_default_is_empty() {
        let board = Board::default();
        assert!(board.lines().is_empty());
        assert_eq!(board.padding, 1);
        assert!(!board.spread);
    }
}
