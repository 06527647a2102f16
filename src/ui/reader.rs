use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout as AreaLayout, Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::config::Config;
use crate::logging;
use crate::models::{Book, Direction, Layout, Page, Poem, Side, WindowType};
use crate::navigation::{NavigationState, SwipeTracker, visible_pages};
use crate::paginator::{PagePolicy, paginate_book};
use crate::ui::board::{Board, render_error};
use crate::ui::windows::help::HelpWindow;

/// Widest a single page is drawn, in columns
const SINGLE_PAGE_WIDTH: u16 = 72;
const BUTTON_WIDTH: u16 = 10;

#[derive(Debug, Clone, Default)]
pub struct UiState {
    pub active_window: WindowType,
    pub help_scroll: u16,
    /// Last known size of the whole screen
    pub screen: Rect,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_window(&mut self, window_type: WindowType) {
        if window_type == WindowType::Help {
            self.help_scroll = 0;
        }
        self.active_window = window_type;
    }
}

/// Fixed regions of the screen, shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub header: Rect,
    pub body: Rect,
    pub prev_button: Rect,
    pub indicator: Rect,
    pub next_button: Rect,
}

pub fn screen_areas(area: Rect) -> ScreenAreas {
    let [header, body, footer] = AreaLayout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);
    let [prev_button, indicator, next_button] = AreaLayout::horizontal([
        Constraint::Length(BUTTON_WIDTH),
        Constraint::Min(0),
        Constraint::Length(BUTTON_WIDTH),
    ])
    .areas(footer);

    ScreenAreas {
        header,
        body,
        prev_button,
        indicator,
        next_button,
    }
}

/// Where a page is drawn inside the body area.
pub fn page_slot(body: Rect, layout: Layout, page: &Page) -> Rect {
    match layout {
        Layout::Spread => {
            let [left, right] =
                AreaLayout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .areas(body);
            match page.side {
                Some(Side::Left) => left,
                // a closed book shows its cover on the right
                Some(Side::Right) | None => right,
            }
        }
        Layout::Single | Layout::Auto => {
            let width = body.width.min(SINGLE_PAGE_WIDTH);
            Rect::new(body.x + (body.width - width) / 2, body.y, width, body.height)
        }
    }
}

/// Everything the reader shows, independent of the terminal.
#[derive(Debug, Clone)]
pub struct ApplicationState {
    pub config: Config,
    pub poems: Vec<Poem>,
    /// Configured layout, possibly `Auto`
    pub layout: Layout,
    pub book: Book,
    pub navigation: Option<NavigationState>,
    pub ui_state: UiState,
    pub swipe: SwipeTracker,
    pub should_quit: bool,
}

impl ApplicationState {
    pub fn new(config: Config, poems: Vec<Poem>, term_width: u16) -> Self {
        let layout = config.settings.layout;
        let book = Self::build_book(&config, &poems, layout, term_width);
        let navigation = Self::initial_navigation(&book);
        let swipe = SwipeTracker::new(config.settings.swipe_threshold_px);

        Self {
            config,
            poems,
            layout,
            book,
            navigation,
            ui_state: UiState::new(),
            swipe,
            should_quit: false,
        }
    }

    fn build_book(config: &Config, poems: &[Poem], layout: Layout, term_width: u16) -> Book {
        let settings = &config.settings;
        let resolved = layout.resolve(term_width, settings.spread_min_width);
        let policy = PagePolicy::for_layout(resolved, settings);
        paginate_book(poems, &policy, &settings.book_title)
    }

    fn initial_navigation(book: &Book) -> Option<NavigationState> {
        if book.is_empty() {
            None
        } else {
            NavigationState::new(book.total())
        }
    }

    pub fn position(&self) -> Option<usize> {
        self.navigation.map(|n| n.position())
    }

    /// Turn one unit; a no-op at either end of the book.
    pub fn turn_page(&mut self, direction: Direction) -> bool {
        match self.navigation.as_mut() {
            Some(nav) => nav.apply(direction),
            None => false,
        }
    }

    /// Re-paginate for a layout, keeping the reader on the poem being read.
    pub fn relayout(&mut self, layout: Layout, term_width: u16) {
        let settings = &self.config.settings;
        let resolved = layout.resolve(term_width, settings.spread_min_width);
        self.layout = layout;
        if resolved == self.book.layout {
            return;
        }

        let poem = self.position().and_then(|p| self.book.poem_at(p));
        self.book = Self::build_book(&self.config, &self.poems, layout, term_width);
        self.navigation = Self::initial_navigation(&self.book).and_then(|nav| {
            let target = poem.and_then(|p| self.book.first_unit_of(p)).unwrap_or(0);
            NavigationState::at(target, nav.total())
        });
        log::debug!("Switched to {:?} layout", self.book.layout);
    }

    pub fn toggle_layout(&mut self) {
        let next = self.book.layout.toggled();
        self.relayout(next, self.ui_state.screen.width);
    }

    pub fn handle_resize(&mut self, width: u16, height: u16) {
        self.ui_state.screen = Rect::new(0, 0, width, height);
        self.relayout(self.layout, width);
    }

    /// Switch windows, forgetting any press that started in the old one.
    pub fn open_window(&mut self, window_type: WindowType) {
        self.swipe.cancel();
        self.ui_state.open_window(window_type);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match self.ui_state.active_window {
            WindowType::Help => self.handle_help_keys(key),
            WindowType::Reader => self.handle_reader_keys(key),
        }
    }

    fn handle_reader_keys(&mut self, key: KeyEvent) {
        let keymap = self.config.keymap.clone();
        match key.code {
            KeyCode::Left => {
                self.turn_page(Direction::Backward);
            }
            KeyCode::Right | KeyCode::Char(' ') => {
                self.turn_page(Direction::Forward);
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) if keymap.prev_page.contains(&c) => {
                self.turn_page(Direction::Backward);
            }
            KeyCode::Char(c) if keymap.next_page.contains(&c) => {
                self.turn_page(Direction::Forward);
            }
            KeyCode::Char(c) if keymap.toggle_layout.contains(&c) => self.toggle_layout(),
            KeyCode::Char(c) if keymap.help.contains(&c) => {
                self.open_window(WindowType::Help)
            }
            KeyCode::Char(c) if keymap.quit.contains(&c) => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_help_keys(&mut self, key: KeyEvent) {
        let keymap = self.config.keymap.clone();
        let total = HelpWindow::get_total_lines(self.config.keymap_user_dict()) as u16;
        match key.code {
            KeyCode::Esc => self.open_window(WindowType::Reader),
            KeyCode::Char(c) if keymap.quit.contains(&c) || keymap.help.contains(&c) => {
                self.open_window(WindowType::Reader)
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.ui_state.help_scroll = self.ui_state.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.ui_state.help_scroll + 1 < total {
                    self.ui_state.help_scroll += 1;
                }
            }
            _ => {}
        }
    }

    /// Mouse drags act as swipes; a press and release without travel is a
    /// click on the Prev/Next buttons.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !self.config.settings.mouse_support || self.ui_state.active_window != WindowType::Reader
        {
            return;
        }

        let cell_width = self.config.settings.cell_width_px.max(1);
        let x_px = i32::from(mouse.column).saturating_mul(cell_width);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.swipe.start(x_px),
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(direction) = self.swipe.end(x_px) {
                    self.turn_page(direction);
                    return;
                }
                let areas = screen_areas(self.ui_state.screen);
                let at = Position::new(mouse.column, mouse.row);
                if areas.prev_button.contains(at) {
                    self.turn_page(Direction::Backward);
                } else if areas.next_button.contains(at) {
                    self.turn_page(Direction::Forward);
                }
            }
            _ => {}
        }
    }

    fn header_text(&self) -> String {
        self.position()
            .and_then(|p| self.book.poem_at(p))
            .and_then(|i| self.poems.get(i))
            .map(|poem| format!("{} · {}", self.book.title, poem.title))
            .unwrap_or_else(|| self.book.title.clone())
    }
}

pub struct Reader {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    state: ApplicationState,
}

impl Reader {
    /// Create a new Reader over the loaded poems
    pub fn new(config: Config, poems: Vec<Poem>) -> eyre::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));

        let mut state = ApplicationState::new(config, poems, width);
        state.ui_state.screen = Rect::new(0, 0, width, height);

        Ok(Self { terminal, state })
    }

    /// Run the main application loop
    pub fn run(&mut self) -> eyre::Result<()> {
        let mouse = self.state.config.settings.mouse_support;
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
        if mouse {
            crossterm::execute!(io::stdout(), crossterm::event::EnableMouseCapture)?;
        }
        let log_level = logging::suspend();

        let result = self.event_loop();

        logging::resume(log_level);
        self.terminal.show_cursor()?;
        if mouse {
            crossterm::execute!(io::stdout(), crossterm::event::DisableMouseCapture)?;
        }
        crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
        crossterm::terminal::disable_raw_mode()?;

        result
    }

    fn event_loop(&mut self) -> eyre::Result<()> {
        self.terminal.clear()?;
        self.terminal.hide_cursor()?;

        while !self.state.should_quit {
            let state = &self.state;
            self.terminal.draw(|f| render(f, state))?;

            if !crossterm::event::poll(Duration::from_secs(60))? {
                continue;
            }

            match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.state.handle_key(key),
                Event::Mouse(mouse) => self.state.handle_mouse(mouse),
                Event::Resize(width, height) => self.state.handle_resize(width, height),
                _ => {}
            }
        }
        Ok(())
    }
}

/// Draw the whole screen from the application state.
pub fn render(frame: &mut Frame, state: &ApplicationState) {
    let areas = screen_areas(frame.area());

    frame.render_widget(
        Paragraph::new(state.header_text())
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        areas.header,
    );

    match state.navigation {
        Some(nav) if !state.book.is_empty() => {
            render_book(frame, areas.body, &state.book, &nav);
            render_controls(frame, &areas, &nav);
        }
        _ => {
            render_error(frame, areas.body);
            frame.render_widget(
                Paragraph::new("Press q to quit")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray)),
                areas.indicator,
            );
        }
    }

    if state.ui_state.active_window == WindowType::Help {
        HelpWindow::render(
            frame,
            frame.area(),
            state.config.keymap_user_dict(),
            state.ui_state.help_scroll,
        );
    }
}

fn render_book(frame: &mut Frame, body: Rect, book: &Book, nav: &NavigationState) {
    let spread = book.layout == Layout::Spread;
    for page_state in visible_pages(book, nav) {
        let page = &book.units[page_state.unit].pages[page_state.page];
        let slot = page_slot(body, book.layout, page);
        Board::new()
            .with_page(page)
            .with_spread(spread)
            .render(frame, slot);
    }
}

fn button_style(enabled: bool) -> Style {
    if enabled {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_controls(frame: &mut Frame, areas: &ScreenAreas, nav: &NavigationState) {
    frame.render_widget(
        Paragraph::new(Line::from("◀ Prev")).style(button_style(nav.prev_enabled())),
        areas.prev_button,
    );
    frame.render_widget(
        Paragraph::new(nav.indicator()).alignment(Alignment::Center),
        areas.indicator,
    );
    frame.render_widget(
        Paragraph::new(Line::from("Next ▶"))
            .alignment(Alignment::Right)
            .style(button_style(nav.next_enabled())),
        areas.next_button,
    );
}
