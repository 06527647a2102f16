use ratatui::{
    Frame,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::settings::CfgDefaultKeymaps;

pub struct HelpWindow;

impl HelpWindow {
    pub fn help_text(keys: &CfgDefaultKeymaps) -> Vec<String> {
        vec![
            " Key Bindings:".to_string(),
            format!("   {:<18}Previous Page", format!("{} / Left", keys.prev_page)),
            format!("   {:<18}Next Page", format!("{} / Right / Space", keys.next_page)),
            format!("   {:<18}Toggle Spread / Single", keys.toggle_layout),
            format!("   {:<18}Help", keys.help),
            format!("   {:<18}Quit / Close Window", format!("{} / Esc", keys.quit)),
            String::new(),
            " Mouse:".to_string(),
            "   Click Prev/Next   Turn Page".to_string(),
            "   Drag left/right   Swipe".to_string(),
        ]
    }

    pub fn get_total_lines(keys: &CfgDefaultKeymaps) -> usize {
        Self::help_text(keys).len()
    }

    pub fn render(frame: &mut Frame, area: Rect, keys: &CfgDefaultKeymaps, scroll_offset: u16) {
        let help_content: Vec<Line> = Self::help_text(keys).into_iter().map(Line::from).collect();

        let max_width = help_content.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let width = (max_width + 4).min(area.width);
        let height = (help_content.len() as u16 + 2).min(area.height);

        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        let popup_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup_area);

        let help_paragraph = Paragraph::new(help_content)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .scroll((scroll_offset, 0));

        frame.render_widget(help_paragraph, popup_area);
    }
}
