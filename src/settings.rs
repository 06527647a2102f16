use serde::{Deserialize, Serialize};

use crate::models::Layout;
use crate::paginator::{SINGLE_PAGE_LINES, SPREAD_PAGE_LINES, SPREAD_TITLE_PAGE_LINES};

pub const DEFAULT_POEM_FILES: &[&str] = &[
    "In His Hands.txt",
    "Sooner or Later.txt",
    "The Week I Fell In Love.txt",
    "First Day of Spring.txt",
    "Beatty Line Haibun.txt",
    "Summertime in the Temperate Rainforest.txt",
    "Oncoming Lights.txt",
    "Baby.txt",
    "Sanctuary.txt",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub book_title: String,
    /// Fetch poems from `<base_url>/poems/<file>` instead of a directory
    pub base_url: Option<String>,
    pub poems_dir: String,
    /// Empty means "every .txt file in poems_dir"
    pub poem_files: Vec<String>,
    pub layout: Layout,
    pub spread_min_width: u16,
    pub single_page_lines: usize,
    pub spread_title_page_lines: usize,
    pub spread_page_lines: usize,
    pub mouse_support: bool,
    pub swipe_threshold_px: i32,
    pub cell_width_px: i32,
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            book_title: "Collected Poems".to_string(),
            base_url: None,
            poems_dir: "poems".to_string(),
            poem_files: DEFAULT_POEM_FILES.iter().map(|s| s.to_string()).collect(),
            layout: Layout::Auto,
            spread_min_width: 100,
            single_page_lines: SINGLE_PAGE_LINES,
            spread_title_page_lines: SPREAD_TITLE_PAGE_LINES,
            spread_page_lines: SPREAD_PAGE_LINES,
            mouse_support: true,
            swipe_threshold_px: 50,
            cell_width_px: 8,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CfgDefaultKeymaps {
    pub prev_page: String,
    pub next_page: String,
    pub toggle_layout: String,
    pub help: String,
    pub quit: String,
}

impl Default for CfgDefaultKeymaps {
    fn default() -> Self {
        Self {
            prev_page: "h".to_string(),
            next_page: "l".to_string(),
            toggle_layout: "D".to_string(),
            help: "?".to_string(),
            quit: "q".to_string(),
        }
    }
}

/// Resolved key bindings. Arrow keys always turn pages in addition to these.
#[derive(Debug, Clone, PartialEq)]
pub struct Keymap {
    pub prev_page: Vec<char>,
    pub next_page: Vec<char>,
    pub toggle_layout: Vec<char>,
    pub help: Vec<char>,
    pub quit: Vec<char>,
}

impl Keymap {
    pub fn from_user_dict(dict: &CfgDefaultKeymaps) -> Self {
        fn keys(binding: &str) -> Vec<char> {
            binding.chars().filter(|c| !c.is_whitespace()).collect()
        }
        Self {
            prev_page: keys(&dict.prev_page),
            next_page: keys(&dict.next_page),
            toggle_layout: keys(&dict.toggle_layout),
            help: keys(&dict.help),
            quit: keys(&dict.quit),
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_user_dict(&CfgDefaultKeymaps::default())
    }
}
