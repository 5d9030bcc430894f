//! Application state
//!
//! Single source of truth for the UI. All transitions go through the
//! reducer (see `reducer.rs`).

use libretroscroll::config::DEFAULT_SCROLL_THRESHOLD;
use libretroscroll::feed::render::SENTINEL_ROWS;
use libretroscroll::feed::{FeedView, Viewport};
use libretroscroll::games::GameDescriptor;
use libretroscroll::router::View;
use libretroscroll::types::StatsState;

use super::actions::Effect;

/// Typing this word anywhere starts the game parade
pub const ARCADE_TRIGGER: &str = "arcade";

/// Rows taken by the tab bar, the status bar and the feed border
pub const CHROME_ROWS: u16 = 8;

const DEFAULT_VIEWPORT_ROWS: usize = 20;

/// Root application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub should_quit: bool,

    pub current_view: View,

    pub help_visible: bool,

    pub feed: FeedPane,

    pub games: GamesPane,

    pub profile: ProfileState,

    /// Level shown in the level-up banner, until the effect ends
    pub level_up: Option<u64>,

    /// Last typed characters, bounded to the trigger word length
    pub key_buffer: String,

    pub status: StatusBarState,

    /// Error overlay state
    pub error: Option<String>,

    /// Side effects for the main loop, drained after every dispatch
    pub effects: Vec<Effect>,

    pub config: UiConfig,
}

/// Feed screen state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPane {
    /// Rendered feed as of the last batch
    pub view: FeedView,

    /// First visible row
    pub scroll: usize,

    /// Rows available for cards
    pub viewport_rows: usize,

    /// A batch was requested and has not landed yet
    pub requested: bool,
}

/// Games screen state
#[derive(Debug, Clone, Default)]
pub struct GamesPane {
    pub catalog: Vec<GameDescriptor>,

    /// Highlighted catalog index
    pub selected: usize,

    /// Game id of the running session
    pub active: Option<String>,

    /// Parade in progress
    pub parade: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    pub username: String,
    pub stats: StatsState,
}

#[derive(Debug, Clone, Default)]
pub struct StatusBarState {
    pub message: Option<String>,
}

/// UI configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    pub colors_enabled: bool,

    /// Tick rate in milliseconds
    pub tick_rate_ms: u64,

    /// Fraction of the sentinel that must be visible to load more
    pub scroll_threshold: f64,
}

impl Default for FeedPane {
    fn default() -> Self {
        Self {
            view: FeedView::default(),
            scroll: 0,
            viewport_rows: DEFAULT_VIEWPORT_ROWS,
            requested: false,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            should_quit: false,
            current_view: View::Feed,
            help_visible: false,
            feed: FeedPane::default(),
            games: GamesPane::default(),
            profile: ProfileState::default(),
            level_up: None,
            key_buffer: String::new(),
            status: StatusBarState::default(),
            error: None,
            effects: Vec::new(),
            config: UiConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        let colors_enabled = std::env::var("NO_COLOR").is_err()
            && std::env::var("RETROSCROLL_NO_COLOR").is_err();

        let tick_rate_ms = std::env::var("RETROSCROLL_TUI_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(100);

        Self {
            colors_enabled,
            tick_rate_ms,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State using the feed threshold from the service configuration
    pub fn with_threshold(scroll_threshold: f64) -> Self {
        let mut state = Self::default();
        state.config.scroll_threshold = scroll_threshold;
        state
    }

    pub fn game_active(&self) -> bool {
        self.games.active.is_some()
    }

    pub fn selected_game(&self) -> Option<&GameDescriptor> {
        self.games.catalog.get(self.games.selected)
    }

    /// Visible window over the feed rows
    pub fn feed_viewport(&self) -> Viewport {
        Viewport {
            top: self.feed.scroll as f64,
            height: self.feed.viewport_rows as f64,
        }
    }

    /// Largest scroll offset: the sentinel's last row at the bottom edge
    pub fn max_scroll(&self) -> usize {
        (self.feed.view.sentinel.row + SENTINEL_ROWS).saturating_sub(self.feed.viewport_rows)
    }
}
