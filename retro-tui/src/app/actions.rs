//! Actions for the reducer pattern
//!
//! Every state transition is triggered by an `Action`. Work the reducer
//! cannot do itself (loading batches, launching games) is requested by
//! queueing an `Effect` that the main loop performs.

use crossterm::event::KeyEvent;
use libretroscroll::feed::FeedView;
use libretroscroll::games::GameDescriptor;
use libretroscroll::router::View;
use libretroscroll::types::StatsState;

/// Actions that trigger state transitions
#[derive(Debug, Clone)]
pub enum Action {
    // === UI Events ===
    /// Keyboard input event
    Key(KeyEvent),

    /// Periodic tick
    Tick,

    /// Terminal resize event
    Resize(u16, u16),

    // === Navigation ===
    /// Switch to a view
    NavigateTo(View),

    /// Quit the application
    Quit,

    ShowHelp,
    HideHelp,

    // === Feed ===
    /// Move the feed viewport by `delta` rows
    Scroll(i64),

    /// Ask for the next batch unless one is already requested
    RequestMore,

    /// A batch landed; carries the re-rendered feed
    FeedUpdated(FeedView),

    // === Profile ===
    /// Username and stats known at boot
    ProfileLoaded { username: String, stats: StatsState },

    StatsUpdated(StatsState),

    /// XP crossed a level boundary
    LevelUp { level: u64 },

    /// The level-up banner timed out
    LevelUpEffectEnded,

    // === Games ===
    CatalogLoaded(Vec<GameDescriptor>),

    SelectNext,
    SelectPrev,

    /// Launch the highlighted catalog entry
    LaunchSelected,

    /// A session was mounted
    GameStarted(String),

    /// The active session was released
    GameClosed,

    /// Start cycling through the catalog
    StartParade,

    /// The parade reached catalog entry `seq`
    ParadeStep(u32),

    // === Error Handling ===
    ShowError(String),
    DismissError,

    // === Status Bar ===
    SetStatus(String),
    ClearStatus,
}

/// Side effects requested by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a background batch load
    LoadMore,

    /// Tell the router which view is shown
    OpenView(View),

    LaunchGame(String),

    /// Release the active session and award session XP
    CloseGame,

    StartParade,
    StopParade,
}
