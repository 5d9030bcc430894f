//! Application module
//!
//! - Actions: what can happen
//! - State: what is true right now
//! - Reducer: pure function `(State, Action) -> State`

pub mod actions;
pub mod event;
pub mod reducer;
pub mod state;

pub use actions::{Action, Effect};
pub use reducer::reduce;
pub use state::{AppState, FeedPane, GamesPane, ProfileState, StatusBarState, UiConfig};
