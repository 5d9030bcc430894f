//! retro-tui library
//!
//! Exports the reducer, rendering and service adapter for testing.

pub mod app;
pub mod error;
pub mod services;
pub mod terminal;
pub mod ui;

// Re-export commonly used types
pub use app::{reduce, Action, AppState, Effect};
pub use error::{Result, TuiError};
