//! RetroScroll - an endless retro feed with XP, levels and mini-games
//!
//! This library holds the session engine behind the RetroScroll front
//! ends: mock content generation, the infinite feed pipeline, progress
//! tracking, the game launcher and view routing.

pub mod art;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod games;
pub mod identity;
pub mod logging;
pub mod router;
pub mod schedule;
pub mod service;
pub mod stats;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use content::{ContentGenerator, IdCounter};
pub use error::{Result, RetroScrollError};
pub use feed::{FeedPipeline, FeedState, LoadOutcome};
pub use router::View;
pub use service::RetroScrollService;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::{ContentItem, Identity, StatsState};
