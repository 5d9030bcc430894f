//! Core data types for RetroScroll

use serde::{Deserialize, Serialize};
use std::fmt;

/// XP needed per level
pub const XP_PER_LEVEL: u64 = 100;

/// Level derived from an XP total: `floor(xp / 100) + 1`
pub fn level_for_xp(xp: u64) -> u64 {
    xp / XP_PER_LEVEL + 1
}

/// A single feed entry
///
/// The JSON form is tagged by `type` (`fact`, `image`, `ad`). Ids are
/// assigned once at creation and never change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentItem {
    #[serde(rename = "fact")]
    Fact {
        id: u64,
        content: String,
        source: String,
    },

    #[serde(rename = "image", rename_all = "camelCase")]
    Image {
        id: u64,
        /// `data:image/svg+xml,...` URI
        image_url: String,
        caption: String,
    },

    #[serde(rename = "ad")]
    Advertisement {
        id: u64,
        sponsored: bool,
        title: String,
        description: String,
        cta: String,
    },
}

impl ContentItem {
    pub fn id(&self) -> u64 {
        match self {
            ContentItem::Fact { id, .. }
            | ContentItem::Image { id, .. }
            | ContentItem::Advertisement { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ContentItem::Fact { .. } => ContentKind::Fact,
            ContentItem::Image { .. } => ContentKind::Image,
            ContentItem::Advertisement { .. } => ContentKind::Advertisement,
        }
    }
}

/// Discriminant of a `ContentItem`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Fact,
    Image,
    Advertisement,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentKind::Fact => write!(f, "fact"),
            ContentKind::Image => write!(f, "image"),
            ContentKind::Advertisement => write!(f, "ad"),
        }
    }
}

/// Gamified progress, persisted after every change
///
/// `xp` is the source of truth; `level` always equals `level_for_xp(xp)`
/// once the stats engine has touched the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsState {
    pub xp: u64,
    pub level: u64,
    pub streak: i64,
    pub visits: i64,
    pub distance: f64,
}

impl Default for StatsState {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            streak: 0,
            visits: 0,
            distance: 0.0,
        }
    }
}

impl StatsState {
    /// Whether `level` matches the value derived from `xp`
    pub fn is_consistent(&self) -> bool {
        self.level == level_for_xp(self.xp)
    }
}

/// Pseudonymous handle shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    /// `data:image/svg+xml,...` URI
    pub avatar: String,
}
