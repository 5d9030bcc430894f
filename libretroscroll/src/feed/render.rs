//! Pure rendering of the feed into display cards
//!
//! `render_feed` is a total function of the item sequence: it rebuilds
//! every card on each call and places the sentinel right after the last
//! one, so the scroll trigger stays anchored to the end of the feed.

use crate::types::{ContentItem, ContentKind};

use super::observer::Bounds;
use super::FeedState;

/// Rows taken by a card's frame (top and bottom border)
pub const CARD_FRAME_ROWS: usize = 2;
/// Rows taken by the sentinel marker
pub const SENTINEL_ROWS: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardBody {
    Fact {
        text: String,
        source: String,
    },
    Image {
        image_url: String,
        caption: String,
    },
    Ad {
        title: String,
        description: String,
        cta: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: u64,
    pub kind: ContentKind,
    pub body: CardBody,
}

impl Card {
    pub fn from_item(item: &ContentItem) -> Self {
        let body = match item {
            ContentItem::Fact {
                content, source, ..
            } => CardBody::Fact {
                text: content.clone(),
                source: source.clone(),
            },
            ContentItem::Image {
                image_url, caption, ..
            } => CardBody::Image {
                image_url: image_url.clone(),
                caption: caption.clone(),
            },
            ContentItem::Advertisement {
                title,
                description,
                cta,
                ..
            } => CardBody::Ad {
                title: title.clone(),
                description: description.clone(),
                cta: cta.clone(),
            },
        };

        Self {
            id: item.id(),
            kind: item.kind(),
            body,
        }
    }

    /// Text lines shown inside the card frame
    pub fn lines(&self) -> Vec<String> {
        match &self.body {
            CardBody::Fact { text, source } => {
                vec![text.clone(), format!("Source: {}", source)]
            }
            CardBody::Image { caption, .. } => {
                vec!["[pixel art]".to_string(), caption.clone()]
            }
            CardBody::Ad {
                title,
                description,
                cta,
            } => vec![
                "Sponsored".to_string(),
                title.clone(),
                description.clone(),
                format!("[ {} ]", cta),
            ],
        }
    }

    /// Rows the card occupies including its frame
    pub fn height(&self) -> usize {
        self.lines().len() + CARD_FRAME_ROWS
    }
}

/// Marker placed after the last card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinel {
    /// Index in the sequence, equal to the item count
    pub index: usize,
    /// First row of the sentinel
    pub row: usize,
}

impl Sentinel {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            top: self.row as f64,
            height: SENTINEL_ROWS as f64,
        }
    }
}

/// Rendered feed: cards in sequence order, then the sentinel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedView {
    pub cards: Vec<Card>,
    pub sentinel: Sentinel,
    pub loading: bool,
}

impl FeedView {
    /// Total rows of cards, not counting the sentinel
    pub fn content_height(&self) -> usize {
        self.sentinel.row
    }

    /// First row of each card
    pub fn card_offsets(&self) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(self.cards.len());
        let mut row = 0;
        for card in &self.cards {
            offsets.push(row);
            row += card.height();
        }
        offsets
    }
}

impl Default for FeedView {
    fn default() -> Self {
        render_feed(&FeedState::default())
    }
}

/// Rebuild the full view from the state
pub fn render_feed(state: &FeedState) -> FeedView {
    let cards: Vec<Card> = state.items().iter().map(Card::from_item).collect();
    let row = cards.iter().map(Card::height).sum();

    FeedView {
        sentinel: Sentinel {
            index: cards.len(),
            row,
        },
        cards,
        loading: state.is_loading(),
    }
}
