//! In-process event bus
//!
//! Components publish what happened (a batch landed, a level was gained,
//! a game was torn down) and front ends subscribe to refresh their view.
//!
//! # Architecture
//!
//! The bus wraps `tokio::sync::broadcast`. Emitting never blocks: with no
//! subscribers the event is dropped, and a lagging subscriber loses its
//! oldest events rather than stalling the emitter.
//!
//! # Example
//!
//! ```no_run
//! use libretroscroll::service::events::{EventBus, Event};
//!
//! # async fn example() {
//! let event_bus = EventBus::new(100);
//! let mut receiver = event_bus.subscribe();
//!
//! event_bus.emit(Event::LevelUp { level: 2, xp: 120 });
//!
//! if let Ok(event) = receiver.recv().await {
//!     println!("Received: {:?}", event);
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::router::View;

/// Event receiver type alias
pub type EventReceiver = broadcast::Receiver<Event>;

/// Broadcast bus shared by every component of a session
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new event bus
    ///
    /// `capacity` is the per-subscriber buffer before the oldest events
    /// are dropped.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribe to events emitted from now on
    pub fn subscribe(&self) -> EventReceiver {
        self.sender.subscribe()
    }

    /// Emit an event to all subscribers without blocking
    pub fn emit(&self, event: Event) {
        // Err only means nobody is listening
        let _ = self.sender.send(event);
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Events published by the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A batch was appended to the feed
    BatchLoaded {
        first_id: u64,
        last_id: u64,
        /// Feed length after the append
        total: usize,
    },

    /// A load was requested while another was in flight
    BatchSkipped,

    /// XP crossed a level boundary
    LevelUp { level: u64, xp: u64 },

    /// A game session was mounted
    GameLaunched { game_id: String, session_id: String },

    /// A game session was torn down
    GameReleased { game_id: String, session_id: String },

    /// The active view changed
    ViewChanged { from: View, to: View },

    /// The game catalog was populated for the session
    CatalogPopulated { games: usize },

    /// A scheduled event fired; `seq` counts from 0 for repeating schedules
    Scheduled { name: String, seq: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_emission_and_subscription() {
        let event_bus = EventBus::new(10);
        let mut receiver = event_bus.subscribe();

        event_bus.emit(Event::BatchLoaded {
            first_id: 1,
            last_id: 20,
            total: 20,
        });

        match receiver.recv().await.unwrap() {
            Event::BatchLoaded {
                first_id,
                last_id,
                total,
            } => {
                assert_eq!(first_id, 1);
                assert_eq!(last_id, 20);
                assert_eq!(total, 20);
            }
            other => panic!("Wrong event type received: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let event_bus = EventBus::new(10);
        let mut receiver1 = event_bus.subscribe();
        let mut receiver2 = event_bus.subscribe();

        event_bus.emit(Event::LevelUp { level: 3, xp: 200 });

        assert_eq!(
            receiver1.recv().await.unwrap(),
            Event::LevelUp { level: 3, xp: 200 }
        );
        assert_eq!(
            receiver2.recv().await.unwrap(),
            Event::LevelUp { level: 3, xp: 200 }
        );
    }

    #[tokio::test]
    async fn test_no_subscribers() {
        let event_bus = EventBus::new(10);

        // Must not panic or block
        event_bus.emit(Event::BatchSkipped);
        assert_eq!(event_bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_subscriber_count() {
        let event_bus = EventBus::new(10);
        let _receiver1 = event_bus.subscribe();
        let _receiver2 = event_bus.subscribe();
        assert_eq!(event_bus.subscriber_count(), 2);
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::ViewChanged {
            from: View::Feed,
            to: View::Games,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("view_changed"));
        assert!(json.contains("\"to\":\"games\""));

        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
