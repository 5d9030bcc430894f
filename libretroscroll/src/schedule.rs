//! Delayed and repeating events with explicit cancellation
//!
//! Visual effects that expire (the level-up banner) and timed sequences
//! (the game parade) are modelled as named `Event::Scheduled` emissions on
//! the event bus. Every schedule hands back a `CancelHandle`.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::service::events::{Event, EventBus};

/// Fired when the level-up effect should disappear
pub const LEVEL_UP_EFFECT_END: &str = "level_up_effect_end";
/// Fired once per catalog entry during the parade
pub const PARADE_STEP: &str = "parade_step";

pub const LEVEL_UP_EFFECT_DURATION: Duration = Duration::from_millis(3000);
pub const PARADE_INTERVAL: Duration = Duration::from_millis(2000);

/// Handle to a pending schedule
#[derive(Debug)]
pub struct CancelHandle {
    name: String,
    task: JoinHandle<()>,
}

impl CancelHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop the schedule. Calling it again, or after it finished, is a no-op.
    pub fn cancel(&self) {
        if !self.task.is_finished() {
            tracing::debug!(name = %self.name, "schedule cancelled");
        }
        self.task.abort();
    }

    /// True once every emission happened or the schedule was cancelled
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawns schedules on a tokio runtime
///
/// Holding a runtime `Handle` lets synchronous callers (the terminal UI
/// loop) schedule without entering the runtime themselves.
#[derive(Clone)]
pub struct Scheduler {
    runtime: Handle,
    events: EventBus,
}

impl Scheduler {
    pub fn new(runtime: Handle, events: EventBus) -> Self {
        Self { runtime, events }
    }

    /// Emit `name` once after `delay`
    pub fn after(&self, name: &str, delay: Duration) -> CancelHandle {
        self.every(name, delay, 1)
    }

    /// Emit `name` `count` times, one `period` apart
    ///
    /// The first emission happens one period after the call.
    pub fn every(&self, name: &str, period: Duration, count: u32) -> CancelHandle {
        let events = self.events.clone();
        let event_name = name.to_string();

        let task = self.runtime.spawn(async move {
            for seq in 0..count {
                tokio::time::sleep(period).await;
                events.emit(Event::Scheduled {
                    name: event_name.clone(),
                    seq,
                });
            }
        });

        tracing::debug!(name, ?period, count, "schedule started");
        CancelHandle {
            name: name.to_string(),
            task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler(events: &EventBus) -> Scheduler {
        Scheduler::new(Handle::current(), events.clone())
    }

    #[tokio::test]
    async fn test_one_shot_fires() {
        let events = EventBus::new(16);
        let mut receiver = events.subscribe();
        let handle = scheduler(&events).after("ping", Duration::from_millis(5));

        assert_eq!(
            receiver.recv().await.unwrap(),
            Event::Scheduled {
                name: "ping".to_string(),
                seq: 0
            }
        );
        assert_eq!(handle.name(), "ping");
    }

    #[tokio::test]
    async fn test_repeating_counts_up() {
        let events = EventBus::new(16);
        let mut receiver = events.subscribe();
        let handle = scheduler(&events).every("tick", Duration::from_millis(2), 3);

        for expected in 0..3 {
            match receiver.recv().await.unwrap() {
                Event::Scheduled { name, seq } => {
                    assert_eq!(name, "tick");
                    assert_eq!(seq, expected);
                }
                other => panic!("unexpected event {:?}", other),
            }
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_finished());
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancel_prevents_emission_and_is_idempotent() {
        let events = EventBus::new(16);
        let mut receiver = events.subscribe();
        let handle = scheduler(&events).after("never", Duration::from_millis(50));

        handle.cancel();
        handle.cancel();

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(receiver.try_recv().is_err());
        assert!(handle.is_finished());
    }
}
