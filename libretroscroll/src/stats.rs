//! XP, levels and persistence of progress
//!
//! `StatsEngine` is the only writer of `StatsState`. Every award is
//! persisted before the call returns, and crossing a level boundary
//! publishes a single `Event::LevelUp`.

use std::sync::Arc;

use crate::error::{Result, RetroScrollError};
use crate::service::events::{Event, EventBus};
use crate::storage::{load_record, save_record, KeyValueStore};
use crate::types::{level_for_xp, StatsState};

/// Result of a successful award
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Award {
    pub xp: u64,
    pub level: u64,
    pub leveled_up: bool,
}

pub struct StatsEngine {
    state: StatsState,
    store: Arc<dyn KeyValueStore>,
    key: String,
    events: EventBus,
}

impl StatsEngine {
    /// Load stats from `store`, falling back to the zero state
    ///
    /// A stored record whose level disagrees with its XP is corrected.
    pub fn load(store: Arc<dyn KeyValueStore>, key: impl Into<String>, events: EventBus) -> Self {
        let key = key.into();
        let mut state: StatsState = load_record(store.as_ref(), &key).unwrap_or_default();

        if !state.is_consistent() {
            let level = level_for_xp(state.xp);
            tracing::warn!(xp = state.xp, stored = state.level, level, "stored level out of sync, recomputing");
            state.level = level;
        }

        tracing::debug!(xp = state.xp, level = state.level, "stats loaded");

        Self {
            state,
            store,
            key,
            events,
        }
    }

    /// Read-only view of the current stats
    pub fn state(&self) -> &StatsState {
        &self.state
    }

    /// Add `amount` XP, re-derive the level and persist
    ///
    /// The award only takes effect once the record is written.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `amount` is negative.
    /// - `Storage` if the record cannot be written.
    ///
    /// In both cases the state is untouched and no event is published.
    pub fn award_xp(&mut self, amount: i64) -> Result<Award> {
        if amount < 0 {
            return Err(RetroScrollError::InvalidInput(format!(
                "XP award must be non-negative, got {}",
                amount
            )));
        }

        let mut next = self.state.clone();
        next.xp = next.xp.saturating_add(amount as u64);
        next.level = level_for_xp(next.xp);
        let leveled_up = next.level > self.state.level;

        save_record(self.store.as_ref(), &self.key, &next)?;
        self.state = next;

        let (xp, level) = (self.state.xp, self.state.level);
        if leveled_up {
            tracing::info!(level, xp, "level up");
            self.events.emit(Event::LevelUp { level, xp });
        }

        Ok(Award {
            xp,
            level,
            leveled_up,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use crate::storage::MemoryStore;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Store whose writes fail while `failing` is set
    struct FlakyStore {
        inner: MemoryStore,
        failing: AtomicBool,
    }

    impl FlakyStore {
        fn new() -> Self {
            Self {
                inner: MemoryStore::new(),
                failing: AtomicBool::new(true),
            }
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::IoError(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                ))
                .into());
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }

        fn backend_name(&self) -> &str {
            "flaky"
        }
    }

    const KEY: &str = "retroScroll:stats";

    fn engine(store: Arc<MemoryStore>) -> StatsEngine {
        StatsEngine::load(store, KEY, EventBus::new(16))
    }

    #[test]
    fn test_load_defaults_when_absent() {
        let stats = engine(Arc::new(MemoryStore::new()));
        assert_eq!(stats.state(), &StatsState::default());
    }

    #[test]
    fn test_load_defaults_when_corrupted() {
        let store = Arc::new(MemoryStore::new());
        store.set(KEY, "not json at all").unwrap();

        let stats = engine(store);
        assert_eq!(stats.state(), &StatsState::default());
    }

    #[test]
    fn test_load_resyncs_level() {
        let store = Arc::new(MemoryStore::new());
        store.set(KEY, r#"{"xp":250,"level":1,"streak":2,"visits":4,"distance":1.5}"#).unwrap();

        let stats = engine(store);
        assert_eq!(stats.state().level, 3);
        assert_eq!(stats.state().streak, 2);
    }

    #[test]
    fn test_award_accumulates_and_levels() {
        let mut stats = engine(Arc::new(MemoryStore::new()));

        let award = stats.award_xp(60).unwrap();
        assert_eq!(award, Award { xp: 60, level: 1, leveled_up: false });

        let award = stats.award_xp(60).unwrap();
        assert_eq!(award, Award { xp: 120, level: 2, leveled_up: true });
    }

    #[test]
    fn test_negative_award_rejected() {
        let store = Arc::new(MemoryStore::new());
        let mut stats = engine(store.clone());
        stats.award_xp(10).unwrap();

        let err = stats.award_xp(-5).unwrap_err();
        assert!(matches!(err, RetroScrollError::InvalidInput(_)));
        assert_eq!(stats.state().xp, 10);
    }

    #[test]
    fn test_zero_award_persists_without_level_up() {
        let store = Arc::new(MemoryStore::new());
        let mut stats = engine(store.clone());

        let award = stats.award_xp(0).unwrap();
        assert!(!award.leveled_up);
        assert!(store.get(KEY).unwrap().is_some());
    }

    #[test]
    fn test_award_persists_before_returning() {
        let store = Arc::new(MemoryStore::new());
        let mut stats = engine(store.clone());
        stats.award_xp(130).unwrap();

        let persisted: StatsState = load_record(store.as_ref(), KEY).unwrap();
        assert_eq!(persisted.xp, 130);
        assert_eq!(persisted.level, 2);
    }

    #[tokio::test]
    async fn test_level_up_event_emitted_once() {
        let events = EventBus::new(16);
        let mut receiver = events.subscribe();
        let mut stats = StatsEngine::load(Arc::new(MemoryStore::new()), KEY, events);

        stats.award_xp(99).unwrap();
        stats.award_xp(1).unwrap();
        stats.award_xp(50).unwrap();

        assert_eq!(
            receiver.recv().await.unwrap(),
            Event::LevelUp { level: 2, xp: 100 }
        );
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_multi_level_jump_counts_as_one_level_up() {
        let mut stats = engine(Arc::new(MemoryStore::new()));
        let award = stats.award_xp(350).unwrap();
        assert_eq!(award.level, 4);
        assert!(award.leveled_up);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_untouched() {
        let store = Arc::new(FlakyStore::new());
        let events = EventBus::new(16);
        let mut receiver = events.subscribe();
        let mut stats = StatsEngine::load(store.clone(), KEY, events);

        let err = stats.award_xp(150).unwrap_err();
        assert!(matches!(err, RetroScrollError::Storage(_)));
        assert_eq!(stats.state(), &StatsState::default());
        assert!(store.get(KEY).unwrap().is_none());
        assert!(receiver.try_recv().is_err());

        store.failing.store(false, Ordering::SeqCst);
        let award = stats.award_xp(150).unwrap();
        assert_eq!(award, Award { xp: 150, level: 2, leveled_up: true });
        assert_eq!(
            receiver.recv().await.unwrap(),
            Event::LevelUp { level: 2, xp: 150 }
        );
    }

    #[test]
    fn test_full_record_round_trips() {
        let store = Arc::new(MemoryStore::new());
        for distance in [394301.33835633675, 0.1 + 0.2, 1e-7, 12345.678901234567] {
            let state = StatsState {
                xp: 420,
                level: 5,
                streak: 7,
                visits: 31,
                distance,
            };
            save_record(store.as_ref(), KEY, &state).unwrap();
            assert_eq!(load_record::<StatsState>(store.as_ref(), KEY), Some(state.clone()));

            let reloaded = engine(store.clone());
            assert_eq!(reloaded.state(), &state);
        }
    }
}
