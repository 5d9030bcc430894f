//! Infinite feed pipeline
//!
//! The feed is an append-only sequence of `ContentItem`s that grows one
//! batch at a time. A batch load waits out a simulated network delay and
//! then appends exactly `n` freshly generated items.
//!
//! # Re-entrancy
//!
//! `FeedState::loading` is checked when a load starts. A load requested
//! while another is in flight returns `LoadOutcome::Skipped` without
//! touching the sequence. The state lock is never held across the delay,
//! so the check is advisory in the same way a flag on a single-threaded
//! event loop is.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use libretroscroll::content::ContentGenerator;
//! use libretroscroll::feed::{FeedPipeline, LoadOutcome};
//! use libretroscroll::service::events::EventBus;
//!
//! # async fn example() -> libretroscroll::Result<()> {
//! let feed = FeedPipeline::new(
//!     ContentGenerator::with_seed(1),
//!     Duration::from_millis(500),
//!     EventBus::new(16),
//! );
//! let outcome = feed.load_batch(20).await?;
//! assert!(matches!(outcome, LoadOutcome::Appended { first_id: 1, last_id: 20 }));
//! # Ok(())
//! # }
//! ```

pub mod observer;
pub mod render;

pub use observer::{Bounds, ScrollObserver, Viewport};
pub use render::{render_feed, Card, CardBody, FeedView};

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::content::{ContentGenerator, IdCounter};
use crate::error::{Result, RetroScrollError};
use crate::service::events::{Event, EventBus};
use crate::types::ContentItem;

/// Accumulated feed of one session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedState {
    items: Vec<ContentItem>,
    loading: bool,
    ids: IdCounter,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in display order
    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Most recently issued id, 0 before the first batch
    pub fn last_id(&self) -> u64 {
        self.ids.last()
    }

    /// Mark a load as in flight. Returns false if one already is.
    pub fn begin_load(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.loading = true;
        true
    }

    /// Generate `count` items, append them and clear the loading flag
    ///
    /// Returns the id range of the appended items.
    pub fn complete_load(
        &mut self,
        generator: &mut ContentGenerator,
        count: usize,
    ) -> (u64, u64) {
        let batch = generator.produce_batch(&mut self.ids, count);
        let first_id = batch.first().map(ContentItem::id).unwrap_or(self.ids.last());
        let last_id = self.ids.last();
        self.items.extend(batch);
        self.loading = false;
        (first_id, last_id)
    }

    /// Clear the loading flag without appending
    pub fn abort_load(&mut self) {
        self.loading = false;
    }
}

/// Result of a `load_batch` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The batch was appended; ids are inclusive
    Appended { first_id: u64, last_id: u64 },
    /// Another load was in flight, nothing happened
    Skipped,
}

struct FeedInner {
    state: FeedState,
    generator: ContentGenerator,
}

/// Clears the loading flag if a load future is dropped mid-delay
struct LoadGuard<'a> {
    pipeline: &'a FeedPipeline,
    armed: bool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("batch load dropped before completion");
            self.pipeline.lock().state.abort_load();
        }
    }
}

/// Shared handle to the feed of a session
///
/// Cloning is cheap; every clone sees the same sequence.
#[derive(Clone)]
pub struct FeedPipeline {
    inner: Arc<Mutex<FeedInner>>,
    latency: Duration,
    events: EventBus,
}

impl FeedPipeline {
    pub fn new(generator: ContentGenerator, latency: Duration, events: EventBus) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FeedInner {
                state: FeedState::new(),
                generator,
            })),
            latency,
            events,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Load and append `n` items after the simulated delay
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `n` is zero.
    pub async fn load_batch(&self, n: usize) -> Result<LoadOutcome> {
        if n == 0 {
            return Err(RetroScrollError::InvalidInput(
                "Batch size must be greater than zero".to_string(),
            ));
        }

        if !self.lock().state.begin_load() {
            tracing::debug!("batch load already in flight, skipping");
            self.events.emit(Event::BatchSkipped);
            return Ok(LoadOutcome::Skipped);
        }

        let mut guard = LoadGuard {
            pipeline: self,
            armed: true,
        };

        if self.latency.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.latency).await;
        }

        let (first_id, last_id, total) = {
            let mut inner = self.lock();
            let FeedInner { state, generator } = &mut *inner;
            let (first_id, last_id) = state.complete_load(generator, n);
            (first_id, last_id, state.len())
        };
        guard.armed = false;

        tracing::debug!(first_id, last_id, total, "batch appended");
        self.events.emit(Event::BatchLoaded {
            first_id,
            last_id,
            total,
        });

        Ok(LoadOutcome::Appended { first_id, last_id })
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> FeedState {
        self.lock().state.clone()
    }

    /// Render the current sequence
    pub fn render(&self) -> FeedView {
        render_feed(&self.lock().state)
    }

    pub fn len(&self) -> usize {
        self.lock().state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().state.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.is_loading()
    }
}
