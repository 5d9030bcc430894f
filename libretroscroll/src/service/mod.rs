//! Service layer for RetroScroll
//!
//! `RetroScrollService` owns every piece of session state and hands out
//! references to front ends. There are no globals: the feed, the stats,
//! the launcher and the router all live here.
//!
//! # Architecture
//!
//! - `FeedPipeline`: batch loading and rendering of the infinite feed
//! - `StatsEngine`: XP awards and persisted progress
//! - `GameLauncher`: catalog and the single active game session
//! - `ViewRouter`: which view is active
//! - `Scheduler`: timed effects (level-up banner, game parade)
//! - `EventBus`: notifications for front ends
//!
//! # Example
//!
//! ```no_run
//! use libretroscroll::router::View;
//! use libretroscroll::service::RetroScrollService;
//!
//! # async fn example() -> libretroscroll::Result<()> {
//! let mut service = RetroScrollService::new().await?;
//! service.initialize_feed().await?;
//!
//! service.open_view(View::Games);
//! service.launch_game("pacMan")?;
//! service.close_game()?;
//! # Ok(())
//! # }
//! ```

pub mod events;

use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use self::events::{Event, EventBus, EventReceiver};
use crate::content::ContentGenerator;
use crate::feed::{FeedPipeline, LoadOutcome, ScrollObserver};
use crate::games::{GameDescriptor, GameLauncher};
use crate::identity;
use crate::router::{Transition, View, ViewRouter};
use crate::schedule::{
    CancelHandle, Scheduler, LEVEL_UP_EFFECT_DURATION, LEVEL_UP_EFFECT_END, PARADE_INTERVAL,
    PARADE_STEP,
};
use crate::stats::{Award, StatsEngine};
use crate::storage::{FileStore, KeyValueStore, StorageKeys};
use crate::types::{Identity, StatsState};
use crate::{Config, Result, RetroScrollError};

/// XP granted for finishing a game session
pub const SESSION_XP: i64 = 10;

const EVENT_CAPACITY: usize = 256;

/// Main service facade
pub struct RetroScrollService {
    config: Config,
    keys: StorageKeys,
    identity: Identity,
    feed: FeedPipeline,
    observer: ScrollObserver,
    stats: StatsEngine,
    launcher: GameLauncher,
    router: ViewRouter,
    catalog: Vec<GameDescriptor>,
    scheduler: Scheduler,
    runtime: Handle,
    level_up_effect: Option<CancelHandle>,
    parade: Option<CancelHandle>,
    event_bus: EventBus,
}

impl RetroScrollService {
    /// Create a service from the default configuration location
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the storage
    /// directory cannot be created.
    pub async fn new() -> Result<Self> {
        let config = Config::load()?;
        Self::from_config(config).await
    }

    /// Create a service persisting to the configured storage directory
    pub async fn from_config(config: Config) -> Result<Self> {
        let store = FileStore::new(config.storage_path())?;
        Self::with_store(config, Arc::new(store)).await
    }

    /// Create a service over an explicit store (tests, ephemeral sessions)
    ///
    /// Must be called from within a tokio runtime; background work of the
    /// session is spawned on that runtime.
    pub async fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        config.validate()?;

        let keys = StorageKeys::new(&config.storage.namespace);
        let event_bus = EventBus::new(EVENT_CAPACITY);

        let mut identity_rng = match config.content.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)),
            None => ChaCha8Rng::from_entropy(),
        };
        let identity = identity::load_or_create(store.as_ref(), &keys.identity, &mut identity_rng)?;

        let feed = FeedPipeline::new(
            ContentGenerator::from_seed_option(config.content.seed),
            config.feed.latency(),
            event_bus.clone(),
        );
        let observer = ScrollObserver::new(config.feed.scroll_threshold);
        let stats = StatsEngine::load(Arc::clone(&store), keys.stats.clone(), event_bus.clone());
        let launcher = GameLauncher::with_placeholders(event_bus.clone());
        let runtime = Handle::try_current().map_err(|e| {
            RetroScrollError::InvalidInput(format!("service needs a tokio runtime: {}", e))
        })?;
        let scheduler = Scheduler::new(runtime.clone(), event_bus.clone());

        tracing::info!(
            backend = store.backend_name(),
            username = %identity.username,
            batch_size = config.feed.batch_size,
            "service initialized"
        );

        Ok(Self {
            config,
            keys,
            identity,
            feed,
            observer,
            stats,
            launcher,
            router: ViewRouter::new(),
            catalog: Vec::new(),
            scheduler,
            runtime,
            level_up_effect: None,
            parade: None,
            event_bus,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn feed(&self) -> &FeedPipeline {
        &self.feed
    }

    pub fn observer(&self) -> &ScrollObserver {
        &self.observer
    }

    pub fn stats(&self) -> &StatsState {
        self.stats.state()
    }

    pub fn launcher(&self) -> &GameLauncher {
        &self.launcher
    }

    pub fn current_view(&self) -> View {
        self.router.current()
    }

    /// Catalog shown in the games view, empty until first visited
    pub fn catalog(&self) -> &[GameDescriptor] {
        &self.catalog
    }

    /// Subscribe to service events
    pub fn subscribe(&self) -> EventReceiver {
        self.event_bus.subscribe()
    }

    /// Load the first batch of the session
    pub async fn initialize_feed(&self) -> Result<LoadOutcome> {
        self.feed.load_batch(self.config.feed.batch_size).await
    }

    /// Start a batch load that runs to completion even if nobody awaits it
    pub fn request_batch(&self) -> JoinHandle<Result<LoadOutcome>> {
        let feed = self.feed.clone();
        let batch_size = self.config.feed.batch_size;
        self.runtime
            .spawn(async move { feed.load_batch(batch_size).await })
    }

    /// Switch views, populating the catalog on the first visit to games
    pub fn open_view(&mut self, view: View) -> Transition {
        let transition = self.router.switch_to(view);

        if transition.populate_catalog {
            self.catalog = self.launcher.list_games();
            self.event_bus.emit(Event::CatalogPopulated {
                games: self.catalog.len(),
            });
        }

        if transition.from != transition.to {
            self.event_bus.emit(Event::ViewChanged {
                from: transition.from,
                to: transition.to,
            });
        }

        transition
    }

    /// Award XP; a level-up schedules the end of the level-up effect
    pub fn award_xp(&mut self, amount: i64) -> Result<Award> {
        let award = self.stats.award_xp(amount)?;

        if award.leveled_up {
            if let Some(previous) = self.level_up_effect.take() {
                previous.cancel();
            }
            self.level_up_effect = Some(
                self.scheduler
                    .after(LEVEL_UP_EFFECT_END, LEVEL_UP_EFFECT_DURATION),
            );
        }

        Ok(award)
    }

    pub fn launch_game(&mut self, game_id: &str) -> Result<()> {
        self.launcher.launch(game_id)?;
        Ok(())
    }

    /// Close the active game and award session XP
    ///
    /// Returns `None` when no game was running.
    pub fn close_game(&mut self) -> Result<Option<Award>> {
        if !self.launcher.close() {
            return Ok(None);
        }
        self.award_xp(SESSION_XP).map(Some)
    }

    /// Launch every catalog entry in turn, one per parade interval
    ///
    /// The front end reacts to each `parade_step` event by launching the
    /// catalog entry at index `seq`. A running parade is restarted.
    pub fn start_parade(&mut self) -> &CancelHandle {
        self.stop_parade();
        if self.catalog.is_empty() {
            self.catalog = self.launcher.list_games();
        }
        let steps = self.catalog.len() as u32;
        tracing::info!(steps, "game parade started");
        self.parade
            .insert(self.scheduler.every(PARADE_STEP, PARADE_INTERVAL, steps))
    }

    pub fn stop_parade(&mut self) {
        if let Some(parade) = self.parade.take() {
            parade.cancel();
        }
    }

    /// Catalog entry for a parade step
    pub fn parade_game(&self, seq: u32) -> Option<&GameDescriptor> {
        self.catalog.get(seq as usize)
    }
}

impl Drop for RetroScrollService {
    fn drop(&mut self) {
        self.stop_parade();
        if let Some(effect) = self.level_up_effect.take() {
            effect.cancel();
        }
    }
}
