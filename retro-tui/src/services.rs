//! Service layer adapter for the TUI
//!
//! Bridges the async `RetroScrollService` to the synchronous event loop.
//!
//! # Architecture
//!
//! - `ServiceHandle`: owns the service and the tokio runtime it runs on
//! - Effects: the reducer's requests are performed by `perform`
//! - Events: the tokio broadcast channel is forwarded to crossbeam and
//!   translated into actions by `action_for`
//!
//! # Example
//!
//! ```no_run
//! use libretroscroll::Config;
//! use retro_tui::services::ServiceHandle;
//! use retro_tui::Effect;
//!
//! # fn example() -> retro_tui::Result<()> {
//! let mut services = ServiceHandle::new(Config::load()?)?;
//! let events = services.subscribe();
//!
//! services.perform(Effect::LoadMore);
//! if let Ok(event) = events.recv() {
//!     let _action = services.action_for(event);
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver};
use libretroscroll::schedule::{LEVEL_UP_EFFECT_END, PARADE_STEP};
use libretroscroll::service::events::Event;
use libretroscroll::service::SESSION_XP;
use libretroscroll::{Config, MemoryStore, RetroScrollService};
use tokio::runtime::Runtime;
use tokio::sync::broadcast::error::RecvError;

use crate::app::{reduce, Action, AppState, Effect};
use crate::error::Result;

/// Service handle for TUI operations
pub struct ServiceHandle {
    // Dropped before the runtime so pending schedules are cancelled first
    service: RetroScrollService,
    runtime: Runtime,
}

impl ServiceHandle {
    /// Service persisting to the configured storage directory
    pub fn new(config: Config) -> Result<Self> {
        let runtime = Runtime::new()?;
        let service = runtime.block_on(RetroScrollService::from_config(config))?;
        Ok(Self { service, runtime })
    }

    /// Service whose progress is forgotten on exit
    pub fn in_memory(config: Config) -> Result<Self> {
        let runtime = Runtime::new()?;
        let store = Arc::new(MemoryStore::new());
        let service = runtime.block_on(RetroScrollService::with_store(config, store))?;
        Ok(Self { service, runtime })
    }

    pub fn service(&self) -> &RetroScrollService {
        &self.service
    }

    /// Actions that seed the UI with the persisted profile
    pub fn boot_actions(&self) -> Vec<Action> {
        vec![Action::ProfileLoaded {
            username: self.service.identity().username.clone(),
            stats: self.service.stats().clone(),
        }]
    }

    /// Forward service events to a channel the sync loop can poll
    pub fn subscribe(&self) -> Receiver<Event> {
        let (tx, rx) = unbounded();
        let mut event_rx = self.service.subscribe();

        self.runtime.spawn(async move {
            loop {
                match event_rx.recv().await {
                    Ok(event) => {
                        if tx.send(event).is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Event receiver lagged, skipped {} events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        rx
    }

    /// Perform an effect queued by the reducer
    ///
    /// Returns follow-up actions for results known synchronously. Results
    /// that arrive later come back as service events.
    pub fn perform(&mut self, effect: Effect) -> Vec<Action> {
        match effect {
            Effect::LoadMore => {
                let task = self.service.request_batch();
                self.runtime.spawn(async move {
                    match task.await {
                        Ok(Ok(_)) => {}
                        Ok(Err(e)) => tracing::warn!(error = %e, "batch load failed"),
                        Err(e) => tracing::warn!(error = %e, "batch load task failed"),
                    }
                });
                Vec::new()
            }
            Effect::OpenView(view) => {
                self.service.open_view(view);
                Vec::new()
            }
            Effect::LaunchGame(game_id) => match self.service.launch_game(&game_id) {
                Ok(()) => Vec::new(),
                Err(e) => vec![Action::ShowError(e.to_string())],
            },
            Effect::CloseGame => match self.service.close_game() {
                Ok(Some(_)) => vec![
                    Action::StatsUpdated(self.service.stats().clone()),
                    Action::SetStatus(format!("+{} XP", SESSION_XP)),
                ],
                Ok(None) => Vec::new(),
                Err(e) => vec![Action::ShowError(e.to_string())],
            },
            Effect::StartParade => {
                self.service.start_parade();
                vec![Action::CatalogLoaded(self.service.catalog().to_vec())]
            }
            Effect::StopParade => {
                self.service.stop_parade();
                Vec::new()
            }
        }
    }

    /// Translate a service event into an action, if the UI cares
    pub fn action_for(&self, event: Event) -> Option<Action> {
        match event {
            Event::BatchLoaded { .. } => Some(Action::FeedUpdated(self.service.feed().render())),
            Event::LevelUp { level, .. } => Some(Action::LevelUp { level }),
            Event::GameLaunched { game_id, .. } => Some(Action::GameStarted(game_id)),
            Event::GameReleased { .. } => Some(Action::GameClosed),
            Event::CatalogPopulated { .. } => {
                Some(Action::CatalogLoaded(self.service.catalog().to_vec()))
            }
            Event::Scheduled { name, .. } if name == LEVEL_UP_EFFECT_END => {
                Some(Action::LevelUpEffectEnded)
            }
            Event::Scheduled { name, seq } if name == PARADE_STEP => Some(Action::ParadeStep(seq)),
            Event::Scheduled { .. } | Event::BatchSkipped | Event::ViewChanged { .. } => None,
        }
    }
}

/// Perform queued effects until none are left
///
/// Follow-up actions may queue further effects; those run too.
pub fn drain_effects(services: &mut ServiceHandle, mut state: AppState) -> AppState {
    while !state.effects.is_empty() {
        for effect in std::mem::take(&mut state.effects) {
            for action in services.perform(effect) {
                state = reduce(state, action);
            }
        }
    }
    state
}
