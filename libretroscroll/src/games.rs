//! Game catalog and session lifecycle
//!
//! Games are external collaborators behind `GameModule`. The launcher
//! only relies on one capability of what they return: `GameSession::release`.
//!
//! # Session ownership
//!
//! At most one session is active. `launch` releases the active session
//! before the next one mounts, and every session is wrapped in a
//! `SessionHandle` that runs the game's teardown at most once, including
//! when the handle is dropped.

use uuid::Uuid;

use crate::art;
use crate::error::{GameError, Result};
use crate::service::events::{Event, EventBus};

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDescriptor {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `data:image/svg+xml,...` URI
    pub thumbnail: String,
}

impl GameDescriptor {
    pub fn new(id: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            thumbnail: art::svg_data_uri(&art::game_thumbnail(id)),
        }
    }
}

/// The bundled games, in display order
pub fn default_catalog() -> Vec<GameDescriptor> {
    vec![
        GameDescriptor::new(
            "flappyCat",
            "Flappy Cat",
            "Tap/Space to fly. Avoid pipes. Earn XP!",
        ),
        GameDescriptor::new(
            "pacMan",
            "Pac-Man",
            "Eat dots, avoid ghosts. Arrow keys. XP for score.",
        ),
        GameDescriptor::new(
            "dinoRunner",
            "Dino Runner",
            "Jump over obstacles. Space/Up arrow.",
        ),
        GameDescriptor::new("numberMunchers", "Number Munchers", "Munch numbers! Arrow keys."),
    ]
}

/// Interaction surface handed to a game on mount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSurface {
    pub width: u32,
    pub height: u32,
    pub controls: Vec<String>,
}

impl Default for GameSurface {
    fn default() -> Self {
        Self {
            width: 400,
            height: 300,
            controls: vec!["←".to_string(), "→".to_string(), "Space".to_string()],
        }
    }
}

/// Resources held by a running game
pub trait GameSession: Send {
    /// Free the surface, listeners and timers of the session
    ///
    /// The launcher calls this at most once per session.
    fn release(&mut self);
}

/// A launchable game
pub trait GameModule: Send + Sync {
    fn descriptor(&self) -> &GameDescriptor;

    /// Start the game on `surface`
    fn mount(&self, surface: &GameSurface) -> Result<Box<dyn GameSession>>;
}

/// Game whose session holds nothing and only logs its teardown
pub struct PlaceholderGame {
    descriptor: GameDescriptor,
}

impl PlaceholderGame {
    pub fn new(descriptor: GameDescriptor) -> Self {
        Self { descriptor }
    }
}

struct PlaceholderSession {
    game_id: String,
}

impl GameSession for PlaceholderSession {
    fn release(&mut self) {
        tracing::debug!(game = %self.game_id, "game cleanup");
    }
}

impl GameModule for PlaceholderGame {
    fn descriptor(&self) -> &GameDescriptor {
        &self.descriptor
    }

    fn mount(&self, surface: &GameSurface) -> Result<Box<dyn GameSession>> {
        tracing::debug!(
            game = %self.descriptor.id,
            width = surface.width,
            height = surface.height,
            "placeholder game mounted"
        );
        Ok(Box::new(PlaceholderSession {
            game_id: self.descriptor.id.clone(),
        }))
    }
}

/// Exclusive owner of a mounted session
pub struct SessionHandle {
    id: Uuid,
    game_id: String,
    session: Box<dyn GameSession>,
    released: bool,
    events: EventBus,
}

impl SessionHandle {
    fn new(game_id: String, session: Box<dyn GameSession>, events: EventBus) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id,
            session,
            released: false,
            events,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Run the game's teardown unless it already ran
    ///
    /// Returns true if this call performed the release.
    pub fn release(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.session.release();
        self.released = true;

        tracing::info!(game = %self.game_id, session = %self.id, "game session released");
        self.events.emit(Event::GameReleased {
            game_id: self.game_id.clone(),
            session_id: self.id.to_string(),
        });
        true
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("id", &self.id)
            .field("game_id", &self.game_id)
            .field("released", &self.released)
            .finish()
    }
}

/// Catalog plus the single active session
pub struct GameLauncher {
    modules: Vec<Box<dyn GameModule>>,
    surface: GameSurface,
    active: Option<SessionHandle>,
    events: EventBus,
}

impl GameLauncher {
    pub fn new(modules: Vec<Box<dyn GameModule>>, events: EventBus) -> Self {
        Self {
            modules,
            surface: GameSurface::default(),
            active: None,
            events,
        }
    }

    /// Launcher over `default_catalog()` with placeholder games
    pub fn with_placeholders(events: EventBus) -> Self {
        let modules = default_catalog()
            .into_iter()
            .map(|descriptor| Box::new(PlaceholderGame::new(descriptor)) as Box<dyn GameModule>)
            .collect();
        Self::new(modules, events)
    }

    /// Catalog in registration order
    pub fn list_games(&self) -> Vec<GameDescriptor> {
        self.modules.iter().map(|m| m.descriptor().clone()).collect()
    }

    pub fn surface(&self) -> &GameSurface {
        &self.surface
    }

    pub fn active(&self) -> Option<&SessionHandle> {
        self.active.as_ref()
    }

    /// Mount `game_id`, releasing the active session first
    ///
    /// # Errors
    ///
    /// - `UnknownGame` if no module has that id; the active session is kept.
    /// - Whatever the module's `mount` returns; the previous session has
    ///   already been released at that point.
    pub fn launch(&mut self, game_id: &str) -> Result<&SessionHandle> {
        let module = self
            .modules
            .iter()
            .find(|m| m.descriptor().id == game_id)
            .ok_or_else(|| GameError::UnknownGame(game_id.to_string()))?;

        if let Some(mut previous) = self.active.take() {
            previous.release();
        }

        let session = module.mount(&self.surface)?;
        let handle = SessionHandle::new(game_id.to_string(), session, self.events.clone());

        tracing::info!(game = game_id, session = %handle.id(), "game launched");
        self.events.emit(Event::GameLaunched {
            game_id: game_id.to_string(),
            session_id: handle.id().to_string(),
        });

        let active: &SessionHandle = self.active.insert(handle);
        Ok(active)
    }

    /// Release the active session, if any. Returns whether one was active.
    pub fn close(&mut self) -> bool {
        match self.active.take() {
            Some(mut session) => {
                session.release();
                true
            }
            None => false,
        }
    }
}
