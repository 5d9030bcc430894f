//! Pure reducer function for state transitions
//!
//! `(State, Action) -> State` with no I/O. Work that needs the service
//! layer is queued on `AppState::effects` and performed by the main loop.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use libretroscroll::feed::ScrollObserver;
use libretroscroll::router::View;

use super::actions::{Action, Effect};
use super::state::{AppState, FeedPane, GamesPane, ProfileState, StatusBarState, ARCADE_TRIGGER, CHROME_ROWS};

pub fn reduce(state: AppState, action: Action) -> AppState {
    match action {
        // === UI Events ===
        Action::Key(key) => handle_key(state, key),
        Action::Tick => state,
        Action::Resize(_, height) => {
            let viewport_rows = usize::from(height.saturating_sub(CHROME_ROWS).max(1));
            let state = AppState {
                feed: FeedPane {
                    viewport_rows,
                    ..state.feed
                },
                ..state
            };
            check_sentinel(clamp_scroll(state))
        }

        // === Navigation ===
        Action::NavigateTo(view) => {
            let state = with_effect(state, Effect::OpenView(view));
            let state = AppState {
                current_view: view,
                ..state
            };
            check_sentinel(state)
        }

        Action::Quit => AppState {
            should_quit: true,
            ..state
        },

        Action::ShowHelp => AppState {
            help_visible: true,
            ..state
        },

        Action::HideHelp => AppState {
            help_visible: false,
            ..state
        },

        // === Feed ===
        Action::Scroll(delta) => {
            let scroll = if delta < 0 {
                state.feed.scroll.saturating_sub(delta.unsigned_abs() as usize)
            } else {
                state.feed.scroll.saturating_add(delta as usize)
            };
            let state = AppState {
                feed: FeedPane {
                    scroll,
                    ..state.feed
                },
                ..state
            };
            check_sentinel(clamp_scroll(state))
        }

        Action::RequestMore => {
            if state.feed.requested || state.feed.view.loading {
                return state;
            }
            let state = with_effect(state, Effect::LoadMore);
            AppState {
                feed: FeedPane {
                    requested: true,
                    ..state.feed
                },
                ..state
            }
        }

        Action::FeedUpdated(view) => {
            let state = AppState {
                feed: FeedPane {
                    view,
                    requested: false,
                    ..state.feed
                },
                ..state
            };
            check_sentinel(clamp_scroll(state))
        }

        // === Profile ===
        Action::ProfileLoaded { username, stats } => AppState {
            profile: ProfileState { username, stats },
            ..state
        },

        Action::StatsUpdated(stats) => AppState {
            profile: ProfileState {
                stats,
                ..state.profile
            },
            ..state
        },

        Action::LevelUp { level } => AppState {
            level_up: Some(level),
            status: StatusBarState {
                message: Some(format!("Level up! You reached level {}", level)),
            },
            ..state
        },

        Action::LevelUpEffectEnded => AppState {
            level_up: None,
            ..state
        },

        // === Games ===
        Action::CatalogLoaded(catalog) => {
            let selected = state.games.selected.min(catalog.len().saturating_sub(1));
            AppState {
                games: GamesPane {
                    catalog,
                    selected,
                    ..state.games
                },
                ..state
            }
        }

        Action::SelectNext => {
            let last = state.games.catalog.len().saturating_sub(1);
            let selected = (state.games.selected + 1).min(last);
            AppState {
                games: GamesPane {
                    selected,
                    ..state.games
                },
                ..state
            }
        }

        Action::SelectPrev => {
            let selected = state.games.selected.saturating_sub(1);
            AppState {
                games: GamesPane {
                    selected,
                    ..state.games
                },
                ..state
            }
        }

        Action::LaunchSelected => match state.selected_game().map(|game| game.id.clone()) {
            Some(game_id) => with_effect(state, Effect::LaunchGame(game_id)),
            None => state,
        },

        Action::GameStarted(game_id) => AppState {
            games: GamesPane {
                active: Some(game_id),
                ..state.games
            },
            ..state
        },

        Action::GameClosed => AppState {
            games: GamesPane {
                active: None,
                ..state.games
            },
            ..state
        },

        Action::StartParade => {
            let state = with_effect(state, Effect::StartParade);
            AppState {
                games: GamesPane {
                    parade: true,
                    ..state.games
                },
                status: StatusBarState {
                    message: Some("Arcade parade!".to_string()),
                },
                ..state
            }
        }

        Action::ParadeStep(seq) => parade_step(state, seq as usize),

        // === Error Handling ===
        Action::ShowError(error) => AppState {
            error: Some(error),
            ..state
        },

        Action::DismissError => AppState { error: None, ..state },

        // === Status Bar ===
        Action::SetStatus(message) => AppState {
            status: StatusBarState {
                message: Some(message),
            },
            ..state
        },

        Action::ClearStatus => AppState {
            status: StatusBarState { message: None },
            ..state
        },
    }
}

fn with_effect(mut state: AppState, effect: Effect) -> AppState {
    state.effects.push(effect);
    state
}

fn clamp_scroll(state: AppState) -> AppState {
    let scroll = state.feed.scroll.min(state.max_scroll());
    AppState {
        feed: FeedPane {
            scroll,
            ..state.feed
        },
        ..state
    }
}

/// Request the next batch once the sentinel is visible enough
fn check_sentinel(state: AppState) -> AppState {
    if state.current_view != View::Feed {
        return state;
    }

    let observer = ScrollObserver::new(state.config.scroll_threshold);
    let loading = state.feed.requested || state.feed.view.loading;
    if observer.should_trigger(state.feed_viewport(), state.feed.view.sentinel.bounds(), loading) {
        reduce(state, Action::RequestMore)
    } else {
        state
    }
}

fn parade_step(state: AppState, seq: usize) -> AppState {
    if !state.games.parade {
        return state;
    }

    let Some(game_id) = state.games.catalog.get(seq).map(|game| game.id.clone()) else {
        return AppState {
            games: GamesPane {
                parade: false,
                ..state.games
            },
            ..state
        };
    };

    let finished = seq + 1 >= state.games.catalog.len();
    let state = with_effect(state, Effect::LaunchGame(game_id));
    AppState {
        games: GamesPane {
            selected: seq,
            parade: !finished,
            ..state.games
        },
        ..state
    }
}

/// Map keys to actions. Keybindings are defined here.
fn handle_key(state: AppState, key: KeyEvent) -> AppState {
    if key.kind != KeyEventKind::Press {
        return state;
    }

    // Global keybindings
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Char('q'), KeyModifiers::NONE) => {
            return reduce(state, Action::Quit);
        }

        (KeyCode::F(1), _) => {
            let action = if state.help_visible {
                Action::HideHelp
            } else {
                Action::ShowHelp
            };
            return reduce(state, action);
        }

        (KeyCode::Esc, _) if state.error.is_some() => {
            return reduce(state, Action::DismissError);
        }

        (KeyCode::Esc, _) if state.help_visible => {
            return reduce(state, Action::HideHelp);
        }

        (KeyCode::Esc, _) if state.game_active() || state.games.parade => {
            return close_game(state);
        }

        _ => {}
    }

    // Overlays and running games take every other key
    if state.help_visible || state.error.is_some() || state.game_active() {
        return state;
    }

    let plain = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

    let state = match key.code {
        KeyCode::Char(c) if plain => track_typed(state, c),
        _ => state,
    };

    match key.code {
        KeyCode::Char('f') if plain => reduce(state, Action::NavigateTo(View::Feed)),
        KeyCode::Char('g') if plain => reduce(state, Action::NavigateTo(View::Games)),
        KeyCode::Char('i') if plain => reduce(state, Action::NavigateTo(View::About)),
        _ => match state.current_view {
            View::Feed => handle_feed_key(state, key),
            View::Games => handle_games_key(state, key),
            View::About => state,
        },
    }
}

fn handle_feed_key(state: AppState, key: KeyEvent) -> AppState {
    let page = state.feed.viewport_rows as i64;
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => reduce(state, Action::Scroll(1)),
        KeyCode::Up | KeyCode::Char('k') => reduce(state, Action::Scroll(-1)),
        KeyCode::PageDown => reduce(state, Action::Scroll(page)),
        KeyCode::PageUp => reduce(state, Action::Scroll(-page)),
        KeyCode::Home => {
            let top = state.feed.scroll as i64;
            reduce(state, Action::Scroll(-top))
        }
        KeyCode::End => {
            let bottom = state.max_scroll() as i64 - state.feed.scroll as i64;
            reduce(state, Action::Scroll(bottom))
        }
        _ => state,
    }
}

fn handle_games_key(state: AppState, key: KeyEvent) -> AppState {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => reduce(state, Action::SelectNext),
        KeyCode::Up | KeyCode::Char('k') => reduce(state, Action::SelectPrev),
        KeyCode::Enter => reduce(state, Action::LaunchSelected),
        _ => state,
    }
}

/// Esc while a game runs: stop the parade and release the session
fn close_game(state: AppState) -> AppState {
    let mut state = state;
    if state.games.parade {
        state.effects.push(Effect::StopParade);
        state.games.parade = false;
    }
    if state.game_active() {
        state.effects.push(Effect::CloseGame);
    }
    state
}

/// Append to the bounded key buffer; completing the trigger word starts the parade
fn track_typed(state: AppState, c: char) -> AppState {
    let mut key_buffer = state.key_buffer;
    key_buffer.push(c);

    let excess = key_buffer
        .chars()
        .count()
        .saturating_sub(ARCADE_TRIGGER.chars().count());
    if excess > 0 {
        key_buffer = key_buffer.chars().skip(excess).collect();
    }

    if key_buffer == ARCADE_TRIGGER {
        let state = AppState {
            key_buffer: String::new(),
            ..state
        };
        reduce(state, Action::StartParade)
    } else {
        AppState { key_buffer, ..state }
    }
}
