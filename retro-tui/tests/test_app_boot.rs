//! Test application initialization
//!
//! Verifies the app boots into the feed with the defaults the
//! environment asks for.

use libretroscroll::config::DEFAULT_SCROLL_THRESHOLD;
use libretroscroll::router::View;
use retro_tui::app::{reduce, Action, AppState, Effect};
use serial_test::serial;

#[test]
fn test_app_initializes_to_feed() {
    let state = AppState::new();

    assert_eq!(state.current_view, View::Feed);
    assert!(!state.should_quit);
    assert!(!state.help_visible);
    assert!(state.error.is_none());
    assert!(state.effects.is_empty());
}

#[test]
fn test_feed_empty_on_boot() {
    let state = AppState::new();

    assert!(state.feed.view.cards.is_empty());
    assert_eq!(state.feed.scroll, 0);
    assert!(!state.feed.requested);
}

#[test]
fn test_no_game_or_banner_on_boot() {
    let state = AppState::new();

    assert!(!state.game_active());
    assert!(!state.games.parade);
    assert!(state.games.catalog.is_empty());
    assert_eq!(state.level_up, None);
}

#[test]
fn test_profile_loaded() {
    let mut stats = libretroscroll::StatsState::default();
    stats.xp = 230;
    stats.level = 3;

    let state = reduce(
        AppState::new(),
        Action::ProfileLoaded {
            username: "RetroRunner12".to_string(),
            stats,
        },
    );

    assert_eq!(state.profile.username, "RetroRunner12");
    assert_eq!(state.profile.stats.level, 3);
}

#[test]
fn test_first_resize_requests_initial_batch() {
    // An empty feed shows the sentinel right away
    let state = reduce(AppState::new(), Action::Resize(80, 30));

    assert_eq!(state.feed.viewport_rows, 22);
    assert_eq!(state.effects, vec![Effect::LoadMore]);
    assert!(state.feed.requested);
}

#[test]
fn test_threshold_from_config() {
    assert_eq!(
        AppState::new().config.scroll_threshold,
        DEFAULT_SCROLL_THRESHOLD
    );
    assert_eq!(AppState::with_threshold(0.5).config.scroll_threshold, 0.5);
}

#[test]
#[serial]
fn test_colors_disabled_with_no_color_env() {
    std::env::set_var("NO_COLOR", "1");
    let state = AppState::new();
    std::env::remove_var("NO_COLOR");

    assert!(!state.config.colors_enabled);
}

#[test]
#[serial]
fn test_colors_disabled_with_retroscroll_no_color_env() {
    std::env::set_var("RETROSCROLL_NO_COLOR", "1");
    let state = AppState::new();
    std::env::remove_var("RETROSCROLL_NO_COLOR");

    assert!(!state.config.colors_enabled);
}

#[test]
#[serial]
fn test_tick_rate_from_env() {
    std::env::set_var("RETROSCROLL_TUI_TICK_MS", "250");
    let state = AppState::new();
    std::env::remove_var("RETROSCROLL_TUI_TICK_MS");

    assert_eq!(state.config.tick_rate_ms, 250);
}

#[test]
#[serial]
fn test_tick_rate_default_100ms() {
    std::env::remove_var("RETROSCROLL_TUI_TICK_MS");
    let state = AppState::new();

    assert_eq!(state.config.tick_rate_ms, 100);
}
