//! View routing
//!
//! Three views, every one reachable from every other. The only state
//! beyond the current view is whether the game catalog has been
//! populated: the first entry into `games` asks for it, later entries
//! do not.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Feed,
    Games,
    About,
}

impl View {
    pub const ALL: [View; 3] = [View::Feed, View::Games, View::About];

    pub fn title(&self) -> &'static str {
        match self {
            View::Feed => "Feed",
            View::Games => "Games",
            View::About => "About",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Feed => write!(f, "feed"),
            View::Games => write!(f, "games"),
            View::About => write!(f, "about"),
        }
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feed" => Ok(View::Feed),
            "games" => Ok(View::Games),
            "about" => Ok(View::About),
            _ => Err(format!(
                "Unknown view: '{}'. Valid options: feed, games, about",
                s
            )),
        }
    }
}

/// Outcome of a `switch_to` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: View,
    pub to: View,
    /// True exactly once per session, on the first entry into `games`
    pub populate_catalog: bool,
}

#[derive(Debug, Clone)]
pub struct ViewRouter {
    current: View,
    catalog_populated: bool,
}

impl Default for ViewRouter {
    fn default() -> Self {
        Self {
            current: View::Feed,
            catalog_populated: false,
        }
    }
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> View {
        self.current
    }

    pub fn catalog_populated(&self) -> bool {
        self.catalog_populated
    }

    /// Activate `view`. Switching to the current view is allowed.
    pub fn switch_to(&mut self, view: View) -> Transition {
        let from = self.current;
        self.current = view;

        let populate_catalog = view == View::Games && !self.catalog_populated;
        if populate_catalog {
            self.catalog_populated = true;
        }

        tracing::debug!(%from, to = %view, populate_catalog, "view switched");

        Transition {
            from,
            to: view,
            populate_catalog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_feed() {
        let router = ViewRouter::new();
        assert_eq!(router.current(), View::Feed);
        assert!(!router.catalog_populated());
    }

    #[test]
    fn test_catalog_populated_once() {
        let mut router = ViewRouter::new();

        let first = router.switch_to(View::Games);
        assert!(first.populate_catalog);

        router.switch_to(View::Feed);
        let second = router.switch_to(View::Games);
        assert!(!second.populate_catalog);

        let again = router.switch_to(View::Games);
        assert!(!again.populate_catalog);
    }

    #[test]
    fn test_every_view_reachable_from_every_other() {
        let mut router = ViewRouter::new();
        for from in View::ALL {
            for to in View::ALL {
                router.switch_to(from);
                let transition = router.switch_to(to);
                assert_eq!(transition.from, from);
                assert_eq!(transition.to, to);
                assert_eq!(router.current(), to);
            }
        }
    }

    #[test]
    fn test_view_parse_and_display() {
        for view in View::ALL {
            assert_eq!(view.to_string().parse::<View>().unwrap(), view);
        }
        assert_eq!("GAMES".parse::<View>().unwrap(), View::Games);
        assert!("settings".parse::<View>().is_err());
    }
}
