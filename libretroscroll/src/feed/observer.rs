//! Scroll-position observer
//!
//! Decides when the sentinel is visible enough to request the next batch.
//! Positions are in arbitrary units (rows in the terminal UI); only the
//! overlap ratio matters.

/// Visible window over the feed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub top: f64,
    pub height: f64,
}

/// Vertical extent of an observed element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollObserver {
    threshold: f64,
}

impl ScrollObserver {
    /// `threshold` is clamped into (0, 1]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(f64::EPSILON, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Fraction of `target` inside `viewport`, in [0, 1]
    pub fn visible_fraction(viewport: Viewport, target: Bounds) -> f64 {
        if target.height <= 0.0 || viewport.height <= 0.0 {
            return 0.0;
        }
        let top = viewport.top.max(target.top);
        let bottom = (viewport.top + viewport.height).min(target.top + target.height);
        ((bottom - top).max(0.0) / target.height).min(1.0)
    }

    /// Whether a load should be requested
    ///
    /// Fires when the target is at least `threshold` visible and no load
    /// is in flight.
    pub fn should_trigger(&self, viewport: Viewport, target: Bounds, loading: bool) -> bool {
        !loading && Self::visible_fraction(viewport, target) >= self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(top: f64, height: f64) -> Viewport {
        Viewport { top, height }
    }

    fn bounds(top: f64, height: f64) -> Bounds {
        Bounds { top, height }
    }

    #[test]
    fn test_fully_visible_and_hidden() {
        assert_eq!(
            ScrollObserver::visible_fraction(viewport(0.0, 10.0), bounds(5.0, 1.0)),
            1.0
        );
        assert_eq!(
            ScrollObserver::visible_fraction(viewport(0.0, 10.0), bounds(20.0, 1.0)),
            0.0
        );
    }

    #[test]
    fn test_partial_visibility() {
        let fraction = ScrollObserver::visible_fraction(viewport(0.0, 10.0), bounds(9.0, 2.0));
        assert!((fraction - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_threshold_boundary() {
        let observer = ScrollObserver::new(0.8);
        // 80% of a 10-unit sentinel visible
        assert!(observer.should_trigger(viewport(0.0, 18.0), bounds(10.0, 10.0), false));
        // 70% visible
        assert!(!observer.should_trigger(viewport(0.0, 17.0), bounds(10.0, 10.0), false));
    }

    #[test]
    fn test_no_trigger_while_loading() {
        let observer = ScrollObserver::new(0.8);
        assert!(!observer.should_trigger(viewport(0.0, 10.0), bounds(0.0, 1.0), true));
    }

    #[test]
    fn test_threshold_clamped() {
        assert_eq!(ScrollObserver::new(3.0).threshold(), 1.0);
        assert!(ScrollObserver::new(-1.0).threshold() > 0.0);
    }
}
