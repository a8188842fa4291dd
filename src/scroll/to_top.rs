use crate::animation::ease::Ease;
use crate::foundation::core::TimeMs;
use crate::foundation::math::clamp01;

const DURATION_MS: u64 = 1200;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Flight {
    started: TimeMs,
    from: f64,
}

/// Floating "back to top" control: visibility rule plus an eased scroll animation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollToTop {
    flight: Option<Flight>,
}

impl ScrollToTop {
    /// Helper with no animation running.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shown once the page is scrolled past a third of the viewport.
    pub fn is_visible(offset_y: f64, viewport_height: f64) -> bool {
        offset_y > viewport_height / 3.0
    }

    /// Whether an animation is running.
    pub fn is_animating(&self) -> bool {
        self.flight.is_some()
    }

    /// Start scrolling from `offset_y` to zero. Ignored while already animating.
    pub fn trigger(&mut self, now: TimeMs, offset_y: f64) -> bool {
        if self.flight.is_some() || offset_y <= 0.0 {
            return false;
        }
        self.flight = Some(Flight {
            started: now,
            from: offset_y,
        });
        true
    }

    /// Offset the page should be scrolled to at `now`, or `None` when idle.
    /// The final tick returns `0.0` and ends the animation.
    pub fn tick(&mut self, now: TimeMs) -> Option<f64> {
        let flight = self.flight?;
        let t = clamp01(now.since(flight.started) as f64 / DURATION_MS as f64);
        if t >= 1.0 {
            self.flight = None;
            return Some(0.0);
        }
        Some(flight.from * (1.0 - Ease::OutCubic.apply(t)))
    }

    /// Abort a running animation, e.g. when the user scrolls manually.
    pub fn cancel(&mut self) {
        self.flight = None;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/to_top.rs"]
mod tests;
