use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::foundation::core::{ElementId, Rect, Viewport};
use crate::foundation::error::{EngineError, EngineResult};

/// Fractions of the viewport height removed from the top and bottom of the observation root.
///
/// The defaults bias activation toward the upper half of the screen: an element near the
/// bottom edge has to scroll up a little before it counts as visible.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RootMargin {
    /// Shrink from the top edge, as a fraction of viewport height.
    pub top: f64,
    /// Shrink from the bottom edge, as a fraction of viewport height.
    pub bottom: f64,
}

impl Default for RootMargin {
    fn default() -> Self {
        Self {
            top: 0.05,
            bottom: 0.15,
        }
    }
}

/// Activation rule for a [`VisibilityTracker`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ObserverOptions {
    /// Minimum visible fraction of the element, in `[0, 1]`.
    pub threshold: f64,
    /// Root shrink applied before measuring.
    pub root_margin: RootMargin,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: RootMargin::default(),
        }
    }
}

impl ObserverOptions {
    /// Check value ranges.
    pub fn validate(&self) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(EngineError::config(format!(
                "visibility threshold must be within [0, 1], got {}",
                self.threshold
            )));
        }
        let RootMargin { top, bottom } = self.root_margin;
        if !(0.0..1.0).contains(&top) || !(0.0..1.0).contains(&bottom) || top + bottom >= 1.0 {
            return Err(EngineError::config(format!(
                "root margin must leave part of the viewport observable, got top={top} bottom={bottom}"
            )));
        }
        Ok(())
    }

    /// Observation root for `viewport`, in client coordinates.
    pub fn root_rect(&self, viewport: Viewport) -> Rect {
        let h = viewport.height;
        Rect::new(
            0.0,
            h * self.root_margin.top,
            viewport.width,
            h - h * self.root_margin.bottom,
        )
    }

    /// Whether a measured intersection ratio activates an element.
    pub fn activates(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// Visible fraction of `target` inside `root`.
///
/// Zero-area targets count as fully visible when they sit inside the root.
pub fn intersection_ratio(target: Rect, root: Rect) -> f64 {
    let area = target.area();
    if area <= 0.0 {
        let inside = target.x0 >= root.x0
            && target.x1 <= root.x1
            && target.y0 >= root.y0
            && target.y1 <= root.y1;
        return if inside { 1.0 } else { 0.0 };
    }
    let overlap = target.intersect(root);
    (overlap.area() / area).clamp(0.0, 1.0)
}

/// Owner of a group of observations, released together by [`VisibilityTracker::dispose`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(u64);

/// One-shot viewport entry record of an observed element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportEntry {
    /// Observed element.
    pub element: ElementId,
    /// Whether the element has entered the viewport. Never reverts to `false`.
    pub has_entered: bool,
}

/// Callback invoked once when an element first enters the viewport.
pub type EnterCallback = Box<dyn FnOnce(ElementId)>;

enum EntryState {
    Observing(EnterCallback),
    Entered,
}

struct Observation {
    scope: ScopeId,
    state: EntryState,
}

/// Tracks elements until they first become visible, then forgets their callbacks.
///
/// Intersections are fed in by the host, either as ratios already measured by the platform
/// ([`VisibilityTracker::on_intersection`]) or as raw layout rectangles
/// ([`VisibilityTracker::on_layout`]). Reports may arrive in any order across elements.
pub struct VisibilityTracker {
    options: ObserverOptions,
    next_scope: u64,
    observations: BTreeMap<ElementId, Observation>,
}

impl std::fmt::Debug for VisibilityTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityTracker")
            .field("options", &self.options)
            .field("observations", &self.observations.len())
            .field("pending", &self.pending_count())
            .finish()
    }
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new(ObserverOptions::default())
    }
}

impl VisibilityTracker {
    /// Tracker applying `options` to every observation.
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            next_scope: 0,
            observations: BTreeMap::new(),
        }
    }

    /// Activation rule in use.
    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    /// Allocate a fresh owner scope.
    pub fn scope(&mut self) -> ScopeId {
        let id = ScopeId(self.next_scope);
        self.next_scope += 1;
        id
    }

    /// Register a one-shot `on_enter` for `element` under `scope`.
    ///
    /// A missing element is skipped and reported as `false`. Observing an element that is
    /// already tracked keeps the existing registration; an element that already entered is
    /// never re-armed.
    pub fn observe(
        &mut self,
        scope: ScopeId,
        element: Option<ElementId>,
        on_enter: impl FnOnce(ElementId) + 'static,
    ) -> bool {
        let Some(element) = element else {
            let skipped = EngineError::observation_skipped("target element is not mounted");
            tracing::debug!(error = %skipped, "visibility observe skipped");
            return false;
        };
        if self.observations.contains_key(&element) {
            tracing::debug!(?element, "element is already observed");
            return false;
        }
        self.observations.insert(
            element,
            Observation {
                scope,
                state: EntryState::Observing(Box::new(on_enter)),
            },
        );
        true
    }

    /// Stop tracking `element`. Its callback never fires afterwards.
    pub fn unobserve(&mut self, element: ElementId) -> bool {
        self.observations.remove(&element).is_some()
    }

    /// Release every observation owned by `scope`. Returns how many were dropped.
    pub fn dispose(&mut self, scope: ScopeId) -> usize {
        let before = self.observations.len();
        self.observations.retain(|_, obs| obs.scope != scope);
        before - self.observations.len()
    }

    /// Report a platform-measured intersection ratio. Returns whether the callback fired.
    pub fn on_intersection(&mut self, element: ElementId, ratio: f64) -> bool {
        if !self.options.activates(ratio) {
            return false;
        }
        self.fire(element)
    }

    /// Measure `elements` (client-coordinate rectangles) against the margin-adjusted
    /// viewport. Returns the elements that entered during this call.
    pub fn on_layout(
        &mut self,
        viewport: Viewport,
        elements: impl IntoIterator<Item = (ElementId, Rect)>,
    ) -> SmallVec<[ElementId; 8]> {
        let root = self.options.root_rect(viewport);
        let mut entered = SmallVec::new();
        for (element, rect) in elements {
            let ratio = intersection_ratio(rect, root);
            if self.on_intersection(element, ratio) {
                entered.push(element);
            }
        }
        entered
    }

    /// Entry record for `element`, if it is tracked.
    pub fn entry(&self, element: ElementId) -> Option<ViewportEntry> {
        self.observations.get(&element).map(|obs| ViewportEntry {
            element,
            has_entered: matches!(obs.state, EntryState::Entered),
        })
    }

    /// Observations still waiting for their first entry.
    pub fn pending_count(&self) -> usize {
        self.observations
            .values()
            .filter(|obs| matches!(obs.state, EntryState::Observing(_)))
            .count()
    }

    fn fire(&mut self, element: ElementId) -> bool {
        let Some(obs) = self.observations.get_mut(&element) else {
            return false;
        };
        match std::mem::replace(&mut obs.state, EntryState::Entered) {
            EntryState::Observing(on_enter) => {
                on_enter(element);
                true
            }
            EntryState::Entered => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewport/visibility.rs"]
mod tests;
