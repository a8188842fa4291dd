//! Page-wide scroll read model.
//!
//! One [`ScrollSignal`] exists per page. It is created by the page and handed to every
//! consumer as a cloned handle; consumers only read from it and subscribe to it. The host
//! binding feeds it raw scroll/resize events and animation-frame ticks through a
//! [`ScrollHost`].

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::foundation::core::Viewport;
use crate::foundation::error::EngineResult;
use crate::foundation::math::clamp01;
use crate::scroll::region::{RegionBounds, RegionMap, RegionSpec};

/// Platform side of the scroll signal.
///
/// Implementations must not call back into the signal synchronously.
pub trait ScrollHost {
    /// Install the page's scroll and resize listeners.
    fn attach(&mut self);
    /// Remove the page's scroll and resize listeners.
    fn detach(&mut self);
    /// Schedule one animation-frame tick that ends in [`ScrollSignal::on_animation_frame`].
    fn request_frame(&mut self);
}

/// Host that does nothing; the embedder drives frames itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualScrollHost;

impl ScrollHost for ManualScrollHost {
    fn attach(&mut self) {}
    fn detach(&mut self) {}
    fn request_frame(&mut self) {}
}

/// What listeners receive on every dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrollEvent {
    /// Vertical scroll offset in CSS pixels.
    pub offset_y: f64,
    /// Current viewport.
    pub viewport: Viewport,
    /// Whole-document progress in `[0, 1]`.
    pub document_progress: f64,
    regions: BTreeMap<String, f64>,
}

impl ScrollEvent {
    /// Progress of region `name` at this offset.
    pub fn region_progress(&self, name: &str) -> Option<f64> {
        self.regions.get(name).copied()
    }
}

/// Handle returned by [`ScrollSignal::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ScrollEvent)>;

struct Inner {
    host: Box<dyn ScrollHost>,
    attached: bool,
    torn_down: bool,
    coalesce: bool,
    frame_pending: bool,
    dispatching: bool,
    offset_y: f64,
    viewport: Viewport,
    document_height: f64,
    regions: RegionMap,
    listeners: Vec<(ListenerId, Listener)>,
    removed: SmallVec<[ListenerId; 4]>,
    next_listener: u64,
}

impl Inner {
    fn document_progress(&self) -> f64 {
        let scrollable = self.document_height - self.viewport.height;
        if scrollable <= 0.0 {
            return 0.0;
        }
        clamp01(self.offset_y / scrollable)
    }

    // Returns whether to dispatch right away; otherwise at most one frame is requested.
    fn schedule(&mut self) -> bool {
        if !self.coalesce {
            return true;
        }
        if !self.frame_pending {
            self.frame_pending = true;
            self.host.request_frame();
        }
        false
    }

    fn event(&self) -> ScrollEvent {
        ScrollEvent {
            offset_y: self.offset_y,
            viewport: self.viewport,
            document_progress: self.document_progress(),
            regions: self.regions.snapshot(self.offset_y),
        }
    }
}

/// Shared scroll offset with derived region progress.
///
/// Cloning yields another handle to the same signal. Host listeners are installed when the
/// first consumer subscribes and removed by [`ScrollSignal::teardown`].
#[derive(Clone)]
pub struct ScrollSignal {
    inner: Rc<RefCell<Inner>>,
}

impl std::fmt::Debug for ScrollSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ScrollSignal")
            .field("offset_y", &inner.offset_y)
            .field("viewport", &inner.viewport)
            .field("listeners", &inner.listeners.len())
            .field("attached", &inner.attached)
            .finish()
    }
}

impl ScrollSignal {
    /// Signal that coalesces scroll events to one dispatch per animation frame.
    pub fn new(host: impl ScrollHost + 'static, viewport: Viewport) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                host: Box::new(host),
                attached: false,
                torn_down: false,
                coalesce: true,
                frame_pending: false,
                dispatching: false,
                offset_y: 0.0,
                viewport,
                document_height: viewport.height,
                regions: RegionMap::default(),
                listeners: Vec::new(),
                removed: SmallVec::new(),
                next_listener: 0,
            })),
        }
    }

    /// Dispatch synchronously inside every scroll event instead of once per frame.
    pub fn with_coalescing(self, coalesce: bool) -> Self {
        self.inner.borrow_mut().coalesce = coalesce;
        self
    }

    /// Register `listener`. The first subscription installs the host listeners.
    pub fn subscribe(&self, listener: impl FnMut(&ScrollEvent) + 'static) -> ListenerId {
        let mut inner = self.inner.borrow_mut();
        let id = ListenerId(inner.next_listener);
        inner.next_listener += 1;
        inner.listeners.push((id, Box::new(listener)));
        if !inner.attached && !inner.torn_down {
            inner.attached = true;
            inner.host.attach();
            tracing::debug!("scroll signal attached");
        }
        id
    }

    /// Remove `id`. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _)| *lid != id);
        let removed_now = inner.listeners.len() != before;
        if inner.dispatching {
            inner.removed.push(id);
            return true;
        }
        removed_now
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// Whether host listeners are currently installed.
    pub fn is_attached(&self) -> bool {
        self.inner.borrow().attached
    }

    /// Define or replace region `name`. Overlapping regions are rejected.
    pub fn define_region(&self, name: &str, spec: RegionSpec) -> EngineResult<()> {
        let mut inner = self.inner.borrow_mut();
        let height = inner.viewport.height;
        inner.regions.insert(name, spec, height)
    }

    /// Drop region `name`.
    pub fn remove_region(&self, name: &str) -> bool {
        self.inner.borrow_mut().regions.remove(name)
    }

    /// Pixel bounds of region `name` for the current viewport.
    pub fn region_bounds(&self, name: &str) -> Option<RegionBounds> {
        self.inner.borrow().regions.bounds(name)
    }

    /// Progress of region `name` at the current offset.
    pub fn region_progress(&self, name: &str) -> Option<f64> {
        let inner = self.inner.borrow();
        inner.regions.progress(name, inner.offset_y)
    }

    /// Current scroll offset.
    pub fn offset_y(&self) -> f64 {
        self.inner.borrow().offset_y
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    /// Whole-document progress `offset / (document_height - viewport_height)`, clamped.
    pub fn document_progress(&self) -> f64 {
        self.inner.borrow().document_progress()
    }

    /// Update the total document height used by [`ScrollSignal::document_progress`].
    pub fn set_document_height(&self, height: f64) {
        self.inner.borrow_mut().document_height = height.max(0.0);
    }

    /// Host scroll event.
    pub fn on_scroll(&self, offset_y: f64) {
        let dispatch_now = {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down {
                return;
            }
            inner.offset_y = offset_y;
            inner.schedule()
        };
        if dispatch_now {
            self.dispatch();
        }
    }

    /// Host animation-frame tick. Dispatches at most once per requested frame.
    pub fn on_animation_frame(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.frame_pending || inner.torn_down {
                return;
            }
            inner.frame_pending = false;
        }
        self.dispatch();
    }

    /// Host resize event. Region bounds depend on viewport height and are recomputed here;
    /// listeners hear about it on the same frame as any pending scroll.
    pub fn on_resize(&self, viewport: Viewport) {
        let dispatch_now = {
            let mut inner = self.inner.borrow_mut();
            if inner.torn_down {
                return;
            }
            inner.viewport = viewport;
            inner.document_height = inner.document_height.max(viewport.height);
            inner.regions.recompute(viewport.height);
            inner.schedule()
        };
        if dispatch_now {
            self.dispatch();
        }
    }

    /// Page unmount: drop every listener and remove the host listeners.
    pub fn teardown(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.attached {
            inner.host.detach();
            inner.attached = false;
        }
        inner.torn_down = true;
        inner.frame_pending = false;
        inner.listeners.clear();
        tracing::debug!("scroll signal torn down");
    }

    // Listeners run without the cell borrowed so they can query the signal or (un)subscribe.
    fn dispatch(&self) {
        let (event, mut listeners) = {
            let mut inner = self.inner.borrow_mut();
            if inner.dispatching {
                return;
            }
            inner.dispatching = true;
            (inner.event(), std::mem::take(&mut inner.listeners))
        };

        for (id, listener) in listeners.iter_mut() {
            if self.inner.borrow().removed.contains(id) {
                continue;
            }
            listener(&event);
        }

        let mut inner = self.inner.borrow_mut();
        inner.dispatching = false;
        let removed = std::mem::take(&mut inner.removed);
        listeners.retain(|(id, _)| !removed.contains(id));
        if inner.torn_down {
            listeners.clear();
        }
        let added = std::mem::take(&mut inner.listeners);
        listeners.extend(added);
        inner.listeners = listeners;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/signal.rs"]
mod tests;
