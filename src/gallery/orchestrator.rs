//! Per-tile composition of visibility, stagger, streaming, thumbnails and hover previews.
//!
//! The host owns the event loop. It mounts a gallery, then forwards platform events for the
//! gallery's tiles (intersections, media readiness, seek completion, pointer and timer
//! events). Everything the page should render is read back through [`GalleryOrchestrator::view`]
//! and the event queue.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::animation::reveal::RevealFrame;
use crate::config::EngineConfig;
use crate::foundation::core::{ElementId, Rect, TileKey, TimeMs, Viewport};
use crate::foundation::error::{EngineError, EngineResult};
use crate::gallery::model::{MediaKind, MediaTile, assign_keys};
use crate::media::hover::{HoverPreviewController, HoverState};
use crate::media::platform::{MediaElement, PlayFailure, StreamingBackend};
use crate::media::player::PlaybackRequest;
use crate::media::source::{SourceState, StreamingVideoSource};
use crate::media::thumbnail::{ThumbnailCache, ThumbnailExtractor, ThumbnailStatus};
use crate::runtime::timer::{TimerHost, TimerId};
use crate::viewport::visibility::{ScopeId, VisibilityTracker};

/// Platform services a gallery needs.
pub trait GalleryHost {
    /// Video element type created for video tiles.
    type Video: MediaElement;

    /// Current time on the host clock.
    fn now(&self) -> TimeMs;
    /// Container element of tile `key`, or `None` when it is not in the document.
    fn container_element(&mut self, key: TileKey) -> Option<ElementId>;
    /// Fresh video element for tile `key`.
    fn create_video_element(&mut self, key: TileKey) -> Option<Self::Video>;
    /// Adaptive streaming support of the platform.
    fn streaming(&mut self) -> &mut dyn StreamingBackend;
    /// Recurring timers used by hover previews.
    fn timers(&mut self) -> &mut dyn TimerHost;
}

/// Something the page should react to, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
pub enum GalleryEvent {
    /// Tile entered the viewport; its entrance animation starts after `delay_sec`.
    Revealed {
        /// Tile.
        key: TileKey,
        /// Stagger delay in seconds.
        delay_sec: f64,
    },
    /// Image tile finished loading.
    ImageLoaded {
        /// Tile.
        key: TileKey,
    },
    /// Extracted thumbnail is available through the tile view.
    ThumbnailReady {
        /// Tile.
        key: TileKey,
    },
    /// Tile falls back to its poster.
    Fallback {
        /// Tile.
        key: TileKey,
        /// Display form of the error.
        reason: String,
    },
    /// Hover preview started playing.
    PreviewStarted {
        /// Tile.
        key: TileKey,
    },
    /// Hover preview stopped, by a leave, an error, a source switch or teardown.
    PreviewStopped {
        /// Tile.
        key: TileKey,
    },
}

/// Render-facing snapshot of one tile.
#[derive(Clone, Debug, PartialEq)]
pub struct TileView<'a> {
    /// Stable tile identity.
    pub key: TileKey,
    /// Position in display order.
    pub index: usize,
    /// Image or video.
    pub kind: MediaKind,
    /// Whether the tile entered the viewport.
    pub visible: bool,
    /// Stagger delay before the entrance animation.
    pub delay_sec: f64,
    /// Image to display: loaded image, extracted thumbnail or poster.
    pub image: Option<&'a str>,
    /// Whether an image tile finished loading.
    pub image_loaded: bool,
    /// Thumbnail status of a video tile.
    pub thumbnail: Option<ThumbnailStatus>,
    /// Streaming state of a video tile.
    pub source_state: Option<SourceState>,
    /// Hover preview state of a video tile.
    pub hover: Option<HoverState>,
    /// Whether hovering can start a preview.
    pub interactive: bool,
    /// Caption title.
    pub title: Option<&'a str>,
    /// Caption subtitle.
    pub subtitle: Option<&'a str>,
}

struct VideoParts<E: MediaElement> {
    source: StreamingVideoSource<E>,
    extractor: ThumbnailExtractor,
    hover: HoverPreviewController,
    thumbnail: ThumbnailCache,
    failed: bool,
    // Leave issued a seek back to the hover start that has not completed.
    resetting: bool,
    // The running extraction followed a leave; seek back to the hover start after capture.
    restore_start: bool,
}

impl<E: MediaElement> VideoParts<E> {
    fn new(element: E, tile: &MediaTile, config: &EngineConfig) -> Self {
        Self {
            source: StreamingVideoSource::new(element),
            extractor: ThumbnailExtractor::new(
                tile.thumbnail_timestamp
                    .unwrap_or(config.thumbnail.timestamp_sec),
                config.thumbnail.jpeg_quality,
            ),
            hover: HoverPreviewController::new(
                tile.hover_start_timestamp.unwrap_or(config.hover.start_sec),
                config.hover.loop_period_ms,
            ),
            thumbnail: ThumbnailCache::default(),
            failed: false,
            resetting: false,
            restore_start: false,
        }
    }

    fn fail(&mut self, timers: &mut dyn TimerHost) {
        self.failed = true;
        self.hover.cancel(timers);
        self.thumbnail.set_failed();
    }
}

struct TileSlot<E: MediaElement> {
    tile: MediaTile,
    index: usize,
    delay_sec: f64,
    container: Option<ElementId>,
    entered_at: Option<TimeMs>,
    image_loaded: bool,
    video: Option<VideoParts<E>>,
}

/// Drives every tile of one gallery.
///
/// Tiles are keyed by [`TileKey`], so reordering or inserting tiles keeps per-tile state.
/// Video sources attach at mount; thumbnails are only extracted for tiles that entered the
/// viewport and whose source is ready.
pub struct GalleryOrchestrator<E: MediaElement> {
    config: EngineConfig,
    tracker: VisibilityTracker,
    scope: ScopeId,
    entered: Rc<RefCell<Vec<TileKey>>>,
    containers: BTreeMap<ElementId, TileKey>,
    tiles: BTreeMap<TileKey, TileSlot<E>>,
    order: Vec<TileKey>,
    events: Vec<GalleryEvent>,
    torn_down: bool,
}

impl<E: MediaElement> std::fmt::Debug for GalleryOrchestrator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryOrchestrator")
            .field("tiles", &self.order.len())
            .field("tracker", &self.tracker)
            .field("pending_events", &self.events.len())
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

impl<E: MediaElement> GalleryOrchestrator<E> {
    /// Validate `config`, then mount `tiles`.
    #[tracing::instrument(skip(config, tiles, host), fields(tiles = tiles.len()))]
    pub fn mount<H>(config: EngineConfig, tiles: Vec<MediaTile>, host: &mut H) -> EngineResult<Self>
    where
        H: GalleryHost<Video = E>,
    {
        config.validate()?;
        let mut tracker = VisibilityTracker::new(config.visibility);
        let scope = tracker.scope();
        let mut gallery = Self {
            config,
            tracker,
            scope,
            entered: Rc::new(RefCell::new(Vec::new())),
            containers: BTreeMap::new(),
            tiles: BTreeMap::new(),
            order: Vec::new(),
            events: Vec::new(),
            torn_down: false,
        };
        gallery.set_tiles(tiles, host)?;
        Ok(gallery)
    }

    /// Configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Tile keys in display order.
    pub fn keys(&self) -> &[TileKey] {
        &self.order
    }

    /// Replace the tile list.
    ///
    /// Removed tiles are torn down. Kept tiles keep their state; a kept video tile whose URL
    /// changed switches manifests and starts a fresh thumbnail. New tiles are mounted.
    pub fn set_tiles<H>(&mut self, tiles: Vec<MediaTile>, host: &mut H) -> EngineResult<()>
    where
        H: GalleryHost<Video = E>,
    {
        if self.torn_down {
            return Err(EngineError::config("gallery was torn down"));
        }
        let keys = assign_keys(&tiles)?;

        let stale: Vec<TileKey> = self
            .tiles
            .iter()
            .filter(|(key, slot)| {
                let kept = keys
                    .iter()
                    .zip(&tiles)
                    .any(|(k, t)| k == *key && t.kind == slot.tile.kind);
                !kept
            })
            .map(|(key, _)| *key)
            .collect();
        for key in stale {
            if let Some(slot) = self.tiles.remove(&key) {
                self.release_slot(key, slot, host);
            }
        }

        self.order = keys.clone();
        for (index, (key, tile)) in keys.into_iter().zip(tiles).enumerate() {
            let delay_sec = self.config.stagger.delay_for(index);
            if let Some(slot) = self.tiles.get_mut(&key) {
                slot.index = index;
                slot.delay_sec = delay_sec;
                let url_changed = slot.tile.source_url != tile.source_url;
                slot.tile = tile;
                if url_changed {
                    self.switch_source(key, host);
                }
                continue;
            }
            self.mount_tile(key, index, delay_sec, tile, host);
        }
        Ok(())
    }

    fn mount_tile<H>(&mut self, key: TileKey, index: usize, delay_sec: f64, tile: MediaTile, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        let container = host.container_element(key);
        let inbox = Rc::clone(&self.entered);
        if self
            .tracker
            .observe(self.scope, container, move |_| inbox.borrow_mut().push(key))
        {
            if let Some(element) = container {
                self.containers.insert(element, key);
            }
        }

        let video = match tile.kind {
            MediaKind::Image => None,
            MediaKind::Video => match host.create_video_element(key) {
                Some(element) => {
                    let mut parts = VideoParts::new(element, &tile, &self.config);
                    if let Err(err) =
                        parts
                            .source
                            .attach(&tile.source_url, host.streaming(), &self.config.streaming)
                    {
                        parts.fail(host.timers());
                        self.fallback(key, &err);
                    }
                    Some(parts)
                }
                None => {
                    let err = EngineError::stream_attach_failed("video element is not mounted");
                    self.fallback(key, &err);
                    None
                }
            },
        };

        self.tiles.insert(
            key,
            TileSlot {
                tile,
                index,
                delay_sec,
                container,
                entered_at: None,
                image_loaded: false,
                video,
            },
        );
    }

    fn switch_source<H>(&mut self, key: TileKey, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        let Some(slot) = self.tiles.get_mut(&key) else {
            return;
        };
        let tile = &slot.tile;
        let Some(parts) = slot.video.as_mut() else {
            return;
        };
        let was_previewing = parts.hover.is_previewing();
        parts.hover.cancel(host.timers());
        let fresh_extractor = ThumbnailExtractor::new(
            tile.thumbnail_timestamp
                .unwrap_or(self.config.thumbnail.timestamp_sec),
            self.config.thumbnail.jpeg_quality,
        );
        parts.extractor = fresh_extractor;
        parts.hover = HoverPreviewController::new(
            tile.hover_start_timestamp
                .unwrap_or(self.config.hover.start_sec),
            self.config.hover.loop_period_ms,
        );
        parts.thumbnail = ThumbnailCache::default();
        parts.failed = false;
        parts.resetting = false;
        parts.restore_start = false;
        let result = parts
            .source
            .attach(&tile.source_url, host.streaming(), &self.config.streaming);
        if result.is_err() {
            parts.fail(host.timers());
        }
        if was_previewing {
            self.events.push(GalleryEvent::PreviewStopped { key });
        }
        if let Err(err) = result {
            self.fallback(key, &err);
        }
    }

    /// Platform-measured intersection ratio for a tile container.
    pub fn on_intersection<H>(&mut self, element: ElementId, ratio: f64, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        self.tracker.on_intersection(element, ratio);
        self.process_entered(host);
    }

    /// Layout pass: client rectangles of tile containers.
    pub fn on_layout<H>(
        &mut self,
        viewport: Viewport,
        rects: impl IntoIterator<Item = (ElementId, Rect)>,
        host: &mut H,
    ) where
        H: GalleryHost<Video = E>,
    {
        self.tracker.on_layout(viewport, rects);
        self.process_entered(host);
    }

    fn process_entered<H>(&mut self, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        let entered = std::mem::take(&mut *self.entered.borrow_mut());
        let now = host.now();
        for key in entered {
            let Some(slot) = self.tiles.get_mut(&key) else {
                continue;
            };
            if slot.entered_at.is_some() {
                continue;
            }
            slot.entered_at = Some(now);
            self.events.push(GalleryEvent::Revealed {
                key,
                delay_sec: slot.delay_sec,
            });
            self.try_extract(key);
        }
    }

    fn try_extract(&mut self, key: TileKey) {
        let Some(slot) = self.tiles.get_mut(&key) else {
            return;
        };
        if slot.entered_at.is_none() {
            return;
        }
        let Some(parts) = slot.video.as_mut() else {
            return;
        };
        if parts.failed
            || parts.resetting
            || parts.hover.is_previewing()
            || parts.thumbnail.status() != ThumbnailStatus::Pending
        {
            return;
        }
        if parts.extractor.start(&mut parts.source) {
            tracing::debug!(?key, "thumbnail extraction started");
        }
    }

    /// The tile's software client parsed its manifest.
    pub fn on_manifest_parsed<H>(&mut self, key: TileKey, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        let ready = self
            .video_mut(key)
            .is_some_and(|parts| parts.source.on_manifest_parsed());
        if ready {
            self.on_source_ready(key, host);
        }
    }

    /// The tile's video element loaded metadata.
    pub fn on_loaded_metadata<H>(&mut self, key: TileKey, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        let ready = self
            .video_mut(key)
            .is_some_and(|parts| parts.source.on_loaded_metadata());
        if ready {
            self.on_source_ready(key, host);
        }
    }

    fn on_source_ready<H>(&mut self, key: TileKey, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        self.try_extract(key);
        self.resume_hover(key, host);
    }

    fn resume_hover<H>(&mut self, key: TileKey, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        let started = self.video_mut(key).is_some_and(|parts| {
            !parts.failed
                && !parts.extractor.in_flight()
                && parts.hover.resume(&mut parts.source, host.timers())
        });
        if started {
            self.events.push(GalleryEvent::PreviewStarted { key });
        }
    }

    /// A seek on the tile's video element completed.
    #[tracing::instrument(skip(self, host))]
    pub fn on_seeked<H>(&mut self, key: TileKey, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        let Some(parts) = self.video_mut(key) else {
            return;
        };
        if parts.resetting && !parts.extractor.in_flight() {
            parts.resetting = false;
            self.try_extract(key);
            if let Some(parts) = self.video_mut(key) {
                parts.restore_start = parts.extractor.in_flight();
            }
            self.resume_hover(key, host);
            return;
        }
        let Some(result) = parts.extractor.on_seeked(&mut parts.source) else {
            self.resume_hover(key, host);
            return;
        };
        if std::mem::take(&mut parts.restore_start) && !parts.hover.is_previewing() {
            let start = parts.hover.start_sec();
            parts.source.element_mut().seek(start);
        }
        match result {
            Ok(data_uri) => {
                parts.thumbnail.set_ready(data_uri);
                self.events.push(GalleryEvent::ThumbnailReady { key });
            }
            Err(err) => {
                parts.thumbnail.set_failed();
                self.fallback(key, &err);
            }
        }
        self.resume_hover(key, host);
    }

    /// Media or streaming error on the tile's video.
    ///
    /// During thumbnail extraction this fails only the thumbnail. Otherwise the tile stops
    /// previewing for good and keeps its poster.
    pub fn on_media_error<H>(&mut self, key: TileKey, message: &str, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        let Some(parts) = self.video_mut(key) else {
            return;
        };
        if let Some(err) = parts.extractor.on_error(message) {
            parts.thumbnail.set_failed();
            self.fallback(key, &err);
            self.resume_hover(key, host);
            return;
        }
        if parts.failed {
            return;
        }
        let was_previewing = parts.hover.is_previewing();
        parts.fail(host.timers());
        parts.source.element_mut().pause();
        if was_previewing {
            self.events.push(GalleryEvent::PreviewStopped { key });
        }
        let err = EngineError::playback_error(message.to_owned());
        tracing::warn!(?key, error = %err, "video tile failed");
        self.fallback(key, &err);
    }

    /// Image tile finished loading.
    pub fn on_image_loaded(&mut self, key: TileKey) {
        let Some(slot) = self.tiles.get_mut(&key) else {
            return;
        };
        if slot.tile.kind == MediaKind::Image && !slot.image_loaded {
            slot.image_loaded = true;
            self.events.push(GalleryEvent::ImageLoaded { key });
        }
    }

    /// Pointer entered tile `key`. While a thumbnail seek is outstanding the preview is
    /// deferred until it completes.
    pub fn on_pointer_enter<H>(&mut self, key: TileKey, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        let started = self.video_mut(key).is_some_and(|parts| {
            if parts.failed {
                return false;
            }
            let available = !parts.extractor.in_flight();
            parts.hover.enter(&mut parts.source, host.timers(), available)
        });
        if started {
            self.events.push(GalleryEvent::PreviewStarted { key });
        }
    }

    /// Pointer left tile `key`. A pending thumbnail waits until the reset seek completes.
    pub fn on_pointer_leave<H>(&mut self, key: TileKey, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        let stopped = self.video_mut(key).is_some_and(|parts| {
            let stopped = parts.hover.leave(&mut parts.source, host.timers());
            parts.resetting |= stopped;
            stopped
        });
        if stopped {
            self.events.push(GalleryEvent::PreviewStopped { key });
        }
    }

    /// Recurring timer fired. Returns whether it belonged to this gallery.
    pub fn on_timer(&mut self, timer: TimerId) -> bool {
        self.tiles
            .values_mut()
            .filter_map(|slot| slot.video.as_mut())
            .any(|parts| parts.hover.on_timer(timer, &mut parts.source))
    }

    /// A hover play request on tile `key` settled unsuccessfully.
    pub fn on_play_failed<H>(&mut self, key: TileKey, failure: PlayFailure, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        let Some(parts) = self.video_mut(key) else {
            return;
        };
        let was_previewing = parts.hover.is_previewing();
        if let Err(err) = parts
            .hover
            .on_play_failed(failure, &mut parts.source, host.timers())
        {
            if was_previewing {
                self.events.push(GalleryEvent::PreviewStopped { key });
            }
            self.fallback(key, &err);
        }
    }

    /// Click on tile `key`. Video tiles open in the full player even when they failed.
    pub fn on_click(&self, key: TileKey) -> Option<PlaybackRequest> {
        let slot = self.tiles.get(&key)?;
        if slot.tile.kind != MediaKind::Video {
            return None;
        }
        Some(PlaybackRequest {
            source_url: slot.tile.source_url.clone(),
            title: slot.tile.title.clone(),
        })
    }

    /// Tile key owning container `element`.
    pub fn key_for_container(&self, element: ElementId) -> Option<TileKey> {
        self.containers.get(&element).copied()
    }

    /// Snapshot of tile `key`.
    pub fn view(&self, key: TileKey) -> Option<TileView<'_>> {
        let slot = self.tiles.get(&key)?;
        let tile = &slot.tile;
        let poster = tile.poster_url.as_deref();
        let (image, thumbnail, source_state, hover, interactive) = match &slot.video {
            None if tile.kind == MediaKind::Image => {
                (Some(tile.source_url.as_str()), None, None, None, false)
            }
            None => (poster, None, None, None, false),
            Some(parts) => (
                parts.thumbnail.display(poster),
                Some(parts.thumbnail.status()),
                Some(parts.source.state()),
                Some(parts.hover.state()),
                !parts.failed && !parts.hover.is_disabled(),
            ),
        };
        Some(TileView {
            key,
            index: slot.index,
            kind: tile.kind,
            visible: slot.entered_at.is_some(),
            delay_sec: slot.delay_sec,
            image,
            image_loaded: slot.image_loaded,
            thumbnail,
            source_state,
            hover,
            interactive,
            title: tile.title.as_deref(),
            subtitle: tile.subtitle.as_deref(),
        })
    }

    /// Views of every tile, in display order.
    pub fn views(&self) -> Vec<TileView<'_>> {
        self.order.iter().filter_map(|k| self.view(*k)).collect()
    }

    /// Entrance animation state of tile `key` at `now`.
    pub fn reveal_frame(&self, key: TileKey, now: TimeMs) -> Option<RevealFrame> {
        let slot = self.tiles.get(&key)?;
        let spec = &self.config.reveal;
        Some(match slot.entered_at {
            None => spec.initial_frame(),
            Some(at) => spec.sample(slot.delay_sec, now.since(at) as f64 / 1000.0),
        })
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<GalleryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Observations still waiting for their tile to appear.
    pub fn pending_observations(&self) -> usize {
        self.tracker.pending_count()
    }

    /// Dispose observers, cancel hover timers and destroy every video source.
    ///
    /// Running previews report [`GalleryEvent::PreviewStopped`]. Events queued before or
    /// during teardown stay drainable; nothing is queued afterwards.
    #[tracing::instrument(skip(self, host), fields(tiles = self.order.len()))]
    pub fn teardown<H>(&mut self, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        if self.torn_down {
            return;
        }
        self.tracker.dispose(self.scope);
        let tiles = std::mem::take(&mut self.tiles);
        for (key, slot) in tiles {
            self.release_slot(key, slot, host);
        }
        self.entered.borrow_mut().clear();
        self.containers.clear();
        self.order.clear();
        self.torn_down = true;
    }

    fn release_slot<H>(&mut self, key: TileKey, slot: TileSlot<E>, host: &mut H)
    where
        H: GalleryHost<Video = E>,
    {
        if let Some(element) = slot.container {
            self.tracker.unobserve(element);
            self.containers.remove(&element);
        }
        if let Some(mut parts) = slot.video {
            if parts.hover.is_previewing() {
                self.events.push(GalleryEvent::PreviewStopped { key });
            }
            parts.hover.cancel(host.timers());
            parts.source.destroy();
        }
    }

    fn video_mut(&mut self, key: TileKey) -> Option<&mut VideoParts<E>> {
        self.tiles.get_mut(&key)?.video.as_mut()
    }

    fn fallback(&mut self, key: TileKey, err: &EngineError) {
        if err.is_expected() {
            tracing::debug!(?key, error = %err, "tile falls back to poster");
        } else {
            tracing::warn!(?key, error = %err, "tile falls back to poster");
        }
        self.events.push(GalleryEvent::Fallback {
            key,
            reason: err.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gallery/orchestrator.rs"]
mod tests;
