//! Deterministic in-memory platform for tests and demos.
//!
//! Every fake records the calls the engine makes so scenarios can assert exact sequences.
//! Handles are cheap clones sharing the same recorded state.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::foundation::core::{ElementId, TileKey, TimeMs};
use crate::foundation::error::{EngineError, EngineResult};
use crate::gallery::orchestrator::GalleryHost;
use crate::media::platform::{
    AdaptiveStreamingClient, MediaElement, RgbaFrame, StreamingBackend, StreamingOptions,
};
use crate::runtime::timer::{TimerHost, TimerId, TimerQueue};

/// One call made on a [`FakeVideo`].
#[derive(Clone, Debug, PartialEq)]
pub enum VideoCall {
    /// Direct source assignment.
    SetSrc(String),
    /// Source removed.
    ClearSrc,
    /// Seek to seconds.
    Seek(f64),
    /// Play request.
    Play,
    /// Pause request.
    Pause,
    /// Frame capture.
    Capture,
}

#[derive(Debug)]
struct FakeVideoState {
    calls: Vec<VideoCall>,
    native_hls: bool,
    current_time: f64,
    paused: bool,
    size: Option<(u32, u32)>,
    capture_error: Option<String>,
}

/// Recording [`MediaElement`].
#[derive(Clone, Debug)]
pub struct FakeVideo {
    id: ElementId,
    state: Rc<RefCell<FakeVideoState>>,
}

impl FakeVideo {
    /// A 4x2 video without native adaptive playback.
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            state: Rc::new(RefCell::new(FakeVideoState {
                calls: Vec::new(),
                native_hls: false,
                current_time: 0.0,
                paused: true,
                size: Some((4, 2)),
                capture_error: None,
            })),
        }
    }

    /// Report native adaptive playback support.
    pub fn with_native_hls(self, native: bool) -> Self {
        self.state.borrow_mut().native_hls = native;
        self
    }

    /// Intrinsic video size; `None` before metadata.
    pub fn with_size(self, size: Option<(u32, u32)>) -> Self {
        self.state.borrow_mut().size = size;
        self
    }

    /// Make every later capture fail with `msg`.
    pub fn fail_capture(&self, msg: &str) {
        self.state.borrow_mut().capture_error = Some(msg.to_owned());
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<VideoCall> {
        self.state.borrow().calls.clone()
    }

    /// Forget recorded calls.
    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Every seek target, in order.
    pub fn seeks(&self) -> Vec<f64> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                VideoCall::Seek(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    /// How often `call` was recorded.
    pub fn count(&self, call: &VideoCall) -> usize {
        self.state.borrow().calls.iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: VideoCall) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl MediaElement for FakeVideo {
    fn id(&self) -> ElementId {
        self.id
    }

    fn set_src(&mut self, url: &str) {
        self.record(VideoCall::SetSrc(url.to_owned()));
    }

    fn clear_src(&mut self) {
        self.record(VideoCall::ClearSrc);
    }

    fn can_play_native_hls(&self) -> bool {
        self.state.borrow().native_hls
    }

    fn seek(&mut self, time_sec: f64) {
        self.record(VideoCall::Seek(time_sec));
        self.state.borrow_mut().current_time = time_sec;
    }

    fn current_time(&self) -> f64 {
        self.state.borrow().current_time
    }

    fn play(&mut self) {
        self.record(VideoCall::Play);
        self.state.borrow_mut().paused = false;
    }

    fn pause(&mut self) {
        self.record(VideoCall::Pause);
        self.state.borrow_mut().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn video_size(&self) -> Option<(u32, u32)> {
        self.state.borrow().size
    }

    fn capture_frame(&mut self) -> EngineResult<RgbaFrame> {
        self.record(VideoCall::Capture);
        let state = self.state.borrow();
        if let Some(msg) = &state.capture_error {
            return Err(EngineError::thumbnail_failed(msg.clone()));
        }
        let (width, height) = state.size.unwrap_or((0, 0));
        let data = (0..width * height)
            .flat_map(|i| {
                let v = (i * 37 % 256) as u8;
                [v, 255 - v, 128, 255]
            })
            .collect();
        Ok(RgbaFrame {
            width,
            height,
            data,
        })
    }
}

/// One event in the adaptive-session log of a [`FakeStreaming`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// Client session created.
    Created(u64),
    /// Session loaded a manifest.
    Load(u64, String),
    /// Session bound to an element.
    Attach(u64, ElementId),
    /// Session destroyed.
    Destroy(u64),
}

/// Recording [`StreamingBackend`].
#[derive(Clone, Debug)]
pub struct FakeStreaming {
    supported: bool,
    next: Rc<Cell<u64>>,
    log: Rc<RefCell<Vec<SessionEvent>>>,
    options: Rc<RefCell<Vec<StreamingOptions>>>,
}

impl Default for FakeStreaming {
    fn default() -> Self {
        Self::supported()
    }
}

impl FakeStreaming {
    /// Backend with software adaptive streaming.
    pub fn supported() -> Self {
        Self {
            supported: true,
            next: Rc::new(Cell::new(0)),
            log: Rc::new(RefCell::new(Vec::new())),
            options: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Backend without software adaptive streaming.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::supported()
        }
    }

    /// Session events in order.
    pub fn events(&self) -> Vec<SessionEvent> {
        self.log.borrow().clone()
    }

    /// Options passed to every created session, in order.
    pub fn options_seen(&self) -> Vec<StreamingOptions> {
        self.options.borrow().clone()
    }

    /// Sessions created so far.
    pub fn created(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|e| matches!(e, SessionEvent::Created(_)))
            .count()
    }

    /// Sessions destroyed so far.
    pub fn destroyed(&self) -> usize {
        self.log
            .borrow()
            .iter()
            .filter(|e| matches!(e, SessionEvent::Destroy(_)))
            .count()
    }

    /// Sessions created and not yet destroyed.
    pub fn live_sessions(&self) -> usize {
        self.created().saturating_sub(self.destroyed())
    }
}

struct FakeClient {
    id: u64,
    log: Rc<RefCell<Vec<SessionEvent>>>,
}

impl AdaptiveStreamingClient for FakeClient {
    fn load_source(&mut self, manifest_url: &str) {
        self.log
            .borrow_mut()
            .push(SessionEvent::Load(self.id, manifest_url.to_owned()));
    }

    fn attach_media(&mut self, element: ElementId) {
        self.log
            .borrow_mut()
            .push(SessionEvent::Attach(self.id, element));
    }

    fn destroy(&mut self) {
        self.log.borrow_mut().push(SessionEvent::Destroy(self.id));
    }
}

impl StreamingBackend for FakeStreaming {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn create_client(&mut self, options: &StreamingOptions) -> Box<dyn AdaptiveStreamingClient> {
        let id = self.next.get();
        self.next.set(id + 1);
        self.log.borrow_mut().push(SessionEvent::Created(id));
        self.options.borrow_mut().push(*options);
        Box::new(FakeClient {
            id,
            log: Rc::clone(&self.log),
        })
    }
}

/// In-memory [`GalleryHost`] with virtual time.
#[derive(Debug)]
pub struct FakeGalleryHost {
    timers: TimerQueue,
    streaming: FakeStreaming,
    native_hls: bool,
    next_element: u64,
    containers: BTreeMap<TileKey, ElementId>,
    videos: BTreeMap<TileKey, FakeVideo>,
    unmounted: BTreeSet<TileKey>,
}

impl Default for FakeGalleryHost {
    fn default() -> Self {
        Self::new(FakeStreaming::supported())
    }
}

impl FakeGalleryHost {
    /// Host at time zero using `streaming`.
    pub fn new(streaming: FakeStreaming) -> Self {
        Self {
            timers: TimerQueue::new(TimeMs(0)),
            streaming,
            native_hls: false,
            next_element: 1,
            containers: BTreeMap::new(),
            videos: BTreeMap::new(),
            unmounted: BTreeSet::new(),
        }
    }

    /// Video elements created from now on report native adaptive support.
    pub fn with_native_hls(mut self, native: bool) -> Self {
        self.native_hls = native;
        self
    }

    /// Pretend the container of `key` is not in the document.
    pub fn unmount_container(&mut self, key: TileKey) {
        self.unmounted.insert(key);
    }

    /// Streaming backend, for assertions.
    pub fn streaming_log(&self) -> &FakeStreaming {
        &self.streaming
    }

    /// Container element handed out for `key`.
    pub fn container(&self, key: TileKey) -> Option<ElementId> {
        self.containers.get(&key).copied()
    }

    /// Video element handed out for `key`.
    pub fn video(&self, key: TileKey) -> Option<FakeVideo> {
        self.videos.get(&key).cloned()
    }

    /// Armed recurring timers.
    pub fn active_timers(&self) -> usize {
        self.timers.active_count()
    }

    /// Advance virtual time and return the timers that fired.
    pub fn advance_to(&mut self, now: TimeMs) -> Vec<TimerId> {
        self.timers.advance_to(now)
    }

    fn element(&mut self) -> ElementId {
        let id = ElementId(self.next_element);
        self.next_element += 1;
        id
    }
}

impl GalleryHost for FakeGalleryHost {
    type Video = FakeVideo;

    fn now(&self) -> TimeMs {
        self.timers.now()
    }

    fn container_element(&mut self, key: TileKey) -> Option<ElementId> {
        if self.unmounted.contains(&key) {
            return None;
        }
        if let Some(id) = self.containers.get(&key) {
            return Some(*id);
        }
        let id = self.element();
        self.containers.insert(key, id);
        Some(id)
    }

    fn create_video_element(&mut self, key: TileKey) -> Option<FakeVideo> {
        if self.unmounted.contains(&key) {
            return None;
        }
        let id = self.element();
        let video = FakeVideo::new(id).with_native_hls(self.native_hls);
        self.videos.insert(key, video.clone());
        Some(video)
    }

    fn streaming(&mut self) -> &mut dyn StreamingBackend {
        &mut self.streaming
    }

    fn timers(&mut self) -> &mut dyn TimerHost {
        &mut self.timers
    }
}
