//! Showreel is the engine behind a scroll-driven video portfolio.
//!
//! It is headless and single-threaded. The host page owns the document, media elements and
//! event loop; it implements a few platform traits and forwards events, and the engine
//! decides what happens:
//!
//! - [`VisibilityTracker`] and [`StaggerScheduler`] sequence entrance reveals
//! - [`ScrollSignal`] and [`ColorInterpolator`] turn scroll position into page colours
//! - [`StreamingVideoSource`], [`ThumbnailExtractor`] and [`HoverPreviewController`] manage
//!   adaptive video tiles
//! - [`GalleryOrchestrator`] composes all of the above per gallery
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod color;
pub(crate) mod config;
pub(crate) mod gallery;
pub(crate) mod media;
pub(crate) mod runtime;
pub(crate) mod scroll;
pub(crate) mod viewport;

/// Deterministic fake platform for tests and demos.
pub mod testing;

pub use crate::foundation::core::{ElementId, Point, Rect, Size, TileKey, TimeMs, Viewport};
pub use crate::foundation::error::{EngineError, EngineResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::reveal::{RevealFrame, RevealSpec};
pub use crate::animation::stagger::{GridPosition, GridStagger, StaggerScheduler, delay_for};
pub use crate::color::interpolate::{
    ColorInterpolator, FOREGROUND_SWITCH, ForegroundPalette, ScenePalette,
};
pub use crate::color::value::Color;
pub use crate::config::{EngineConfig, HoverConfig, ThumbnailConfig};
pub use crate::gallery::model::{MediaKind, MediaTile, assign_keys, load_tiles_json};
pub use crate::gallery::orchestrator::{GalleryEvent, GalleryHost, GalleryOrchestrator, TileView};
pub use crate::media::hover::{HoverPreviewController, HoverState};
pub use crate::media::manifest::{HLS_MIME, SourceKind};
pub use crate::media::platform::{
    AdaptiveStreamingClient, MediaElement, NoStreaming, PlayFailure, RgbaFrame,
    StreamingBackend, StreamingOptions,
};
pub use crate::media::player::{AutoplayVideo, PlaybackRequest};
pub use crate::media::source::{Delivery, SourceState, StreamingVideoSource};
pub use crate::media::thumbnail::{
    ThumbnailCache, ThumbnailExtractor, ThumbnailStatus, encode_jpeg_data_uri,
};
pub use crate::runtime::timer::{TimerHost, TimerId, TimerQueue};
pub use crate::scroll::background::{DEFAULT_ACTIVATION_LINE, Section, SectionBackgrounds};
pub use crate::scroll::parallax::{ParallaxTransform, ScrollFactor};
pub use crate::scroll::region::{RegionBounds, RegionSpec};
pub use crate::scroll::signal::{
    ListenerId, ManualScrollHost, ScrollEvent, ScrollHost, ScrollSignal,
};
pub use crate::scroll::to_top::ScrollToTop;
pub use crate::viewport::visibility::{
    EnterCallback, ObserverOptions, RootMargin, ScopeId, ViewportEntry, VisibilityTracker,
    intersection_ratio,
};
