//! Traits the host implements for media elements and the software adaptive-streaming client.
//!
//! The engine never talks to a real player. A browser binding wraps `HTMLVideoElement` and a
//! JavaScript streaming library behind these traits; tests use [`crate::testing`].

use crate::foundation::core::ElementId;
use crate::foundation::error::{EngineError, EngineResult};

/// Options handed to the software adaptive-streaming client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StreamingOptions {
    /// Run demuxing in a background worker.
    pub enable_worker: bool,
    /// Prefer the live edge and short buffers.
    pub low_latency: bool,
}

impl Default for StreamingOptions {
    fn default() -> Self {
        Self {
            enable_worker: false,
            low_latency: true,
        }
    }
}

/// One captured video frame, straight RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 pixels, `width * height * 4` bytes.
    pub data: Vec<u8>,
}

impl RgbaFrame {
    /// Check that the buffer matches the dimensions.
    pub fn validate(&self) -> EngineResult<()> {
        let expected_len = self.width as usize * self.height as usize * 4;
        if expected_len == 0 {
            return Err(EngineError::thumbnail_failed(
                "captured frame size is zero (video dimensions unknown)",
            ));
        }
        if self.data.len() != expected_len {
            return Err(EngineError::thumbnail_failed(format!(
                "captured frame has invalid size: got {} bytes, expected {expected_len}",
                self.data.len()
            )));
        }
        Ok(())
    }
}

/// How a play request settled when it did not succeed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayFailure {
    /// The request was cut short by a pause or a new load.
    Aborted,
    /// Decode, network or policy failure.
    Other(String),
}

impl From<PlayFailure> for EngineError {
    fn from(value: PlayFailure) -> Self {
        match value {
            PlayFailure::Aborted => {
                EngineError::playback_interrupted("play request aborted by pause")
            }
            PlayFailure::Other(msg) => EngineError::playback_error(msg),
        }
    }
}

/// A host video element.
///
/// `play` is asynchronous on every real platform; the host reports how it settled through
/// the owning component's `on_play_settled`.
pub trait MediaElement {
    /// Element identity, used to bind streaming clients.
    fn id(&self) -> ElementId;
    /// Point the element at a URL it can fetch on its own.
    fn set_src(&mut self, url: &str);
    /// Drop the current source and stop any network activity.
    fn clear_src(&mut self);
    /// Whether the element can play adaptive playlists without a software client.
    fn can_play_native_hls(&self) -> bool;
    /// Request a seek. Completion is reported as a "seeked" event.
    fn seek(&mut self, time_sec: f64);
    /// Playback position in seconds.
    fn current_time(&self) -> f64;
    /// Request playback. Failures arrive later as a [`PlayFailure`].
    fn play(&mut self);
    /// Pause playback.
    fn pause(&mut self);
    /// Whether playback is paused.
    fn is_paused(&self) -> bool;
    /// Intrinsic video size, once metadata has loaded.
    fn video_size(&self) -> Option<(u32, u32)>;
    /// Draw the current frame at intrinsic resolution into an offscreen raster.
    fn capture_frame(&mut self) -> EngineResult<RgbaFrame>;
}

/// One software adaptive-streaming session bound to a single element.
pub trait AdaptiveStreamingClient {
    /// Start loading the playlist at `manifest_url`.
    fn load_source(&mut self, manifest_url: &str);
    /// Bind the session to a media element.
    fn attach_media(&mut self, element: ElementId);
    /// Release buffers and network resources. Called exactly once per session.
    fn destroy(&mut self);
}

/// Factory for software adaptive-streaming sessions.
pub trait StreamingBackend {
    /// Whether the platform can run the software client at all.
    fn is_supported(&self) -> bool;
    /// Fresh client session configured with `options`.
    fn create_client(&mut self, options: &StreamingOptions) -> Box<dyn AdaptiveStreamingClient>;
}

/// Backend for platforms without a software client.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoStreaming;

impl StreamingBackend for NoStreaming {
    fn is_supported(&self) -> bool {
        false
    }

    fn create_client(&mut self, _options: &StreamingOptions) -> Box<dyn AdaptiveStreamingClient> {
        Box::new(NullClient)
    }
}

struct NullClient;

impl AdaptiveStreamingClient for NullClient {
    fn load_source(&mut self, _manifest_url: &str) {}
    fn attach_media(&mut self, _element: ElementId) {}
    fn destroy(&mut self) {}
}

#[cfg(test)]
#[path = "../../tests/unit/media/platform.rs"]
mod tests;
