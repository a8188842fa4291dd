use crate::foundation::error::{EngineError, EngineResult};
use crate::media::platform::{MediaElement, PlayFailure, StreamingBackend, StreamingOptions};
use crate::media::source::StreamingVideoSource;

/// Request to open a tile in the full player.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackRequest {
    /// Video to play.
    pub source_url: String,
    /// Title shown by the player.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A source that starts playing as soon as it is ready: the hero background and the
/// full-screen player.
///
/// Failures are logged and never surfaced; the host keeps showing whatever it shows.
#[derive(Debug)]
pub struct AutoplayVideo<E: MediaElement> {
    source: StreamingVideoSource<E>,
    started: bool,
}

impl<E: MediaElement> AutoplayVideo<E> {
    /// Player around `element`; nothing is attached yet.
    pub fn new(element: E) -> Self {
        Self {
            source: StreamingVideoSource::new(element),
            started: false,
        }
    }

    /// Underlying source.
    pub fn source(&self) -> &StreamingVideoSource<E> {
        &self.source
    }

    /// Whether `play` was issued for the current source.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Load `url`, replacing whatever was loaded.
    pub fn open(
        &mut self,
        url: &str,
        backend: &mut dyn StreamingBackend,
        options: &StreamingOptions,
    ) -> EngineResult<()> {
        self.started = false;
        self.source.attach(url, backend, options)
    }

    /// Forwarded manifest-parsed event. Returns whether playback started.
    pub fn on_manifest_parsed(&mut self) -> bool {
        self.source.on_manifest_parsed() && self.start()
    }

    /// Forwarded loaded-metadata event. Returns whether playback started.
    pub fn on_loaded_metadata(&mut self) -> bool {
        self.source.on_loaded_metadata() && self.start()
    }

    /// Report how the autoplay request settled. Autoplay policies commonly reject
    /// unmuted playback, so every failure is only logged.
    pub fn on_play_failed(&mut self, failure: PlayFailure) {
        let err = EngineError::from(failure);
        if err.is_expected() {
            tracing::debug!(error = %err, "autoplay interrupted");
        } else {
            tracing::warn!(error = %err, "autoplay failed");
        }
    }

    /// Stop and release the source. The player cannot be reopened afterwards.
    pub fn close(&mut self) {
        self.source.destroy();
        self.started = false;
    }

    fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.source.element_mut().play();
        self.started = true;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/player.rs"]
mod tests;
