use crate::foundation::error::{EngineError, EngineResult};
use crate::media::manifest::SourceKind;
use crate::media::platform::{
    AdaptiveStreamingClient, MediaElement, StreamingBackend, StreamingOptions,
};

/// Lifecycle of a [`StreamingVideoSource`].
///
/// ```text
/// Unattached --attach--> Loading --manifest parsed / metadata--> Ready
///      \__________________\___________________________________\__destroy--> Destroyed
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum SourceState {
    /// No source bound to the element.
    Unattached,
    /// Source bound, waiting for the manifest or metadata.
    Loading,
    /// Frames can be sought and played.
    Ready,
    /// Released for good.
    Destroyed,
}

/// Which path feeds the element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum Delivery {
    /// Software adaptive client bound to the element.
    SoftwareAdaptive,
    /// The element plays the playlist itself.
    NativeAdaptive,
    /// Plain file URL.
    Progressive,
}

/// A video element together with at most one adaptive-streaming session.
///
/// The source owns the element. Any session is destroyed before a new manifest is attached
/// and when the source is destroyed or dropped.
pub struct StreamingVideoSource<E: MediaElement> {
    element: E,
    state: SourceState,
    manifest_url: Option<String>,
    delivery: Option<Delivery>,
    session: Option<Box<dyn AdaptiveStreamingClient>>,
}

impl<E: MediaElement> std::fmt::Debug for StreamingVideoSource<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingVideoSource")
            .field("element", &self.element.id())
            .field("state", &self.state)
            .field("manifest_url", &self.manifest_url)
            .field("delivery", &self.delivery)
            .field("has_session", &self.session.is_some())
            .finish()
    }
}

impl<E: MediaElement> StreamingVideoSource<E> {
    /// Unattached source owning `element`.
    pub fn new(element: E) -> Self {
        Self {
            element,
            state: SourceState::Unattached,
            manifest_url: None,
            delivery: None,
            session: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SourceState {
        self.state
    }

    /// Whether the source can seek and play.
    pub fn is_ready(&self) -> bool {
        self.state == SourceState::Ready
    }

    /// URL of the current attachment.
    pub fn manifest_url(&self) -> Option<&str> {
        self.manifest_url.as_deref()
    }

    /// Path chosen by the last successful attach.
    pub fn delivery(&self) -> Option<Delivery> {
        self.delivery
    }

    /// Whether a software streaming session is live.
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Owned media element.
    pub fn element(&self) -> &E {
        &self.element
    }

    /// Owned media element, mutably.
    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// Bind `manifest_url` to the element.
    ///
    /// Adaptive playlists prefer the software client when the backend supports it, then
    /// native playback; with neither available the attach fails and the source stays
    /// `Unattached`. Any previous session is destroyed first.
    #[tracing::instrument(skip(self, backend, options), fields(element = ?self.element.id()))]
    pub fn attach(
        &mut self,
        manifest_url: &str,
        backend: &mut dyn StreamingBackend,
        options: &StreamingOptions,
    ) -> EngineResult<()> {
        if self.state == SourceState::Destroyed {
            return Err(EngineError::stream_attach_failed(
                "video source was already destroyed",
            ));
        }
        if self.state != SourceState::Unattached {
            self.release();
        }

        let delivery = match SourceKind::detect(manifest_url) {
            SourceKind::AdaptivePlaylist if backend.is_supported() => Delivery::SoftwareAdaptive,
            SourceKind::AdaptivePlaylist if self.element.can_play_native_hls() => {
                Delivery::NativeAdaptive
            }
            SourceKind::AdaptivePlaylist => {
                let err = EngineError::stream_attach_failed(format!(
                    "no adaptive streaming support for '{manifest_url}'"
                ));
                tracing::warn!(error = %err, "video source attach failed");
                return Err(err);
            }
            SourceKind::Progressive => Delivery::Progressive,
        };

        match delivery {
            Delivery::SoftwareAdaptive => {
                let mut client = backend.create_client(options);
                client.load_source(manifest_url);
                client.attach_media(self.element.id());
                self.session = Some(client);
            }
            Delivery::NativeAdaptive | Delivery::Progressive => {
                self.element.set_src(manifest_url);
            }
        }

        self.manifest_url = Some(manifest_url.to_owned());
        self.delivery = Some(delivery);
        self.state = SourceState::Loading;
        tracing::debug!(?delivery, "video source loading");
        Ok(())
    }

    /// The software client finished parsing the playlist.
    pub fn on_manifest_parsed(&mut self) -> bool {
        if self.state == SourceState::Loading && self.delivery == Some(Delivery::SoftwareAdaptive)
        {
            self.state = SourceState::Ready;
            return true;
        }
        false
    }

    /// The element loaded metadata for its current source.
    pub fn on_loaded_metadata(&mut self) -> bool {
        if self.state == SourceState::Loading {
            self.state = SourceState::Ready;
            return true;
        }
        false
    }

    /// Release everything. Safe to call in any state, any number of times.
    pub fn destroy(&mut self) {
        if self.state == SourceState::Destroyed {
            return;
        }
        self.release();
        self.state = SourceState::Destroyed;
    }

    fn release(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.destroy();
        }
        if self.delivery.take().is_some() {
            self.element.pause();
            self.element.clear_src();
        }
        self.manifest_url = None;
        self.state = SourceState::Unattached;
    }
}

impl<E: MediaElement> Drop for StreamingVideoSource<E> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/source.rs"]
mod tests;
