/// MIME type probed for native adaptive-playlist playback.
pub const HLS_MIME: &str = "application/vnd.apple.mpegurl";

const PLAYLIST_SUFFIX: &str = ".m3u8";

/// Delivery format of a video URL, decided from its path suffix alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// `.m3u8` adaptive-bitrate playlist.
    AdaptivePlaylist,
    /// Anything else, played by setting the element source directly.
    Progressive,
}

impl SourceKind {
    /// Classify `url`. The query string and fragment are ignored; the suffix match is
    /// case-insensitive.
    pub fn detect(url: &str) -> Self {
        let end = url.find(['?', '#']).unwrap_or(url.len());
        let path = url[..end].trim_end();
        let is_playlist = path.len() >= PLAYLIST_SUFFIX.len()
            && path.is_char_boundary(path.len() - PLAYLIST_SUFFIX.len())
            && path[path.len() - PLAYLIST_SUFFIX.len()..].eq_ignore_ascii_case(PLAYLIST_SUFFIX);
        if is_playlist {
            Self::AdaptivePlaylist
        } else {
            Self::Progressive
        }
    }

    /// Whether the URL names an adaptive playlist.
    pub fn is_adaptive(self) -> bool {
        matches!(self, Self::AdaptivePlaylist)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/manifest.rs"]
mod tests;
