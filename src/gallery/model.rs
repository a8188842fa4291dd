use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::core::TileKey;
use crate::foundation::error::{EngineError, EngineResult};

/// Media type of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Adaptive or progressive video.
    Video,
}

/// One gallery entry, as delivered by the page content.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTile {
    /// Stable identity. Without it the tile is identified by its source URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Image URL, manifest URL or progressive video URL.
    pub source_url: String,
    /// How the tile is rendered.
    pub kind: MediaKind,
    /// Still shown until a thumbnail is ready, and for good if it fails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// Caption title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Caption subtitle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Seconds into the video to capture the thumbnail from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_timestamp: Option<f64>,
    /// Seconds into the video where hover previews start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hover_start_timestamp: Option<f64>,
}

impl MediaTile {
    fn new(kind: MediaKind, source_url: impl Into<String>) -> Self {
        Self {
            id: None,
            source_url: source_url.into(),
            kind,
            poster_url: None,
            title: None,
            subtitle: None,
            thumbnail_timestamp: None,
            hover_start_timestamp: None,
        }
    }

    /// Image tile.
    pub fn image(source_url: impl Into<String>) -> Self {
        Self::new(MediaKind::Image, source_url)
    }

    /// Video tile.
    pub fn video(source_url: impl Into<String>) -> Self {
        Self::new(MediaKind::Video, source_url)
    }

    /// Set the stable id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the poster image.
    pub fn with_poster(mut self, poster_url: impl Into<String>) -> Self {
        self.poster_url = Some(poster_url.into());
        self
    }

    /// Set the caption title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Whether this is a video tile.
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}

/// Parse a JSON array of tiles.
pub fn load_tiles_json(json: &str) -> EngineResult<Vec<MediaTile>> {
    let tiles: Vec<MediaTile> = serde_json::from_str(json)
        .map_err(|e| EngineError::config(format!("invalid gallery JSON: {e}")))?;
    assign_keys(&tiles)?;
    Ok(tiles)
}

/// Stable keys for `tiles`, in order.
///
/// Tiles with an explicit id key on it; the rest key on their source URL and how many
/// earlier id-less tiles share it. Empty URLs and duplicate ids are rejected.
pub fn assign_keys(tiles: &[MediaTile]) -> EngineResult<Vec<TileKey>> {
    let mut seen_ids = BTreeSet::new();
    let mut occurrences: BTreeMap<&str, u32> = BTreeMap::new();
    let mut keys = Vec::with_capacity(tiles.len());

    for (i, tile) in tiles.iter().enumerate() {
        if tile.source_url.trim().is_empty() {
            return Err(EngineError::config(format!(
                "tile {i} has an empty source URL"
            )));
        }
        let key = match tile.id.as_deref() {
            Some(id) => {
                if !seen_ids.insert(id) {
                    return Err(EngineError::config(format!(
                        "duplicate tile id '{id}'"
                    )));
                }
                TileKey::for_id(id)
            }
            None => {
                let n = occurrences.entry(tile.source_url.as_str()).or_insert(0);
                let key = TileKey::for_source(&tile.source_url, *n);
                *n += 1;
                key
            }
        };
        keys.push(key);
    }
    Ok(keys)
}

#[cfg(test)]
#[path = "../../tests/unit/gallery/model.rs"]
mod tests;
