use crate::foundation::error::{EngineError, EngineResult};

pub use kurbo::{Point, Rect, Size};

/// Host clock reading in milliseconds.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct TimeMs(pub u64);

impl TimeMs {
    /// Reading `ms` milliseconds later.
    pub fn saturating_add_ms(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn since(self, earlier: TimeMs) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// Reading in seconds.
    pub fn as_secs_f64(self) -> f64 {
        (self.0 as f64) / 1000.0
    }

    /// Reading from seconds, rounded to the nearest millisecond. Negative input maps to zero.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs * 1000.0).round().max(0.0) as u64)
    }
}

/// Host-side handle for a page element (tile container or media element).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u64);

/// Stable identity of a gallery tile.
///
/// Derived from the tile's explicit id when it has one, otherwise from its source URL and
/// the number of earlier tiles sharing that URL. Positions never take part, so inserting
/// or removing tiles does not shift the identity of the others.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKey(u64);

impl TileKey {
    /// Key for a tile with explicit identity `id`.
    pub fn for_id(id: &str) -> Self {
        Self(xxhash_rust::xxh3::xxh3_64_with_seed(id.as_bytes(), u64::MAX))
    }

    /// Key for the `occurrence`-th tile (0-based) pointing at `source_url`.
    pub fn for_source(source_url: &str, occurrence: u32) -> Self {
        Self(xxhash_rust::xxh3::xxh3_64_with_seed(
            source_url.as_bytes(),
            u64::from(occurrence),
        ))
    }

    /// Construct from a raw 64-bit value.
    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw 64-bit value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Visible area of the scrollable page, in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

impl Viewport {
    /// Validated viewport; both dimensions must be finite and non-negative.
    pub fn new(width: f64, height: f64) -> EngineResult<Self> {
        if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
            return Err(EngineError::config(format!(
                "viewport must be finite and non-negative, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Viewport rectangle in client coordinates.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Dimensions as a [`Size`].
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
