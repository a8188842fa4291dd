use std::collections::BTreeMap;

use crate::foundation::error::{EngineError, EngineResult};
use crate::foundation::math::inverse_lerp_clamped;

/// Scroll window expressed in viewport heights, so it follows resizes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RegionSpec {
    /// Window start, in viewport heights from the top of the document.
    pub start_vh: f64,
    /// Window length, in viewport heights. Must be positive.
    pub length_vh: f64,
}

impl RegionSpec {
    /// Validated region.
    pub fn new(start_vh: f64, length_vh: f64) -> EngineResult<Self> {
        if !start_vh.is_finite() || !length_vh.is_finite() || length_vh <= 0.0 {
            return Err(EngineError::config(format!(
                "region needs a finite start and positive length, got start={start_vh} length={length_vh}"
            )));
        }
        Ok(Self {
            start_vh,
            length_vh,
        })
    }

    /// Dark-to-light transition below the full-height hero: from 10% to 60% of the
    /// 0.4-viewport narrative block that follows it.
    pub fn hero_to_featured() -> Self {
        let hero = 1.0;
        let narrative = 0.4;
        Self {
            start_vh: hero + narrative * 0.1,
            length_vh: narrative * 0.5,
        }
    }

    /// End of the window, in viewport heights.
    pub fn end_vh(self) -> f64 {
        self.start_vh + self.length_vh
    }

    /// Whether the two half-open windows share any offset.
    pub fn overlaps(self, other: RegionSpec) -> bool {
        self.start_vh < other.end_vh() && other.start_vh < self.end_vh()
    }

    /// Pixel bounds for a viewport of `viewport_height`.
    pub fn bounds(self, viewport_height: f64) -> RegionBounds {
        let start = self.start_vh * viewport_height;
        RegionBounds {
            start,
            end: start + self.length_vh * viewport_height,
        }
    }
}

/// Pixel window `[start, end)` of a region for the current viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionBounds {
    /// First offset of the window.
    pub start: f64,
    /// First offset past the window.
    pub end: f64,
}

impl RegionBounds {
    /// `clamp((offset - start) / (end - start), 0, 1)`.
    pub fn progress(self, offset_y: f64) -> f64 {
        inverse_lerp_clamped(self.start, self.end, offset_y)
    }
}

/// Named, non-overlapping regions with bounds cached for the current viewport height.
#[derive(Clone, Debug, Default)]
pub(crate) struct RegionMap {
    specs: BTreeMap<String, RegionSpec>,
    bounds: BTreeMap<String, RegionBounds>,
}

impl RegionMap {
    /// Add or replace `name`. Overlap with any other region is a configuration error.
    pub(crate) fn insert(
        &mut self,
        name: &str,
        spec: RegionSpec,
        viewport_height: f64,
    ) -> EngineResult<()> {
        let spec = RegionSpec::new(spec.start_vh, spec.length_vh)?;
        if let Some((other, _)) = self
            .specs
            .iter()
            .find(|(other, s)| other.as_str() != name && s.overlaps(spec))
        {
            return Err(EngineError::config(format!(
                "scroll region '{name}' overlaps region '{other}'"
            )));
        }
        self.specs.insert(name.to_owned(), spec);
        self.bounds
            .insert(name.to_owned(), spec.bounds(viewport_height));
        Ok(())
    }

    pub(crate) fn remove(&mut self, name: &str) -> bool {
        self.bounds.remove(name);
        self.specs.remove(name).is_some()
    }

    pub(crate) fn recompute(&mut self, viewport_height: f64) {
        for (name, spec) in &self.specs {
            self.bounds
                .insert(name.clone(), spec.bounds(viewport_height));
        }
    }

    pub(crate) fn bounds(&self, name: &str) -> Option<RegionBounds> {
        self.bounds.get(name).copied()
    }

    pub(crate) fn progress(&self, name: &str, offset_y: f64) -> Option<f64> {
        self.bounds(name).map(|b| b.progress(offset_y))
    }

    pub(crate) fn snapshot(&self, offset_y: f64) -> BTreeMap<String, f64> {
        self.bounds
            .iter()
            .map(|(name, b)| (name.clone(), b.progress(offset_y)))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/region.rs"]
mod tests;
