use crate::foundation::math::{inverse_lerp_clamped, lerp};

/// Clamped linear map from a scroll progress window to an output range.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParallaxTransform {
    /// Progress window `[a, b]` the transform is active in.
    pub input: [f64; 2],
    /// Output at `a` and at `b`.
    pub output: [f64; 2],
}

impl ParallaxTransform {
    /// Map `input` to `output`, clamping outside the window.
    pub const fn new(input: [f64; 2], output: [f64; 2]) -> Self {
        Self { input, output }
    }

    /// Hero title lift over the first 30% of the page.
    pub const fn hero() -> Self {
        Self::new([0.0, 0.3], [0.0, -100.0])
    }

    /// Manifesto block drift through the middle of the page.
    pub const fn manifesto() -> Self {
        Self::new([0.2, 0.8], [50.0, -50.0])
    }

    /// Background layer drift over the whole page.
    pub const fn background() -> Self {
        Self::new([0.0, 1.0], [0.0, -200.0])
    }

    /// Output for `progress`.
    pub fn apply(&self, progress: f64) -> f64 {
        let t = inverse_lerp_clamped(self.input[0], self.input[1], progress);
        lerp(self.output[0], self.output[1], t)
    }
}

/// Offset-proportional transform (`offset_y * factor`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollFactor(pub f64);

impl ScrollFactor {
    /// Hero logo.
    pub const LOGO: Self = Self(0.5);
    /// Hero subtitle.
    pub const SUBTITLE: Self = Self(0.3);

    /// Transform for scroll offset `offset_y`.
    pub fn apply(self, offset_y: f64) -> f64 {
        offset_y * self.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/parallax.rs"]
mod tests;
