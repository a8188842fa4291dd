use crate::animation::ease::Ease;
use crate::foundation::math::{clamp01, lerp};

/// Entrance animation of a tile: fade in while sliding up and growing to full size.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RevealSpec {
    /// Animation length after the stagger delay, in seconds.
    pub duration_sec: f64,
    /// Timing curve.
    pub ease: Ease,
    /// Initial vertical offset in CSS pixels; animates to 0.
    pub from_offset_y: f64,
    /// Initial scale; animates to 1.
    pub from_scale: f64,
}

impl Default for RevealSpec {
    fn default() -> Self {
        Self::video_tile()
    }
}

/// Sampled state of a reveal animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealFrame {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Vertical offset in CSS pixels.
    pub offset_y: f64,
    /// Uniform scale.
    pub scale: f64,
}

impl RevealSpec {
    /// Video tiles and section blocks.
    pub fn video_tile() -> Self {
        Self {
            duration_sec: 0.8,
            ease: Ease::REVEAL,
            from_offset_y: 30.0,
            from_scale: 1.0,
        }
    }

    /// Tall portrait/architecture cells.
    pub fn portrait_tile() -> Self {
        Self {
            duration_sec: 0.8,
            ease: Ease::REVEAL,
            from_offset_y: 40.0,
            from_scale: 0.95,
        }
    }

    /// Photos inside a strip that is itself revealed.
    pub fn photo_strip() -> Self {
        Self {
            duration_sec: 0.6,
            ease: Ease::REVEAL,
            from_offset_y: 20.0,
            from_scale: 1.0,
        }
    }

    /// State before the animation starts.
    pub fn initial_frame(&self) -> RevealFrame {
        RevealFrame {
            opacity: 0.0,
            offset_y: self.from_offset_y,
            scale: self.from_scale,
        }
    }

    /// State once the animation has finished.
    pub fn final_frame(&self) -> RevealFrame {
        RevealFrame {
            opacity: 1.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }

    /// Sample the animation `elapsed_sec` after the tile entered, given its stagger delay.
    pub fn sample(&self, delay_sec: f64, elapsed_sec: f64) -> RevealFrame {
        let local = elapsed_sec - delay_sec;
        if local <= 0.0 {
            return self.initial_frame();
        }
        if self.duration_sec <= 0.0 || local >= self.duration_sec {
            return self.final_frame();
        }
        let t = self.ease.apply(clamp01(local / self.duration_sec));
        RevealFrame {
            opacity: t,
            offset_y: lerp(self.from_offset_y, 0.0, t),
            scale: lerp(self.from_scale, 1.0, t),
        }
    }

    /// Whether the animation has finished at `elapsed_sec`.
    pub fn is_complete(&self, delay_sec: f64, elapsed_sec: f64) -> bool {
        elapsed_sec - delay_sec >= self.duration_sec
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/reveal.rs"]
mod tests;
