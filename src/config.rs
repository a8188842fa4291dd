use crate::animation::reveal::RevealSpec;
use crate::animation::stagger::GridStagger;
use crate::foundation::error::{EngineError, EngineResult};
use crate::foundation::math::is_finite_non_negative;
use crate::media::platform::StreamingOptions;
use crate::viewport::visibility::ObserverOptions;

/// Thumbnail extraction settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Frame to capture when a tile does not set its own timestamp.
    pub timestamp_sec: f64,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            timestamp_sec: 0.1,
            jpeg_quality: 80,
        }
    }
}

/// Hover preview settings.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// Period of the re-seek loop.
    pub loop_period_ms: u64,
    /// Start position when a tile does not set its own.
    pub start_sec: f64,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            loop_period_ms: 10_000,
            start_sec: 0.0,
        }
    }
}

/// Every tunable of the engine. Missing fields take their defaults.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// When a tile counts as entered.
    pub visibility: ObserverOptions,
    /// Reveal delays by grid position.
    pub stagger: GridStagger,
    /// Entrance animation.
    pub reveal: RevealSpec,
    /// Thumbnail extraction.
    pub thumbnail: ThumbnailConfig,
    /// Hover previews.
    pub hover: HoverConfig,
    /// Options handed to the adaptive streaming client.
    pub streaming: StreamingOptions,
}

impl EngineConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::config(format!("invalid engine config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check every group. Errors are [`EngineError::Config`].
    pub fn validate(&self) -> EngineResult<()> {
        self.visibility.validate()?;

        let s = &self.stagger;
        if !is_finite_non_negative(s.base_delay_sec)
            || !is_finite_non_negative(s.row_increment_sec)
            || !is_finite_non_negative(s.increment_sec)
        {
            return Err(EngineError::config(
                "stagger delays must be finite and non-negative",
            ));
        }

        let r = &self.reveal;
        if !is_finite_non_negative(r.duration_sec) || !r.from_offset_y.is_finite() {
            return Err(EngineError::config(format!(
                "reveal duration must be finite and non-negative, got {}",
                r.duration_sec
            )));
        }
        if !r.from_scale.is_finite() || r.from_scale <= 0.0 {
            return Err(EngineError::config(format!(
                "reveal scale must be positive, got {}",
                r.from_scale
            )));
        }

        if !is_finite_non_negative(self.thumbnail.timestamp_sec) {
            return Err(EngineError::config(format!(
                "thumbnail timestamp must be finite and non-negative, got {}",
                self.thumbnail.timestamp_sec
            )));
        }
        if !(1..=100).contains(&self.thumbnail.jpeg_quality) {
            return Err(EngineError::config(format!(
                "jpeg quality must be within 1..=100, got {}",
                self.thumbnail.jpeg_quality
            )));
        }

        if self.hover.loop_period_ms == 0 {
            return Err(EngineError::config("hover loop period must be positive"));
        }
        if !is_finite_non_negative(self.hover.start_sec) {
            return Err(EngineError::config(format!(
                "hover start must be finite and non-negative, got {}",
                self.hover.start_sec
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
