use crate::color::value::Color;
use crate::foundation::math::clamp01;
use crate::scroll::signal::{ListenerId, ScrollSignal};

/// Progress above which the light-background foreground palette is used.
pub const FOREGROUND_SWITCH: f64 = 0.5;

/// Text and accent colours that must stay legible on the current background.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForegroundPalette {
    /// Body text.
    pub text: Color,
    /// Divider lines.
    pub line: Color,
    /// Category labels.
    pub category: Color,
    /// Card borders.
    pub border: Color,
    /// Card borders while hovered.
    pub hover_border: Color,
}

impl ForegroundPalette {
    /// Foreground for a dark (black) background.
    pub const fn dark_background() -> Self {
        Self {
            text: Color::WHITE,
            line: Color::grey(102.0),
            category: Color::rgb(156.0, 163.0, 175.0),
            border: Color::grey(68.0),
            hover_border: Color::grey(102.0),
        }
    }

    /// Foreground for a light (white) background.
    pub const fn light_background() -> Self {
        Self {
            text: Color::BLACK,
            line: Color::grey(204.0),
            category: Color::grey(102.0),
            border: Color::grey(229.0),
            hover_border: Color::grey(204.0),
        }
    }
}

/// Full set of colours for one scroll position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenePalette {
    /// Page background.
    pub background: Color,
    /// Text and accent colours readable on `background`.
    pub foreground: ForegroundPalette,
    /// Hover accent, the same at every progress.
    pub accent_hover: Color,
}

impl ScenePalette {
    /// CSS custom properties for this palette, in a stable order.
    pub fn css_variables(&self) -> [(&'static str, String); 7] {
        let fg = &self.foreground;
        [
            ("--bg", self.background.to_string()),
            ("--text", fg.text.to_string()),
            ("--line", fg.line.to_string()),
            ("--category", fg.category.to_string()),
            ("--border", fg.border.to_string()),
            ("--hover-border", fg.hover_border.to_string()),
            ("--accent-hover", self.accent_hover.to_string()),
        ]
    }
}

/// Maps scroll progress to the page palette.
///
/// The background fades continuously from black to white. Foreground colours do not fade:
/// they flip between the two endpoint palettes once the background is lighter than mid-grey.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorInterpolator {
    dark: ForegroundPalette,
    light: ForegroundPalette,
    accent_hover: Color,
}

impl Default for ColorInterpolator {
    fn default() -> Self {
        Self {
            dark: ForegroundPalette::dark_background(),
            light: ForegroundPalette::light_background(),
            accent_hover: Color::rgba(66.0, 133.0, 244.0, 0.8),
        }
    }
}

impl ColorInterpolator {
    /// Interpolator with the stock dark and light palettes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Palette for `progress`; out-of-range input is clamped to `[0, 1]`.
    pub fn interpolate(&self, progress: f64) -> ScenePalette {
        let p = clamp01(progress);
        let foreground = if p > FOREGROUND_SWITCH {
            self.light
        } else {
            self.dark
        };
        ScenePalette {
            background: Color::grey(255.0 * p),
            foreground,
            accent_hover: self.accent_hover,
        }
    }

    /// Deliver a palette to `on_palette` on every scroll dispatch, computed from the
    /// progress of `region`. An undefined region reads as progress 0.
    pub fn subscribe(
        self,
        signal: &ScrollSignal,
        region: &str,
        mut on_palette: impl FnMut(ScenePalette) + 'static,
    ) -> ListenerId {
        let region = region.to_owned();
        signal.subscribe(move |event| {
            let progress = event.region_progress(&region).unwrap_or_else(|| {
                tracing::debug!(region = %region, "palette region is not defined");
                0.0
            });
            on_palette(self.interpolate(progress));
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/interpolate.rs"]
mod tests;
