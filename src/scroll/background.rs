use crate::color::Color;

/// Fraction of the viewport height used as the activation line.
pub const DEFAULT_ACTIVATION_LINE: f64 = 0.3;

/// One page section with its own background colour, in document coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Section {
    /// Section name, for logging.
    pub name: String,
    /// Document offset of the section's top edge.
    pub top: f64,
    /// Document offset of the section's bottom edge.
    pub bottom: f64,
    /// Background while the section is active.
    pub color: Color,
}

/// Picks the background of the section crossing the activation line.
///
/// A section is active while the line `viewport_height * activation_line` (measured from
/// the top of the viewport) lies inside its half-open window `[top, bottom)`. The first
/// matching section wins. Between sections the last selected colour stays.
#[derive(Clone, Debug)]
pub struct SectionBackgrounds {
    sections: Vec<Section>,
    activation_line: f64,
    current: Color,
}

impl Default for SectionBackgrounds {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SectionBackgrounds {
    /// Selector over `sections` with the default activation line, starting on black.
    pub fn new(sections: Vec<Section>) -> Self {
        Self {
            sections,
            activation_line: DEFAULT_ACTIVATION_LINE,
            current: Color::BLACK,
        }
    }

    /// Use `line` (fraction of viewport height) as the activation line.
    pub fn with_activation_line(mut self, line: f64) -> Self {
        self.activation_line = line;
        self
    }

    /// Replace the sections, e.g. after layout changed.
    pub fn set_sections(&mut self, sections: Vec<Section>) {
        self.sections = sections;
    }

    /// Background currently selected.
    pub fn current(&self) -> Color {
        self.current
    }

    /// Section under the activation line at `offset_y`, if any.
    pub fn section_at(&self, offset_y: f64, viewport_height: f64) -> Option<&Section> {
        let line = offset_y + viewport_height * self.activation_line;
        self.sections
            .iter()
            .find(|s| s.top <= line && line < s.bottom)
    }

    /// Colour of the section under the activation line, without updating the selection.
    pub fn color_at(&self, offset_y: f64, viewport_height: f64) -> Option<Color> {
        self.section_at(offset_y, viewport_height).map(|s| s.color)
    }

    /// Re-evaluate for `offset_y`. Returns the new colour only when a section matched and
    /// its colour differs from the current one.
    pub fn select(&mut self, offset_y: f64, viewport_height: f64) -> Option<Color> {
        let next = self.color_at(offset_y, viewport_height)?;
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/background.rs"]
mod tests;
