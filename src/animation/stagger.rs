use std::ops::Range;

/// Entrance delay for the item at `index`: `base + index * increment`.
///
/// Pure and deterministic, so replaying a gallery staggers identically. Index 0 always
/// gets exactly `base`.
pub fn delay_for(index: usize, base_sec: f64, increment_sec: f64) -> f64 {
    if index == 0 {
        return base_sec;
    }
    base_sec + (index as f64) * increment_sec
}

/// Fixed base/increment pair applied to an ordered set of items.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StaggerScheduler {
    /// Delay of the first item, in seconds.
    pub base_sec: f64,
    /// Added delay per position, in seconds.
    pub increment_sec: f64,
}

impl StaggerScheduler {
    /// Scheduler with the given base and per-item increment.
    pub fn new(base_sec: f64, increment_sec: f64) -> Self {
        Self {
            base_sec,
            increment_sec,
        }
    }

    /// Delay of the item at `index`.
    pub fn delay_for(&self, index: usize) -> f64 {
        delay_for(index, self.base_sec, self.increment_sec)
    }
}

/// Row/column of a tile inside a fixed-width grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridPosition {
    /// 0-based row.
    pub row: usize,
    /// 0-based position within the row.
    pub col: usize,
}

/// Two-level stagger over a grid: one step per row, one step per position within a row.
///
/// `row_width == 0` treats the collection as a single row, so the flat index is the
/// intra-row position.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GridStagger {
    /// Tiles per row; 0 disables row grouping.
    pub row_width: usize,
    /// Delay of the first tile, in seconds.
    pub base_delay_sec: f64,
    /// Added delay per row, in seconds.
    pub row_increment_sec: f64,
    /// Added delay per position within a row, in seconds.
    pub increment_sec: f64,
}

impl Default for GridStagger {
    fn default() -> Self {
        Self {
            row_width: 3,
            base_delay_sec: 0.0,
            row_increment_sec: 0.0,
            increment_sec: 0.1,
        }
    }
}

impl GridStagger {
    /// Grid position of flat tile `index`.
    pub fn position(&self, index: usize) -> GridPosition {
        if self.row_width == 0 {
            return GridPosition { row: 0, col: index };
        }
        GridPosition {
            row: index / self.row_width,
            col: index % self.row_width,
        }
    }

    /// Entrance delay of flat tile `index`.
    pub fn delay_for(&self, index: usize) -> f64 {
        let pos = self.position(index);
        let row_base = delay_for(pos.row, self.base_delay_sec, self.row_increment_sec);
        delay_for(pos.col, row_base, self.increment_sec)
    }

    /// Split `len` tiles into row index ranges.
    pub fn rows(&self, len: usize) -> Vec<Range<usize>> {
        if len == 0 {
            return Vec::new();
        }
        let width = if self.row_width == 0 {
            len
        } else {
            self.row_width
        };
        (0..len)
            .step_by(width)
            .map(|start| start..(start + width).min(len))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/stagger.rs"]
mod tests;
