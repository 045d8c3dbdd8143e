//! Touch geometry for the long-press option row.
//!
//! Pure functions over screen coordinates so selection can be tested without
//! a rendering toolkit.

use tracing::trace;

/// On-screen rectangle of a key.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl KeyBounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.left + self.width / 2.0
    }

    /// Non-finite coordinates become `0.0` and a negative width is
    /// flattened, so layout arithmetic stays ordered.
    pub fn sanitized(self) -> Self {
        fn finite(v: f32) -> f32 {
            if v.is_finite() {
                v
            } else {
                0.0
            }
        }
        Self {
            left: finite(self.left),
            top: finite(self.top),
            width: finite(self.width).max(0.0),
            height: finite(self.height).max(0.0),
        }
    }
}

/// Sizing of the multi-option preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupGeometry {
    pub option_width: f32,
    pub edge_margin: f32,
    /// Width of the visible display frame; `0.0` means unknown (no clamping).
    pub screen_width: f32,
}

impl Default for PopupGeometry {
    fn default() -> Self {
        Self {
            option_width: 48.0,
            edge_margin: 8.0,
            screen_width: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionCell {
    pub center_x: f32,
    pub value: String,
}

/// The laid-out option row: where the renderer draws each option and what
/// touch selection compares against.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionRow {
    pub left: f32,
    pub width: f32,
    pub cells: Vec<OptionCell>,
}

impl OptionRow {
    /// Lay out `values` in equal cells over the anchor key: at least as wide
    /// as the key, centred on it, kept inside the screen margins.
    pub fn layout(anchor: KeyBounds, values: Vec<String>, geometry: &PopupGeometry) -> Self {
        let anchor = anchor.sanitized();
        let count = values.len();
        let content = geometry.option_width * count as f32;
        let mut width = content.max(anchor.width);
        let mut left = anchor.center_x() - width / 2.0;

        if geometry.screen_width.is_finite() && geometry.screen_width > 0.0 {
            let max_width = (geometry.screen_width - 2.0 * geometry.edge_margin).max(0.0);
            width = width.min(max_width);
            let max_left = geometry.screen_width - geometry.edge_margin - width;
            left = left.min(max_left).max(geometry.edge_margin);
        }

        let cell = if count == 0 { 0.0 } else { width / count as f32 };
        let cells = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| OptionCell {
                center_x: left + cell * (i as f32 + 0.5),
                value,
            })
            .collect();
        Self { left, width, cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|c| c.value.as_str())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(|c| c.value.as_str())
    }

    /// Index of the option under a touch at screen `x`. Touches outside the
    /// row are pulled back to its edge first.
    pub fn select(&self, x: f32) -> Option<usize> {
        let x = x.clamp(self.left, self.left + self.width);
        let centers: Vec<(f32, &str)> = self
            .cells
            .iter()
            .map(|c| (c.center_x, c.value.as_str()))
            .collect();
        nearest(&centers, x)
    }
}

/// Index of the option whose centre is closest to `touch_x`. Ties go to the
/// earlier option. `None` for an empty list.
pub fn nearest<T>(options: &[(f32, T)], touch_x: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, (center, _)) in options.iter().enumerate() {
        let dist = (center - touch_x).abs();
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((i, dist));
        }
    }
    trace!(touch_x, best = ?best.map(|(i, _)| i));
    best.map(|(i, _)| i)
}
