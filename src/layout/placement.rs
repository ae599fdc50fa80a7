use serde::{Deserialize, Serialize};

const DEFAULT_PALETTE: [&str; 8] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899", "#14b8a6", "#f97316",
];

/// Fixed card geometry used to turn columns and rows into pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    pub card_width: f64,
    pub card_height: f64,
    /// Horizontal space between columns.
    pub gap_x: f64,
    /// Vertical space between rows.
    pub gap_y: f64,
    /// Margin around the whole canvas.
    pub padding: f64,
    pub input_panel_width: f64,
    pub input_row_height: f64,
    /// Connector colors, cycled over the input parameters.
    pub palette: Vec<String>,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            card_width: 240.0,
            card_height: 120.0,
            gap_x: 80.0,
            gap_y: 40.0,
            padding: 40.0,
            input_panel_width: 180.0,
            input_row_height: 36.0,
            palette: DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl LayoutMetrics {
    pub fn column_x(&self, column: usize) -> f64 {
        self.padding + column as f64 * (self.card_width + self.gap_x)
    }

    pub fn row_y(&self, row: usize) -> f64 {
        self.padding + row as f64 * (self.card_height + self.gap_y)
    }

    /// Canvas size for a grid of `columns` x `rows` cards. Zero when either is zero.
    pub fn canvas_size(&self, columns: usize, rows: usize) -> (f64, f64) {
        if columns == 0 || rows == 0 {
            return (0.0, 0.0);
        }
        let width = 2.0 * self.padding
            + columns as f64 * self.card_width
            + (columns - 1) as f64 * self.gap_x;
        let height =
            2.0 * self.padding + rows as f64 * self.card_height + (rows - 1) as f64 * self.gap_y;
        (width, height)
    }

    /// Vertical center of the `index`-th parameter row in the input panel.
    pub fn input_anchor_y(&self, index: usize) -> f64 {
        self.padding + index as f64 * self.input_row_height + self.input_row_height / 2.0
    }

    pub fn input_color(&self, index: usize) -> String {
        if self.palette.is_empty() {
            return "#888888".to_string();
        }
        self.palette[index % self.palette.len()].clone()
    }
}

/// Column and row assigned to a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Slot {
    pub layer: usize,
    pub row: usize,
}

/// One slot per cell, left to right in list order.
pub(super) fn linear_slots(count: usize) -> Vec<Option<Slot>> {
    (0..count).map(|i| Some(Slot { layer: i, row: 0 })).collect()
}

/// Slots for layered placement. Cells missing from `layers` get `None`.
pub(super) fn layered_slots(count: usize, layers: &[Vec<usize>]) -> Vec<Option<Slot>> {
    let mut slots = vec![None; count];
    for (layer, members) in layers.iter().enumerate() {
        for (row, &cell) in members.iter().enumerate() {
            slots[cell] = Some(Slot { layer, row });
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_size_formula() {
        let metrics = LayoutMetrics::default();
        assert_eq!(metrics.canvas_size(0, 3), (0.0, 0.0));
        assert_eq!(metrics.canvas_size(1, 1), (320.0, 200.0));
        assert_eq!(metrics.canvas_size(3, 2), (80.0 + 720.0 + 160.0, 80.0 + 240.0 + 40.0));
    }

    #[test]
    fn test_palette_cycles() {
        let metrics = LayoutMetrics::default();
        assert_eq!(metrics.input_color(0), metrics.input_color(8));
        assert_ne!(metrics.input_color(0), metrics.input_color(1));

        let bare = LayoutMetrics {
            palette: Vec::new(),
            ..LayoutMetrics::default()
        };
        assert_eq!(bare.input_color(3), "#888888");
    }

    #[test]
    fn test_layered_slots_leave_gaps_for_unplaced() {
        let slots = layered_slots(4, &[vec![0, 2], vec![1]]);
        assert_eq!(slots[0], Some(Slot { layer: 0, row: 0 }));
        assert_eq!(slots[2], Some(Slot { layer: 0, row: 1 }));
        assert_eq!(slots[1], Some(Slot { layer: 1, row: 0 }));
        assert_eq!(slots[3], None);
    }
}
