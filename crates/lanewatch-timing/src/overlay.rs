/// Rows that get a divider line above them, counted from the top bar.
const DIVIDER_ROWS: [usize; 3] = [0, 1, 3];

/// The aggregate bar carries the scale marks.
const SCALE_ROW: usize = 0;

/// Divider and scale-mark positions drawn over the timing bars.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingOverlay {
    pub divider_rows: Vec<usize>,
    /// Row the scale marks are drawn on.
    pub scale_row: usize,
    /// Fractions of the bar width in `(0, 1]`, one per lane boundary.
    pub scale_marks: Vec<f64>,
}

impl TimingOverlay {
    pub fn for_lanes(lane_count: usize) -> Self {
        Self {
            divider_rows: DIVIDER_ROWS.to_vec(),
            scale_row: SCALE_ROW,
            scale_marks: (1..=lane_count)
                .map(|n| n as f64 / lane_count as f64)
                .collect(),
        }
    }

    /// Scale mark x positions for a bar `width` pixels wide starting at `left`.
    pub fn mark_positions(&self, left: f64, width: f64) -> Vec<f64> {
        self.scale_marks.iter().map(|m| left + m * width).collect()
    }
}
