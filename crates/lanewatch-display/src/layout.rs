use lanewatch_config::Settings;

/// Row geometry of the mistake area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineMetrics {
    pub font_size: f64,
    /// Height of one row.
    pub row_height: f64,
    /// Left padding of text rows.
    pub pad_left: f64,
    /// Rows that fit, timing bars included.
    pub rows: usize,
    /// Canvas height that fits `rows` rows without a trailing gap.
    pub height: f64,
    pub min_width: f64,
}

impl LineMetrics {
    pub fn from_settings(settings: &Settings) -> Self {
        let font_size = f64::from(settings.font_size);
        let row_height = f64::from(settings.line_spacing) * font_size;
        let slots = ((f64::from(settings.min_height) + font_size) / row_height).ceil() as usize;
        Self {
            font_size,
            row_height,
            pad_left: f64::from(settings.relative_pad_left) * font_size,
            rows: slots.saturating_sub(1),
            height: row_height * slots as f64 - font_size,
            min_width: f64::from(settings.min_width),
        }
    }

    /// Canvas width for a widest measured line of `widest_line` pixels.
    pub fn canvas_width(&self, widest_line: f64) -> f64 {
        self.min_width.max(widest_line + self.font_size)
    }

    /// Top edge of `row`.
    pub fn row_y(&self, row: usize) -> f64 {
        row as f64 * self.row_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry() {
        let m = LineMetrics::from_settings(&Settings::default());
        assert_eq!(m.row_height, 27.0);
        assert_eq!(m.rows, 22);
        assert_eq!(m.height, 603.0);
        assert_eq!(m.pad_left, 9.0);
        assert_eq!(m.row_y(3), 81.0);
    }

    #[test]
    fn width_never_below_minimum() {
        let m = LineMetrics::from_settings(&Settings::default());
        assert_eq!(m.canvas_width(100.0), 400.0);
        assert_eq!(m.canvas_width(500.0), 518.0);
    }
}
