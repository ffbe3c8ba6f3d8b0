use crate::format::MistakeLine;

/// Scrollable list of mistake lines.
///
/// `rows` is the number of rows in the display area. Timing bars take the top
/// `bar_rows` of them; the rest show mistakes starting at `offset`. When the
/// view is at the bottom, inserting keeps it there.
#[derive(Debug, Clone, Default)]
pub struct MistakeLog {
    lines: Vec<MistakeLine>,
    offset: usize,
    rows: usize,
    bar_rows: usize,
}

impl MistakeLog {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Rows left for mistake lines.
    pub fn text_rows(&self) -> usize {
        self.rows.saturating_sub(self.bar_rows)
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.text_rows())
    }

    pub fn insert(&mut self, line: MistakeLine) {
        let following = self.offset == self.max_offset();
        self.lines.push(line);
        if following {
            self.offset = self.max_offset();
        }
    }

    /// Move the view by `delta` lines, clamped to the available range.
    pub fn scroll(&mut self, delta: isize) {
        self.offset = self
            .offset
            .saturating_add_signed(delta)
            .min(self.max_offset());
    }

    pub fn clear(&mut self) {
        log::debug!("clearing {} mistakes", self.lines.len());
        self.lines.clear();
        self.offset = 0;
    }

    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Reserve the top rows for timing bars.
    pub fn set_bar_rows(&mut self, bar_rows: usize) {
        self.bar_rows = bar_rows;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Lines currently in view, top to bottom.
    pub fn visible(&self) -> &[MistakeLine] {
        let end = (self.offset + self.text_rows()).min(self.lines.len());
        &self.lines[self.offset..end]
    }

    pub fn lines(&self) -> &[MistakeLine] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::TextRun;
    use lanewatch_types::Colour;

    fn line(i: usize) -> MistakeLine {
        MistakeLine {
            runs: vec![TextRun {
                text: i.to_string(),
                colour: Colour::BLACK,
            }],
            description: i.to_string(),
        }
    }

    fn filled(rows: usize, count: usize) -> MistakeLog {
        let mut log = MistakeLog::new(rows);
        for i in 0..count {
            log.insert(line(i));
        }
        log
    }

    fn shown(log: &MistakeLog) -> Vec<String> {
        log.visible().iter().map(|l| l.description.clone()).collect()
    }

    #[test]
    fn follows_newest_at_bottom() {
        let log = filled(3, 5);
        assert_eq!(log.offset(), 2);
        assert_eq!(shown(&log), vec!["2", "3", "4"]);
    }

    #[test]
    fn stays_put_when_scrolled_up() {
        let mut log = filled(3, 5);
        log.scroll(-2);
        log.insert(line(5));
        assert_eq!(log.offset(), 0);
        assert_eq!(shown(&log), vec!["0", "1", "2"]);
    }

    #[test]
    fn scroll_is_clamped() {
        let mut log = filled(3, 5);
        log.scroll(-10);
        assert_eq!(log.offset(), 0);
        log.scroll(10);
        assert_eq!(log.offset(), 2);
    }

    #[test]
    fn short_log_never_scrolls() {
        let mut log = filled(10, 3);
        log.scroll(1);
        assert_eq!(log.offset(), 0);
        assert_eq!(log.visible().len(), 3);
    }

    #[test]
    fn bar_rows_shrink_the_view() {
        let mut log = filled(5, 5);
        log.set_bar_rows(3);
        assert_eq!(log.text_rows(), 2);
        log.scroll(10);
        assert_eq!(shown(&log), vec!["3", "4"]);
        log.insert(line(5));
        assert_eq!(shown(&log), vec!["4", "5"]);
    }

    #[test]
    fn fewer_rows_pull_the_view_back() {
        let mut log = filled(3, 5);
        log.scroll(-1);
        assert_eq!(log.offset(), 1);
        log.set_rows(5);
        assert_eq!(log.offset(), 0);
        assert_eq!(shown(&log), vec!["0", "1", "2", "3", "4"]);
        log.set_rows(2);
        assert_eq!(log.offset(), 0);
        log.insert(line(5));
        assert_eq!(log.offset(), 0);
        assert_eq!(shown(&log), vec!["0", "1"]);
    }

    #[test]
    fn clear_resets() {
        let mut log = filled(3, 5);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.offset(), 0);
        assert!(log.visible().is_empty());
    }
}
