use lanewatch_types::{Colour, LaneIndex};

/// What a stretch of a timing bar represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// The lane is held on its own.
    Held(LaneIndex),
    /// The lane has been released and the next lane of its group is not pressed yet.
    Idle(LaneIndex),
    /// A lane is still held after the next lane of its group was pressed.
    Keylock,
}

impl SegmentKind {
    /// Held uses the lane colour, idle the paled lane colour, keylock is always black.
    pub fn colour(self, lane_colours: &[Colour]) -> Colour {
        match self {
            SegmentKind::Held(lane) => lane_colours[lane],
            SegmentKind::Idle(lane) => lane_colours[lane].pale(),
            SegmentKind::Keylock => Colour::BLACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSegment {
    pub duration_ms: f64,
    pub kind: SegmentKind,
    pub colour: Colour,
}

/// Horizontal pixel span of one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub x: f64,
    pub width: f64,
    pub colour: Colour,
}

/// One bar of the breakdown: segments laid end to end.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarLine {
    segments: Vec<BarSegment>,
}

impl BarLine {
    /// # Panics
    /// If a segment has a negative or non-finite duration.
    pub fn new(segments: Vec<BarSegment>) -> Self {
        for s in &segments {
            assert!(
                s.duration_ms.is_finite() && s.duration_ms >= 0.0,
                "bar segment durations must be non-negative, got {}",
                s.duration_ms
            );
        }
        Self { segments }
    }

    pub fn segments(&self) -> &[BarSegment] {
        &self.segments
    }

    pub fn total_ms(&self) -> f64 {
        self.segments.iter().map(|s| s.duration_ms).sum()
    }

    pub fn keylock_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.kind == SegmentKind::Keylock)
            .count()
    }

    /// Scale segments to `width` pixels in proportion to their duration.
    ///
    /// A bar whose total is zero is drawn with every segment at equal weight.
    pub fn layout(&self, width: f64) -> Vec<Span> {
        let total = self.total_ms();
        let (weights, total): (Vec<f64>, f64) = if total > 0.0 {
            (self.segments.iter().map(|s| s.duration_ms).collect(), total)
        } else {
            (vec![1.0; self.segments.len()], self.segments.len() as f64)
        };
        let mut x = 0.0;
        weights
            .iter()
            .zip(&self.segments)
            .map(|(&w, s)| {
                let span = Span {
                    x,
                    width: width * w / total,
                    colour: s.colour,
                };
                x += span.width;
                span
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(duration_ms: f64, kind: SegmentKind) -> BarSegment {
        let colours = [Colour::rgb(200, 0, 0), Colour::rgb(0, 200, 0)];
        BarSegment {
            duration_ms,
            kind,
            colour: kind.colour(&colours),
        }
    }

    #[test]
    fn colour_rules() {
        let colours = [Colour::rgb(0xDC, 0x00, 0x14)];
        assert_eq!(SegmentKind::Held(0).colour(&colours), colours[0]);
        assert_eq!(SegmentKind::Idle(0).colour(&colours), colours[0].pale());
        assert_eq!(SegmentKind::Keylock.colour(&colours), Colour::BLACK);
    }

    #[test]
    fn layout_is_proportional() {
        let bar = BarLine::new(vec![
            seg(100.0, SegmentKind::Held(0)),
            seg(50.0, SegmentKind::Keylock),
            seg(50.0, SegmentKind::Idle(1)),
        ]);
        let spans = bar.layout(400.0);
        assert_eq!(spans.len(), 3);
        assert_eq!((spans[0].x, spans[0].width), (0.0, 200.0));
        assert_eq!((spans[1].x, spans[1].width), (200.0, 100.0));
        assert_eq!((spans[2].x, spans[2].width), (300.0, 100.0));
        assert_eq!(spans[1].colour, Colour::BLACK);
    }

    #[test]
    fn zero_total_uses_equal_weights() {
        let bar = BarLine::new(vec![
            seg(0.0, SegmentKind::Held(0)),
            seg(0.0, SegmentKind::Held(1)),
        ]);
        let spans = bar.layout(100.0);
        assert_eq!(spans[0].width, 50.0);
        assert_eq!(spans[1].x, 50.0);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn negative_segment_is_rejected() {
        BarLine::new(vec![seg(-1.0, SegmentKind::Keylock)]);
    }
}
