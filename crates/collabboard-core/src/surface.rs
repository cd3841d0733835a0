//! Canvas surface abstraction.
//!
//! The core never rasterizes. It issues `clear` and `draw_line` calls against a
//! [`CanvasSurface`] provided by the host (an HTML canvas, a GPU renderer, a test recorder).

use crate::stroke::Segment;
use kurbo::Point;

/// Drawing primitives the core relies on.
pub trait CanvasSurface {
    /// Clear the whole surface.
    fn clear(&mut self);

    /// Draw a round-capped line between two points.
    fn draw_line(&mut self, from: Point, to: Point, color: &str, size: f64);

    /// Draw a wire segment.
    fn draw_segment(&mut self, segment: &Segment) {
        self.draw_line(segment.start(), segment.end(), &segment.color, segment.size);
    }
}

/// A recorded surface operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Clear,
    Line(Segment),
}

/// Surface that records every operation as a display list.
///
/// Two recordings with the same [`visible`](Self::visible) lines would rasterize to
/// the same bitmap, which is what tests and headless clients compare.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All operations issued so far.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Lines drawn since the last clear, in paint order.
    pub fn visible(&self) -> Vec<&Segment> {
        let start = self
            .ops
            .iter()
            .rposition(|op| matches!(op, SurfaceOp::Clear))
            .map_or(0, |i| i + 1);
        self.ops[start..]
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Line(seg) => Some(seg),
                SurfaceOp::Clear => None,
            })
            .collect()
    }

    /// Check if nothing is visible.
    pub fn is_blank(&self) -> bool {
        self.visible().is_empty()
    }

    /// Number of clears issued.
    pub fn clear_count(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, SurfaceOp::Clear)).count()
    }
}

impl CanvasSurface for RecordingSurface {
    fn clear(&mut self) {
        self.ops.push(SurfaceOp::Clear);
    }

    fn draw_line(&mut self, from: Point, to: Point, color: &str, size: f64) {
        self.ops.push(SurfaceOp::Line(Segment::between(from, to, color, size)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_starts_blank() {
        let surface = RecordingSurface::new();
        assert!(surface.is_blank());
        assert_eq!(surface.clear_count(), 0);
    }

    #[test]
    fn test_visible_since_last_clear() {
        let mut surface = RecordingSurface::new();
        surface.draw_line(Point::new(0.0, 0.0), Point::new(1.0, 1.0), "black", 1.0);
        surface.clear();
        surface.draw_line(Point::new(2.0, 2.0), Point::new(3.0, 3.0), "blue", 4.0);

        let visible = surface.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].color, "blue");
        assert_eq!(surface.ops().len(), 3);
    }

    #[test]
    fn test_draw_segment_uses_carried_style() {
        let mut surface = RecordingSurface::new();
        let seg = Segment::between(Point::new(0.0, 0.0), Point::new(10.0, 10.0), "#ff0000", 5.0);
        surface.draw_segment(&seg);
        assert_eq!(surface.visible(), vec![&seg]);
    }
}
