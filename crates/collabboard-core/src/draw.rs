//! Local draw engine: turns pointer input into segments and strokes.

use crate::stroke::{Segment, Stroke};
use crate::tools::ToolSettings;
use kurbo::Point;

/// State of the current pointer gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DrawState {
    /// Waiting for pointer-down.
    #[default]
    Idle,
    /// Pointer is down and points are being collected.
    Drawing {
        /// Points sampled so far, first is the pointer-down position.
        points: Vec<Point>,
        /// Color captured at pointer-down.
        color: String,
        /// Line width captured at pointer-down.
        size: f64,
    },
}

/// Pointer gesture state machine.
///
/// The engine is pure: it returns the segment to paint and emit on every move and
/// the finished stroke on pointer-up. Painting, emitting and committing are done by
/// the caller.
#[derive(Debug, Clone, Default)]
pub struct DrawEngine {
    state: DrawState,
}

impl DrawEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gesture state.
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Check if a gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing { .. })
    }

    /// Start a gesture. Any unfinished gesture is discarded.
    pub fn pointer_down(&mut self, point: Point, settings: &ToolSettings) {
        self.state = DrawState::Drawing {
            points: vec![point],
            color: settings.stroke_color().to_string(),
            size: settings.size,
        };
    }

    /// Extend the gesture. Returns the segment from the previous point to `point`,
    /// or `None` when no gesture is in progress.
    pub fn pointer_move(&mut self, point: Point) -> Option<Segment> {
        let DrawState::Drawing { points, color, size } = &mut self.state else {
            return None;
        };
        let prev = *points.last()?;
        points.push(point);
        Some(Segment::between(prev, point, color.as_str(), *size))
    }

    /// Finish the gesture. Returns the stroke if it has at least two points.
    pub fn pointer_up(&mut self) -> Option<Stroke> {
        match std::mem::take(&mut self.state) {
            DrawState::Drawing { points, color, size } => Stroke::from_points(points, color, size),
            DrawState::Idle => None,
        }
    }
}
