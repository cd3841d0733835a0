//! Segments and strokes.
//!
//! A [`Segment`] is the unit sent over the wire, a [`Stroke`] is the unit of undo/redo.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// One line between two consecutive pointer samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    /// CSS color string, relayed as-is.
    pub color: String,
    /// Line width in device pixels.
    pub size: f64,
}

impl Segment {
    /// Create a segment between two points.
    pub fn between(from: Point, to: Point, color: impl Into<String>, size: f64) -> Self {
        Self {
            x0: from.x,
            y0: from.y,
            x1: to.x,
            y1: to.y,
            color: color.into(),
            size,
        }
    }

    /// Start point.
    pub fn start(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    /// End point.
    pub fn end(&self) -> Point {
        Point::new(self.x1, self.y1)
    }
}

/// A completed pointer gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Sampled points, at least two for a committed stroke.
    pub points: Vec<Point>,
    pub color: String,
    pub size: f64,
}

impl Stroke {
    /// Minimum number of points for a stroke to be kept.
    pub const MIN_POINTS: usize = 2;

    /// Build a stroke, returning `None` for taps with fewer than two points.
    pub fn from_points(points: Vec<Point>, color: impl Into<String>, size: f64) -> Option<Self> {
        if points.len() < Self::MIN_POINTS {
            return None;
        }
        Some(Self {
            points,
            color: color.into(),
            size,
        })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the stroke has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Segments between consecutive points, in drawing order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points
            .windows(2)
            .map(|pair| Segment::between(pair[0], pair[1], self.color.as_str(), self.size))
    }
}
