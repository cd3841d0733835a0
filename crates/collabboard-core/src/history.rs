//! Stroke history with undo/redo.
//!
//! History is local to one client and never synchronized. Undo and redo repaint the
//! whole surface from the undo stack, which is the only way to guarantee the canvas
//! matches the stack without an erase primitive. Strokes painted by peers are not part
//! of the stack, so they disappear from this client's canvas on the next repaint.

use crate::stroke::Stroke;
use crate::surface::CanvasSurface;

/// Undo and redo stacks of completed strokes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeHistory {
    /// Applied strokes, oldest first.
    undo_stack: Vec<Stroke>,
    /// Undone strokes, the most recently undone last.
    redo_stack: Vec<Stroke>,
}

impl StrokeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed stroke. Clears the redo stack.
    pub fn commit(&mut self, stroke: Stroke) {
        self.undo_stack.push(stroke);
        self.redo_stack.clear();
    }

    /// Undo the last stroke.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(stroke) = self.undo_stack.pop() {
            self.redo_stack.push(stroke);
            true
        } else {
            false
        }
    }

    /// Redo the last undone stroke.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(stroke) = self.redo_stack.pop() {
            self.undo_stack.push(stroke);
            true
        } else {
            false
        }
    }

    /// Drop both stacks. Nothing cleared here can be redone.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Applied strokes in paint order.
    pub fn undo_stack(&self) -> &[Stroke] {
        &self.undo_stack
    }

    /// Undone strokes, the next one to redo last.
    pub fn redo_stack(&self) -> &[Stroke] {
        &self.redo_stack
    }

    /// Total points across applied strokes, i.e. the cost of a repaint.
    pub fn point_count(&self) -> usize {
        self.undo_stack.iter().map(Stroke::len).sum()
    }

    /// Clear the surface and replay every applied stroke in order.
    pub fn redraw<S: CanvasSurface + ?Sized>(&self, surface: &mut S) {
        surface.clear();
        for stroke in &self.undo_stack {
            for segment in stroke.segments() {
                surface.draw_segment(&segment);
            }
        }
    }
}
