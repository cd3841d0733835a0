//! Applies events relayed from peers.
//!
//! Remote segments are painted straight onto the surface and never enter the local
//! history: a client can only undo its own strokes. A remote clear, on the other hand,
//! wipes the local history too.

use crate::history::StrokeHistory;
use crate::sync::ServerMessage;
use crate::surface::CanvasSurface;

/// What a relayed message did to local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteEffect {
    /// A peer segment was painted.
    Painted,
    /// The board was cleared.
    Cleared,
}

/// Apply a relayed message. Painting is skipped when no surface is available;
/// a clear still resets the history.
pub fn apply<S: CanvasSurface + ?Sized>(
    msg: &ServerMessage,
    surface: Option<&mut S>,
    history: &mut StrokeHistory,
) -> RemoteEffect {
    match msg {
        ServerMessage::Drawing { data } => {
            if let Some(surface) = surface {
                surface.draw_segment(data);
            }
            RemoteEffect::Painted
        }
        ServerMessage::ClearCanvas => {
            if let Some(surface) = surface {
                surface.clear();
            }
            history.clear();
            RemoteEffect::Cleared
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{Segment, Stroke};
    use crate::surface::RecordingSurface;
    use kurbo::Point;

    fn local_stroke() -> Stroke {
        Stroke::from_points(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)], "black", 3.0).unwrap()
    }

    #[test]
    fn test_remote_segment_bypasses_history() {
        let mut surface = RecordingSurface::new();
        let mut history = StrokeHistory::new();
        history.commit(local_stroke());

        let seg = Segment::between(Point::new(0.0, 0.0), Point::new(10.0, 10.0), "#ff0000", 5.0);
        let effect = apply(&ServerMessage::Drawing { data: seg.clone() }, Some(&mut surface), &mut history);

        assert_eq!(effect, RemoteEffect::Painted);
        assert_eq!(surface.visible(), vec![&seg]);
        assert_eq!(history.undo_stack(), &[local_stroke()]);
    }

    #[test]
    fn test_remote_clear_resets_history() {
        let mut surface = RecordingSurface::new();
        let mut history = StrokeHistory::new();
        history.commit(local_stroke());
        history.commit(local_stroke());
        history.undo();

        let effect = apply(&ServerMessage::ClearCanvas, Some(&mut surface), &mut history);

        assert_eq!(effect, RemoteEffect::Cleared);
        assert!(surface.is_blank());
        assert_eq!(surface.clear_count(), 1);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_missing_surface_is_noop_for_paint() {
        let mut history = StrokeHistory::new();
        history.commit(local_stroke());
        let seg = Segment::between(Point::new(0.0, 0.0), Point::new(1.0, 0.0), "red", 1.0);

        apply::<RecordingSurface>(&ServerMessage::Drawing { data: seg }, None, &mut history);
        assert!(history.can_undo());

        apply::<RecordingSurface>(&ServerMessage::ClearCanvas, None, &mut history);
        assert!(!history.can_undo());
    }
}
