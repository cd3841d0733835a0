//! Client-side whiteboard: local drawing, history and remote events for one room.

use crate::draw::DrawEngine;
use crate::history::StrokeHistory;
use crate::remote::{self, RemoteEffect};
use crate::stroke::{Segment, Stroke};
use crate::surface::CanvasSurface;
use crate::sync::{ClientMessage, ServerMessage, SyncEvent};
use crate::tools::{ToolKind, ToolSettings};
use kurbo::Point;

/// One client's view of a shared board.
///
/// Owns the draw engine, the stroke history and the canvas surface, and queues the
/// messages that must go to the relay. The host drains the queue with
/// [`take_outgoing`](Self::take_outgoing) (or `flush`) after handling input.
///
/// The surface is optional: while none is attached every paint call is skipped, but
/// history and outgoing messages are still updated.
pub struct Whiteboard<S: CanvasSurface> {
    room_id: String,
    settings: ToolSettings,
    engine: DrawEngine,
    history: StrokeHistory,
    surface: Option<S>,
    /// Pending outgoing messages.
    outgoing: Vec<ClientMessage>,
}

impl<S: CanvasSurface> Whiteboard<S> {
    /// Create a board for `room_id` without a surface. Queues the room join.
    pub fn new(room_id: impl Into<String>) -> Self {
        let room_id = room_id.into();
        let outgoing = vec![ClientMessage::JoinRoom { room_id: room_id.clone() }];
        Self {
            room_id,
            settings: ToolSettings::default(),
            engine: DrawEngine::new(),
            history: StrokeHistory::new(),
            surface: None,
            outgoing,
        }
    }

    /// Create a board that paints onto `surface`.
    pub fn with_surface(room_id: impl Into<String>, surface: S) -> Self {
        let mut board = Self::new(room_id);
        board.surface = Some(surface);
        board
    }

    /// Room this board belongs to.
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    // --- Surface ---

    /// Attach a (new) surface and repaint local strokes onto it.
    pub fn attach_surface(&mut self, mut surface: S) {
        self.history.redraw(&mut surface);
        self.surface = Some(surface);
    }

    /// Detach the surface; painting becomes a no-op until one is attached again.
    pub fn detach_surface(&mut self) -> Option<S> {
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    // --- Tool settings ---

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    /// Select pen or eraser. Takes effect at the next pointer-down.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.settings.tool = tool;
    }

    /// Set the pen color. Takes effect at the next pointer-down.
    pub fn set_color(&mut self, color: impl Into<String>) {
        self.settings.color = color.into();
    }

    /// Set the line width. Takes effect at the next pointer-down.
    pub fn set_size(&mut self, size: f64) {
        self.settings.set_size(size);
    }

    // --- Local drawing ---

    /// Pointer pressed on the canvas.
    pub fn pointer_down(&mut self, point: Point) {
        self.engine.pointer_down(point, &self.settings);
    }

    /// Pointer moved. While drawing, paints the new segment and queues it for the
    /// room; returns it.
    pub fn pointer_move(&mut self, point: Point) -> Option<Segment> {
        let segment = self.engine.pointer_move(point)?;
        if let Some(surface) = self.surface.as_mut() {
            surface.draw_segment(&segment);
        }
        self.outgoing.push(ClientMessage::Drawing {
            room_id: self.room_id.clone(),
            data: segment.clone(),
        });
        Some(segment)
    }

    /// Pointer released. Commits the stroke to history if it has at least two points.
    /// Returns true if a stroke was committed.
    pub fn pointer_up(&mut self) -> bool {
        match self.engine.pointer_up() {
            Some(stroke) => {
                log::debug!("Committed stroke with {} points", stroke.len());
                self.history.commit(stroke);
                true
            }
            None => false,
        }
    }

    /// Check if a gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        self.engine.is_drawing()
    }

    // --- History ---

    /// Undo the last local stroke and repaint.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        self.repaint();
        true
    }

    /// Redo the last undone stroke and repaint.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        self.repaint();
        true
    }

    /// Clear the board for everyone: wipes the canvas and both stacks locally and
    /// queues a clear for the room.
    pub fn clear_all(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        self.history.clear();
        self.outgoing.push(ClientMessage::ClearCanvas { room_id: self.room_id.clone() });
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_stack(&self) -> &[Stroke] {
        self.history.undo_stack()
    }

    pub fn redo_stack(&self) -> &[Stroke] {
        self.history.redo_stack()
    }

    pub fn history(&self) -> &StrokeHistory {
        &self.history
    }

    fn repaint(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            self.history.redraw(surface);
        }
    }

    // --- Remote events ---

    /// Apply a message relayed from a peer.
    pub fn handle_server_message(&mut self, msg: &ServerMessage) -> RemoteEffect {
        let effect = remote::apply(msg, self.surface.as_mut(), &mut self.history);
        if effect == RemoteEffect::Cleared {
            log::info!("Board {} cleared by a peer", self.room_id);
        }
        effect
    }

    /// Parse and apply a raw text frame. Malformed frames are dropped.
    pub fn handle_server_text(&mut self, text: &str) -> Option<RemoteEffect> {
        match serde_json::from_str::<ServerMessage>(text) {
            Ok(msg) => Some(self.handle_server_message(&msg)),
            Err(e) => {
                log::warn!("Dropping malformed relay message: {}", e);
                None
            }
        }
    }

    /// Apply a transport event. A (re)connect queues the room join again, which the
    /// relay treats as a no-op when already joined.
    pub fn handle_sync_event(&mut self, event: &SyncEvent) -> Option<RemoteEffect> {
        match event {
            SyncEvent::Message(msg) => Some(self.handle_server_message(msg)),
            SyncEvent::Connected => {
                let join = ClientMessage::JoinRoom { room_id: self.room_id.clone() };
                if !self.outgoing.contains(&join) {
                    self.outgoing.push(join);
                }
                None
            }
            SyncEvent::Disconnected => {
                log::info!("Disconnected from relay");
                None
            }
            SyncEvent::Error { message } => {
                log::warn!("Relay connection error: {}", message);
                None
            }
        }
    }

    // --- Outgoing ---

    /// Take the queued outgoing messages, oldest first.
    pub fn take_outgoing(&mut self) -> Vec<ClientMessage> {
        std::mem::take(&mut self.outgoing)
    }

    /// Number of queued outgoing messages.
    pub fn pending_outgoing(&self) -> usize {
        self.outgoing.len()
    }

    /// Send every queued message. Delivery is best-effort: on the first failure the
    /// remaining messages are dropped and the error is returned.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn flush(&mut self, socket: &crate::sync::NativeWebSocket) -> Result<usize, crate::sync::TransportError> {
        let messages = self.take_outgoing();
        let count = messages.len();
        for msg in &messages {
            socket.send(msg)?;
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use crate::tools::ERASER_COLOR;

    fn board(room: &str) -> Whiteboard<RecordingSurface> {
        let mut board = Whiteboard::with_surface(room, RecordingSurface::new());
        board.take_outgoing();
        board
    }

    fn draw(board: &mut Whiteboard<RecordingSurface>, points: &[Point]) {
        board.pointer_down(points[0]);
        for p in &points[1..] {
            board.pointer_move(*p);
        }
        board.pointer_up();
    }

    fn visible(board: &Whiteboard<RecordingSurface>) -> Vec<Segment> {
        board.surface().unwrap().visible().into_iter().cloned().collect()
    }

    #[test]
    fn test_new_board_queues_join() {
        let mut board = Whiteboard::<RecordingSurface>::new("r0001");
        assert_eq!(
            board.take_outgoing(),
            vec![ClientMessage::JoinRoom { room_id: "r0001".to_string() }]
        );
        assert_eq!(board.pending_outgoing(), 0);
    }

    #[test]
    fn test_three_point_stroke_scenario() {
        let mut board = board("r0001");
        board.set_color("#000000");
        board.set_size(3.0);
        let (p0, p1, p2) = (Point::new(0.0, 0.0), Point::new(4.0, 3.0), Point::new(8.0, 0.0));

        board.pointer_down(p0);
        board.pointer_move(p1);
        board.pointer_move(p2);
        assert!(board.pointer_up());

        let s01 = Segment::between(p0, p1, "#000000", 3.0);
        let s12 = Segment::between(p1, p2, "#000000", 3.0);
        assert_eq!(
            board.take_outgoing(),
            vec![
                ClientMessage::Drawing { room_id: "r0001".to_string(), data: s01.clone() },
                ClientMessage::Drawing { room_id: "r0001".to_string(), data: s12.clone() },
            ]
        );
        assert_eq!(board.undo_stack().len(), 1);
        assert_eq!(board.undo_stack()[0].points, vec![p0, p1, p2]);
        assert_eq!(visible(&board), vec![s01.clone(), s12.clone()]);

        assert!(board.undo());
        assert!(board.undo_stack().is_empty());
        assert_eq!(board.redo_stack().len(), 1);
        assert!(board.surface().unwrap().is_blank());

        assert!(board.redo());
        assert_eq!(visible(&board), vec![s01, s12]);
        // Undo and redo stay local.
        assert_eq!(board.pending_outgoing(), 0);
    }

    #[test]
    fn test_n_strokes_n_undos_blank() {
        let mut board = board("r");
        for i in 0..4 {
            let y = i as f64 * 10.0;
            draw(&mut board, &[Point::new(0.0, y), Point::new(5.0, y), Point::new(10.0, y)]);
        }
        for _ in 0..4 {
            assert!(board.undo());
        }
        assert!(board.surface().unwrap().is_blank());
        assert!(!board.undo());
    }

    #[test]
    fn test_undo_redo_restores_bitmap() {
        let mut board = board("r");
        draw(&mut board, &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        draw(&mut board, &[Point::new(5.0, 5.0), Point::new(6.0, 6.0), Point::new(7.0, 5.0)]);
        let stack_before = board.undo_stack().to_vec();
        let bitmap_before = visible(&board);

        board.undo();
        board.undo();
        board.redo();
        board.redo();

        assert_eq!(board.undo_stack(), stack_before.as_slice());
        assert_eq!(visible(&board), bitmap_before);
    }

    #[test]
    fn test_new_stroke_after_undo_disables_redo() {
        let mut board = board("r");
        draw(&mut board, &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        board.undo();
        draw(&mut board, &[Point::new(2.0, 2.0), Point::new(3.0, 3.0)]);

        assert!(!board.can_redo());
        assert!(!board.redo());
        assert_eq!(board.undo_stack().len(), 1);
    }

    #[test]
    fn test_clear_all() {
        let mut board = board("r0003");
        draw(&mut board, &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        draw(&mut board, &[Point::new(2.0, 2.0), Point::new(3.0, 3.0)]);
        board.undo();
        board.take_outgoing();

        board.clear_all();

        assert!(board.surface().unwrap().is_blank());
        assert!(!board.undo());
        assert!(!board.redo());
        assert_eq!(
            board.take_outgoing(),
            vec![ClientMessage::ClearCanvas { room_id: "r0003".to_string() }]
        );
    }

    #[test]
    fn test_tap_emits_nothing() {
        let mut board = board("r");
        board.pointer_down(Point::new(1.0, 1.0));
        assert!(!board.pointer_up());
        assert_eq!(board.pending_outgoing(), 0);
        assert!(!board.can_undo());
    }

    #[test]
    fn test_eraser_stroke() {
        let mut board = board("r");
        board.set_color("#123456");
        board.set_tool(ToolKind::Eraser);
        draw(&mut board, &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert_eq!(board.undo_stack()[0].color, ERASER_COLOR);
    }

    #[test]
    fn test_remote_segment_not_undoable() {
        let mut board = board("r");
        let seg = Segment::between(Point::new(0.0, 0.0), Point::new(10.0, 10.0), "#ff0000", 5.0);
        let effect = board.handle_server_message(&ServerMessage::Drawing { data: seg.clone() });

        assert_eq!(effect, RemoteEffect::Painted);
        assert_eq!(visible(&board), vec![seg]);
        assert!(!board.can_undo());
        assert!(!board.undo());
    }

    #[test]
    fn test_remote_clear_resets_history() {
        let mut board = board("r");
        draw(&mut board, &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        board.take_outgoing();

        let effect = board.handle_server_text(r#"{"type":"clear-canvas"}"#);

        assert_eq!(effect, Some(RemoteEffect::Cleared));
        assert!(!board.can_undo());
        assert!(board.surface().unwrap().is_blank());
        // A relayed clear is not echoed back.
        assert_eq!(board.pending_outgoing(), 0);
    }

    #[test]
    fn test_malformed_text_dropped() {
        let mut board = board("r");
        draw(&mut board, &[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert_eq!(board.handle_server_text("{not json"), None);
        assert_eq!(board.handle_server_text(r#"{"type":"drawing"}"#), None);
        assert!(board.can_undo());
    }

    #[test]
    fn test_drawing_without_surface() {
        let mut board = Whiteboard::<RecordingSurface>::new("r");
        board.take_outgoing();
        draw(&mut board, &[Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(2.0, 0.0)]);
        assert!(board.undo());
        assert!(board.redo());
        assert_eq!(board.pending_outgoing(), 2);

        board.attach_surface(RecordingSurface::new());
        assert_eq!(visible(&board).len(), 2);

        let detached = board.detach_surface();
        assert!(detached.is_some());
        assert!(board.surface().is_none());
    }

    #[test]
    fn test_reconnect_requeues_join_once() {
        let mut board = Whiteboard::<RecordingSurface>::new("r0009");
        board.handle_sync_event(&SyncEvent::Connected);
        assert_eq!(board.pending_outgoing(), 1);

        board.take_outgoing();
        board.handle_sync_event(&SyncEvent::Connected);
        assert_eq!(
            board.take_outgoing(),
            vec![ClientMessage::JoinRoom { room_id: "r0009".to_string() }]
        );
    }
}
