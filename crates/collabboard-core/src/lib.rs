//! CollabBoard Core Library
//!
//! Platform-agnostic client logic for the CollabBoard shared whiteboard: pointer
//! strokes, local undo/redo with full repaint, relayed peer events and the wire
//! protocol spoken with the relay server.

pub mod board;
pub mod draw;
pub mod history;
pub mod remote;
pub mod room;
pub mod stroke;
pub mod surface;
pub mod sync;
pub mod tools;

pub use board::Whiteboard;
pub use draw::{DrawEngine, DrawState};
pub use history::StrokeHistory;
pub use kurbo::Point;
pub use remote::RemoteEffect;
pub use room::new_room_id;
pub use stroke::{Segment, Stroke};
pub use surface::{CanvasSurface, RecordingSurface, SurfaceOp};
pub use sync::{ClientMessage, ConnectionState, ServerMessage, SyncEvent, TransportError};
pub use tools::{ToolKind, ToolSettings};

#[cfg(not(target_arch = "wasm32"))]
pub use sync::NativeWebSocket;
