//! Room-scoped fan-out of drawing events.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::registry::{PeerHandle, RoomRegistry, SessionId};
use serde_json::Value;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info};
use uuid::Uuid;

/// Shared relay state: the room registry plus per-session queue sizing.
///
/// Every operation runs to completion without awaiting, so a message's membership
/// change or fan-out is applied atomically with respect to that sender's next message.
pub struct RelayEngine {
    registry: RoomRegistry,
    peer_queue: usize,
}

/// A registered connection: its id and the handle peers forward into.
#[derive(Clone)]
pub struct Session {
    pub id: SessionId,
    pub handle: PeerHandle,
}

impl RelayEngine {
    /// Create a relay whose sessions buffer up to `peer_queue` outbound messages.
    pub fn new(peer_queue: usize) -> Self {
        Self {
            registry: RoomRegistry::new(),
            peer_queue: peer_queue.max(1),
        }
    }

    /// Allocate a session for a new connection. The receiver is drained by the
    /// connection task into its socket.
    pub fn open_session(&self) -> (Session, mpsc::Receiver<ServerMessage>) {
        let (handle, outbound) = mpsc::channel(self.peer_queue);
        let session = Session {
            id: Uuid::new_v4(),
            handle,
        };
        (session, outbound)
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Add a session to a room. Idempotent.
    pub fn join(&self, session: &Session, room_id: &str) {
        if self.registry.join(room_id, session.id, session.handle.clone()) {
            info!("User {} joined room: {}", session.id, room_id);
        }
    }

    /// Forward a segment to every other member of `room_id`.
    /// Returns the number of peers it was queued for.
    pub fn relay_drawing(&self, session: SessionId, room_id: &str, data: Value) -> usize {
        self.fan_out(session, room_id, ServerMessage::Drawing { data })
    }

    /// Forward a clear to every other member of `room_id`.
    /// Returns the number of peers it was queued for.
    pub fn relay_clear(&self, session: SessionId, room_id: &str) -> usize {
        self.fan_out(session, room_id, ServerMessage::ClearCanvas)
    }

    /// Apply one parsed client message.
    pub fn dispatch(&self, session: &Session, msg: ClientMessage) {
        match msg {
            ClientMessage::JoinRoom { room_id } => self.join(session, &room_id),
            ClientMessage::Drawing { room_id, data } => {
                self.relay_drawing(session.id, &room_id, data);
            }
            ClientMessage::ClearCanvas { room_id } => {
                self.relay_clear(session.id, &room_id);
            }
        }
    }

    /// Drop a session from every room. Peers are not notified.
    pub fn disconnect(&self, session: SessionId) {
        let rooms = self.registry.remove_session(session);
        debug!("Session {} removed from {} room(s)", session, rooms.len());
    }

    /// Queue `msg` for each peer. A full or closed queue drops that single forward.
    fn fan_out(&self, from: SessionId, room_id: &str, msg: ServerMessage) -> usize {
        let mut delivered = 0;
        self.registry.for_each_peer(room_id, from, |peer, handle| {
            match handle.try_send(msg.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    debug!("Queue full for {}, dropping forward in room {}", peer, room_id);
                }
                Err(TrySendError::Closed(_)) => {
                    debug!("Peer {} is gone, dropping forward in room {}", peer, room_id);
                }
            }
        });
        delivered
    }
}

impl Default for RelayEngine {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_PEER_QUEUE)
    }
}
