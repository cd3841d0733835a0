//! Room membership.
//!
//! A room exists only while it has members: it is created by the first join and
//! removed when its last member leaves.

use crate::protocol::ServerMessage;
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Identifier of one live connection.
pub type SessionId = Uuid;

/// Outbound queue of a session. Forwards are `try_send`, never awaited.
pub type PeerHandle = mpsc::Sender<ServerMessage>;

/// Members of one room.
#[derive(Default)]
struct Room {
    peers: HashMap<SessionId, PeerHandle>,
}

/// Maps room ids to their member sessions.
#[derive(Default)]
pub struct RoomRegistry {
    /// Active rooms
    rooms: DashMap<String, Room>,
    /// Rooms each session joined, for cleanup on disconnect
    memberships: DashMap<SessionId, HashSet<String>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session to a room, creating the room if needed.
    /// Returns false if the session was already a member.
    pub fn join(&self, room_id: &str, session: SessionId, handle: PeerHandle) -> bool {
        let added = self
            .rooms
            .entry(room_id.to_string())
            .or_default()
            .peers
            .insert(session, handle)
            .is_none();
        self.memberships
            .entry(session)
            .or_default()
            .insert(room_id.to_string());
        added
    }

    /// Remove a session from every room it joined. Returns the rooms it left.
    pub fn remove_session(&self, session: SessionId) -> Vec<String> {
        let Some((_, rooms)) = self.memberships.remove(&session) else {
            return Vec::new();
        };
        for room_id in &rooms {
            if let Some(mut room) = self.rooms.get_mut(room_id) {
                room.peers.remove(&session);
            }
            self.rooms.remove_if(room_id, |_, room| room.peers.is_empty());
        }
        rooms.into_iter().collect()
    }

    /// Call `f` with every member of `room_id` except `exclude`.
    /// Returns the number of members visited.
    pub fn for_each_peer(
        &self,
        room_id: &str,
        exclude: SessionId,
        mut f: impl FnMut(SessionId, &PeerHandle),
    ) -> usize {
        let Some(room) = self.rooms.get(room_id) else {
            return 0;
        };
        let mut visited = 0;
        for (id, handle) in room.peers.iter().filter(|(id, _)| **id != exclude) {
            f(*id, handle);
            visited += 1;
        }
        visited
    }

    /// Check if a session is a member of a room.
    pub fn is_member(&self, room_id: &str, session: SessionId) -> bool {
        self.rooms
            .get(room_id)
            .is_some_and(|room| room.peers.contains_key(&session))
    }

    /// Number of members in a room (0 if it does not exist).
    pub fn member_count(&self, room_id: &str) -> usize {
        self.rooms.get(room_id).map_or(0, |room| room.peers.len())
    }

    /// Number of rooms with at least one member.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
