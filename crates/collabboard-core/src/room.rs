//! Room identifiers.

use uuid::Uuid;

/// Length of a generated room id.
pub const ROOM_ID_LEN: usize = 8;

/// Generate a short room id for a new board: the first characters of a UUID v4.
///
/// Collisions are possible in principle and accepted. Everything else treats room ids
/// as opaque strings.
pub fn new_room_id() -> String {
    let mut id = Uuid::new_v4().to_string();
    id.truncate(ROOM_ID_LEN);
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_shape() {
        let id = new_room_id();
        assert_eq!(id.len(), ROOM_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_room_ids_differ() {
        assert_ne!(new_room_id(), new_room_id());
    }
}
