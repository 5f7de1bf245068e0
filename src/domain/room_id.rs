//! Room identifier chosen by clients.

use std::fmt;

use serde::Serialize;

use crate::error::GameError;

/// Longest accepted room key, in bytes.
pub const MAX_ROOM_ID_LEN: usize = 128;

/// Client-chosen key under which a session is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Validates and wraps a raw room key.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidRoomId`] if the key is longer than
    /// [`MAX_ROOM_ID_LEN`] bytes. Any shorter string, including the empty
    /// one, is a valid key.
    pub fn parse(raw: impl Into<String>) -> Result<Self, GameError> {
        let raw = raw.into();
        if raw.len() > MAX_ROOM_ID_LEN {
            return Err(GameError::InvalidRoomId(format!(
                "room id exceeds {MAX_ROOM_ID_LEN} bytes"
            )));
        }
        Ok(Self(raw))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_keys() {
        let id = RoomId::parse("r1");
        assert_eq!(id.as_ref().map(RoomId::as_str).ok(), Some("r1"));
    }

    #[test]
    fn empty_key_is_a_room_like_any_other() {
        let id = RoomId::parse("");
        assert_eq!(id.as_ref().map(RoomId::as_str).ok(), Some(""));
    }

    #[test]
    fn rejects_oversized_keys() {
        assert!(RoomId::parse("x".repeat(MAX_ROOM_ID_LEN + 1)).is_err());
        assert!(RoomId::parse("x".repeat(MAX_ROOM_ID_LEN)).is_ok());
    }
}
