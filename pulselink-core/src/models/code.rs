use nanoid::nanoid;
use serde::{Deserialize, Serialize};

/// Room code correlating two participants' connections and one persisted row.
///
/// Uppercase-normalized at construction; every boundary (registration,
/// login, join, pulse, gift) builds one of these, so `abc12` and `AbC12`
/// always resolve to the same room. Bypassing `new` would let rooms
/// silently fragment by case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Deserialization goes through `new` so wire payloads are normalized too.
impl<'de> Deserialize<'de> for RoomCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

impl std::fmt::Display for RoomCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport-level connection identifier (12-character nanoid).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionId(String);

impl ConnectionId {
    #[must_use]
    pub fn new() -> Self {
        Self(nanoid!(12))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_code_is_case_insensitive() {
        assert_eq!(RoomCode::new("abc123"), RoomCode::new("ABC123"));
        assert_eq!(RoomCode::new("AbC123"), RoomCode::new("abc123"));
        assert_eq!(RoomCode::new("abc123").as_str(), "ABC123");
    }

    #[test]
    fn test_room_code_trims_whitespace() {
        assert_eq!(RoomCode::new("  abc123 ").as_str(), "ABC123");
        assert!(RoomCode::new("   ").is_empty());
    }

    #[test]
    fn test_room_code_normalizes_on_deserialize() {
        let code: RoomCode = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(code.as_str(), "ABC123");
    }

    #[test]
    fn test_connection_id_is_unique() {
        let a = ConnectionId::new();
        let b = ConnectionId::new();

        assert_eq!(a.as_str().len(), 12);
        assert_ne!(a, b);
    }
}
