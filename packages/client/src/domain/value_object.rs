//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

const MAX_USER_ID_LEN: usize = 100;
const MAX_ROOM_ID_LEN: usize = 100;
const MAX_GAME_KEY_LEN: usize = 300;

/// User identifier value object.
///
/// Represents the name a participant votes under inside a room.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId.
    ///
    /// # Arguments
    ///
    /// * `id` - The user identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the UserId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::UserIdEmpty);
        }
        let len = id.len();
        if len > MAX_USER_ID_LEN {
            return Err(ValueObjectError::UserIdTooLong {
                max: MAX_USER_ID_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room identifier value object.
///
/// Rooms are opaque ids handed out by the backend (e.g. `"04217"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(String);

impl RoomId {
    /// Create a new RoomId.
    ///
    /// # Arguments
    ///
    /// * `id` - The room identifier string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::RoomIdEmpty);
        }
        let len = id.len();
        if len > MAX_ROOM_ID_LEN {
            return Err(ValueObjectError::RoomIdTooLong {
                max: MAX_ROOM_ID_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Game key value object.
///
/// The key a game is deduplicated by inside a collection. It is the stable
/// catalog id whenever one is known, and the display name otherwise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GameKey(String);

impl GameKey {
    /// Create a new GameKey.
    pub fn new(key: String) -> Result<Self, ValueObjectError> {
        if key.is_empty() {
            return Err(ValueObjectError::GameKeyEmpty);
        }
        let len = key.len();
        if len > MAX_GAME_KEY_LEN {
            return Err(ValueObjectError::GameKeyTooLong {
                max: MAX_GAME_KEY_LEN,
                actual: len,
            });
        }
        Ok(Self(key))
    }

    /// Pick the key for a catalog record: id first, name as fallback.
    pub fn from_id_or_name(id: &str, name: &str) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            Self::new(name.to_string())
        } else {
            Self::new(id.to_string())
        }
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
