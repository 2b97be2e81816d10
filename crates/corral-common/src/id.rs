//! Opaque object ID generation and validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CorralError, CorralResult};

/// A validated, engine-assigned object ID (networks, endpoints).
///
/// Object IDs must:
/// - Be 1-64 characters long
/// - Contain only alphanumeric characters, hyphens, and underscores
/// - Start with an alphanumeric character
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Maximum length of an object ID.
    pub const MAX_LENGTH: usize = 64;

    /// Create a new object ID, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID format is invalid.
    pub fn new(id: impl Into<String>) -> CorralResult<Self> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Generate a new random object ID.
    ///
    /// The ID is a 12-character hex string derived from a UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let hex = hex::encode(&uuid.as_bytes()[..6]);
        Self(hex)
    }

    /// Get the object ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate an object ID string.
    fn validate(id: &str) -> CorralResult<()> {
        if id.is_empty() || id.len() > Self::MAX_LENGTH {
            return Err(CorralError::InvalidId { id: id.to_string() });
        }

        let first_char = id.chars().next().unwrap();
        if !first_char.is_ascii_alphanumeric() {
            return Err(CorralError::InvalidId { id: id.to_string() });
        }

        for c in id.chars() {
            if !c.is_ascii_alphanumeric() && c != '-' && c != '_' {
                return Err(CorralError::InvalidId { id: id.to_string() });
            }
        }

        Ok(())
    }

    /// Returns a short version of the ID (first 12 characters).
    #[must_use]
    pub fn short(&self) -> &str {
        if self.0.len() <= 12 {
            &self.0
        } else {
            &self.0[..12]
        }
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectId {
    type Err = CorralError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_object_ids() {
        assert!(ObjectId::new("abc123").is_ok());
        assert!(ObjectId::new("my-network").is_ok());
        assert!(ObjectId::new("my_network").is_ok());
        assert!(ObjectId::new("Net-123_test").is_ok());
    }

    #[test]
    fn invalid_object_ids() {
        assert!(ObjectId::new("").is_err());
        assert!(ObjectId::new("-invalid").is_err());
        assert!(ObjectId::new("_invalid").is_err());
        assert!(ObjectId::new("invalid!").is_err());
        assert!(ObjectId::new("a".repeat(65)).is_err());
    }

    #[test]
    fn generate_object_id() {
        let id1 = ObjectId::generate();
        let id2 = ObjectId::generate();
        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 12);
    }

    #[test]
    fn short_id() {
        let id = ObjectId::new("0123456789abcdef").unwrap();
        assert_eq!(id.short(), "0123456789ab");
    }
}
