//! Object identifier (SHA-256 hash)
//!
//! Object IDs are 64-character lowercase hexadecimal strings. They identify
//! both blobs and commit records. Objects live in a flat directory, so the
//! id is also the object's filename.

use crate::error::Error;
use crate::objects::OBJECT_ID_LENGTH;

/// A validated 64-character hex SHA-256 identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string.
    pub fn try_parse(id: impl Into<String>) -> crate::error::Result<Self> {
        let id = id.into();
        if id.len() != OBJECT_ID_LENGTH
            || !id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
        {
            return Err(Error::corrupt(format!("invalid object id '{id}'")));
        }
        Ok(Self(id))
    }

    /// Abbreviated form for display (first 7 characters).
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(7).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::hash_bytes;

    #[test]
    fn accepts_a_real_digest() {
        let oid = ObjectId::try_parse(hash_bytes(b"hello")).unwrap();
        assert_eq!(oid.as_ref().len(), 64);
        assert_eq!(oid.to_short_oid().len(), 7);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(ObjectId::try_parse("abc123").is_err());
    }

    #[test]
    fn rejects_non_hex_and_uppercase() {
        assert!(ObjectId::try_parse("z".repeat(64)).is_err());
        assert!(ObjectId::try_parse("A".repeat(64)).is_err());
    }
}
