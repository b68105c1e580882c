//! Blob object
//!
//! A blob is a byte-identical snapshot of a workspace file, stored at
//! `.glite/objects/<sha256(content)>`. There is no header and no
//! compression; the object file's bytes are the file's bytes, so blobs
//! deduplicate naturally by content hash.

use bytes::Bytes;
use derive_new::new;

use crate::hashing::hash_bytes;
use crate::objects::object_id::ObjectId;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn from_bytes(content: impl Into<Bytes>) -> Self {
        Blob::new(content.into())
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// The blob's id is the SHA-256 of its bytes (invariant: the id is also
    /// the object filename).
    pub fn object_id(&self) -> ObjectId {
        ObjectId::try_parse(hash_bytes(&self.content))
            .unwrap_or_else(|_| unreachable!("sha256 output is always a valid object id"))
    }
}
