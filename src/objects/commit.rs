//! Commit record
//!
//! A commit captures a full tree snapshot plus metadata. Records are
//! serialized as text objects:
//!
//! ```text
//! id=<hex64>
//! author=<str>
//! timestamp=<YYYY-MM-DDTHH:MM:SS>
//! branch=<str>
//! parent=<hex64 | "null">
//! message=<str>
//! files:
//! <path>\t<hex64>
//! ...
//! ```
//!
//! The id is the SHA-256 of the *body*, meaning every line after the
//! `id=` line, byte for byte. Serialization therefore has to be stable:
//! the same record always produces the same bytes.

use chrono::{NaiveDateTime, Timelike};

use crate::error::{Error, Result};
use crate::hashing::hash_bytes;
use crate::objects::object_id::ObjectId;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current local time, truncated to whole seconds (the serialized form
/// carries no sub-second precision).
pub fn local_timestamp() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    id: ObjectId,
    parent: Option<ObjectId>,
    author: String,
    timestamp: NaiveDateTime,
    branch: String,
    message: String,
    files: Vec<(String, ObjectId)>,
}

impl CommitRecord {
    /// Assemble a record and derive its id from the body.
    pub fn build(
        parent: Option<ObjectId>,
        author: String,
        timestamp: NaiveDateTime,
        branch: String,
        message: String,
        files: Vec<(String, ObjectId)>,
    ) -> Self {
        let body = compose_body(&parent, &author, timestamp, &branch, &message, &files);
        let id = ObjectId::try_parse(hash_bytes(body.as_bytes()))
            .unwrap_or_else(|_| unreachable!("sha256 output is always a valid object id"));
        CommitRecord {
            id,
            parent,
            author,
            timestamp,
            branch,
            message,
            files,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn files(&self) -> &[(String, ObjectId)] {
        &self.files
    }

    /// The hashed portion of the record: everything after the `id=` line.
    pub fn body(&self) -> String {
        compose_body(
            &self.parent,
            &self.author,
            self.timestamp,
            &self.branch,
            &self.message,
            &self.files,
        )
    }

    /// Full on-disk form: `id=<id>\n` + body.
    pub fn serialize(&self) -> String {
        format!("id={}\n{}", self.id, self.body())
    }

    pub fn deserialize(text: &str) -> Result<Self> {
        let mut id = None;
        let mut parent = None;
        let mut author = None;
        let mut timestamp = None;
        let mut branch = None;
        let mut message = None;
        let mut files = Vec::new();
        let mut in_files = false;

        for line in text.lines() {
            if in_files {
                let Some((path, oid)) = line.split_once('\t') else {
                    continue;
                };
                files.push((path.to_string(), ObjectId::try_parse(oid)?));
                continue;
            }
            if line == "files:" {
                in_files = true;
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key {
                "id" => id = Some(ObjectId::try_parse(value)?),
                "parent" => {
                    parent = match value {
                        "null" | "" => None,
                        oid => Some(ObjectId::try_parse(oid)?),
                    }
                }
                "author" => author = Some(value.to_string()),
                "timestamp" => {
                    timestamp = Some(
                        NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
                            .map_err(|e| Error::corrupt(format!("bad commit timestamp: {e}")))?,
                    )
                }
                "branch" => branch = Some(value.to_string()),
                "message" => message = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(CommitRecord {
            id: id.ok_or_else(|| Error::corrupt("commit record missing id"))?,
            parent,
            author: author.ok_or_else(|| Error::corrupt("commit record missing author"))?,
            timestamp: timestamp
                .ok_or_else(|| Error::corrupt("commit record missing timestamp"))?,
            branch: branch.ok_or_else(|| Error::corrupt("commit record missing branch"))?,
            message: message.ok_or_else(|| Error::corrupt("commit record missing message"))?,
            files,
        })
    }
}

fn compose_body(
    parent: &Option<ObjectId>,
    author: &str,
    timestamp: NaiveDateTime,
    branch: &str,
    message: &str,
    files: &[(String, ObjectId)],
) -> String {
    let mut body = String::new();
    body.push_str(&format!("author={author}\n"));
    body.push_str(&format!(
        "timestamp={}\n",
        timestamp.format(TIMESTAMP_FORMAT)
    ));
    body.push_str(&format!("branch={branch}\n"));
    body.push_str(&format!(
        "parent={}\n",
        parent.as_ref().map(|p| p.as_ref()).unwrap_or("null")
    ));
    body.push_str(&format!("message={message}\n"));
    body.push_str("files:\n");
    for (path, oid) in files {
        body.push_str(&format!("{path}\t{oid}\n"));
    }
    body
}
