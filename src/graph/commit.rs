//! graph::commit
//!
//! The commit record and its canonical serialization.
//!
//! # Canonical Format
//!
//! Version-tagged text, one commit per object:
//!
//! ```text
//! stratum commit v1
//! parent <64-hex | ->
//! timestamp <unix-seconds>
//! message <byte-len>
//! <message bytes>
//! entries <count>
//! entry <64-hex> <path>
//! ```
//!
//! The field order is fixed and is part of the compatibility surface: a
//! commit's digest is the SHA-256 of exactly these bytes, so any change
//! to the layout changes every downstream digest. The message is length
//! prefixed so messages containing newlines cannot break framing; entry
//! lines put the digest first because paths may contain spaces.
//!
//! Decoding is strict: wrong tag or version, out-of-order fields, or a
//! truncated payload all fail rather than yielding a partial record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::Digest;
use crate::store::index::IndexEntry;

/// Format tag at the head of every serialized commit.
const FORMAT_TAG: &str = "stratum commit";

/// Canonical format version this build reads and writes.
const FORMAT_VERSION: u32 = 1;

/// Sentinel for the absent parent of a root commit.
const NO_PARENT: &str = "-";

/// Errors from canonical commit decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("missing or malformed {0} line")]
    MalformedField(&'static str),

    #[error("unsupported format header '{0}'")]
    UnsupportedFormat(String),

    #[error("payload truncated while reading {0}")]
    Truncated(&'static str),

    #[error("message is not valid UTF-8")]
    MessageEncoding,

    #[error("entry count mismatch: header says {expected}, found {found}")]
    EntryCount { expected: usize, found: usize },

    #[error("invalid digest in {field}: {reason}")]
    InvalidDigest { field: &'static str, reason: String },

    #[error("trailing bytes after last entry")]
    TrailingBytes,
}

/// An immutable commit record.
///
/// A commit with `parent == None` is a root commit. Entries are the
/// staging index snapshot at commit time, in path-lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Parent commit, absent for a root commit.
    pub parent: Option<Digest>,
    /// Creation time, unix seconds.
    pub timestamp: i64,
    /// Commit message, verbatim.
    pub message: String,
    /// Snapshot of staged entries, path-ordered.
    pub entries: Vec<IndexEntry>,
}

impl Commit {
    /// Serialize to the canonical byte layout.
    ///
    /// Encoding identical logical commits always yields identical bytes,
    /// which is what makes commit digests reproducible.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = String::new();
        out.push_str(FORMAT_TAG);
        out.push_str(" v");
        out.push_str(&FORMAT_VERSION.to_string());
        out.push('\n');

        out.push_str("parent ");
        match &self.parent {
            Some(digest) => out.push_str(digest.as_str()),
            None => out.push_str(NO_PARENT),
        }
        out.push('\n');

        out.push_str("timestamp ");
        out.push_str(&self.timestamp.to_string());
        out.push('\n');

        out.push_str("message ");
        out.push_str(&self.message.len().to_string());
        out.push('\n');
        out.push_str(&self.message);
        out.push('\n');

        out.push_str("entries ");
        out.push_str(&self.entries.len().to_string());
        out.push('\n');
        for entry in &self.entries {
            out.push_str("entry ");
            out.push_str(entry.digest.as_str());
            out.push(' ');
            out.push_str(&entry.path);
            out.push('\n');
        }

        out.into_bytes()
    }

    /// The commit's digest: SHA-256 over the canonical bytes.
    pub fn digest(&self) -> Digest {
        Digest::of_bytes(&self.encode())
    }

    /// Deserialize from the canonical byte layout.
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut rest = bytes;

        let header = take_line(&mut rest, "format header")?;
        let expected = format!("{FORMAT_TAG} v{FORMAT_VERSION}");
        if header != expected {
            return Err(CodecError::UnsupportedFormat(header.to_string()));
        }

        let parent_raw = field_line(&mut rest, "parent")?;
        let parent = if parent_raw == NO_PARENT {
            None
        } else {
            Some(
                Digest::new(parent_raw).map_err(|e| CodecError::InvalidDigest {
                    field: "parent",
                    reason: e.to_string(),
                })?,
            )
        };

        let timestamp = field_line(&mut rest, "timestamp")?
            .parse::<i64>()
            .map_err(|_| CodecError::MalformedField("timestamp"))?;

        let message_len = field_line(&mut rest, "message")?
            .parse::<usize>()
            .map_err(|_| CodecError::MalformedField("message"))?;
        if rest.len() < message_len + 1 {
            return Err(CodecError::Truncated("message"));
        }
        let message = std::str::from_utf8(&rest[..message_len])
            .map_err(|_| CodecError::MessageEncoding)?
            .to_string();
        if rest[message_len] != b'\n' {
            return Err(CodecError::MalformedField("message"));
        }
        rest = &rest[message_len + 1..];

        let expected_entries = field_line(&mut rest, "entries")?
            .parse::<usize>()
            .map_err(|_| CodecError::MalformedField("entries"))?;

        let mut entries = Vec::with_capacity(expected_entries);
        while !rest.is_empty() {
            let line = take_line(&mut rest, "entry")?;
            let body = line
                .strip_prefix("entry ")
                .ok_or(CodecError::MalformedField("entry"))?;
            let (digest_raw, path) = body
                .split_once(' ')
                .ok_or(CodecError::MalformedField("entry"))?;
            let digest = Digest::new(digest_raw).map_err(|e| CodecError::InvalidDigest {
                field: "entry",
                reason: e.to_string(),
            })?;
            entries.push(IndexEntry {
                path: path.to_string(),
                digest,
            });
            if entries.len() > expected_entries {
                return Err(CodecError::TrailingBytes);
            }
        }

        if entries.len() != expected_entries {
            return Err(CodecError::EntryCount {
                expected: expected_entries,
                found: entries.len(),
            });
        }

        Ok(Self {
            parent,
            timestamp,
            message,
            entries,
        })
    }

    /// The commit's snapshot as a path-keyed map.
    ///
    /// This is the form the merge engine classifies against.
    pub fn entry_map(&self) -> BTreeMap<String, Digest> {
        self.entries
            .iter()
            .map(|e| (e.path.clone(), e.digest.clone()))
            .collect()
    }
}

/// Consume one `\n`-terminated UTF-8 line from `rest`.
fn take_line<'a>(rest: &mut &'a [u8], what: &'static str) -> Result<&'a str, CodecError> {
    let end = rest
        .iter()
        .position(|&b| b == b'\n')
        .ok_or(CodecError::Truncated(what))?;
    let line = std::str::from_utf8(&rest[..end]).map_err(|_| CodecError::MalformedField(what))?;
    *rest = &rest[end + 1..];
    Ok(line)
}

/// Consume one `<field> <value>` line, returning the value.
fn field_line<'a>(rest: &mut &'a [u8], field: &'static str) -> Result<&'a str, CodecError> {
    let line = take_line(rest, field)?;
    let (name, value) = line
        .split_once(' ')
        .ok_or(CodecError::MalformedField(field))?;
    if name != field {
        return Err(CodecError::MalformedField(field));
    }
    Ok(value)
}
