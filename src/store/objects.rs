//! store::objects
//!
//! Content-addressed, immutable object storage.
//!
//! # Architecture
//!
//! Every stored payload (file blob or serialized commit) lives in one file
//! under `objects/`, named by the SHA-256 hex digest of its bytes. The
//! digest is both address and integrity check.
//!
//! # Invariants
//!
//! - Objects are immutable once written; `put` of an existing digest is a
//!   no-op, never an overwrite
//! - Two payloads with identical bytes share one stored object
//!   (deduplication falls out of content addressing)
//! - A torn write is detectable (stored bytes no longer hash to the file
//!   name) and safely repeated by the next `put`

use std::fs;
use std::io;

use crate::core::errors::RepoError;
use crate::core::paths::RepoPaths;
use crate::core::types::Digest;

use super::write_atomic;

/// Content-addressed object storage rooted at `objects/`.
#[derive(Debug, Clone)]
pub struct ObjectStore {
    paths: RepoPaths,
}

impl ObjectStore {
    /// Create an object store over a repository's paths.
    pub fn new(paths: RepoPaths) -> Self {
        Self { paths }
    }

    /// Store `content`, returning its digest.
    ///
    /// Idempotent: if an intact object with the same digest already
    /// exists, nothing is written. A damaged object (bytes that no longer
    /// hash to the file name, e.g. after a torn write) is rewritten.
    ///
    /// # Errors
    ///
    /// Returns `RepoError::Storage` on I/O failure.
    pub fn put(&self, content: &[u8]) -> Result<Digest, RepoError> {
        let digest = Digest::of_bytes(content);
        let path = self.paths.object_path(digest.as_str());

        if let Ok(existing) = fs::read(&path) {
            if Digest::of_bytes(&existing) == digest {
                return Ok(digest);
            }
        }

        write_atomic(&path, content)?;
        Ok(digest)
    }

    /// Read the content stored under `digest`.
    ///
    /// # Errors
    ///
    /// - `RepoError::ObjectNotFound` if the digest is unknown
    /// - `RepoError::Storage` on I/O failure or if the stored bytes do not
    ///   hash back to `digest` (torn or tampered object)
    pub fn get(&self, digest: &Digest) -> Result<Vec<u8>, RepoError> {
        let path = self.paths.object_path(digest.as_str());
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RepoError::ObjectNotFound(digest.clone()))
            }
            Err(e) => return Err(RepoError::Storage(e)),
        };

        if Digest::of_bytes(&content) != *digest {
            return Err(RepoError::Storage(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("object {digest} failed integrity check"),
            )));
        }

        Ok(content)
    }

    /// Whether an object with this digest exists.
    pub fn contains(&self, digest: &Digest) -> bool {
        self.paths.object_path(digest.as_str()).is_file()
    }
}
