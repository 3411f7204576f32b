//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Digest`] - SHA-256 content address, hex-encoded
//! - [`BranchName`] - Validated branch name
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use stratum::core::types::{BranchName, Digest};
//!
//! // Valid constructions
//! let branch = BranchName::new("feature-work").unwrap();
//! let digest = Digest::of_bytes(b"hello");
//!
//! // Invalid constructions fail at creation time
//! assert!(BranchName::new("invalid..name").is_err());
//! assert!(Digest::new("not-a-digest").is_err());
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),
}

/// A SHA-256 content address, stored as 64 lowercase hex characters.
///
/// Digests double as both object address and integrity check: the digest
/// of a stored payload is recomputable from its bytes, so a mismatch
/// between file name and content is detectable.
///
/// # Example
///
/// ```
/// use stratum::core::types::Digest;
///
/// // Compute from content
/// let digest = Digest::of_bytes(b"hello");
/// assert_eq!(digest.as_str().len(), 64);
///
/// // Parse from hex (normalized to lowercase)
/// let parsed = Digest::new(digest.as_str().to_uppercase()).unwrap();
/// assert_eq!(parsed, digest);
///
/// // Abbreviated form for display
/// assert_eq!(digest.short(8).len(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Digest(String);

impl Digest {
    /// Number of hex characters in a digest.
    pub const HEX_LEN: usize = 64;

    /// Compute the digest of a byte sequence.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Create a validated digest from a hex string.
    ///
    /// The digest is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidDigest` if the string is not 64 hex
    /// characters.
    pub fn new(digest: impl Into<String>) -> Result<Self, TypeError> {
        let digest = digest.into().to_ascii_lowercase();
        Self::validate(&digest)?;
        Ok(Self(digest))
    }

    /// Get an abbreviated form of the digest.
    ///
    /// Returns the first `len` characters. If `len` exceeds the digest
    /// length, returns the full digest.
    pub fn short(&self, len: usize) -> &str {
        let end = len.min(self.0.len());
        &self.0[..end]
    }

    /// Validate a hex digest string.
    fn validate(digest: &str) -> Result<(), TypeError> {
        if digest.len() != Self::HEX_LEN {
            return Err(TypeError::InvalidDigest(format!(
                "expected {} hex characters, got {}",
                Self::HEX_LEN,
                digest.len()
            )));
        }
        if !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidDigest(
                "digest must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Digest {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated branch name.
///
/// Branch names become file names under `refs/heads/`, so the rules are a
/// flat-namespace subset of Git's refname rules:
/// - Cannot be empty
/// - Cannot start with `.` or `-`
/// - Cannot end with `.lock` or `.tmp`
/// - Cannot contain `..`, `@{`, or ASCII control characters
/// - Cannot contain `/`, spaces, `~`, `^`, `:`, `\`, `?`, `*`, `[`
/// - Cannot be exactly `@` or `HEAD`
///
/// # Example
///
/// ```
/// use stratum::core::types::BranchName;
///
/// let name = BranchName::new("feature-auth").unwrap();
/// assert_eq!(name.as_str(), "feature-auth");
///
/// assert!(BranchName::new("").is_err());
/// assert!(BranchName::new(".hidden").is_err());
/// assert!(BranchName::new("has space").is_err());
/// assert!(BranchName::new("nested/branch").is_err());
/// assert!(BranchName::new("HEAD").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    /// Create a new validated branch name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidBranchName` if the name violates the
    /// naming rules.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Validate a branch name.
    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot be empty".into(),
            ));
        }

        // "@" and "HEAD" are reserved
        if name == "@" || name == "HEAD" {
            return Err(TypeError::InvalidBranchName(format!(
                "branch name cannot be '{name}' (reserved)"
            )));
        }

        if name.starts_with('.') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start with '.'".into(),
            ));
        }
        if name.starts_with('-') {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot start with '-'".into(),
            ));
        }
        // ".lock" and ".tmp" suffixes are reserved for ref-file bookkeeping
        if name.ends_with(".lock") {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot end with '.lock'".into(),
            ));
        }
        if name.ends_with(".tmp") {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot end with '.tmp'".into(),
            ));
        }
        if name.contains("..") {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain '..'".into(),
            ));
        }
        if name.contains("@{") {
            return Err(TypeError::InvalidBranchName(
                "branch name cannot contain '@{'".into(),
            ));
        }

        // Flat ref namespace: one file per branch under refs/heads/
        const INVALID_CHARS: [char; 9] = ['/', ' ', '~', '^', ':', '\\', '?', '*', '['];
        for c in INVALID_CHARS {
            if name.contains(c) {
                return Err(TypeError::InvalidBranchName(format!(
                    "branch name cannot contain '{c}'"
                )));
            }
        }

        for c in name.chars() {
            if c.is_ascii_control() {
                return Err(TypeError::InvalidBranchName(
                    "branch name cannot contain control characters".into(),
                ));
            }
        }

        Ok(())
    }

    /// Get the branch name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BranchName {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<BranchName> for String {
    fn from(name: BranchName) -> Self {
        name.0
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_of_bytes_is_stable() {
        let a = Digest::of_bytes(b"hello");
        let b = Digest::of_bytes(b"hello");
        assert_eq!(a, b);
        assert_ne!(a, Digest::of_bytes(b"world"));
    }

    #[test]
    fn digest_normalizes_case() {
        let digest = Digest::of_bytes(b"x");
        let upper = digest.as_str().to_uppercase();
        assert_eq!(Digest::new(upper).unwrap(), digest);
    }

    #[test]
    fn digest_rejects_wrong_length() {
        assert!(Digest::new("abc123").is_err());
        assert!(Digest::new("g".repeat(64)).is_err());
    }

    #[test]
    fn branch_name_accepts_reasonable_names() {
        for name in ["master", "feature-auth", "release_1.2", "user@work"] {
            assert!(BranchName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn branch_name_rejects_invalid_names() {
        for name in [
            "", "@", "HEAD", ".hidden", "-flag", "a..b", "x.lock", "x.tmp", "a/b", "has space",
            "a@{b",
        ] {
            assert!(BranchName::new(name).is_err(), "{name} should be invalid");
        }
    }
}
