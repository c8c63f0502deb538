//! core::types
//!
//! Strong types shared across the admission pipeline.
//!
//! # Types
//!
//! - [`Oid`] - Object identifier (SHA-1 commit ids, SHA-256 large-file ids)
//! - [`Committer`] - Identity of the person pushing
//!
//! # Validation
//!
//! Identifiers are validated at construction time so that the scanner and
//! uploaders never have to re-check hex formatting.
//!
//! # Examples
//!
//! ```
//! use lfsgate::core::types::Oid;
//!
//! let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
//! assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
//! assert!(Oid::new("not-a-sha").is_err());
//! assert!(Oid::new(Oid::NULL_SHA1).is_ok());
//! ```

use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid pointer: {0}")]
    InvalidPointer(String),
}

/// A validated object identifier.
///
/// Git commit ids are 40 hex characters (SHA-1) or 64 (SHA-256 repositories).
/// Large-file object ids are always 64 hex characters. Both are normalized to
/// lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid(String);

impl Oid {
    /// The null revision git uses for "ref does not exist".
    pub const NULL_SHA1: &'static str = "0000000000000000000000000000000000000000";

    /// Create a new validated object id.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not 40 or 64 hex characters.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    fn validate(oid: &str) -> Result<(), TypeError> {
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        // hex::decode also rejects odd lengths, which the length check covers
        hex::decode(oid).map_err(|_| TypeError::InvalidOid(format!("not hexadecimal: {oid}")))?;
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The identity of the person pushing.
///
/// Lock ownership is decided by comparing both name and email.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Committer {
    /// Committer name
    pub name: String,
    /// Committer email
    pub email: String,
}

impl Committer {
    /// Create a committer identity.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl std::fmt::Display for Committer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}
