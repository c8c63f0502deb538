//! core::objects
//!
//! Tracked large objects and the pointer files that reference them.
//!
//! A pointer is a small text blob committed in place of the real content:
//!
//! ```text
//! version https://git-lfs.github.com/spec/v1
//! oid sha256:4d7a214614ab2935c943f9e0ff69d22eadbb8f32b1258daaa5e2ca24d17e2393
//! size 12345
//! ```

use crate::core::types::{Oid, TypeError};

/// Blobs at least this large are never pointers.
pub const MAX_POINTER_SIZE: usize = 1024;

const POINTER_VERSIONS: [&str; 2] = [
    "https://git-lfs.github.com/spec/v1",
    "https://hawser.github.com/spec/v1",
];

const OID_PREFIX: &str = "sha256:";

/// A parsed pointer file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    /// Content hash of the real object
    pub oid: Oid,
    /// Size of the real object in bytes
    pub size: u64,
}

impl Pointer {
    /// Parse pointer text.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPointer` if the text is not a pointer.
    ///
    /// # Example
    ///
    /// ```
    /// use lfsgate::core::objects::Pointer;
    ///
    /// let text = "version https://git-lfs.github.com/spec/v1\n\
    ///             oid sha256:4d7a214614ab2935c943f9e0ff69d22eadbb8f32b1258daaa5e2ca24d17e2393\n\
    ///             size 12345\n";
    /// let pointer = Pointer::parse(text).unwrap();
    /// assert_eq!(pointer.size, 12345);
    /// ```
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let version = lines
            .next()
            .and_then(|l| l.strip_prefix("version "))
            .ok_or_else(|| TypeError::InvalidPointer("missing version line".into()))?;
        if !POINTER_VERSIONS.contains(&version) {
            return Err(TypeError::InvalidPointer(format!(
                "unknown version '{}'",
                version
            )));
        }

        let mut oid = None;
        let mut size = None;
        for line in lines {
            let (key, value) = line
                .split_once(' ')
                .ok_or_else(|| TypeError::InvalidPointer(format!("malformed line '{}'", line)))?;
            match key {
                "oid" => {
                    let hash = value.strip_prefix(OID_PREFIX).ok_or_else(|| {
                        TypeError::InvalidPointer(format!("unsupported oid '{}'", value))
                    })?;
                    oid = Some(Oid::new(hash)?);
                }
                "size" => {
                    let parsed = value
                        .parse::<u64>()
                        .map_err(|_| TypeError::InvalidPointer(format!("bad size '{}'", value)))?;
                    size = Some(parsed);
                }
                // Extension keys are allowed and ignored
                _ => {}
            }
        }

        match (oid, size) {
            (Some(oid), Some(size)) => Ok(Self { oid, size }),
            (None, _) => Err(TypeError::InvalidPointer("missing oid".into())),
            (_, None) => Err(TypeError::InvalidPointer("missing size".into())),
        }
    }

    /// Parse a blob's raw bytes, returning `None` for anything that is not a pointer.
    pub fn from_blob(content: &[u8]) -> Option<Self> {
        if content.len() >= MAX_POINTER_SIZE {
            return None;
        }
        std::str::from_utf8(content)
            .ok()
            .and_then(|text| Self::parse(text).ok())
    }
}

/// A large object reachable from a ref update.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackedObject {
    /// Object name: the content hash of the stored object
    pub name: String,
    /// Repository path the object is committed at
    pub path: String,
    /// Size in bytes
    pub size: u64,
}

impl TrackedObject {
    /// Create a tracked object from a pointer found at `path`.
    pub fn from_pointer(pointer: &Pointer, path: impl Into<String>) -> Self {
        Self {
            name: pointer.oid.to_string(),
            path: path.into(),
            size: pointer.size,
        }
    }
}
