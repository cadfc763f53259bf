//! Fixed-capacity strings
//!
//! Catalog fields have a hard byte limit. Values coming off the link are
//! truncated at a character boundary (with a warning); values built locally
//! can be checked strictly with [`BoundedString::try_new`].

use std::fmt;
use std::ops::Deref;

use hu_protocol::wire::truncate_to_boundary;
use tracing::warn;

use crate::error::LibraryError;

/// Capacity of entity ids in bytes
pub const ID_CAPACITY: usize = 48;
/// Capacity of display names in bytes
pub const NAME_CAPACITY: usize = 64;
/// Capacity of now-playing fields in bytes
pub const NOW_PLAYING_CAPACITY: usize = 128;

pub type CatalogId = BoundedString<ID_CAPACITY>;
pub type CatalogName = BoundedString<NAME_CAPACITY>;

/// A UTF-8 string of at most `N` bytes
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoundedString<const N: usize>(String);

impl<const N: usize> BoundedString<N> {
    pub const CAPACITY: usize = N;

    pub fn new() -> Self {
        Self(String::new())
    }

    /// Reject values longer than `N` bytes
    pub fn try_new(value: &str) -> Result<Self, LibraryError> {
        if value.len() > N {
            return Err(LibraryError::ValueTooLong {
                len: value.len(),
                capacity: N,
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Keep the longest prefix that fits, warning when anything is cut
    pub fn truncating(value: &str) -> Self {
        let kept = truncate_to_boundary(value, N);
        if kept.len() < value.len() {
            warn!(
                "Truncating {}-byte value to {} bytes: {:?}",
                value.len(),
                N,
                kept
            );
        }
        Self(kept.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> Deref for BoundedString<N> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> AsRef<str> for BoundedString<N> {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<const N: usize> fmt::Display for BoundedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<const N: usize> fmt::Debug for BoundedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<const N: usize> TryFrom<&str> for BoundedString<N> {
    type Error = LibraryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl<const N: usize> PartialEq<str> for BoundedString<N> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl<const N: usize> PartialEq<&str> for BoundedString<N> {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
