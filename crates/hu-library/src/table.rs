//! Fixed-capacity record table

use std::fmt;

use tracing::warn;

use crate::entities::CatalogRecord;
use crate::error::LibraryError;

/// The four catalog tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogTableKind {
    Playlists,
    Artists,
    Albums,
    Songs,
}

impl CatalogTableKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Playlists => "playlists",
            Self::Artists => "artists",
            Self::Albums => "albums",
            Self::Songs => "songs",
        }
    }
}

impl fmt::Display for CatalogTableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of replacing a table's contents with a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// Records now in the table
    pub stored: usize,
    /// Records dropped because the table was full
    pub rejected: usize,
}

impl ReplaceOutcome {
    pub fn is_truncated(&self) -> bool {
        self.rejected > 0
    }
}

/// Append-only table with a hard record limit
#[derive(Debug, Clone)]
pub struct CatalogTable<T> {
    kind: CatalogTableKind,
    records: Vec<T>,
    capacity: usize,
}

impl<T> CatalogTable<T> {
    pub fn new(kind: CatalogTableKind, capacity: usize) -> Self {
        Self {
            kind,
            records: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn kind(&self) -> CatalogTableKind {
        self.kind
    }

    /// Append `record`; a full table is left unchanged
    pub fn push(&mut self, record: T) -> Result<(), LibraryError> {
        if self.is_full() {
            warn!("Max {} reached ({})", self.kind, self.capacity);
            return Err(LibraryError::CapacityExceeded {
                table: self.kind,
                capacity: self.capacity,
            });
        }
        self.records.push(record);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Clear, then append records until the table is full
    pub fn replace_with<I>(&mut self, records: I) -> ReplaceOutcome
    where
        I: IntoIterator<Item = T>,
    {
        self.clear();
        let mut outcome = ReplaceOutcome::default();
        for record in records {
            if self.is_full() {
                outcome.rejected += 1;
            } else {
                self.records.push(record);
                outcome.stored += 1;
            }
        }
        if outcome.is_truncated() {
            warn!(
                "Max {} reached: stored {}, rejected {}",
                self.kind, outcome.stored, outcome.rejected
            );
        }
        outcome
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.records
    }
}

impl<T: CatalogRecord> CatalogTable<T> {
    /// Linear scan for the first record with `id`
    pub fn find(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }
}
