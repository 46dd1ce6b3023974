use serde::{Deserialize, Serialize};

use super::ids::EntryId;
use crate::error::CoreError;

/// An immutable record in an observation log.
pub trait LogEntry {
    fn id(&self) -> EntryId;
}

/// Append-only sequence of log entries. Insertion order is temporal order and
/// entry IDs strictly increase; nothing is ever removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationLog<E> {
    entries: Vec<E>,
}

impl<E> Default for ObservationLog<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E: LogEntry> ObservationLog<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The ID the next appended entry must carry.
    pub fn next_id(&self) -> EntryId {
        self.entries
            .last()
            .map(|e| e.id().next())
            .unwrap_or(EntryId::FIRST)
    }

    /// Append an entry. Rejects entries whose ID does not follow the last one.
    pub fn append(&mut self, entry: E) -> Result<&E, CoreError> {
        if let Some(last) = self.entries.last() {
            if entry.id() <= last.id() {
                return Err(CoreError::OutOfOrder {
                    last: last.id(),
                    got: entry.id(),
                });
            }
        }
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&E> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, E> IntoIterator for &'a ObservationLog<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
