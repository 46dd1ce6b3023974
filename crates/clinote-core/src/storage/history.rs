use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{AssessmentSession, GroupSession, SessionId};

/// A finalized session that can be kept in a history store.
pub trait ArchivedSession: Clone + Serialize + DeserializeOwned {
    fn session_id(&self) -> &SessionId;
    /// Group name or case name, used for listings and export file names.
    fn display_name(&self) -> &str;
    fn date(&self) -> &str;
    fn generated_content(&self) -> Option<&str>;
}

impl ArchivedSession for GroupSession {
    fn session_id(&self) -> &SessionId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.group_name
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn generated_content(&self) -> Option<&str> {
        self.generated_content.as_deref()
    }
}

impl ArchivedSession for AssessmentSession {
    fn session_id(&self) -> &SessionId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.case_name
    }

    fn date(&self) -> &str {
        &self.date
    }

    fn generated_content(&self) -> Option<&str> {
        self.generated_content.as_deref()
    }
}

/// A stored session plus when it was last saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord<S> {
    /// Store-wide save counter; higher means saved more recently.
    pub revision: u64,
    pub saved_at: DateTime<Utc>,
    pub session: S,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Replaced,
}

/// Upsert-by-ID collection of saved sessions of one type.
pub trait HistoryStore<S: ArchivedSession> {
    /// Replace the record with the same ID, or append a new one.
    fn save(&mut self, session: S) -> Result<SaveOutcome, CoreError>;

    /// All records, most recently saved first.
    fn list(&self) -> Result<Vec<HistoryRecord<S>>, CoreError>;

    fn get(&self, id: &SessionId) -> Result<Option<S>, CoreError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|r| r.session.session_id() == id)
            .map(|r| r.session))
    }
}

/// Shared upsert used by every store implementation.
pub(crate) fn upsert<S: ArchivedSession>(
    records: &mut Vec<HistoryRecord<S>>,
    session: S,
) -> SaveOutcome {
    let revision = records.iter().map(|r| r.revision).max().unwrap_or(0) + 1;
    let saved_at = Utc::now();
    match records
        .iter_mut()
        .find(|r| r.session.session_id() == session.session_id())
    {
        Some(existing) => {
            existing.revision = revision;
            existing.saved_at = saved_at;
            existing.session = session;
            SaveOutcome::Replaced
        }
        None => {
            records.push(HistoryRecord {
                revision,
                saved_at,
                session,
            });
            SaveOutcome::Inserted
        }
    }
}

pub(crate) fn most_recent_first<S: Clone>(records: &[HistoryRecord<S>]) -> Vec<HistoryRecord<S>> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.revision.cmp(&a.revision));
    sorted
}

/// In-process history, lost when the process exits.
#[derive(Debug, Clone)]
pub struct MemoryHistory<S> {
    records: Vec<HistoryRecord<S>>,
}

impl<S> MemoryHistory<S> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<S> Default for MemoryHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ArchivedSession> HistoryStore<S> for MemoryHistory<S> {
    fn save(&mut self, session: S) -> Result<SaveOutcome, CoreError> {
        let id = session.session_id().clone();
        let outcome = upsert(&mut self.records, session);
        tracing::debug!("history save {id}: {outcome:?}");
        Ok(outcome)
    }

    fn list(&self) -> Result<Vec<HistoryRecord<S>>, CoreError> {
        Ok(most_recent_first(&self.records))
    }
}
