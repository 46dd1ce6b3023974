use chrono::{DateTime, Utc};
use clinote_core::model::{AssessmentCategory, AssessmentLogEntry, AssessmentSession};

use crate::error::CaptureError;

/// Records categorized notes into an assessment session's log.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssessmentRecorder;

impl AssessmentRecorder {
    pub fn new() -> Self {
        Self
    }

    /// Record a note captured now. Empty notes are rejected: a category
    /// tag without content is not an observation.
    pub fn record(
        &self,
        session: &mut AssessmentSession,
        category: AssessmentCategory,
        note: &str,
    ) -> Result<AssessmentLogEntry, CaptureError> {
        self.record_at(session, category, note, Utc::now())
    }

    pub fn record_at(
        &self,
        session: &mut AssessmentSession,
        category: AssessmentCategory,
        note: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<AssessmentLogEntry, CaptureError> {
        let note = note.trim();
        if note.is_empty() {
            return Err(CaptureError::EmptyNote);
        }
        let entry = AssessmentLogEntry {
            id: session.logs().next_id(),
            timestamp,
            category,
            note: note.to_string(),
        };
        let entry = session.logs_mut().append(entry)?.clone();
        tracing::debug!(
            "recorded {} entry {} in session {}",
            entry.category,
            entry.id,
            session.id
        );
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_appends_in_order() {
        let mut session = AssessmentSession::new();
        let recorder = AssessmentRecorder::new();
        recorder
            .record(&mut session, AssessmentCategory::Appearance, "衣著整齊")
            .unwrap();
        recorder
            .record(&mut session, AssessmentCategory::Attention, "容易分心")
            .unwrap();

        let logs = session.logs().entries();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].category, AssessmentCategory::Appearance);
        assert_eq!(logs[1].note, "容易分心");
        assert!(logs[0].id < logs[1].id);
    }

    #[test]
    fn test_empty_note_rejected_without_mutation() {
        let mut session = AssessmentSession::new();
        let recorder = AssessmentRecorder::new();
        for note in ["", "   \n"] {
            let err = recorder
                .record(&mut session, AssessmentCategory::Emotion, note)
                .unwrap_err();
            assert!(matches!(err, CaptureError::EmptyNote));
        }
        assert!(session.logs().is_empty());
    }
}
