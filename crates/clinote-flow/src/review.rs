use serde::Serialize;

use crate::error::FlowError;
use crate::screen::SessionKind;

/// Per-session Review state: at most one draft and at most one in-flight
/// generation.
#[derive(Debug, Clone, Default)]
pub struct ReviewState {
    draft: Option<Draft>,
    in_flight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Draft {
    text: String,
    is_fallback: bool,
}

impl ReviewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The text shown on Review: an accepted draft or the fallback message.
    pub fn displayed(&self) -> Option<&str> {
        self.draft.as_ref().map(|d| d.text.as_str())
    }

    /// The draft only if it came from the generator.
    pub fn accepted(&self) -> Option<&str> {
        self.draft
            .as_ref()
            .filter(|d| !d.is_fallback)
            .map(|d| d.text.as_str())
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight
    }

    /// Generation is enabled when nothing is pending and no accepted draft
    /// is held. A fallback message does not block a retry.
    pub fn can_generate(&self) -> bool {
        !self.in_flight && self.accepted().is_none()
    }

    pub fn begin(&mut self) -> Result<(), FlowError> {
        if self.in_flight {
            return Err(FlowError::GenerationInFlight);
        }
        if self.accepted().is_some() {
            return Err(FlowError::DraftPending);
        }
        self.in_flight = true;
        Ok(())
    }

    pub fn complete(&mut self, text: String, is_fallback: bool) {
        self.in_flight = false;
        self.draft = Some(Draft { text, is_fallback });
    }

    /// Drop the current draft, returning its text.
    pub fn discard(&mut self) -> Option<String> {
        self.draft.take().map(|d| d.text)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The data check shown on the Review screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub kind: SessionKind,
    /// Group only: lesson plan text or image entered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_lesson_plan: Option<bool>,
    /// Assessment only: chief complaint entered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_chief_complaint: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member_count: Option<usize>,
    pub log_count: usize,
    pub has_draft: bool,
    pub can_generate: bool,
}
