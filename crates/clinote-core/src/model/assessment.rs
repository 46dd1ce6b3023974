use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EntryId, SessionId};
use super::log::{LogEntry, ObservationLog};

/// The fixed tag vocabulary for assessment observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentCategory {
    Appearance,
    Attitude,
    Cooperation,
    Attention,
    Emotion,
    TestReaction,
    Language,
    Motor,
}

impl AssessmentCategory {
    pub const ALL: [AssessmentCategory; 8] = [
        AssessmentCategory::Appearance,
        AssessmentCategory::Attitude,
        AssessmentCategory::Cooperation,
        AssessmentCategory::Attention,
        AssessmentCategory::Emotion,
        AssessmentCategory::TestReaction,
        AssessmentCategory::Language,
        AssessmentCategory::Motor,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AssessmentCategory::Appearance => "外觀 (Appearance)",
            AssessmentCategory::Attitude => "態度 (Attitude)",
            AssessmentCategory::Cooperation => "配合度 (Cooperation)",
            AssessmentCategory::Attention => "注意力 (Attention)",
            AssessmentCategory::Emotion => "情緒 (Emotion)",
            AssessmentCategory::TestReaction => "測驗反應 (Test Reaction)",
            AssessmentCategory::Language => "語言 (Language)",
            AssessmentCategory::Motor => "動作 (Motor)",
        }
    }

    /// The snake_case key used in serialized data and scripts.
    pub fn key(self) -> &'static str {
        match self {
            AssessmentCategory::Appearance => "appearance",
            AssessmentCategory::Attitude => "attitude",
            AssessmentCategory::Cooperation => "cooperation",
            AssessmentCategory::Attention => "attention",
            AssessmentCategory::Emotion => "emotion",
            AssessmentCategory::TestReaction => "test_reaction",
            AssessmentCategory::Language => "language",
            AssessmentCategory::Motor => "motor",
        }
    }
}

impl std::fmt::Display for AssessmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AssessmentCategory {
    type Err = String;

    /// Accepts the snake_case key or the full display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.key() == s || c.label() == s)
            .ok_or_else(|| format!("unknown assessment category: {s}"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentLogEntry {
    pub id: EntryId,
    pub timestamp: DateTime<Utc>,
    pub category: AssessmentCategory,
    pub note: String,
}

impl LogEntry for AssessmentLogEntry {
    fn id(&self) -> EntryId {
        self.id
    }
}

/// Reserved: declared for assessment sessions but never filled by any flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentTool {
    pub id: String,
    pub name: String,
    pub result: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssessmentSessionPatch {
    pub date: Option<String>,
    pub case_name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub chief_complaint: Option<String>,
    pub provisional_diagnosis: Option<String>,
}

/// Aggregate root of an individual clinical assessment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentSession {
    pub id: SessionId,
    pub date: String,
    #[serde(default)]
    pub case_name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: String,
    /// Raw clinician or parent wording.
    #[serde(default)]
    pub chief_complaint: String,
    #[serde(default)]
    pub provisional_diagnosis: String,
    #[serde(default)]
    logs: ObservationLog<AssessmentLogEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assessment_tools: Vec<AssessmentTool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_content: Option<String>,
}

impl AssessmentSession {
    pub const DEFAULT_GENDER: &'static str = "男";

    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            date: super::today(),
            case_name: String::new(),
            age: String::new(),
            gender: Self::DEFAULT_GENDER.to_string(),
            chief_complaint: String::new(),
            provisional_diagnosis: String::new(),
            logs: ObservationLog::new(),
            assessment_tools: Vec::new(),
            generated_content: None,
        }
    }

    pub fn apply(&mut self, patch: AssessmentSessionPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(name) = patch.case_name {
            self.case_name = name;
        }
        if let Some(age) = patch.age {
            self.age = age;
        }
        if let Some(gender) = patch.gender {
            self.gender = gender;
        }
        if let Some(complaint) = patch.chief_complaint {
            self.chief_complaint = complaint;
        }
        if let Some(diagnosis) = patch.provisional_diagnosis {
            self.provisional_diagnosis = diagnosis;
        }
    }

    pub fn logs(&self) -> &ObservationLog<AssessmentLogEntry> {
        &self.logs
    }

    pub fn logs_mut(&mut self) -> &mut ObservationLog<AssessmentLogEntry> {
        &mut self.logs
    }
}

impl Default for AssessmentSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_accepts_key_or_label() {
        assert_eq!(
            "test_reaction".parse::<AssessmentCategory>().unwrap(),
            AssessmentCategory::TestReaction
        );
        assert_eq!(
            "情緒 (Emotion)".parse::<AssessmentCategory>().unwrap(),
            AssessmentCategory::Emotion
        );
        assert!("mood".parse::<AssessmentCategory>().is_err());
    }

    #[test]
    fn test_new_session_defaults() {
        let session = AssessmentSession::new();
        assert_eq!(session.gender, "男");
        assert!(session.logs().is_empty());
        assert!(session.assessment_tools.is_empty());
    }

    #[test]
    fn test_patch() {
        let mut session = AssessmentSession::new();
        session.apply(AssessmentSessionPatch {
            case_name: Some("C001".into()),
            chief_complaint: Some("媽媽說他都講不聽".into()),
            ..Default::default()
        });
        assert_eq!(session.case_name, "C001");
        assert_eq!(session.chief_complaint, "媽媽說他都講不聽");
        assert_eq!(session.gender, "男");
    }

    #[test]
    fn test_session_serde_roundtrip() {
        let mut session = AssessmentSession::new();
        session
            .logs_mut()
            .append(AssessmentLogEntry {
                id: EntryId::FIRST,
                timestamp: Utc::now(),
                category: AssessmentCategory::Attention,
                note: "頻繁看向窗外".into(),
            })
            .unwrap();
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains("\"category\":\"attention\""));
        let parsed: AssessmentSession = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }
}
