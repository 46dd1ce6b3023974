use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const DEFAULT_THEORIES: [&str; 5] = [
    "行為治療 (Behavioral Therapy)",
    "阿德勒學派 (Adlerian)",
    "心理動力 (Psychodynamic)",
    "人本/存在主義 (Humanistic/Existential)",
    "認知行為 (CBT)",
];

/// The mutable set of theory labels a group session may select from.
///
/// Removing a label never touches sessions that already selected it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TheoryVocabulary {
    labels: Vec<String>,
}

impl TheoryVocabulary {
    pub fn new(labels: impl IntoIterator<Item = String>) -> Self {
        let mut vocab = Self { labels: Vec::new() };
        for label in labels {
            // Duplicates and blanks in stored config are dropped silently.
            let _ = vocab.add(&label);
        }
        vocab
    }

    /// Add a label. Surrounding whitespace is trimmed.
    pub fn add(&mut self, label: &str) -> Result<(), CoreError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(CoreError::EmptyTheory);
        }
        if self.contains(label) {
            return Err(CoreError::DuplicateTheory(label.to_string()));
        }
        self.labels.push(label.to_string());
        Ok(())
    }

    /// Remove a label by value. Returns whether it was present.
    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.labels.len();
        self.labels.retain(|l| l != label.trim());
        self.labels.len() != before
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn first(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for TheoryVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_THEORIES.iter().map(|s| s.to_string()))
    }
}
