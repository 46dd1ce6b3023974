use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clinote_core::config::ClinoteConfig;
use clinote_core::model::{AssessmentSession, GroupSession};
use clinote_core::storage::JsonFileHistory;

/// Layout of the clinote data directory.
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn exports_dir(&self) -> PathBuf {
        self.root.join("exports")
    }

    pub fn group_history(&self) -> JsonFileHistory<GroupSession> {
        JsonFileHistory::open(self.root.join("history").join("group.json"))
    }

    pub fn assessment_history(&self) -> JsonFileHistory<AssessmentSession> {
        JsonFileHistory::open(self.root.join("history").join("assessment.json"))
    }

    pub fn load_config(&self) -> Result<ClinoteConfig> {
        let path = self.config_path();
        ClinoteConfig::load(&path).with_context(|| format!("Failed to load {}", path.display()))
    }

    pub fn save_config(&self, config: &ClinoteConfig) -> Result<()> {
        let path = self.config_path();
        config
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}
