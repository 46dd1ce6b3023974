use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::TheoryVocabulary;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_FALLBACK_MESSAGE: &str = "無法生成報告，請稍後再試。";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Settings stored as `config.json` in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClinoteConfig {
    pub model: String,
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Shown in place of a report when generation fails or returns nothing.
    pub fallback_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    /// Per-request timeout for the generation service. Unset means no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    pub theories: TheoryVocabulary,
}

impl Default for ClinoteConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            api_key: None,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
            system_instruction: None,
            request_timeout_secs: None,
            theories: TheoryVocabulary::default(),
        }
    }
}

impl ClinoteConfig {
    /// Read config from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let config = match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(config)
    }

    /// The API key from the file, else from `GEMINI_API_KEY`.
    ///
    /// The environment value is never stored on `self`, so saving the config
    /// cannot write it to disk.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key_or(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_or(&self, env_key: Option<String>) -> Option<String> {
        self.api_key
            .clone()
            .or(env_key)
            .filter(|k| !k.trim().is_empty())
    }

    /// Write config to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| CoreError::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, json)?;
        Ok(())
    }
}
