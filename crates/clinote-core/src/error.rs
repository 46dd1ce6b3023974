use thiserror::Error;

use crate::model::EntryId;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid session ID: {0}")]
    InvalidId(String),

    #[error("Session not found: {id}")]
    NotFound { id: String },

    #[error("Theory is not in the vocabulary: {0}")]
    InvalidTheory(String),

    #[error("Theory already exists: {0}")]
    DuplicateTheory(String),

    #[error("Theory label must not be empty")]
    EmptyTheory,

    #[error("Log entry {got} does not follow entry {last}")]
    OutOfOrder { last: EntryId, got: EntryId },

    #[error("Invalid image payload: {0}")]
    InvalidImage(String),
}
