//! Core data model for clinote: group and assessment sessions, their
//! append-only observation logs, the theory vocabulary, configuration and the
//! per-type history store.

pub mod config;
pub mod error;
pub mod model;
pub mod storage;

pub use error::CoreError;
