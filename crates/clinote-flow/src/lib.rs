//! Session navigation for clinote.
//!
//! [`transition`] is the pure screen state machine. [`App`] is the context
//! object handlers run against: it owns the in-progress sessions, applies
//! navigation side effects (fresh sessions on start, persistence on save),
//! and guards report generation so only one request is in flight.

pub mod app;
pub mod clipboard;
pub mod command;
pub mod error;
pub mod review;
pub mod screen;

pub use app::{App, AssessmentHistory, GroupHistory};
pub use clipboard::{Clipboard, MemoryClipboard};
pub use command::{Command, Outcome};
pub use error::FlowError;
pub use review::{ReviewState, ReviewSummary};
pub use screen::{transition, AssessmentStep, GroupStep, NavEvent, Screen, SessionKind};
