//! Append-only capture of observations into clinote sessions.
//!
//! Group sessions are recorded through [`BehaviorRecorder`], which also tracks
//! which member (or that member's parent) is currently selected. Assessment
//! sessions use [`AssessmentRecorder`]. Both assign entry IDs and capture
//! timestamps; neither ever edits or removes a prior entry.

pub mod assessment;
pub mod behavior;
pub mod error;
pub mod seating;

pub use assessment::AssessmentRecorder;
pub use behavior::{ActorSelection, BehaviorRecorder};
pub use error::CaptureError;
pub use seating::{assign_seat, SeatAssignment, SeatOutcome};
