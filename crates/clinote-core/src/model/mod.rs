pub mod assessment;
pub mod group;
pub mod ids;
pub mod image;
pub mod log;
pub mod theory;

pub use assessment::{
    AssessmentCategory, AssessmentLogEntry, AssessmentSession, AssessmentSessionPatch,
    AssessmentTool,
};
pub use group::{
    BehaviorLogEntry, EntryKind, GroupEvent, GroupSession, GroupSessionPatch, Member, PhaseMarker,
    BEHAVIOR_TAGS,
};
pub use ids::{EntryId, MemberId, SessionId};
pub use image::ImagePayload;
pub use log::{LogEntry, ObservationLog};
pub use theory::{TheoryVocabulary, DEFAULT_THEORIES};

/// Today's local date in the `YYYY-MM-DD` form used for session dates.
pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}
