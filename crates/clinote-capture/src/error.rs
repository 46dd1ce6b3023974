use clinote_core::model::MemberId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Core error: {0}")]
    Core(#[from] clinote_core::CoreError),

    #[error("Observation note must not be empty")]
    EmptyNote,

    #[error("Behavior action must not be empty")]
    EmptyAction,

    #[error("Member name must not be empty")]
    EmptyName,

    #[error("No member is selected")]
    NoActorSelected,

    #[error("Member is not seated in this session: {0}")]
    UnknownMember(MemberId),

    #[error("No seated member at seat {0}")]
    EmptySeat(u32),

    #[error("No behavior tag at index {0}")]
    UnknownTag(usize),

    #[error("{0} has no parent recorded")]
    NoParentRecorded(String),
}
