use clinote_capture::CaptureError;
use clinote_core::CoreError;
use clinote_report::ReportError;
use thiserror::Error;

use crate::screen::{NavEvent, Screen};

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Cannot {event} from {from}")]
    InvalidTransition { from: Screen, event: NavEvent },

    #[error("{action} is not available on {current}")]
    NotOnScreen {
        action: &'static str,
        current: Screen,
    },

    #[error("A report is already being generated")]
    GenerationInFlight,

    #[error("A report draft already exists; discard it before regenerating")]
    DraftPending,

    #[error("No accepted report draft to save or copy")]
    NoDraft,

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Report(#[from] ReportError),
}
