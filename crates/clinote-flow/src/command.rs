//! Command objects for driving an [`App`] from a script or another surface.

use clinote_capture::SeatAssignment;
use clinote_core::model::{
    AssessmentCategory, AssessmentSessionPatch, EntryId, GroupSessionPatch, Member, MemberId,
    PhaseMarker,
};
use clinote_report::ReportGenerator;
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::clipboard::Clipboard;
use crate::error::FlowError;
use crate::screen::{NavEvent, Screen};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    Navigate {
        event: NavEvent,
    },
    UpdateGroup(GroupSessionPatch),
    UpdateAssessment(AssessmentSessionPatch),
    Seat(SeatAssignment),
    SelectTheory {
        theory: String,
    },
    SelectActor {
        seat: u32,
    },
    ParentMode {
        enabled: bool,
    },
    Behavior {
        action: String,
        #[serde(default)]
        note: String,
    },
    /// A behavior from the fixed tag list, by index.
    Tag {
        index: usize,
        #[serde(default)]
        note: String,
    },
    Phase {
        marker: PhaseMarker,
    },
    Note {
        text: String,
    },
    Assess {
        category: AssessmentCategory,
        note: String,
    },
    Generate,
    Discard,
    Copy,
    AddTheory {
        label: String,
    },
    RemoveTheory {
        label: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Moved {
        screen: Screen,
    },
    Updated,
    Seated {
        member: Member,
        #[serde(skip_serializing_if = "Option::is_none")]
        evicted: Option<Member>,
    },
    Selected {
        member_id: MemberId,
        parent_mode: bool,
    },
    Recorded {
        entry: EntryId,
    },
    Report {
        text: String,
    },
    Discarded {
        had_draft: bool,
    },
    Copied,
    Theories {
        labels: Vec<String>,
    },
}

impl App {
    /// Dispatch one command. Errors leave the app state unchanged.
    pub async fn apply(
        &mut self,
        command: Command,
        generator: &dyn ReportGenerator,
        clipboard: &mut dyn Clipboard,
    ) -> Result<Outcome, FlowError> {
        let outcome = match command {
            Command::Navigate { event } => Outcome::Moved {
                screen: self.navigate(event)?,
            },
            Command::UpdateGroup(patch) => {
                self.update_group(patch)?;
                Outcome::Updated
            }
            Command::UpdateAssessment(patch) => {
                self.update_assessment(patch)?;
                Outcome::Updated
            }
            Command::Seat(request) => {
                let seated = self.seat(request)?;
                Outcome::Seated {
                    member: seated.member,
                    evicted: seated.evicted,
                }
            }
            Command::SelectTheory { theory } => {
                self.select_theory(&theory)?;
                Outcome::Updated
            }
            Command::SelectActor { seat } => {
                let selection = self.select_seat(seat)?;
                Outcome::Selected {
                    member_id: selection.member_id,
                    parent_mode: selection.parent_mode,
                }
            }
            Command::ParentMode { enabled } => {
                self.set_parent_mode(enabled)?;
                let selection = self.selection().cloned().ok_or(FlowError::NotOnScreen {
                    action: "switch parent mode",
                    current: self.screen(),
                })?;
                Outcome::Selected {
                    member_id: selection.member_id,
                    parent_mode: selection.parent_mode,
                }
            }
            Command::Behavior { action, note } => Outcome::Recorded {
                entry: self.record_behavior(&action, &note)?.id,
            },
            Command::Tag { index, note } => Outcome::Recorded {
                entry: self.record_tag(index, &note)?.id,
            },
            Command::Phase { marker } => Outcome::Recorded {
                entry: self.record_phase(marker)?.id,
            },
            Command::Note { text } => Outcome::Recorded {
                entry: self.record_note(&text)?.id,
            },
            Command::Assess { category, note } => Outcome::Recorded {
                entry: self.record_assessment(category, &note)?.id,
            },
            Command::Generate => Outcome::Report {
                text: self.generate(generator).await?,
            },
            Command::Discard => Outcome::Discarded {
                had_draft: self.discard_draft()?.is_some(),
            },
            Command::Copy => {
                self.copy_draft(clipboard)?;
                Outcome::Copied
            }
            Command::AddTheory { label } => {
                self.add_theory(&label)?;
                Outcome::Theories {
                    labels: self.theories().labels().to_vec(),
                }
            }
            Command::RemoveTheory { label } => {
                self.remove_theory(&label)?;
                Outcome::Theories {
                    labels: self.theories().labels().to_vec(),
                }
            }
        };
        Ok(outcome)
    }
}
