use chrono::{DateTime, Utc};
use clinote_core::model::{
    BehaviorLogEntry, GroupEvent, GroupSession, Member, MemberId, PhaseMarker, BEHAVIOR_TAGS,
};
use serde::{Deserialize, Serialize};

use crate::error::CaptureError;

/// The member currently picked for tagging, and whether the next behavior is
/// attributed to that member's parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSelection {
    pub member_id: MemberId,
    pub parent_mode: bool,
}

/// Records observations into a group session's behavior log.
///
/// Any successful record closes the current actor selection.
#[derive(Debug, Clone, Default)]
pub struct BehaviorRecorder {
    selection: Option<ActorSelection>,
}

impl BehaviorRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Option<&ActorSelection> {
        self.selection.as_ref()
    }

    /// Select a seated member as the actor for the next behavior entry.
    pub fn select(
        &mut self,
        session: &GroupSession,
        member_id: &MemberId,
    ) -> Result<&ActorSelection, CaptureError> {
        if session.member(member_id).is_none() {
            return Err(CaptureError::UnknownMember(member_id.clone()));
        }
        Ok(&*self.selection.insert(ActorSelection {
            member_id: member_id.clone(),
            parent_mode: false,
        }))
    }

    /// Select the member seated at `seat_index`.
    pub fn select_seat(
        &mut self,
        session: &GroupSession,
        seat_index: u32,
    ) -> Result<&ActorSelection, CaptureError> {
        let member_id = session
            .member_at_seat(seat_index)
            .map(|m| m.id.clone())
            .ok_or(CaptureError::EmptySeat(seat_index))?;
        self.select(session, &member_id)
    }

    /// Switch attribution between the selected member and their parent.
    /// Only members with a recorded parent can be switched to parent mode.
    pub fn set_parent_mode(
        &mut self,
        session: &GroupSession,
        parent_mode: bool,
    ) -> Result<(), CaptureError> {
        let selection = self.selection.as_mut().ok_or(CaptureError::NoActorSelected)?;
        let member = session
            .member(&selection.member_id)
            .ok_or_else(|| CaptureError::UnknownMember(selection.member_id.clone()))?;
        if parent_mode && member.parent_name.is_none() {
            return Err(CaptureError::NoParentRecorded(member.name.clone()));
        }
        selection.parent_mode = parent_mode;
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Record a behavior for the selected actor (or their parent in parent mode).
    pub fn record_selected(
        &mut self,
        session: &mut GroupSession,
        action: &str,
        note: &str,
    ) -> Result<BehaviorLogEntry, CaptureError> {
        let selection = self.selection.as_ref().ok_or(CaptureError::NoActorSelected)?;
        let member = session
            .member(&selection.member_id)
            .ok_or_else(|| CaptureError::UnknownMember(selection.member_id.clone()))?;
        let event = if selection.parent_mode {
            GroupEvent::parent_behavior(member, action)
        } else {
            GroupEvent::behavior(member, action)
        };
        self.record(session, event.with_note(note))
    }

    /// Record one of [`BEHAVIOR_TAGS`] for the selected actor.
    pub fn record_tag(
        &mut self,
        session: &mut GroupSession,
        index: usize,
        note: &str,
    ) -> Result<BehaviorLogEntry, CaptureError> {
        let tag = BEHAVIOR_TAGS
            .get(index)
            .ok_or(CaptureError::UnknownTag(index))?;
        self.record_selected(session, tag, note)
    }

    pub fn record_phase(
        &mut self,
        session: &mut GroupSession,
        marker: PhaseMarker,
    ) -> Result<BehaviorLogEntry, CaptureError> {
        self.record(session, GroupEvent::phase(marker))
    }

    /// Record a free-text note about the whole group.
    pub fn record_note(
        &mut self,
        session: &mut GroupSession,
        note: &str,
    ) -> Result<BehaviorLogEntry, CaptureError> {
        self.record(session, GroupEvent::global(note))
    }

    /// Record an event captured now.
    pub fn record(
        &mut self,
        session: &mut GroupSession,
        event: GroupEvent,
    ) -> Result<BehaviorLogEntry, CaptureError> {
        self.record_at(session, event, Utc::now())
    }

    /// Record an event with an explicit capture time.
    pub fn record_at(
        &mut self,
        session: &mut GroupSession,
        event: GroupEvent,
        timestamp: DateTime<Utc>,
    ) -> Result<BehaviorLogEntry, CaptureError> {
        let event = validate(session, event)?;
        let entry = BehaviorLogEntry {
            id: session.logs().next_id(),
            timestamp,
            event,
        };
        let entry = session.logs_mut().append(entry)?.clone();
        self.selection = None;
        tracing::debug!(
            "recorded {:?} entry {} in session {}",
            entry.kind(),
            entry.id,
            session.id
        );
        Ok(entry)
    }
}

fn validate(session: &GroupSession, event: GroupEvent) -> Result<GroupEvent, CaptureError> {
    match event {
        GroupEvent::Behavior {
            actor_id,
            is_parent_action,
            action,
            note,
            ..
        } => {
            let action = action.trim();
            if action.is_empty() {
                return Err(CaptureError::EmptyAction);
            }
            let member: &Member = session
                .member(&actor_id)
                .ok_or_else(|| CaptureError::UnknownMember(actor_id.clone()))?;
            if is_parent_action && member.parent_name.is_none() {
                return Err(CaptureError::NoParentRecorded(member.name.clone()));
            }
            // The roster is authoritative for the display name.
            Ok(GroupEvent::Behavior {
                actor_name: member.name.clone(),
                actor_id,
                is_parent_action,
                action: action.to_string(),
                note: note.trim().to_string(),
            })
        }
        GroupEvent::Phase { action } => {
            let action = action.trim();
            if action.is_empty() {
                return Err(CaptureError::EmptyAction);
            }
            Ok(GroupEvent::Phase {
                action: action.to_string(),
            })
        }
        GroupEvent::Global { note } => {
            let note = note.trim();
            if note.is_empty() {
                return Err(CaptureError::EmptyNote);
            }
            Ok(GroupEvent::Global {
                note: note.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seating::{assign_seat, SeatAssignment};
    use clinote_core::model::{EntryKind, TheoryVocabulary};

    fn session_with_members() -> GroupSession {
        let mut session = GroupSession::new(&TheoryVocabulary::default());
        assign_seat(
            &mut session,
            SeatAssignment {
                seat_index: 0,
                name: "小明".into(),
                parent_name: None,
                feature: "紅衣".into(),
            },
        )
        .unwrap();
        assign_seat(
            &mut session,
            SeatAssignment {
                seat_index: 1,
                name: "小華".into(),
                parent_name: Some("華媽".into()),
                feature: String::new(),
            },
        )
        .unwrap();
        session
    }

    #[test]
    fn test_phase_then_behavior_scenario() {
        let mut session = session_with_members();
        let mut recorder = BehaviorRecorder::new();

        recorder
            .record(&mut session, GroupEvent::Phase { action: "活動開始".into() })
            .unwrap();
        recorder.select_seat(&session, 0).unwrap();
        recorder.record_selected(&mut session, "離座", "").unwrap();

        let logs = session.logs().entries();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].kind(), EntryKind::Phase);
        assert!(logs[0].actor_name().is_none());
        assert!(logs[0].actor_id().is_none());
        assert_eq!(logs[1].actor_name(), Some("小明"));
        assert_eq!(logs[1].action(), "離座");
    }

    #[test]
    fn test_record_tag_uses_fixed_label() {
        let mut session = session_with_members();
        let mut recorder = BehaviorRecorder::new();
        recorder.select_seat(&session, 0).unwrap();
        let entry = recorder.record_tag(&mut session, 3, "撿起同學的筆").unwrap();
        assert_eq!(entry.action(), BEHAVIOR_TAGS[3]);
        assert_eq!(entry.note(), "撿起同學的筆");

        recorder.select_seat(&session, 0).unwrap();
        assert!(matches!(
            recorder.record_tag(&mut session, BEHAVIOR_TAGS.len(), ""),
            Err(CaptureError::UnknownTag(8))
        ));
        assert_eq!(session.logs().len(), 1);
        assert!(recorder.selection().is_some());
    }

    #[test]
    fn test_record_closes_selection() {
        let mut session = session_with_members();
        let mut recorder = BehaviorRecorder::new();
        recorder.select_seat(&session, 1).unwrap();
        recorder.record_phase(&mut session, PhaseMarker::ActivityTransition).unwrap();
        assert!(recorder.selection().is_none());

        let err = recorder.record_selected(&mut session, "哭鬧 (Crying)", "").unwrap_err();
        assert!(matches!(err, CaptureError::NoActorSelected));
    }

    #[test]
    fn test_parent_mode_attribution() {
        let mut session = session_with_members();
        let mut recorder = BehaviorRecorder::new();

        recorder.select_seat(&session, 0).unwrap();
        let err = recorder.set_parent_mode(&session, true).unwrap_err();
        assert!(matches!(err, CaptureError::NoParentRecorded(_)));

        recorder.select_seat(&session, 1).unwrap();
        recorder.set_parent_mode(&session, true).unwrap();
        let entry = recorder
            .record_selected(&mut session, "情緒表達 (Emotional Expr.)", "安撫孩子")
            .unwrap();
        assert!(entry.is_parent_action());
        assert_eq!(entry.actor_name(), Some("小華"));
        assert_eq!(entry.note(), "安撫孩子");
    }

    #[test]
    fn test_ids_unique_and_in_call_order() {
        let mut session = session_with_members();
        let mut recorder = BehaviorRecorder::new();
        let member = session.member_at_seat(0).unwrap().clone();
        for i in 0..20 {
            match i % 3 {
                0 => recorder.record_note(&mut session, &format!("note {i}")),
                1 => recorder.record(&mut session, GroupEvent::behavior(&member, format!("act {i}"))),
                _ => recorder.record_phase(&mut session, PhaseMarker::GroupEnd),
            }
            .unwrap();
        }
        let ids: Vec<u64> = session.logs().iter().map(|e| e.id.0).collect();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
        assert_eq!(session.logs().entries()[0].note(), "note 0");
        assert_eq!(session.logs().entries()[1].action(), "act 1");
    }

    #[test]
    fn test_validation_leaves_log_untouched() {
        let mut session = session_with_members();
        let mut recorder = BehaviorRecorder::new();
        let stranger = Member::new("路人", 9);

        assert!(matches!(
            recorder.record_note(&mut session, "   "),
            Err(CaptureError::EmptyNote)
        ));
        assert!(matches!(
            recorder.record(&mut session, GroupEvent::behavior(&stranger, "離座")),
            Err(CaptureError::UnknownMember(_))
        ));
        let member = session.member_at_seat(0).unwrap().clone();
        assert!(matches!(
            recorder.record(&mut session, GroupEvent::behavior(&member, " ")),
            Err(CaptureError::EmptyAction)
        ));
        assert!(session.logs().is_empty());
    }

    #[test]
    fn test_record_at_keeps_given_timestamp() {
        let mut session = session_with_members();
        let mut recorder = BehaviorRecorder::new();
        let at = "2025-03-01T14:05:00Z".parse::<DateTime<Utc>>().unwrap();
        let entry = recorder
            .record_at(&mut session, GroupEvent::global("全體安靜"), at)
            .unwrap();
        assert_eq!(entry.timestamp, at);
        assert_eq!(entry.action(), "Note");
    }
}
