use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{EntryId, MemberId, SessionId};
use super::image::ImagePayload;
use super::log::{LogEntry, ObservationLog};
use super::theory::TheoryVocabulary;
use crate::error::CoreError;

pub const BEHAVIOR_TAGS: [&str; 8] = [
    "離座 (Left Seat)",
    "哭鬧 (Crying)",
    "攻擊 (Aggression)",
    "幫助他人 (Helping)",
    "參與互動 (Engaged)",
    "自我刺激 (Stimming)",
    "抗拒指令 (Refusal)",
    "情緒表達 (Emotional Expr.)",
];

/// A child seated in a group session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    #[serde(default)]
    pub feature: String,
    pub seat_index: u32,
}

impl Member {
    pub fn new(name: impl Into<String>, seat_index: u32) -> Self {
        Self {
            id: MemberId::new(),
            name: name.into(),
            parent_name: None,
            feature: String::new(),
            seat_index,
        }
    }

    pub fn with_parent(mut self, parent_name: impl Into<String>) -> Self {
        self.parent_name = Some(parent_name.into());
        self
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = feature.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Behavior,
    Phase,
    Global,
}

/// Group-level activity markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseMarker {
    ActivityStart,
    ActivityTransition,
    GroupEnd,
}

impl PhaseMarker {
    pub const ALL: [PhaseMarker; 3] = [
        PhaseMarker::ActivityStart,
        PhaseMarker::ActivityTransition,
        PhaseMarker::GroupEnd,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PhaseMarker::ActivityStart => "activity_start",
            PhaseMarker::ActivityTransition => "activity_transition",
            PhaseMarker::GroupEnd => "group_end",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PhaseMarker::ActivityStart => "活動開始",
            PhaseMarker::ActivityTransition => "活動轉換",
            PhaseMarker::GroupEnd => "團體結束",
        }
    }
}

/// What was observed, without ID or capture time.
///
/// Only behavior events name an actor; phase and global events are group-level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GroupEvent {
    Behavior {
        actor_id: MemberId,
        actor_name: String,
        #[serde(default)]
        is_parent_action: bool,
        action: String,
        #[serde(default)]
        note: String,
    },
    Phase {
        action: String,
    },
    Global {
        note: String,
    },
}

impl GroupEvent {
    pub fn behavior(actor: &Member, action: impl Into<String>) -> Self {
        GroupEvent::Behavior {
            actor_id: actor.id.clone(),
            actor_name: actor.name.clone(),
            is_parent_action: false,
            action: action.into(),
            note: String::new(),
        }
    }

    /// A behavior attributed to the member's parent rather than the member.
    pub fn parent_behavior(actor: &Member, action: impl Into<String>) -> Self {
        GroupEvent::Behavior {
            actor_id: actor.id.clone(),
            actor_name: actor.name.clone(),
            is_parent_action: true,
            action: action.into(),
            note: String::new(),
        }
    }

    pub fn phase(marker: PhaseMarker) -> Self {
        GroupEvent::Phase {
            action: marker.label().to_string(),
        }
    }

    pub fn global(note: impl Into<String>) -> Self {
        GroupEvent::Global { note: note.into() }
    }

    pub fn with_note(mut self, text: impl Into<String>) -> Self {
        if let GroupEvent::Behavior { note, .. } = &mut self {
            *note = text.into();
        }
        self
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            GroupEvent::Behavior { .. } => EntryKind::Behavior,
            GroupEvent::Phase { .. } => EntryKind::Phase,
            GroupEvent::Global { .. } => EntryKind::Global,
        }
    }
}

/// One recorded observation in a group session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BehaviorLogEntry {
    pub id: EntryId,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: GroupEvent,
}

impl BehaviorLogEntry {
    pub fn kind(&self) -> EntryKind {
        self.event.kind()
    }

    pub fn actor_id(&self) -> Option<&MemberId> {
        match &self.event {
            GroupEvent::Behavior { actor_id, .. } => Some(actor_id),
            _ => None,
        }
    }

    pub fn actor_name(&self) -> Option<&str> {
        match &self.event {
            GroupEvent::Behavior { actor_name, .. } => Some(actor_name),
            _ => None,
        }
    }

    pub fn is_parent_action(&self) -> bool {
        matches!(
            self.event,
            GroupEvent::Behavior {
                is_parent_action: true,
                ..
            }
        )
    }

    pub fn action(&self) -> &str {
        match &self.event {
            GroupEvent::Behavior { action, .. } | GroupEvent::Phase { action } => action,
            GroupEvent::Global { .. } => "Note",
        }
    }

    pub fn note(&self) -> &str {
        match &self.event {
            GroupEvent::Behavior { note, .. } | GroupEvent::Global { note } => note,
            GroupEvent::Phase { .. } => "",
        }
    }
}

impl LogEntry for BehaviorLogEntry {
    fn id(&self) -> EntryId {
        self.id
    }
}

/// Field replacements for a group session. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSessionPatch {
    pub lesson_plan_text: Option<String>,
    pub lesson_plan_image: Option<ImagePayload>,
    pub clear_lesson_plan_image: bool,
    pub group_name: Option<String>,
    pub date: Option<String>,
    pub therapist: Option<String>,
    pub observer: Option<String>,
    pub session_number: Option<String>,
}

/// Aggregate root of a group-therapy observation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupSession {
    pub id: SessionId,
    #[serde(default)]
    pub lesson_plan_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_plan_image: Option<ImagePayload>,
    #[serde(default)]
    pub group_name: String,
    pub date: String,
    #[serde(default)]
    pub therapist: String,
    #[serde(default)]
    pub observer: String,
    #[serde(default)]
    pub session_number: String,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    logs: ObservationLog<BehaviorLogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_content: Option<String>,
}

impl GroupSession {
    /// Fresh, empty session with a new ID, dated today, with the first theory
    /// of the vocabulary preselected.
    pub fn new(theories: &TheoryVocabulary) -> Self {
        Self {
            id: SessionId::new(),
            lesson_plan_text: String::new(),
            lesson_plan_image: None,
            group_name: String::new(),
            date: super::today(),
            therapist: String::new(),
            observer: String::new(),
            session_number: String::new(),
            members: Vec::new(),
            logs: ObservationLog::new(),
            theory: theories.first().map(String::from),
            generated_content: None,
        }
    }

    pub fn apply(&mut self, patch: GroupSessionPatch) {
        if let Some(text) = patch.lesson_plan_text {
            self.lesson_plan_text = text;
        }
        if patch.clear_lesson_plan_image {
            self.lesson_plan_image = None;
        }
        if let Some(image) = patch.lesson_plan_image {
            self.lesson_plan_image = Some(image);
        }
        if let Some(name) = patch.group_name {
            self.group_name = name;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(therapist) = patch.therapist {
            self.therapist = therapist;
        }
        if let Some(observer) = patch.observer {
            self.observer = observer;
        }
        if let Some(number) = patch.session_number {
            self.session_number = number;
        }
    }

    /// Seat a member, evicting whoever held that seat index. Returns the evicted member.
    pub fn seat_member(&mut self, member: Member) -> Option<Member> {
        let evicted = self
            .members
            .iter()
            .position(|m| m.seat_index == member.seat_index)
            .map(|pos| self.members.remove(pos));
        self.members.push(member);
        evicted
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|m| &m.id == id)
    }

    pub fn member_at_seat(&self, seat_index: u32) -> Option<&Member> {
        self.members.iter().find(|m| m.seat_index == seat_index)
    }

    /// Number of occupied seats.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn logs(&self) -> &ObservationLog<BehaviorLogEntry> {
        &self.logs
    }

    pub fn logs_mut(&mut self) -> &mut ObservationLog<BehaviorLogEntry> {
        &mut self.logs
    }

    pub fn theory(&self) -> Option<&str> {
        self.theory.as_deref()
    }

    /// Select a theory; it must be in the vocabulary at the time of selection.
    pub fn select_theory(
        &mut self,
        theories: &TheoryVocabulary,
        label: &str,
    ) -> Result<(), CoreError> {
        if !theories.contains(label) {
            return Err(CoreError::InvalidTheory(label.to_string()));
        }
        self.theory = Some(label.to_string());
        Ok(())
    }

    pub fn has_lesson_plan(&self) -> bool {
        self.lesson_plan_image.is_some() || !self.lesson_plan_text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_marker_key_matches_serde() {
        for marker in PhaseMarker::ALL {
            assert_eq!(serde_json::to_value(marker).unwrap(), marker.key());
        }
    }

    #[test]
    fn test_new_session_defaults() {
        let theories = TheoryVocabulary::default();
        let session = GroupSession::new(&theories);
        assert_eq!(session.theory(), Some("行為治療 (Behavioral Therapy)"));
        assert_eq!(session.date.len(), 10);
        assert!(session.logs().is_empty());
        assert_eq!(session.member_count(), 0);
        assert!(session.generated_content.is_none());
    }

    #[test]
    fn test_seat_member_evicts_prior_occupant() {
        let mut session = GroupSession::new(&TheoryVocabulary::default());
        assert!(session.seat_member(Member::new("小明", 0)).is_none());
        session.seat_member(Member::new("小華", 1));
        let evicted = session.seat_member(Member::new("小美", 0)).unwrap();

        assert_eq!(evicted.name, "小明");
        assert_eq!(session.member_count(), 2);
        let at_zero: Vec<_> = session
            .members()
            .iter()
            .filter(|m| m.seat_index == 0)
            .collect();
        assert_eq!(at_zero.len(), 1);
        assert_eq!(at_zero[0].name, "小美");
    }

    #[test]
    fn test_patch_replaces_only_given_fields() {
        let mut session = GroupSession::new(&TheoryVocabulary::default());
        session.apply(GroupSessionPatch {
            group_name: Some("社交技巧團體".into()),
            therapist: Some("王老師".into()),
            ..Default::default()
        });
        session.apply(GroupSessionPatch {
            lesson_plan_image: Some(ImagePayload::parse("abcd").unwrap()),
            ..Default::default()
        });
        assert_eq!(session.group_name, "社交技巧團體");
        assert_eq!(session.therapist, "王老師");
        assert!(session.has_lesson_plan());

        session.apply(GroupSessionPatch {
            clear_lesson_plan_image: true,
            ..Default::default()
        });
        assert!(session.lesson_plan_image.is_none());
        assert_eq!(session.group_name, "社交技巧團體");
    }

    #[test]
    fn test_select_theory_checks_vocabulary_at_selection_time() {
        let mut theories = TheoryVocabulary::default();
        let mut session = GroupSession::new(&theories);
        assert!(session.select_theory(&theories, "不存在").is_err());

        session
            .select_theory(&theories, "認知行為 (CBT)")
            .unwrap();
        theories.remove("認知行為 (CBT)");
        // No retroactive repair
        assert_eq!(session.theory(), Some("認知行為 (CBT)"));
    }

    #[test]
    fn test_entry_serde_tags_type() {
        let member = Member::new("小明", 0);
        let entry = BehaviorLogEntry {
            id: EntryId::FIRST,
            timestamp: Utc::now(),
            event: GroupEvent::parent_behavior(&member, "哭鬧 (Crying)").with_note("抱緊孩子"),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"type\":\"behavior\""));
        assert!(json.contains("\"is_parent_action\":true"));
        let parsed: BehaviorLogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entry);
        assert_eq!(parsed.actor_name(), Some("小明"));
        assert_eq!(parsed.note(), "抱緊孩子");

        let phase = BehaviorLogEntry {
            id: EntryId(2),
            timestamp: Utc::now(),
            event: GroupEvent::phase(PhaseMarker::ActivityStart),
        };
        assert_eq!(phase.kind(), EntryKind::Phase);
        assert!(phase.actor_id().is_none());
        assert!(phase.actor_name().is_none());
        assert_eq!(phase.action(), "活動開始");
    }
}
