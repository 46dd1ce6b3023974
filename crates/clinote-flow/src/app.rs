//! The explicit context object the navigator's handlers run against.

use clinote_capture::{
    assign_seat, ActorSelection, AssessmentRecorder, BehaviorRecorder, SeatAssignment, SeatOutcome,
};
use clinote_core::config::ClinoteConfig;
use clinote_core::model::{
    AssessmentCategory, AssessmentLogEntry, AssessmentSession, AssessmentSessionPatch,
    BehaviorLogEntry, GroupSession, GroupSessionPatch, MemberId, PhaseMarker, TheoryVocabulary,
};
use clinote_core::storage::{HistoryStore, MemoryHistory};
use clinote_core::CoreError;
use clinote_report::{
    resolve_outcome, ReportError, ReportGenerator, ReportRequest, RequestBuilder,
};

use crate::clipboard::Clipboard;
use crate::error::FlowError;
use crate::review::{ReviewState, ReviewSummary};
use crate::screen::{transition, AssessmentStep, GroupStep, NavEvent, Screen, SessionKind};

pub type GroupHistory = Box<dyn HistoryStore<GroupSession> + Send>;
pub type AssessmentHistory = Box<dyn HistoryStore<AssessmentSession> + Send>;

/// Current screen, the in-progress session of each kind, and the
/// collaborators that act on them.
///
/// Every mutation goes through `&mut self`, so a session is never written by
/// two handlers at once.
pub struct App {
    screen: Screen,
    theories: TheoryVocabulary,
    group: GroupSession,
    assessment: AssessmentSession,
    behavior: BehaviorRecorder,
    assessment_recorder: AssessmentRecorder,
    group_review: ReviewState,
    assessment_review: ReviewState,
    group_history: GroupHistory,
    assessment_history: AssessmentHistory,
    builder: RequestBuilder,
    fallback: String,
}

impl App {
    pub fn new(
        config: &ClinoteConfig,
        group_history: GroupHistory,
        assessment_history: AssessmentHistory,
    ) -> Self {
        let theories = config.theories.clone();
        Self {
            screen: Screen::Home,
            group: GroupSession::new(&theories),
            assessment: AssessmentSession::new(),
            theories,
            behavior: BehaviorRecorder::new(),
            assessment_recorder: AssessmentRecorder::new(),
            group_review: ReviewState::new(),
            assessment_review: ReviewState::new(),
            group_history,
            assessment_history,
            builder: RequestBuilder::from_config(config),
            fallback: config.fallback_message.clone(),
        }
    }

    /// An app whose histories live only as long as the process.
    pub fn in_memory(config: &ClinoteConfig) -> Self {
        Self::new(
            config,
            Box::new(MemoryHistory::new()),
            Box::new(MemoryHistory::new()),
        )
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn theories(&self) -> &TheoryVocabulary {
        &self.theories
    }

    pub fn group(&self) -> &GroupSession {
        &self.group
    }

    pub fn assessment(&self) -> &AssessmentSession {
        &self.assessment
    }

    pub fn selection(&self) -> Option<&ActorSelection> {
        self.behavior.selection()
    }

    pub fn review(&self, kind: SessionKind) -> &ReviewState {
        match kind {
            SessionKind::Group => &self.group_review,
            SessionKind::Assessment => &self.assessment_review,
        }
    }

    fn review_mut(&mut self, kind: SessionKind) -> &mut ReviewState {
        match kind {
            SessionKind::Group => &mut self.group_review,
            SessionKind::Assessment => &mut self.assessment_review,
        }
    }

    pub fn group_history(&self) -> &dyn HistoryStore<GroupSession> {
        self.group_history.as_ref()
    }

    pub fn assessment_history(&self) -> &dyn HistoryStore<AssessmentSession> {
        self.assessment_history.as_ref()
    }

    // -- navigation --

    /// Apply a navigation event, running its side effects first so a failed
    /// save leaves the screen unchanged.
    pub fn navigate(&mut self, event: NavEvent) -> Result<Screen, FlowError> {
        let from = self.screen;
        let to = transition(from, event)?;

        match (from, event) {
            (_, NavEvent::StartGroup) => self.start_group(),
            (_, NavEvent::StartAssessment) => self.start_assessment(),
            (Screen::Group(_), NavEvent::Save) => self.save_group()?,
            (Screen::Assessment(_), NavEvent::Save) => self.save_assessment()?,
            _ => {}
        }
        if from == Screen::Group(GroupStep::Observation) && to != from {
            self.behavior.clear_selection();
        }

        tracing::debug!("{from} -> {to} on {event}");
        self.screen = to;
        Ok(to)
    }

    fn start_group(&mut self) {
        if !self.group.logs().is_empty() && self.group.generated_content.is_none() {
            tracing::debug!("discarding unsaved group session {}", self.group.id);
        }
        self.group = GroupSession::new(&self.theories);
        self.behavior = BehaviorRecorder::new();
        self.group_review.reset();
    }

    fn start_assessment(&mut self) {
        if !self.assessment.logs().is_empty() && self.assessment.generated_content.is_none() {
            tracing::debug!("discarding unsaved assessment session {}", self.assessment.id);
        }
        self.assessment = AssessmentSession::new();
        self.assessment_review.reset();
    }

    fn save_group(&mut self) -> Result<(), FlowError> {
        let draft = self.group_review.accepted().ok_or(FlowError::NoDraft)?.to_string();
        let mut snapshot = self.group.clone();
        snapshot.generated_content = Some(draft);
        let outcome = self.group_history.save(snapshot.clone())?;
        tracing::info!("saved group session {} ({outcome:?})", snapshot.id);
        self.group = snapshot;
        Ok(())
    }

    fn save_assessment(&mut self) -> Result<(), FlowError> {
        let draft = self
            .assessment_review
            .accepted()
            .ok_or(FlowError::NoDraft)?
            .to_string();
        let mut snapshot = self.assessment.clone();
        snapshot.generated_content = Some(draft);
        let outcome = self.assessment_history.save(snapshot.clone())?;
        tracing::info!("saved assessment session {} ({outcome:?})", snapshot.id);
        self.assessment = snapshot;
        Ok(())
    }

    fn require(&self, action: &'static str, allowed: bool) -> Result<(), FlowError> {
        if allowed {
            Ok(())
        } else {
            Err(FlowError::NotOnScreen {
                action,
                current: self.screen,
            })
        }
    }

    // -- settings --

    pub fn add_theory(&mut self, label: &str) -> Result<(), FlowError> {
        self.require("add theory", self.screen == Screen::Settings)?;
        self.theories.add(label)?;
        Ok(())
    }

    /// Remove a theory label. Sessions that already selected it keep it.
    pub fn remove_theory(&mut self, label: &str) -> Result<(), FlowError> {
        self.require("remove theory", self.screen == Screen::Settings)?;
        if !self.theories.remove(label) {
            return Err(CoreError::InvalidTheory(label.trim().to_string()).into());
        }
        Ok(())
    }

    // -- data collection --

    pub fn update_group(&mut self, patch: GroupSessionPatch) -> Result<(), FlowError> {
        self.require(
            "edit group details",
            matches!(
                self.screen,
                Screen::Group(GroupStep::LessonPlan | GroupStep::Setup)
            ),
        )?;
        self.group.apply(patch);
        Ok(())
    }

    pub fn update_assessment(&mut self, patch: AssessmentSessionPatch) -> Result<(), FlowError> {
        self.require(
            "edit case details",
            self.screen == Screen::Assessment(AssessmentStep::Setup),
        )?;
        self.assessment.apply(patch);
        Ok(())
    }

    pub fn seat(&mut self, request: SeatAssignment) -> Result<SeatOutcome, FlowError> {
        self.require("seat member", self.screen == Screen::Group(GroupStep::Setup))?;
        Ok(assign_seat(&mut self.group, request)?)
    }

    /// Pick the theory perspective. Available on Setup, and on Review so a
    /// report can be regenerated from another perspective.
    pub fn select_theory(&mut self, label: &str) -> Result<(), FlowError> {
        self.require(
            "select theory",
            matches!(
                self.screen,
                Screen::Group(GroupStep::Setup | GroupStep::Review)
            ),
        )?;
        self.group.select_theory(&self.theories, label)?;
        Ok(())
    }

    fn require_observation(&self, action: &'static str) -> Result<(), FlowError> {
        self.require(action, self.screen == Screen::Group(GroupStep::Observation))
    }

    pub fn select_actor(&mut self, member_id: &MemberId) -> Result<ActorSelection, FlowError> {
        self.require_observation("select member")?;
        Ok(self.behavior.select(&self.group, member_id)?.clone())
    }

    pub fn select_seat(&mut self, seat_index: u32) -> Result<ActorSelection, FlowError> {
        self.require_observation("select member")?;
        Ok(self.behavior.select_seat(&self.group, seat_index)?.clone())
    }

    pub fn set_parent_mode(&mut self, parent_mode: bool) -> Result<(), FlowError> {
        self.require_observation("switch parent mode")?;
        self.behavior.set_parent_mode(&self.group, parent_mode)?;
        Ok(())
    }

    pub fn record_behavior(
        &mut self,
        action: &str,
        note: &str,
    ) -> Result<BehaviorLogEntry, FlowError> {
        self.require_observation("record behavior")?;
        Ok(self.behavior.record_selected(&mut self.group, action, note)?)
    }

    pub fn record_tag(&mut self, index: usize, note: &str) -> Result<BehaviorLogEntry, FlowError> {
        self.require_observation("record behavior")?;
        Ok(self.behavior.record_tag(&mut self.group, index, note)?)
    }

    pub fn record_phase(&mut self, marker: PhaseMarker) -> Result<BehaviorLogEntry, FlowError> {
        self.require_observation("record phase")?;
        Ok(self.behavior.record_phase(&mut self.group, marker)?)
    }

    pub fn record_note(&mut self, note: &str) -> Result<BehaviorLogEntry, FlowError> {
        self.require_observation("record note")?;
        Ok(self.behavior.record_note(&mut self.group, note)?)
    }

    pub fn record_assessment(
        &mut self,
        category: AssessmentCategory,
        note: &str,
    ) -> Result<AssessmentLogEntry, FlowError> {
        self.require(
            "record assessment note",
            self.screen == Screen::Assessment(AssessmentStep::Observation),
        )?;
        Ok(self
            .assessment_recorder
            .record(&mut self.assessment, category, note)?)
    }

    // -- review --

    fn review_kind(&self, action: &'static str) -> Result<SessionKind, FlowError> {
        self.screen.review_kind().ok_or(FlowError::NotOnScreen {
            action,
            current: self.screen,
        })
    }

    /// The request that would be sent for the in-progress session of `kind`.
    pub fn request_for(&self, kind: SessionKind) -> ReportRequest {
        match kind {
            SessionKind::Group => self.builder.group(&self.group),
            SessionKind::Assessment => self.builder.assessment(&self.assessment),
        }
    }

    /// Mark a generation as in flight and build its request.
    pub fn begin_generation(&mut self) -> Result<(SessionKind, ReportRequest), FlowError> {
        let kind = self.review_kind("generate report")?;
        self.review_mut(kind).begin()?;
        Ok((kind, self.request_for(kind)))
    }

    /// Resolve an in-flight generation. Failures and empty replies become the
    /// fallback message; the returned text is what Review now shows.
    pub fn complete_generation(
        &mut self,
        kind: SessionKind,
        outcome: Result<String, ReportError>,
    ) -> String {
        let is_fallback = !matches!(&outcome, Ok(text) if !text.trim().is_empty());
        let text = resolve_outcome(outcome, &self.fallback);
        if !is_fallback {
            tracing::info!("{kind} report generated ({} chars)", text.chars().count());
        }
        self.review_mut(kind).complete(text.clone(), is_fallback);
        text
    }

    pub async fn generate(&mut self, generator: &dyn ReportGenerator) -> Result<String, FlowError> {
        let (kind, request) = self.begin_generation()?;
        let outcome = generator.generate(&request).await;
        Ok(self.complete_generation(kind, outcome))
    }

    /// Clear the draft so the report can be regenerated. Stays on Review.
    pub fn discard_draft(&mut self) -> Result<Option<String>, FlowError> {
        let kind = self.review_kind("discard draft")?;
        Ok(self.review_mut(kind).discard())
    }

    /// Copy the displayed report text verbatim.
    pub fn copy_draft(&self, clipboard: &mut dyn Clipboard) -> Result<(), FlowError> {
        let kind = self.review_kind("copy report")?;
        let text = self.review(kind).displayed().ok_or(FlowError::NoDraft)?;
        clipboard.set_text(text);
        Ok(())
    }

    pub fn review_summary(&self) -> Result<ReviewSummary, FlowError> {
        let kind = self.review_kind("review summary")?;
        let review = self.review(kind);
        let summary = match kind {
            SessionKind::Group => ReviewSummary {
                kind,
                has_lesson_plan: Some(self.group.has_lesson_plan()),
                has_chief_complaint: None,
                member_count: Some(self.group.member_count()),
                log_count: self.group.logs().len(),
                has_draft: review.displayed().is_some(),
                can_generate: review.can_generate(),
            },
            SessionKind::Assessment => ReviewSummary {
                kind,
                has_lesson_plan: None,
                has_chief_complaint: Some(!self.assessment.chief_complaint.trim().is_empty()),
                member_count: None,
                log_count: self.assessment.logs().len(),
                has_draft: review.displayed().is_some(),
                can_generate: review.can_generate(),
            },
        };
        Ok(summary)
    }
}
