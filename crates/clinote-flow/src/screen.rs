//! Screens and the pure transition function between them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    Group,
    Assessment,
}

impl SessionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Group => "group",
            SessionKind::Assessment => "assessment",
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStep {
    LessonPlan,
    Setup,
    Observation,
    Review,
    /// Confirmation after save. Only Home is reachable from here.
    Saved,
}

impl GroupStep {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupStep::LessonPlan => "lesson_plan",
            GroupStep::Setup => "setup",
            GroupStep::Observation => "observation",
            GroupStep::Review => "review",
            GroupStep::Saved => "saved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStep {
    Setup,
    Observation,
    Review,
    Saved,
}

impl AssessmentStep {
    pub fn as_str(self) -> &'static str {
        match self {
            AssessmentStep::Setup => "setup",
            AssessmentStep::Observation => "observation",
            AssessmentStep::Review => "review",
            AssessmentStep::Saved => "saved",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "screen", content = "step", rename_all = "snake_case")]
pub enum Screen {
    Home,
    Settings,
    History,
    Group(GroupStep),
    Assessment(AssessmentStep),
}

impl Screen {
    pub fn session_kind(self) -> Option<SessionKind> {
        match self {
            Screen::Group(_) => Some(SessionKind::Group),
            Screen::Assessment(_) => Some(SessionKind::Assessment),
            _ => None,
        }
    }

    /// The session kind whose Review screen this is, if any.
    pub fn review_kind(self) -> Option<SessionKind> {
        match self {
            Screen::Group(GroupStep::Review) => Some(SessionKind::Group),
            Screen::Assessment(AssessmentStep::Review) => Some(SessionKind::Assessment),
            _ => None,
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Screen::Home => f.write_str("home"),
            Screen::Settings => f.write_str("settings"),
            Screen::History => f.write_str("history"),
            Screen::Group(step) => write!(f, "group/{}", step.as_str()),
            Screen::Assessment(step) => write!(f, "assessment/{}", step.as_str()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavEvent {
    OpenSettings,
    OpenHistory,
    StartGroup,
    StartAssessment,
    Next,
    Back,
    /// Group Review only: return to the lesson plan.
    EditLessonPlan,
    Save,
    GoHome,
}

impl fmt::Display for NavEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NavEvent::OpenSettings => "open settings",
            NavEvent::OpenHistory => "open history",
            NavEvent::StartGroup => "start group session",
            NavEvent::StartAssessment => "start assessment session",
            NavEvent::Next => "go next",
            NavEvent::Back => "go back",
            NavEvent::EditLessonPlan => "edit lesson plan",
            NavEvent::Save => "save",
            NavEvent::GoHome => "go home",
        };
        f.write_str(name)
    }
}

/// Compute the screen reached by applying `event` on `from`.
///
/// Forward moves advance exactly one step. Back is always available except on
/// the Saved confirmation, and from Home it is a no-op.
pub fn transition(from: Screen, event: NavEvent) -> Result<Screen, FlowError> {
    use AssessmentStep as A;
    use GroupStep as G;
    use NavEvent as E;

    let to = match (from, event) {
        (Screen::Home, E::OpenSettings) => Screen::Settings,
        (Screen::Home, E::OpenHistory) => Screen::History,
        (Screen::Home, E::StartGroup) => Screen::Group(G::LessonPlan),
        (Screen::Home, E::StartAssessment) => Screen::Assessment(A::Setup),
        (Screen::Home, E::Back | E::GoHome) => Screen::Home,

        (Screen::Settings | Screen::History, E::Back | E::GoHome) => Screen::Home,

        (Screen::Group(G::LessonPlan), E::Next) => Screen::Group(G::Setup),
        (Screen::Group(G::Setup), E::Next) => Screen::Group(G::Observation),
        (Screen::Group(G::Observation), E::Next) => Screen::Group(G::Review),
        (Screen::Group(G::LessonPlan | G::Setup), E::Back) => Screen::Home,
        (Screen::Group(G::Observation), E::Back) => Screen::Group(G::Setup),
        (Screen::Group(G::Review), E::Back) => Screen::Group(G::Observation),
        (Screen::Group(G::Review), E::EditLessonPlan) => Screen::Group(G::LessonPlan),
        (Screen::Group(G::Review), E::Save) => Screen::Group(G::Saved),
        (Screen::Group(G::Saved), E::Back | E::GoHome) => Screen::Home,
        (Screen::Group(_), E::GoHome) => Screen::Home,

        (Screen::Assessment(A::Setup), E::Next) => Screen::Assessment(A::Observation),
        (Screen::Assessment(A::Observation), E::Next) => Screen::Assessment(A::Review),
        (Screen::Assessment(A::Setup), E::Back) => Screen::Home,
        (Screen::Assessment(A::Observation), E::Back) => Screen::Assessment(A::Setup),
        (Screen::Assessment(A::Review), E::Back) => Screen::Assessment(A::Observation),
        (Screen::Assessment(A::Review), E::Save) => Screen::Assessment(A::Saved),
        (Screen::Assessment(A::Saved), E::Back | E::GoHome) => Screen::Home,
        (Screen::Assessment(_), E::GoHome) => Screen::Home,

        (from, event) => return Err(FlowError::InvalidTransition { from, event }),
    };
    Ok(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(start: Screen, events: &[NavEvent]) -> Result<Screen, FlowError> {
        events.iter().try_fold(start, |s, e| transition(s, *e))
    }

    #[test]
    fn test_group_forward_chain() {
        let screen = walk(
            Screen::Home,
            &[NavEvent::StartGroup, NavEvent::Next, NavEvent::Next, NavEvent::Next],
        )
        .unwrap();
        assert_eq!(screen, Screen::Group(GroupStep::Review));
    }

    #[test]
    fn test_assessment_forward_chain() {
        let screen = walk(Screen::Home, &[NavEvent::StartAssessment, NavEvent::Next, NavEvent::Next])
            .unwrap();
        assert_eq!(screen, Screen::Assessment(AssessmentStep::Review));
    }

    #[test]
    fn test_no_forward_past_review() {
        let err = transition(Screen::Group(GroupStep::Review), NavEvent::Next).unwrap_err();
        assert!(matches!(err, FlowError::InvalidTransition { .. }));
    }

    #[test]
    fn test_group_back_from_observation_bypasses_lesson_plan() {
        assert_eq!(
            transition(Screen::Group(GroupStep::Observation), NavEvent::Back).unwrap(),
            Screen::Group(GroupStep::Setup)
        );
        assert_eq!(
            transition(Screen::Group(GroupStep::Setup), NavEvent::Back).unwrap(),
            Screen::Home
        );
        assert_eq!(
            transition(Screen::Group(GroupStep::LessonPlan), NavEvent::Back).unwrap(),
            Screen::Home
        );
    }

    #[test]
    fn test_back_from_home_is_noop() {
        assert_eq!(transition(Screen::Home, NavEvent::Back).unwrap(), Screen::Home);
    }

    #[test]
    fn test_saved_only_reaches_home() {
        let saved = Screen::Assessment(AssessmentStep::Saved);
        assert_eq!(transition(saved, NavEvent::Back).unwrap(), Screen::Home);
        assert_eq!(transition(saved, NavEvent::GoHome).unwrap(), Screen::Home);
        for event in [NavEvent::Next, NavEvent::Save, NavEvent::StartAssessment] {
            assert!(transition(saved, event).is_err());
        }
    }

    #[test]
    fn test_edit_lesson_plan_from_group_review_only() {
        assert_eq!(
            transition(Screen::Group(GroupStep::Review), NavEvent::EditLessonPlan).unwrap(),
            Screen::Group(GroupStep::LessonPlan)
        );
        assert!(transition(Screen::Assessment(AssessmentStep::Review), NavEvent::EditLessonPlan)
            .is_err());
    }

    #[test]
    fn test_start_only_from_home() {
        assert!(transition(Screen::Settings, NavEvent::StartGroup).is_err());
        assert!(transition(Screen::Group(GroupStep::Setup), NavEvent::StartAssessment).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Screen::Group(GroupStep::LessonPlan).to_string(), "group/lesson_plan");
        assert_eq!(Screen::Assessment(AssessmentStep::Review).to_string(), "assessment/review");
    }

    #[test]
    fn test_screen_serde_shape() {
        let json = serde_json::to_string(&Screen::Group(GroupStep::Observation)).unwrap();
        assert_eq!(json, r#"{"screen":"group","step":"observation"}"#);
        let home: Screen = serde_json::from_str(r#"{"screen":"home"}"#).unwrap();
        assert_eq!(home, Screen::Home);
    }
}
