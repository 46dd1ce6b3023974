use clinote_core::model::{
    AssessmentCategory, AssessmentSession, GroupSession, PhaseMarker, TheoryVocabulary,
    BEHAVIOR_TAGS,
};
use clinote_core::storage::{ArchivedSession, HistoryRecord};
use clinote_flow::Outcome;
use clinote_report::ReportRequest;

use super::OutputFormat;

pub fn format_outcome(line: usize, outcome: &Outcome, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string(outcome).unwrap_or_default(),
        OutputFormat::Text => format!("{line:>4}  {}", format_outcome_text(outcome)),
    }
}

fn format_outcome_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Moved { screen } => format!("-> {screen}"),
        Outcome::Updated => "updated".to_string(),
        Outcome::Seated { member, evicted } => {
            let mut out = format!("seated {} at {}", member.name, member.seat_index);
            if let Some(prior) = evicted {
                out.push_str(&format!(" (replaced {})", prior.name));
            }
            out
        }
        Outcome::Selected {
            member_id,
            parent_mode,
        } => {
            if *parent_mode {
                format!("selected parent of {member_id}")
            } else {
                format!("selected {member_id}")
            }
        }
        Outcome::Recorded { entry } => format!("recorded {entry}"),
        Outcome::Report { text } => format!("report:\n{text}"),
        Outcome::Discarded { had_draft } => {
            if *had_draft {
                "draft discarded".to_string()
            } else {
                "no draft to discard".to_string()
            }
        }
        Outcome::Copied => "report copied".to_string(),
        Outcome::Theories { labels } => format!("theories: {}", labels.join(", ")),
    }
}

/// The fixed vocabularies scripts refer to: tag indices for `tag`, marker
/// keys for `phase`, category keys for `assess`.
pub fn format_tags(fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "behavior_tags": BEHAVIOR_TAGS,
                "phase_markers": PhaseMarker::ALL
                    .iter()
                    .map(|m| serde_json::json!({ "key": m.key(), "label": m.label() }))
                    .collect::<Vec<_>>(),
                "assessment_categories": AssessmentCategory::ALL
                    .iter()
                    .map(|c| serde_json::json!({ "key": c.key(), "label": c.label() }))
                    .collect::<Vec<_>>(),
            });
            serde_json::to_string_pretty(&value).unwrap_or_default()
        }
        OutputFormat::Text => {
            let mut out = String::from("Behavior tags:\n");
            for (i, tag) in BEHAVIOR_TAGS.iter().enumerate() {
                out.push_str(&format!("  {i:<20} {tag}\n"));
            }
            out.push_str("Phase markers:\n");
            for marker in PhaseMarker::ALL {
                out.push_str(&format!("  {:<20} {}\n", marker.key(), marker.label()));
            }
            out.push_str("Assessment categories:\n");
            for category in AssessmentCategory::ALL {
                out.push_str(&format!("  {:<20} {}\n", category.key(), category.label()));
            }
            out
        }
    }
}

pub fn format_theories(theories: &TheoryVocabulary, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(theories).unwrap_or_default(),
        OutputFormat::Text => {
            if theories.is_empty() {
                return "No theories configured.\n".to_string();
            }
            theories
                .labels()
                .iter()
                .enumerate()
                .map(|(i, label)| format!("{:>2}. {label}\n", i + 1))
                .collect()
        }
    }
}

pub fn format_request(request: &ReportRequest, fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(request).unwrap_or_default(),
        OutputFormat::Text => {
            let mut out = String::new();
            out.push_str(&request.text);
            if !out.ends_with('\n') {
                out.push('\n');
            }
            if let Some(image) = &request.image {
                out.push_str(&format!(
                    "\n[image: {}, {} base64 chars]\n",
                    image.mime_type,
                    image.data.len()
                ));
            }
            out
        }
    }
}

pub fn format_group_records(records: &[HistoryRecord<GroupSession>], fmt: OutputFormat) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(records).unwrap_or_default(),
        OutputFormat::Text => format_records_text("group", records),
    }
}

pub fn format_assessment_records(
    records: &[HistoryRecord<AssessmentSession>],
    fmt: OutputFormat,
) -> String {
    match fmt {
        OutputFormat::Json => serde_json::to_string_pretty(records).unwrap_or_default(),
        OutputFormat::Text => format_records_text("assessment", records),
    }
}

fn format_records_text<S: ArchivedSession>(kind: &str, records: &[HistoryRecord<S>]) -> String {
    if records.is_empty() {
        return format!("No saved {kind} sessions.\n");
    }
    let mut out = String::new();
    for record in records {
        let s = &record.session;
        let name = if s.display_name().is_empty() {
            "(unnamed)"
        } else {
            s.display_name()
        };
        let report = if s.generated_content().is_some() {
            "report"
        } else {
            "no report"
        };
        out.push_str(&format!(
            "\u{25c6} {} {name} {} [{kind}, {report}]  saved {}\n",
            s.session_id(),
            s.date(),
            record.saved_at.format("%Y-%m-%d %H:%M")
        ));
    }
    out
}
