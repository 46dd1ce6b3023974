use clinote_core::config::settings::DEFAULT_TEMPERATURE;
use clinote_core::config::ClinoteConfig;
use clinote_core::model::{
    AssessmentLogEntry, AssessmentSession, BehaviorLogEntry, GroupEvent, GroupSession, Member,
};

use crate::request::{InlineImage, ReportRequest};

pub const SYSTEM_INSTRUCTION: &str = "你是一位資深的臨床心理師與團體治療督導，\
協助治療師將現場觀察筆記整理成專業、客觀、以現象學描述為主的繁體中文報告。\
只依據提供的資料撰寫，不杜撰未記錄的行為，也不在報告中列出任何具體時間點。";

const NO_LESSON_PLAN_TEXT: &str = "無文字輸入";
const NO_THEORY: &str = "未指定";

/// Builds generation requests from sessions.
///
/// Timestamps are never written into a request: the report must read as
/// continuous prose, so entries appear in log order without their capture times.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    system_instruction: String,
    temperature: f32,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ClinoteConfig) -> Self {
        Self {
            system_instruction: config
                .system_instruction
                .clone()
                .unwrap_or_else(|| SYSTEM_INSTRUCTION.to_string()),
            temperature: config.temperature,
        }
    }

    pub fn group(&self, session: &GroupSession) -> ReportRequest {
        let mut text = String::new();

        text.push_str("[模式: 團體觀察報告生成]\n\n");

        text.push_str("1. 基本資料:\n");
        text.push_str(&format!("團體名稱: {}\n", session.group_name));
        text.push_str(&format!("日期: {}\n", session.date));
        text.push_str(&format!("治療師: {}\n", session.therapist));
        if !session.observer.trim().is_empty() {
            text.push_str(&format!("觀察者: {}\n", session.observer));
        }
        if !session.session_number.trim().is_empty() {
            text.push_str(&format!("場次: {}\n", session.session_number));
        }
        text.push_str(&format!("成員名單: {}\n", format_roster(session.members())));

        text.push_str(&format!(
            "\n2. 指定理論視角: {}\n",
            session.theory().unwrap_or(NO_THEORY)
        ));
        text.push_str("(請依據此理論，在心得部分提出引導式問題，而非直接撰寫結論)\n");

        text.push_str("\n3. 教案內容 (文字輸入):\n");
        let lesson = session.lesson_plan_text.trim();
        text.push_str(if lesson.is_empty() {
            NO_LESSON_PLAN_TEXT
        } else {
            lesson
        });
        text.push('\n');

        text.push_str("\n4. 觀察筆記 (Logs):\n");
        text.push_str(&format_group_logs(session.logs().entries()));
        text.push('\n');

        text.push_str("\n5. 特別要求:\n");
        text.push_str("- 撰寫「團體觀察」段落時，請將零散的觀察紀錄整合為通順的敘事文章。\n");
        text.push_str(
            "- **絕對不要**在報告內容中顯示具體時間點，請改用「活動初期」、「隨後」、「結束前」等連接詞。\n",
        );
        text.push_str("- 格式：純文字 (Plain Text)。\n");

        let image = session.lesson_plan_image.as_ref().map(|img| InlineImage {
            mime_type: img.mime_type().to_string(),
            data: img.base64_data().to_string(),
        });

        ReportRequest {
            system_instruction: self.system_instruction.clone(),
            text,
            image,
            temperature: self.temperature,
        }
    }

    pub fn assessment(&self, session: &AssessmentSession) -> ReportRequest {
        let mut text = String::new();

        text.push_str("[模式: 衡鑑觀察報告生成]\n\n");

        text.push_str("1. 基本資料:\n");
        text.push_str(&format!("日期: {}\n", session.date));
        text.push_str(&format!("個案代號: {}\n", session.case_name));
        text.push_str(&format!("年齡: {}\n", session.age));
        text.push_str(&format!("性別: {}\n", session.gender));
        text.push_str(&format!("初步診斷假設: {}\n", session.provisional_diagnosis));

        text.push_str("\n2. 原始主述 (Chief Complaint Raw Input):\n");
        text.push_str(&format!("\"{}\"\n", session.chief_complaint));

        text.push_str("\n3. 行為觀察筆記 (Behavior Logs):\n");
        text.push_str(&format_assessment_logs(session.logs().entries()));
        text.push('\n');

        text.push_str("\n4. 任務要求:\n");
        text.push_str("請生成一份完整的衡鑑觀察報告，包含以下三個明確欄位：\n\n");
        text.push_str("**一、主述 (Chief Complaint)**\n");
        text.push_str(
            "請將上述「原始主述」轉化為專業病歷格式（例如：將「講不聽」轉化為「指令遵從性低」或「對立反抗特質」）。\n\n",
        );
        text.push_str("**二、行為觀察 (Behavioral Observation)**\n");
        text.push_str("請將「行為觀察筆記」整合成一篇完整、通順、具現象學描述的文章。\n");
        text.push_str("- 描述個案的外觀、態度、測驗中的具體反應。\n");
        text.push_str("- 嚴格遵守現象學：寫出動作、表情、語氣，而非冷冰冰的分數。\n");
        text.push_str("- **不要**顯示時間戳記。\n\n");
        text.push_str("**三、心得與綜合評估 (Conclusion & Impression)**\n");
        text.push_str("- 綜合上述觀察，驗證「初步診斷假設」是否成立，不可預設其成立。\n");
        text.push_str("- 提供臨床觀察總結。\n");

        text.push_str("\n5. 格式: 純文字 (Plain Text)。\n");

        ReportRequest {
            system_instruction: self.system_instruction.clone(),
            text,
            image: None,
            temperature: self.temperature,
        }
    }
}

/// `name (Parent: parent) [Feature: feature]` per member, joined by `; `.
pub fn format_roster(members: &[Member]) -> String {
    members
        .iter()
        .map(|m| match &m.parent_name {
            Some(parent) => format!("{} (Parent: {parent}) [Feature: {}]", m.name, m.feature),
            None => format!("{} [Feature: {}]", m.name, m.feature),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// One line per entry, in log order.
pub fn format_group_logs(entries: &[BehaviorLogEntry]) -> String {
    entries
        .iter()
        .map(format_group_entry)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_group_entry(entry: &BehaviorLogEntry) -> String {
    match &entry.event {
        GroupEvent::Phase { action } => format!("[PHASE CHANGE] {action}"),
        GroupEvent::Global { note } => format!("GLOBAL NOTE: {note}"),
        GroupEvent::Behavior {
            actor_name,
            is_parent_action,
            action,
            note,
            ..
        } => {
            let actor = if *is_parent_action {
                format!("Parent of {actor_name}")
            } else {
                format!("Member: {actor_name}")
            };
            if note.is_empty() {
                format!("{actor} ({action})")
            } else {
                format!("{actor} ({action}) - {note}")
            }
        }
    }
}

pub fn format_assessment_logs(entries: &[AssessmentLogEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("[Category: {}] {}", e.category.label(), e.note))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use clinote_core::model::{
        AssessmentCategory, ImagePayload, PhaseMarker, TheoryVocabulary,
    };
    use regex::Regex;

    fn at(ts: &str) -> DateTime<Utc> {
        ts.parse().unwrap()
    }

    fn sample_group() -> GroupSession {
        let mut session = GroupSession::new(&TheoryVocabulary::default());
        session.group_name = "社交技巧團體".into();
        session.date = "2025-03-01".into();
        session.therapist = "王老師".into();
        session.seat_member(Member::new("小明", 0).with_feature("紅衣"));
        session.seat_member(Member::new("小華", 1).with_parent("華媽"));
        let ming = session.member_at_seat(0).unwrap().clone();
        let hua = session.member_at_seat(1).unwrap().clone();

        let events = [
            (GroupEvent::phase(PhaseMarker::ActivityStart), "2025-03-01T14:05:00Z"),
            (GroupEvent::behavior(&ming, "離座 (Left Seat)"), "2025-03-01T14:07:30Z"),
            (
                GroupEvent::parent_behavior(&hua, "情緒表達 (Emotional Expr.)").with_note("安撫"),
                "2025-03-01T14:12:00Z",
            ),
            (GroupEvent::global("全體一起收拾"), "2025-03-01T14:30:00Z"),
        ];
        for (event, ts) in events {
            let id = session.logs().next_id();
            session
                .logs_mut()
                .append(BehaviorLogEntry {
                    id,
                    timestamp: at(ts),
                    event,
                })
                .unwrap();
        }
        session
    }

    #[test]
    fn test_group_request_redacts_timestamps() {
        let request = RequestBuilder::new().group(&sample_group());
        assert!(!request.text.contains("14:05"));
        let clock = Regex::new(r"\d{1,2}:\d{2}").unwrap();
        assert!(!clock.is_match(&request.text), "{}", request.text);
        assert!(!clock.is_match(&request.system_instruction));
    }

    #[test]
    fn test_group_log_lines() {
        let session = sample_group();
        let lines: Vec<_> = session.logs().iter().map(format_group_entry).collect();
        assert_eq!(
            lines,
            vec![
                "[PHASE CHANGE] 活動開始",
                "Member: 小明 (離座 (Left Seat))",
                "Parent of 小華 (情緒表達 (Emotional Expr.)) - 安撫",
                "GLOBAL NOTE: 全體一起收拾",
            ]
        );
    }

    #[test]
    fn test_group_request_sections() {
        let request = RequestBuilder::new().group(&sample_group());
        assert!(request
            .text
            .contains("成員名單: 小明 [Feature: 紅衣]; 小華 (Parent: 華媽) [Feature: ]"));
        assert!(request
            .text
            .contains("指定理論視角: 行為治療 (Behavioral Therapy)"));
        assert!(request.text.contains("提出引導式問題，而非直接撰寫結論"));
        assert!(request.text.contains(NO_LESSON_PLAN_TEXT));
        assert!(request.image.is_none());
        assert!((request.temperature - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn test_lesson_plan_image_attached_as_separate_part() {
        let mut session = sample_group();
        session.lesson_plan_text = "傳球遊戲".into();
        session.lesson_plan_image =
            Some(ImagePayload::parse("data:image/png;base64,iVBORw0KGgo=").unwrap());
        let request = RequestBuilder::new().group(&session);
        let image = request.image.unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.data, "iVBORw0KGgo=");
        assert!(!request.text.contains("iVBORw0KGgo="));
        assert!(request.text.contains("傳球遊戲"));
    }

    #[test]
    fn test_builder_is_deterministic() {
        let session = sample_group();
        let builder = RequestBuilder::new();
        assert_eq!(builder.group(&session), builder.group(&session));
    }

    #[test]
    fn test_assessment_request() {
        let mut session = AssessmentSession::new();
        session.case_name = "C001".into();
        session.age = "7".into();
        session.provisional_diagnosis = "ADHD".into();
        session.chief_complaint = "媽媽說他都講不聽".into();
        for (category, note, ts) in [
            (AssessmentCategory::Appearance, "衣著整齊", "2025-03-01T09:15:00Z"),
            (AssessmentCategory::Attention, "常看窗外", "2025-03-01T09:40:00Z"),
        ] {
            let id = session.logs().next_id();
            session
                .logs_mut()
                .append(AssessmentLogEntry {
                    id,
                    timestamp: at(ts),
                    category,
                    note: note.into(),
                })
                .unwrap();
        }

        let request = RequestBuilder::new().assessment(&session);
        assert!(request.text.contains("初步診斷假設: ADHD"));
        assert!(request.text.contains("\"媽媽說他都講不聽\""));
        assert!(request
            .text
            .contains("[Category: 外觀 (Appearance)] 衣著整齊\n[Category: 注意力 (Attention)] 常看窗外"));
        assert!(request.text.contains("驗證「初步診斷假設」是否成立"));
        assert!(!Regex::new(r"\d{1,2}:\d{2}").unwrap().is_match(&request.text));
        assert!(request.image.is_none());
    }

    #[test]
    fn test_config_overrides() {
        let config = ClinoteConfig {
            temperature: 0.8,
            system_instruction: Some("自訂".into()),
            ..Default::default()
        };
        let request = RequestBuilder::from_config(&config).assessment(&AssessmentSession::new());
        assert_eq!(request.system_instruction, "自訂");
        assert!((request.temperature - 0.8).abs() < f32::EPSILON);
    }
}
