use async_trait::async_trait;
use clinote_core::config::settings::DEFAULT_FALLBACK_MESSAGE;

use crate::error::ReportError;
use crate::request::ReportRequest;

/// The external text-generation capability.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, request: &ReportRequest) -> Result<String, ReportError>;
}

/// Stand-in used when no service is configured. Every call fails, so callers
/// always land on the fallback message.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGenerator;

#[async_trait]
impl ReportGenerator for UnconfiguredGenerator {
    async fn generate(&self, _request: &ReportRequest) -> Result<String, ReportError> {
        Err(ReportError::NotConfigured)
    }
}

/// Map a generation outcome to displayable text.
///
/// Failures and blank replies become `fallback`; the result is never empty.
pub fn resolve_outcome(outcome: Result<String, ReportError>, fallback: &str) -> String {
    let fallback = if fallback.trim().is_empty() {
        DEFAULT_FALLBACK_MESSAGE
    } else {
        fallback
    };
    match outcome {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            tracing::warn!("generation returned empty text, using fallback");
            fallback.to_string()
        }
        Err(e) => {
            tracing::warn!("generation failed: {e}");
            fallback.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    #[async_trait]
    impl ReportGenerator for Canned {
        async fn generate(&self, _request: &ReportRequest) -> Result<String, ReportError> {
            Ok(self.0.to_string())
        }
    }

    fn request() -> ReportRequest {
        ReportRequest {
            system_instruction: String::new(),
            text: "prompt".into(),
            image: None,
            temperature: 0.3,
        }
    }

    #[tokio::test]
    async fn test_success_text_passes_through() {
        let text = resolve_outcome(Canned("團體觀察報告").generate(&request()).await, "fallback");
        assert_eq!(text, "團體觀察報告");
    }

    #[tokio::test]
    async fn test_failure_and_blank_become_fallback() {
        assert_eq!(
            resolve_outcome(UnconfiguredGenerator.generate(&request()).await, "無法生成報告。"),
            "無法生成報告。"
        );
        assert_eq!(
            resolve_outcome(Canned("  \n").generate(&request()).await, "無法生成報告。"),
            "無法生成報告。"
        );
    }

    #[test]
    fn test_blank_fallback_still_non_empty() {
        let text = resolve_outcome(Err(ReportError::EmptyResponse), "");
        assert_eq!(text, DEFAULT_FALLBACK_MESSAGE);
    }
}
