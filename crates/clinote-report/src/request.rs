use serde::Serialize;

/// An image sent alongside the prompt text as a separate binary part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineImage {
    pub mime_type: String,
    /// Base64 body without any data-URL header.
    pub data: String,
}

/// Everything the generation service needs for one report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    pub system_instruction: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineImage>,
    pub temperature: f32,
}
