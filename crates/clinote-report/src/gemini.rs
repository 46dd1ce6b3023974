//! Generation over the Gemini `generateContent` REST endpoint.

use std::time::Duration;

use async_trait::async_trait;
use clinote_core::config::ClinoteConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::generator::ReportGenerator;
use crate::request::ReportRequest;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Build a client from config; fails when no API key is available.
    pub fn from_config(config: &ClinoteConfig) -> Result<Self, ReportError> {
        let api_key = config
            .resolved_api_key()
            .ok_or(ReportError::NotConfigured)?;
        let client = Self::new(api_key, config.model.clone());
        match config.request_timeout_secs {
            Some(secs) => client.with_timeout(Duration::from_secs(secs)),
            None => Ok(client),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Bound each request. No timeout is applied otherwise.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ReportError> {
        self.client = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn body(request: &ReportRequest) -> GenerateContentRequest {
        let mut parts = vec![Part::Text {
            text: request.text.clone(),
        }];
        if let Some(image) = &request.image {
            parts.push(Part::InlineData {
                inline_data: InlineDataPayload {
                    mime_type: image.mime_type.clone(),
                    data: image.data.clone(),
                },
            });
        }
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            system_instruction: (!request.system_instruction.is_empty()).then(|| Content {
                role: "system".to_string(),
                parts: vec![Part::Text {
                    text: request.system_instruction.clone(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

#[async_trait]
impl ReportGenerator for GeminiClient {
    async fn generate(&self, request: &ReportRequest) -> Result<String, ReportError> {
        let url = format!("{}/{}:generateContent", self.base_url, self.model);
        tracing::info!("requesting report from {}", self.model);

        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(ReportError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_text(parsed)
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineDataPayload {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Concatenate the text parts of the first candidate.
fn extract_text(response: GenerateContentResponse) -> Result<String, ReportError> {
    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ReportError::EmptyResponse);
    }
    Ok(text)
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            match wrapper.error.status {
                Some(status) if !status.is_empty() => format!("{status}: {msg}"),
                _ => msg,
            }
        })
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::InlineImage;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serve one HTTP response and hand back the raw request body.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            l.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + length {
                        let _ = tx.send(String::from_utf8_lossy(&buf[header_end + 4..]).to_string());
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        (format!("http://{addr}"), rx)
    }

    fn request(image: Option<InlineImage>) -> ReportRequest {
        ReportRequest {
            system_instruction: "system".into(),
            text: "prompt".into(),
            image,
            temperature: 0.3,
        }
    }

    #[tokio::test]
    async fn test_generate_success_with_image_part() {
        let (base, body_rx) = serve_once(
            "200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"報告"},{"text":"內容"}]}}]}"#,
        )
        .await;
        let client = GeminiClient::new("key", "test-model").with_base_url(base);
        let text = client
            .generate(&request(Some(InlineImage {
                mime_type: "image/png".into(),
                data: "iVBORw0KGgo=".into(),
            })))
            .await
            .unwrap();
        assert_eq!(text, "報告內容");

        let sent: serde_json::Value = serde_json::from_str(&body_rx.await.unwrap()).unwrap();
        let parts = &sent["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "prompt");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/png");
        assert_eq!(sent["system_instruction"]["parts"][0]["text"], "system");
    }

    #[tokio::test]
    async fn test_generate_maps_api_error() {
        let (base, _rx) = serve_once(
            "503 Service Unavailable",
            r#"{"error":{"code":503,"message":"overloaded","status":"UNAVAILABLE"}}"#,
        )
        .await;
        let client = GeminiClient::new("key", "test-model").with_base_url(base);
        match client.generate(&request(None)).await {
            Err(ReportError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "UNAVAILABLE: overloaded");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(extract_text(parsed), Err(ReportError::EmptyResponse)));
    }

    #[test]
    fn test_from_config_requires_key() {
        let mut config = ClinoteConfig {
            api_key: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(
            GeminiClient::from_config(&config),
            Err(ReportError::NotConfigured)
        ));
        config.api_key = Some("abc".into());
        config.request_timeout_secs = Some(30);
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(client.api_key, "abc");
    }
}
