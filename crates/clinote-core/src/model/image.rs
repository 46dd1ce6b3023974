use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// A self-contained encoded image, either a data URL
/// (`data:<mime>;base64,<data>`) or bare base64. Treated opaquely except for
/// splitting out the MIME type and the base64 body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagePayload(String);

impl ImagePayload {
    /// Wrap an already-encoded payload. Rejects empty or data URLs without a body.
    pub fn parse(encoded: impl Into<String>) -> Result<Self, CoreError> {
        let encoded = encoded.into();
        let payload = Self(encoded.trim().to_string());
        if payload.base64_data().is_empty() {
            return Err(CoreError::InvalidImage("payload has no image data".into()));
        }
        Ok(payload)
    }

    /// Encode raw image bytes as a data URL.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        Self(format!(
            "data:{mime_type};base64,{}",
            BASE64_STANDARD.encode(bytes)
        ))
    }

    pub fn mime_type(&self) -> &str {
        self.0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(','))
            .map(|(header, _)| header.split(';').next().unwrap_or_default())
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME)
    }

    /// The base64 body without any data-URL header.
    pub fn base64_data(&self) -> &str {
        match self.0.split_once(',') {
            Some((header, data)) if header.starts_with("data:") => data,
            _ => &self.0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_parts() {
        let img = ImagePayload::parse("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(img.mime_type(), "image/png");
        assert_eq!(img.base64_data(), "iVBORw0KGgo=");
    }

    #[test]
    fn test_bare_base64_defaults_to_jpeg() {
        let img = ImagePayload::parse("/9j/4AAQSkZJRg==").unwrap();
        assert_eq!(img.mime_type(), "image/jpeg");
        assert_eq!(img.base64_data(), "/9j/4AAQSkZJRg==");
    }

    #[test]
    fn test_from_bytes_roundtrips_through_base64() {
        let img = ImagePayload::from_bytes(b"\xff\xd8\xff", "image/jpeg");
        assert!(img.as_str().starts_with("data:image/jpeg;base64,"));
        let decoded = BASE64_STANDARD.decode(img.base64_data()).unwrap();
        assert_eq!(decoded, b"\xff\xd8\xff");
    }

    #[test]
    fn test_empty_payload_rejected() {
        assert!(ImagePayload::parse("").is_err());
        assert!(ImagePayload::parse("data:image/png;base64,").is_err());
    }
}
