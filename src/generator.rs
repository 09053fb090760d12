//! Contract for an external content generator that turns a request into tag content

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::{content::WriteContent, error::NfcError};

/// Instructions sent along with every prompt, fixes the shape of the response
pub const SYSTEM_INSTRUCTION: &str = r#"You are an expert in NFC technology and NDEF records.
Your goal is to interpret a user's request and generate the specific string or JSON content
that should be written to an NFC tag to accomplish their goal.

Respond with a JSON object with the fields "type" (one of "text", "json" or "url"),
"content" (the exact string to write to the tag) and "explanation" (a very short
explanation of what the tag will do).

Examples:
User: "Make a tag that connects to WiFi 'Home' with password '1234'"
Output Content: WIFI:T:WPA;S:Home;P:1234;;

User: "Open instagram for user 'elonmusk'"
Output Content: https://instagram.com/elonmusk

User: "A vcard for John Doe, phone 555-0199"
Output Content: BEGIN:VCARD\nVERSION:2.1\nN:Doe;John\nTEL;home:555-0199\nEND:VCARD
"#;

#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "lowercase")]
pub enum GeneratedKind {
    Text,
    Json,
    Url,
}

#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct GeneratedContent {
    #[serde(rename = "type")]
    pub kind: GeneratedKind,
    pub content: String,
    pub explanation: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("no response from the generator")]
    EmptyResponse,

    #[error("invalid generator response: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("generator request failed: {0}")]
    Request(String),
}

impl GeneratedContent {
    pub fn from_response_json(response: &str) -> Result<Self, GeneratorError> {
        if response.trim().is_empty() {
            return Err(GeneratorError::EmptyResponse);
        }

        Ok(serde_json::from_str(response)?)
    }

    /// Content is written as a string, whatever kind was reported
    pub fn into_write_content(self) -> WriteContent {
        WriteContent::Text(self.content)
    }
}

#[async_trait::async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GeneratedContent, GeneratorError>;
}

/// Ask the generator for tag content, `None` for a blank prompt
pub async fn generate_content(
    generator: &dyn ContentGenerator,
    prompt: &str,
) -> Result<Option<GeneratedContent>, NfcError> {
    let prompt = prompt.trim();
    if prompt.is_empty() {
        debug!("blank prompt, skipping generation");
        return Ok(None);
    }

    match generator.generate(prompt).await {
        Ok(content) => Ok(Some(content)),
        Err(err) => {
            error!("content generation failed: {err}");
            Err(NfcError::GenerationFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    struct CannedGenerator {
        response: String,
        calls: AtomicUsize,
    }

    impl CannedGenerator {
        fn new(response: &str) -> Self {
            Self { response: response.to_string(), calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait::async_trait]
    impl ContentGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<GeneratedContent, GeneratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            GeneratedContent::from_response_json(&self.response)
        }
    }

    struct OfflineGenerator;

    #[async_trait::async_trait]
    impl ContentGenerator for OfflineGenerator {
        async fn generate(&self, _prompt: &str) -> Result<GeneratedContent, GeneratorError> {
            Err(GeneratorError::Request("connection refused".into()))
        }
    }

    #[test]
    fn parses_response() {
        let response = r#"{"type":"url","content":"https://instagram.com/bob","explanation":"Opens a profile"}"#;
        let content = GeneratedContent::from_response_json(response).unwrap();

        assert_eq!(content.kind, GeneratedKind::Url);
        assert_eq!(content.content, "https://instagram.com/bob");
        assert_eq!(
            content.into_write_content(),
            WriteContent::Text("https://instagram.com/bob".into())
        );
    }

    #[test]
    fn rejects_unknown_kind() {
        let response = r#"{"type":"vcard","content":"x","explanation":"y"}"#;
        assert!(matches!(
            GeneratedContent::from_response_json(response),
            Err(GeneratorError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn blank_prompt_is_ignored() {
        let generator = CannedGenerator::new("{}");

        assert_eq!(generate_content(&generator, "   ").await, Ok(None));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn generated_content_is_returned() {
        let generator = CannedGenerator::new(
            r#"{"type":"text","content":"WIFI:T:WPA;S:Home;P:1234;;","explanation":"Joins Home"}"#,
        );

        let content = generate_content(&generator, "wifi home 1234").await.unwrap().unwrap();
        assert_eq!(content.kind, GeneratedKind::Text);
        assert_eq!(content.content, "WIFI:T:WPA;S:Home;P:1234;;");
    }

    #[tokio::test]
    async fn failures_become_generation_failed() {
        assert_eq!(
            generate_content(&OfflineGenerator, "open a map").await,
            Err(NfcError::GenerationFailed)
        );

        let malformed = CannedGenerator::new("not json");
        assert_eq!(generate_content(&malformed, "open a map").await, Err(NfcError::GenerationFailed));

        let empty = CannedGenerator::new("");
        assert_eq!(generate_content(&empty, "open a map").await, Err(NfcError::GenerationFailed));
    }
}
