//! Completion-service contract.
//!
//! The analyzer and advisor talk to the outside world only through
//! [`CompletionClient`]. Responses are decoded in two stages: the transport
//! envelope yields the assistant's message content ([`decode_envelope`]),
//! and for analysis that content is decoded again as an
//! [`AnalysisResult`] ([`decode_analysis`]).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CompletionError, DecodeStage};
use crate::model::AnalysisResult;

/// A single chat-style completion request: one system instruction, one user
/// message.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Build the chat-completions wire body for this request.
    #[must_use]
    pub fn to_wire(&self) -> ChatCompletionBody<'_> {
        ChatCompletionBody {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system,
                },
                ChatMessage {
                    role: "user",
                    content: &self.user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

/// Chat-completions request body.
#[derive(Debug, Serialize)]
pub struct ChatCompletionBody<'a> {
    pub model: &'a str,
    pub messages: [ChatMessage<'a>; 2],
    pub temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: EnvelopeMessage,
}

#[derive(Debug, Deserialize)]
struct EnvelopeMessage {
    content: Option<String>,
}

/// Transport to an external completion service.
///
/// Implementations return the assistant's message content, already
/// extracted from the envelope, or a classified [`CompletionError`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// A client that never calls out. Used when no credential is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCompletionClient;

#[async_trait]
impl CompletionClient for DisabledCompletionClient {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, CompletionError> {
        Err(CompletionError::Disabled)
    }
}

/// Stage one: extract `choices[0].message.content` from a response body.
///
/// # Errors
///
/// Returns `CompletionError::MalformedResponse` at the envelope stage when the
/// body is not JSON, has no choices, or the first choice has no content.
pub fn decode_envelope(body: &[u8]) -> Result<String, CompletionError> {
    let envelope: Envelope = serde_json::from_slice(body)
        .map_err(|e| CompletionError::malformed(DecodeStage::Envelope, e.to_string()))?;

    envelope
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::malformed(DecodeStage::Envelope, "response has no choices"))?
        .message
        .content
        .ok_or_else(|| CompletionError::malformed(DecodeStage::Envelope, "first choice has no content"))
}

/// Stage two: decode message content as an [`AnalysisResult`].
///
/// Decoding is strict: all four fields must be present and well-typed, and
/// `plainLanguage` and `summary` must not be blank.
///
/// # Errors
///
/// Returns `CompletionError::MalformedResponse` at the payload stage.
pub fn decode_analysis(content: &str) -> Result<AnalysisResult, CompletionError> {
    let result: AnalysisResult = serde_json::from_str(content.trim())
        .map_err(|e| CompletionError::malformed(DecodeStage::Payload, e.to_string()))?;

    if result.plain_language.trim().is_empty() {
        return Err(CompletionError::malformed(
            DecodeStage::Payload,
            "plainLanguage is empty",
        ));
    }
    if result.summary.trim().is_empty() {
        return Err(CompletionError::malformed(
            DecodeStage::Payload,
            "summary is empty",
        ));
    }

    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Severity;

    const PAYLOAD: &str = r#"{
        "plainLanguage": "A lease for one year.",
        "keyTerms": [{"term": "Rent", "explanation": "Due monthly."}],
        "risks": [{"title": "Late fees", "description": "Steep penalties.", "severity": "high"}],
        "summary": "Standard residential lease."
    }"#;

    #[test]
    fn envelope_yields_first_choice_content() {
        let body = br#"{"choices":[{"message":{"role":"assistant","content":"hello"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(decode_envelope(body).unwrap(), "hello");
    }

    #[test]
    fn envelope_without_choices_is_malformed() {
        let err = decode_envelope(br#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(
            err,
            CompletionError::MalformedResponse {
                stage: DecodeStage::Envelope,
                ..
            }
        ));
    }

    #[test]
    fn envelope_with_null_content_is_malformed() {
        let err = decode_envelope(br#"{"choices":[{"message":{"content":null}}]}"#).unwrap_err();
        assert!(matches!(
            err,
            CompletionError::MalformedResponse {
                stage: DecodeStage::Envelope,
                ..
            }
        ));
    }

    #[test]
    fn non_json_body_is_malformed_envelope() {
        let err = decode_envelope(b"<html>quota exceeded</html>").unwrap_err();
        assert!(matches!(
            err,
            CompletionError::MalformedResponse {
                stage: DecodeStage::Envelope,
                ..
            }
        ));
    }

    #[test]
    fn payload_decodes_into_analysis() {
        let result = decode_analysis(PAYLOAD).unwrap();
        assert_eq!(result.plain_language, "A lease for one year.");
        assert_eq!(result.key_terms.len(), 1);
        assert_eq!(result.risks[0].severity, Severity::High);
    }

    #[test]
    fn payload_missing_field_is_malformed() {
        let err = decode_analysis(r#"{"plainLanguage":"x","keyTerms":[],"summary":"y"}"#).unwrap_err();
        assert!(matches!(
            err,
            CompletionError::MalformedResponse {
                stage: DecodeStage::Payload,
                ..
            }
        ));
    }

    #[test]
    fn payload_with_unknown_severity_is_malformed() {
        let content = PAYLOAD.replace("\"high\"", "\"critical\"");
        assert!(decode_analysis(&content).is_err());
    }

    #[test]
    fn payload_with_blank_summary_is_malformed() {
        let content = PAYLOAD.replace("Standard residential lease.", "  ");
        let err = decode_analysis(&content).unwrap_err();
        assert_eq!(
            err,
            CompletionError::MalformedResponse {
                stage: DecodeStage::Payload,
                reason: "summary is empty".to_owned(),
            }
        );
    }

    #[test]
    fn wire_body_carries_system_then_user() {
        let request = CompletionRequest {
            model: "gpt-4o-mini".to_owned(),
            system: "be terse".to_owned(),
            user: "hi".to_owned(),
            temperature: 0.2,
            max_tokens: None,
        };
        let json = serde_json::to_value(request.to_wire()).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
        assert!(json.get("max_tokens").is_none());
    }

    #[tokio::test]
    async fn disabled_client_never_succeeds() {
        let request = CompletionRequest {
            model: "m".to_owned(),
            system: String::new(),
            user: String::new(),
            temperature: 0.0,
            max_tokens: None,
        };
        let err = DisabledCompletionClient.complete(&request).await.unwrap_err();
        assert_eq!(err, CompletionError::Disabled);
    }
}
