//! Document analysis with a never-fail contract.
//!
//! [`DocumentAnalyzer::analyze`] asks the completion service for a JSON
//! analysis and decodes it strictly. Any upstream failure is logged and
//! replaced by [`fallback::synthesize`], so callers always receive a fully
//! populated [`AnalysisResult`]. Only local precondition failures are
//! returned as errors.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::completion::{decode_analysis, CompletionClient, CompletionRequest};
use crate::error::{AnalysisError, CompletionError};
use crate::fallback::{self, PLACEHOLDER_DOCUMENT};
use crate::model::{AnalysisOutcome, AnalysisResult, AnalysisSource};

/// Default model for document analysis.
pub const DEFAULT_ANALYSIS_MODEL: &str = "gpt-4o-mini";

/// Default upper bound on document size (10 MiB).
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// Analyzer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Model identifier sent to the completion service.
    pub model: String,
    /// Sampling temperature. Low, so the JSON shape is respected.
    pub temperature: f32,
    /// Documents larger than this are rejected before any work is done.
    pub max_document_bytes: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_ANALYSIS_MODEL.to_owned(),
            temperature: 0.2,
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
        }
    }
}

/// System instruction for analysis, with the document type folded in.
#[must_use]
pub fn analysis_instruction(document_type: &str) -> String {
    let label = match document_type.trim() {
        "" => "legal document",
        other => other,
    };

    format!(
        "You are a legal document analyzer. Analyze the following {label} and provide:\n\
         1. A plain language explanation\n\
         2. Key terms with explanations\n\
         3. Risk identification with severity levels (low, medium, high)\n\
         4. A brief summary\n\
         \n\
         Format your response as JSON with the following structure:\n\
         {{\n  \
           \"plainLanguage\": \"string\",\n  \
           \"keyTerms\": [{{\"term\": \"string\", \"explanation\": \"string\"}}],\n  \
           \"risks\": [{{\"title\": \"string\", \"description\": \"string\", \"severity\": \"low|medium|high\"}}],\n  \
           \"summary\": \"string\"\n\
         }}\n\
         \n\
         Only return the JSON with no additional text."
    )
}

/// Produces structured analyses of legal documents.
pub struct DocumentAnalyzer {
    client: Arc<dyn CompletionClient>,
    config: AnalyzerConfig,
}

impl fmt::Debug for DocumentAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentAnalyzer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DocumentAnalyzer {
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>, config: AnalyzerConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze `document_text`, falling back to synthetic output on any
    /// upstream failure.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the document exceeds the
    /// configured maximum size.
    pub async fn analyze(
        &self,
        document_text: &str,
        document_type: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        Ok(self.analyze_detailed(document_text, document_type).await?.result)
    }

    /// Like [`analyze`](Self::analyze), but also reports which path produced
    /// the result and why the upstream path was abandoned.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if the document exceeds the
    /// configured maximum size.
    pub async fn analyze_detailed(
        &self,
        document_text: &str,
        document_type: &str,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        if document_text.len() > self.config.max_document_bytes {
            return Err(AnalysisError::InvalidInput {
                reason: format!(
                    "document is {} bytes, limit is {}",
                    document_text.len(),
                    self.config.max_document_bytes
                ),
            });
        }

        let text = if document_text.trim().is_empty() {
            debug!("empty document, substituting placeholder text");
            PLACEHOLDER_DOCUMENT
        } else {
            document_text
        };

        match self.request_analysis(text, document_type).await {
            Ok(result) => {
                info!(
                    document_type,
                    key_terms = result.key_terms.len(),
                    risks = result.risks.len(),
                    "document analysis completed upstream"
                );
                Ok(AnalysisOutcome {
                    result,
                    source: AnalysisSource::Upstream,
                    degraded: None,
                })
            }
            Err(err) => {
                warn!(
                    error = %err,
                    retryable = err.is_retryable(),
                    "document analysis upstream failed, using synthetic fallback"
                );
                Ok(AnalysisOutcome {
                    result: fallback::synthesize(text, document_type),
                    source: AnalysisSource::Fallback,
                    degraded: Some(err.to_string()),
                })
            }
        }
    }

    async fn request_analysis(
        &self,
        text: &str,
        document_type: &str,
    ) -> Result<AnalysisResult, CompletionError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            system: analysis_instruction(document_type),
            user: text.to_owned(),
            temperature: self.config.temperature,
            max_tokens: None,
        };

        let content = self.client.complete(&request).await?;
        decode_analysis(&content)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::DecodeStage;
    use crate::model::Severity;

    /// Replays a fixed reply and records every request it sees.
    struct ScriptedClient {
        reply: Result<String, CompletionError>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedClient {
        fn new(reply: Result<String, CompletionError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone()
        }
    }

    const UPSTREAM: &str = r#"{
        "plainLanguage": "You rent the flat for a year.",
        "keyTerms": [{"term": "Deposit", "explanation": "Returned at the end."}],
        "risks": [{"title": "Auto renewal", "description": "Renews silently.", "severity": "medium"}],
        "summary": "A one-year residential lease."
    }"#;

    const MARKETING: &str = "Company A provides marketing services to Company B for 12 months, \
                             payment due net-30, all materials are confidential.";

    fn analyzer(client: Arc<ScriptedClient>) -> DocumentAnalyzer {
        DocumentAnalyzer::new(client, AnalyzerConfig::default())
    }

    #[tokio::test]
    async fn upstream_result_is_returned_verbatim() {
        let client = ScriptedClient::new(Ok(UPSTREAM.to_owned()));
        let outcome = analyzer(Arc::clone(&client))
            .analyze_detailed("Lease text", "Lease")
            .await
            .unwrap();

        assert_eq!(outcome.source, AnalysisSource::Upstream);
        assert_eq!(outcome.degraded, None);
        assert_eq!(outcome.result.summary, "A one-year residential lease.");

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, DEFAULT_ANALYSIS_MODEL);
        assert_eq!(requests[0].user, "Lease text");
        assert!(requests[0].system.contains("Analyze the following Lease and provide"));
    }

    #[tokio::test]
    async fn status_error_falls_back() {
        let client = ScriptedClient::new(Err(CompletionError::Status { status: 429 }));
        let outcome = analyzer(client)
            .analyze_detailed(MARKETING, "Contract")
            .await
            .unwrap();

        assert_eq!(outcome.source, AnalysisSource::Fallback);
        assert_eq!(outcome.result, fallback::synthesize(MARKETING, "Contract"));
        assert!(outcome.degraded.unwrap().contains("429"));
    }

    #[tokio::test]
    async fn malformed_payload_falls_back() {
        let client = ScriptedClient::new(Ok("Sure! Here is the analysis you asked for.".to_owned()));
        let outcome = analyzer(client)
            .analyze_detailed(MARKETING, "Contract")
            .await
            .unwrap();

        assert_eq!(outcome.source, AnalysisSource::Fallback);
        assert!(outcome.degraded.unwrap().contains("payload"));
    }

    #[tokio::test]
    async fn disabled_and_timeout_fall_back() {
        for err in [
            CompletionError::Disabled,
            CompletionError::Timeout { timeout_secs: 45 },
            CompletionError::MalformedResponse {
                stage: DecodeStage::Envelope,
                reason: "no choices".to_owned(),
            },
        ] {
            let result = analyzer(ScriptedClient::new(Err(err)))
                .analyze(MARKETING, "Contract")
                .await
                .unwrap();
            assert_eq!(result.risks.len(), 4);
        }
    }

    #[tokio::test]
    async fn marketing_contract_end_to_end() {
        let client = ScriptedClient::new(Err(CompletionError::Unavailable {
            reason: "dns failure".to_owned(),
        }));
        let result = analyzer(client).analyze(MARKETING, "Contract").await.unwrap();

        assert_eq!(result.risks[1].severity, Severity::High);
        assert!(result.risks[1].title.to_lowercase().contains("payment"));
        assert!(result.summary.to_lowercase().contains("payment"));
    }

    #[tokio::test]
    async fn empty_document_uses_placeholder() {
        let client = ScriptedClient::new(Err(CompletionError::Disabled));
        let result = analyzer(Arc::clone(&client)).analyze("   ", "").await.unwrap();

        assert_eq!(client.requests()[0].user, PLACEHOLDER_DOCUMENT);
        assert!(client.requests()[0].system.contains("Analyze the following legal document"));
        assert_eq!(result, fallback::synthesize(PLACEHOLDER_DOCUMENT, ""));
    }

    #[tokio::test]
    async fn oversized_document_is_rejected_without_calling_out() {
        let client = ScriptedClient::new(Ok(UPSTREAM.to_owned()));
        let config = AnalyzerConfig {
            max_document_bytes: 8,
            ..AnalyzerConfig::default()
        };
        let err = DocumentAnalyzer::new(Arc::clone(&client) as Arc<dyn CompletionClient>, config)
            .analyze("far too long for the limit", "Contract")
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::InvalidInput { .. }));
        assert!(client.requests().is_empty());
    }

    #[test]
    fn instruction_demands_json_only() {
        let instruction = analysis_instruction("NDA");
        assert!(instruction.contains("Analyze the following NDA"));
        assert!(instruction.contains("\"plainLanguage\": \"string\""));
        assert!(instruction.ends_with("Only return the JSON with no additional text."));
    }
}
