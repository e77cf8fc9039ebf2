//! Analysis data model.
//!
//! Field names on the wire are camelCase to match the JSON shape the
//! completion service is instructed to produce.

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Risk severity. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Lowercase label, as serialized.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A defined term and its plain-language explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyTerm {
    pub term: String,
    pub explanation: String,
}

/// A risk identified in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

/// Structured analysis of a legal document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Plain-language paraphrase of the document. Never empty.
    pub plain_language: String,
    /// Key terms in the order they were produced.
    pub key_terms: Vec<KeyTerm>,
    /// Identified risks in the order they were produced.
    pub risks: Vec<Risk>,
    /// Short executive summary. Never empty.
    pub summary: String,
}

impl AnalysisResult {
    /// Highest severity among the risks, or `None` when there are none.
    #[must_use]
    pub fn overall_risk(&self) -> Option<Severity> {
        self.risks.iter().map(|r| r.severity).max()
    }

    /// Render the analysis as the downloadable plain-text summary.
    #[must_use]
    pub fn to_summary_text(&self) -> String {
        let mut out = String::from("LEGALENS DOCUMENT ANALYSIS SUMMARY\n\n");

        out.push_str("PLAIN LANGUAGE EXPLANATION:\n");
        out.push_str(&self.plain_language);
        out.push_str("\n\n");

        out.push_str("KEY TERMS:\n");
        for term in &self.key_terms {
            let _ = writeln!(out, "- {}: {}", term.term, term.explanation);
        }
        out.push('\n');

        out.push_str("IDENTIFIED RISKS:\n");
        for risk in &self.risks {
            let _ = writeln!(
                out,
                "- {} ({} RISK): {}",
                risk.title,
                risk.severity.as_str().to_uppercase(),
                risk.description
            );
        }
        out.push('\n');

        out.push_str("SUMMARY:\n");
        out.push_str(&self.summary);
        out
    }
}

/// Which path produced an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    /// Decoded from the completion service.
    Upstream,
    /// Produced by the synthetic fallback generator.
    Fallback,
}

/// An analysis together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub source: AnalysisSource,
    /// Why the upstream path was abandoned, when it was.
    pub degraded: Option<String>,
}
