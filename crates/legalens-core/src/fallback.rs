//! Synthetic analysis used when the completion service cannot be used.
//!
//! Output is a pure function of the document text and type hint. The text is
//! scanned case-insensitively for three markers (`service`, `payment`,
//! `confidential`) and each section is assembled from fixed sentences chosen
//! by which markers are present. Risk order is fixed and is not sorted by
//! severity.

use crate::model::{AnalysisResult, KeyTerm, Risk, Severity};

/// Substituted for a document that arrives with no text.
pub const PLACEHOLDER_DOCUMENT: &str = "This is a sample legal document text for analysis.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Markers {
    service: bool,
    payment: bool,
    confidential: bool,
}

impl Markers {
    fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self {
            service: lower.contains("service"),
            payment: lower.contains("payment"),
            confidential: lower.contains("confidential"),
        }
    }
}

/// Build a plausible analysis from marker substrings in `document_text`.
#[must_use]
pub fn synthesize(document_text: &str, document_type: &str) -> AnalysisResult {
    let markers = Markers::detect(document_text);
    let label = document_label(document_type);

    AnalysisResult {
        plain_language: plain_language(markers, &label),
        key_terms: key_terms(markers),
        risks: risks(markers),
        summary: summary(markers),
    }
}

fn document_label(document_type: &str) -> String {
    let trimmed = document_type.trim();
    if trimmed.is_empty() {
        "document".to_owned()
    } else {
        trimmed.to_lowercase()
    }
}

fn plain_language(m: Markers, label: &str) -> String {
    let mut text = if m.service {
        format!("This {label} sets out an arrangement in which one party provides services to another.")
    } else {
        format!("This {label} sets out the rights and obligations of the parties who sign it.")
    };

    text.push_str(if m.payment {
        " It explains how and when payment is owed, including when invoices fall due."
    } else {
        " It does not clearly describe what each party receives in exchange, so compensation should be confirmed in writing."
    });

    text.push_str(if m.confidential {
        " Both parties must keep information they share with each other confidential."
    } else {
        " It places no express secrecy obligations on either party."
    });

    text.push_str(
        " Either party may end the arrangement under the conditions it describes, and each party's liability to the other is limited.",
    );
    text
}

fn key_terms(m: Markers) -> Vec<KeyTerm> {
    let term = |term: &str, explanation: &str| KeyTerm {
        term: term.to_owned(),
        explanation: explanation.to_owned(),
    };

    vec![
        if m.service {
            term(
                "Scope of Services",
                "Describes the work the provider must perform. Anything not listed is generally outside the agreement.",
            )
        } else {
            term(
                "Scope of Obligations",
                "Describes what each party has promised to do. Duties not written down are hard to enforce.",
            )
        },
        if m.payment {
            term(
                "Payment Terms",
                "Sets the amount owed, the due date for each invoice, and what happens when a payment is late.",
            )
        } else {
            term(
                "Consideration",
                "The value each party gives in exchange for the other's promises. It is required for the agreement to be binding.",
            )
        },
        if m.confidential {
            term(
                "Confidentiality",
                "Information marked or treated as confidential may not be disclosed to third parties, usually even after the agreement ends.",
            )
        } else {
            term(
                "Information Sharing",
                "No confidentiality duty is stated, so shared information may be disclosed unless another agreement says otherwise.",
            )
        },
        term(
            "Term and Termination",
            "How long the agreement lasts and the notice a party must give to end it early.",
        ),
        term(
            "Limitation of Liability",
            "Caps the amount one party can recover from the other if something goes wrong.",
        ),
    ]
}

fn risks(m: Markers) -> Vec<Risk> {
    let risk = |title: &str, description: &str, severity: Severity| Risk {
        title: title.to_owned(),
        description: description.to_owned(),
        severity,
    };

    vec![
        risk(
            "Ambiguous Language",
            if m.service {
                "The description of the services is broad enough that the parties could disagree about what was promised."
            } else {
                "Several obligations are described in general terms that could be read more than one way."
            },
            Severity::Medium,
        ),
        if m.payment {
            risk(
                "Payment Terms",
                "Payment deadlines and late payment consequences are strict. Missing a due date could put you in breach.",
                Severity::High,
            )
        } else {
            risk(
                "Performance Obligations",
                "The document does not define clear standards for acceptable performance, which makes a breach hard to prove.",
                Severity::High,
            )
        },
        risk(
            "Termination Conditions",
            if m.confidential {
                "Termination rights are limited, and confidentiality duties continue after the agreement ends."
            } else {
                "Termination rights are limited and may require notice well in advance."
            },
            Severity::Medium,
        ),
        risk(
            "Liability Limitations",
            "Liability caps may leave you without full compensation if the other party fails to perform.",
            Severity::Low,
        ),
    ]
}

fn summary(m: Markers) -> String {
    let mut text = String::from(if m.service {
        "Agreement for the provision of services"
    } else {
        "Agreement setting out obligations between the parties"
    });

    text.push_str(if m.payment {
        " with defined payment terms"
    } else {
        " without a clearly defined compensation schedule"
    });

    text.push_str(if m.confidential {
        " and ongoing confidentiality requirements."
    } else {
        "."
    });

    text.push_str(if m.payment {
        " Review the payment schedule and late payment remedies before signing."
    } else {
        " Confirm what each party must deliver before signing."
    });
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKETING: &str = "Company A provides marketing services to Company B for 12 months, \
                             payment due net-30, all materials are confidential.";

    fn titles(result: &AnalysisResult) -> Vec<&str> {
        result.risks.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn every_field_is_populated() {
        for text in [MARKETING, "Plain words.", ""] {
            let result = synthesize(text, "Contract");
            assert!(!result.plain_language.is_empty());
            assert!(!result.summary.is_empty());
            assert_eq!(result.key_terms.len(), 5);
            assert_eq!(result.risks.len(), 4);
        }
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(synthesize(MARKETING, "Contract"), synthesize(MARKETING, "Contract"));
    }

    #[test]
    fn risk_order_is_fixed() {
        assert_eq!(
            titles(&synthesize(MARKETING, "Contract")),
            ["Ambiguous Language", "Payment Terms", "Termination Conditions", "Liability Limitations"]
        );
        assert_eq!(
            titles(&synthesize("A simple promise.", "")),
            ["Ambiguous Language", "Performance Obligations", "Termination Conditions", "Liability Limitations"]
        );
    }

    #[test]
    fn severities_are_fixed() {
        let severities: Vec<Severity> = synthesize("anything", "Lease")
            .risks
            .iter()
            .map(|r| r.severity)
            .collect();
        assert_eq!(
            severities,
            [Severity::Medium, Severity::High, Severity::Medium, Severity::Low]
        );
    }

    #[test]
    fn payment_marker_changes_second_risk_and_summary() {
        let with = synthesize("PAYMENT is due monthly.", "Contract");
        let without = synthesize("The parties agree to cooperate.", "Contract");

        assert_ne!(with.risks[1], without.risks[1]);
        assert!(with.risks[1].title.to_lowercase().contains("payment"));
        assert!(with.summary.to_lowercase().contains("payment"));
        assert!(!without.summary.to_lowercase().contains("payment"));
    }

    #[test]
    fn marketing_services_example() {
        let result = synthesize(MARKETING, "Contract");
        assert_eq!(result.risks[1].severity, Severity::High);
        assert!(result.risks[1].description.to_lowercase().contains("payment"));
        assert!(result.summary.to_lowercase().contains("payment"));
        assert!(result.summary.contains("services"));
        assert!(result.summary.contains("confidentiality"));
        assert!(result.plain_language.starts_with("This contract "));
    }

    #[test]
    fn markers_are_case_insensitive() {
        assert_eq!(
            synthesize("CONFIDENTIAL Service Payment", "x"),
            synthesize("confidential service payment", "x")
        );
    }

    #[test]
    fn empty_hint_uses_generic_label() {
        assert!(synthesize("text", "  ").plain_language.starts_with("This document "));
    }
}
