//! Precedent search over a fixed bank of case summaries.
//!
//! Each group of cases is selected by its own keywords, so a query touching
//! several areas collects every matching group. Results keep bank order.

use serde::Serialize;
use tracing::debug;

use crate::error::SearchError;

/// A summarized court decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Precedent {
    pub id: &'static str,
    pub title: &'static str,
    pub court: &'static str,
    /// Decision date, `YYYY-MM-DD`.
    pub date: &'static str,
    pub summary: &'static str,
    /// Match score in percent.
    pub relevance: u8,
}

struct CaseGroup {
    keywords: &'static [&'static str],
    cases: &'static [Precedent],
}

const BANK: [CaseGroup; 3] = [
    CaseGroup {
        keywords: &["contract", "agreement"],
        cases: &[
            Precedent {
                id: "1",
                title: "Smith v. Jones",
                court: "Supreme Court",
                date: "2021-06-15",
                summary: "The court held that ambiguous terms in a contract should be interpreted against the drafter.",
                relevance: 95,
            },
            Precedent {
                id: "2",
                title: "ABC Corp v. XYZ Inc",
                court: "Federal Court of Appeals",
                date: "2020-11-03",
                summary: "Verbal agreements can constitute binding contracts if all essential elements are present.",
                relevance: 87,
            },
        ],
    },
    CaseGroup {
        keywords: &["property", "real estate"],
        cases: &[Precedent {
            id: "3",
            title: "Johnson v. Property Management LLC",
            court: "State Supreme Court",
            date: "2022-03-29",
            summary: "Landlords must maintain habitability standards regardless of lease terms to the contrary.",
            relevance: 92,
        }],
    },
    CaseGroup {
        keywords: &["compensation", "damages"],
        cases: &[Precedent {
            id: "4",
            title: "Roberts v. MegaCorp Industries",
            court: "District Court",
            date: "2023-01-18",
            summary: "Compensatory damages must be reasonably foreseeable at the time the contract was formed.",
            relevance: 89,
        }],
    },
];

/// Find precedents relevant to `query`.
///
/// Matching is case-insensitive substring containment. An empty result is a
/// valid answer.
///
/// # Errors
///
/// Returns `SearchError::InvalidInput` if the query is blank.
pub fn search(query: &str) -> Result<Vec<Precedent>, SearchError> {
    let normalized = query.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(SearchError::InvalidInput {
            reason: "query is empty".to_owned(),
        });
    }

    let results: Vec<Precedent> = BANK
        .iter()
        .filter(|group| group.keywords.iter().any(|k| normalized.contains(k)))
        .flat_map(|group| group.cases.iter().copied())
        .collect();

    debug!(matches = results.len(), "precedent search completed");
    Ok(results)
}
