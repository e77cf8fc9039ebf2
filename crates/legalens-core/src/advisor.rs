//! Legal question answering for signed-in users.
//!
//! The caller's [`AuthContext`] is checked before anything else. When the
//! upstream path is enabled the question goes to the completion service and
//! any failure is returned to the caller. Otherwise the question is routed
//! to a canned response by keyword, first matching topic wins.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::AuthContext;
use crate::completion::{CompletionClient, CompletionRequest};
use crate::error::{AdviceError, CompletionError, DecodeStage};

/// Default model for legal advice.
pub const DEFAULT_ADVICE_MODEL: &str = "gpt-4o";

/// System instruction for the upstream advice path.
pub const ADVICE_INSTRUCTION: &str = "You are a knowledgeable legal assistant providing guidance on legal matters. \
Always clarify that you're providing general information, not legal advice, and recommend consulting \
with a qualified attorney for specific situations.";

/// Advisor settings.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorConfig {
    /// Send questions to the completion service instead of the canned bank.
    pub upstream_enabled: bool,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            upstream_enabled: false,
            model: DEFAULT_ADVICE_MODEL.to_owned(),
            temperature: 0.7,
            max_tokens: 500,
        }
    }
}

/// A topic in the canned response bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Contract,
    FamilyLaw,
    Litigation,
    LandlordTenant,
    EstatePlanning,
    Employment,
    General,
}

/// Topics in routing priority order with the keywords that select them.
const ROUTES: [(Topic, &[&str]); 6] = [
    (Topic::Contract, &["contract", "agreement"]),
    (Topic::FamilyLaw, &["divorce", "custody"]),
    (Topic::Litigation, &["sue", "lawsuit", "litigation"]),
    (Topic::LandlordTenant, &["tenant", "landlord", "rent", "lease"]),
    (Topic::EstatePlanning, &["will", "estate", "inherit"]),
    (Topic::Employment, &["employment", "fired", "workplace", "job"]),
];

impl Topic {
    /// Pick the topic for a query. Matching is case-insensitive substring
    /// containment, and the first topic in priority order wins.
    #[must_use]
    pub fn route(query: &str) -> Self {
        let normalized = query.to_lowercase();
        ROUTES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
            .map_or(Self::General, |(topic, _)| *topic)
    }

    /// The canned response for this topic.
    #[must_use]
    pub fn canned_response(self) -> &'static str {
        match self {
            Self::Contract => "Regarding your contract question: Contracts require offer, acceptance, consideration, and legal purpose to be valid. Before signing any contract, ensure you understand all terms, especially clauses about termination, liability, and dispute resolution.\n\nRemember that verbal contracts can be enforceable in many cases, but certain agreements (like real estate) typically require written documentation. If a contract seems ambiguous or potentially unfair, consider having it reviewed by a qualified attorney who specializes in contract law before signing.",
            Self::FamilyLaw => "Family law matters like divorce and custody are highly specific to your jurisdiction and personal situation. Generally, divorce processes involve property division, potential spousal support, and child custody arrangements when applicable.\n\nMost jurisdictions now follow some form of \"equitable distribution\" for property and \"best interests of the child\" standard for custody decisions. Consider mediation as a less adversarial approach to resolving these matters, and always document all agreements formally through the court system.",
            Self::Litigation => "Litigation can be time-consuming and expensive. Before filing a lawsuit, consider:\n\n1. Alternative dispute resolution methods like mediation or arbitration\n2. Statutes of limitations that may affect your claim\n3. Whether you have sufficient evidence to support your position\n4. The potential costs versus benefits of legal action\n\nMany jurisdictions also have small claims courts for disputes under certain dollar amounts, which can be navigated without an attorney.",
            Self::LandlordTenant => "Landlord-tenant relationships are governed by both your lease agreement and local housing laws, which vary significantly by location. Generally, tenants have rights to habitable living conditions, proper notice before entry, and proper eviction procedures. Landlords typically have rights regarding rent collection, property maintenance requirements, and tenant selection (within anti-discrimination laws).\n\nDocument all communication with your landlord/tenant in writing and understand the specific notice requirements in your jurisdiction for issues like repairs, rent increases, or lease termination.",
            Self::EstatePlanning => "Estate planning is essential for ensuring your assets are distributed according to your wishes. A basic estate plan typically includes:\n\n1. A will documenting your asset distribution preferences\n2. Power of attorney designations for financial and healthcare decisions\n3. Advance healthcare directives\n\nWithout a will, your assets will be distributed according to your state's intestacy laws, which may not align with your preferences. Consider reviewing your estate plan after major life events like marriage, divorce, childbirth, or substantial changes in assets.",
            Self::Employment => "Employment relationships are governed by a combination of federal and state laws, company policies, and any employment contracts. Most employment in the US is \"at-will,\" meaning either party can terminate the relationship at any time, with some exceptions including discrimination and retaliation.\n\nWorkplace discrimination based on protected characteristics (race, gender, age, disability, etc.) is illegal under federal law. If you believe you've experienced discrimination, document all incidents and consider filing with the Equal Employment Opportunity Commission (EEOC) before pursuing private legal action.",
            Self::General => "Thank you for your legal question. While I can provide general information, each legal situation has unique aspects that may require personalized advice.\n\nGenerally speaking, legal matters require careful consideration of applicable laws, precedents, and your specific circumstances. Documentation is crucial in most legal matters - keep records of all relevant communications and agreements.\n\nConsider consulting with an attorney who specializes in this area of law for advice tailored to your specific situation. Many offer free initial consultations to help you understand your options.",
        }
    }
}

/// Answers free-text legal questions.
pub struct LegalAdvisor {
    client: Arc<dyn CompletionClient>,
    config: AdvisorConfig,
}

impl fmt::Debug for LegalAdvisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegalAdvisor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LegalAdvisor {
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>, config: AdvisorConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    /// Answer `query` for an authenticated caller.
    ///
    /// # Errors
    ///
    /// - `AdviceError::AuthenticationRequired` if `auth` has no session. No
    ///   other work is done in that case.
    /// - `AdviceError::InvalidInput` if the query is blank.
    /// - `AdviceError::Upstream` if the upstream path is enabled and fails.
    pub async fn get_advice(&self, auth: &AuthContext, query: &str) -> Result<String, AdviceError> {
        if !auth.is_authenticated() {
            warn!("legal advice requested without an active session");
            return Err(AdviceError::AuthenticationRequired);
        }

        let query = query.trim();
        if query.is_empty() {
            return Err(AdviceError::InvalidInput {
                reason: "query is empty".to_owned(),
            });
        }

        debug!(subject = auth.subject(), "processing legal query");

        if self.config.upstream_enabled {
            return self.request_advice(query).await.map_err(|err| {
                warn!(error = %err, retryable = err.is_retryable(), "legal advice upstream failed");
                AdviceError::Upstream(err)
            });
        }

        let topic = Topic::route(query);
        info!(topic = ?topic, "answering legal query from canned responses");
        Ok(topic.canned_response().to_owned())
    }

    async fn request_advice(&self, query: &str) -> Result<String, CompletionError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            system: ADVICE_INSTRUCTION.to_owned(),
            user: query.to_owned(),
            temperature: self.config.temperature,
            max_tokens: Some(self.config.max_tokens),
        };

        let content = self.client.complete(&request).await?;
        if content.trim().is_empty() {
            return Err(CompletionError::malformed(
                DecodeStage::Payload,
                "advice content is empty",
            ));
        }
        Ok(content)
    }
}
