//! Context enrichment: domain and requirement inferences layered on top of
//! the lexical features and any prior-interaction history.

use crate::keywords::{self, KnowledgeDomain, PrimaryDomain, Requirement};
use crate::lexical::LexicalFeatures;
use brx_core::request::Exchange;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextInsights {
    /// Copied verbatim from the lexical complexity score.
    pub intent_depth: f64,
    pub detected_domains: Vec<KnowledgeDomain>,
    pub history: Vec<Exchange>,
    pub implicit_requirements: Vec<Requirement>,
    pub primary_domain: PrimaryDomain,
    pub summary: String,
}

pub fn enrich(text: &str, features: &LexicalFeatures, history: Option<&[Exchange]>) -> ContextInsights {
    let lowered = text.to_lowercase();
    let primary_domain = keywords::first_match(keywords::PRIMARY_DOMAIN_FAMILIES, &lowered)
        .unwrap_or(PrimaryDomain::General);

    ContextInsights {
        // Intent depth is the complexity score under another name. Kept as an
        // identity mapping; do not derive a separate signal here.
        intent_depth: features.complexity_score,
        detected_domains: keywords::matching_tags(keywords::KNOWLEDGE_DOMAIN_FAMILIES, &lowered),
        history: history.map(<[Exchange]>::to_vec).unwrap_or_default(),
        implicit_requirements: keywords::matching_tags(keywords::REQUIREMENT_FAMILIES, &lowered),
        primary_domain,
        summary: format!("Domain: {primary_domain}"),
    }
}
