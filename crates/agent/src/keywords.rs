//! Keyword families: the single declarative table every stage consults.
//!
//! A family is a tag plus a fixed set of trigger substrings. Matching is a
//! case-insensitive substring test: callers lowercase the text once and
//! pass it to [`KeywordFamily::matches`].

use serde::{Deserialize, Serialize};

/// A tag emitted when any of its triggers occurs in the text.
#[derive(Debug, Clone, Copy)]
pub struct KeywordFamily<T> {
    pub tag: T,
    pub triggers: &'static [&'static str],
}

impl<T: Copy> KeywordFamily<T> {
    /// `lowered` must already be lowercase.
    pub fn matches(&self, lowered: &str) -> bool {
        self.triggers.iter().any(|t| lowered.contains(t))
    }
}

/// Tags of every family that matches, in table order.
pub fn matching_tags<T: Copy>(families: &[KeywordFamily<T>], lowered: &str) -> Vec<T> {
    families
        .iter()
        .filter(|f| f.matches(lowered))
        .map(|f| f.tag)
        .collect()
}

/// Tag of the first family that matches, in table order.
pub fn first_match<T: Copy>(families: &[KeywordFamily<T>], lowered: &str) -> Option<T> {
    families.iter().find(|f| f.matches(lowered)).map(|f| f.tag)
}

// ── Tags ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Creation,
    Analysis,
    Visual,
    /// Emitted only when no other intent family matches.
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

/// Domains reported in the knowledge set; several may match at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnowledgeDomain {
    Technology,
    Art,
    Science,
}

/// The single best-guess domain of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryDomain {
    Technology,
    Art,
    Education,
    Business,
    General,
}

impl std::fmt::Display for PrimaryDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Technology => "technology",
            Self::Art => "art",
            Self::Education => "education",
            Self::Business => "business",
            Self::General => "general",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    HighQuality,
    FastExecution,
    HighDetail,
}

/// Families that raise the specificity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecificityMarker {
    Precise,
    Specific,
    Detailed,
    Exact,
}

// ── Tables ────────────────────────────────────────────────────────────────

pub const INTENT_FAMILIES: &[KeywordFamily<Intent>] = &[
    KeywordFamily {
        tag: Intent::Creation,
        triggers: &["criar", "crie", "gerar", "gere", "fazer", "faça"],
    },
    KeywordFamily {
        tag: Intent::Analysis,
        triggers: &["explicar", "analisar", "entender"],
    },
    KeywordFamily {
        tag: Intent::Visual,
        triggers: &["imagem", "foto", "desenho"],
    },
];

/// Checked in order; the first match wins.
pub const TONE_FAMILIES: &[KeywordFamily<Tone>] = &[
    KeywordFamily {
        tag: Tone::Positive,
        triggers: &["incrível", "fantástico", "perfeito", "excelente"],
    },
    KeywordFamily {
        tag: Tone::Negative,
        triggers: &["problema", "erro", "ruim", "péssimo"],
    },
];

pub const SPECIFICITY_FAMILIES: &[KeywordFamily<SpecificityMarker>] = &[
    KeywordFamily {
        tag: SpecificityMarker::Precise,
        triggers: &["preciso"],
    },
    KeywordFamily {
        tag: SpecificityMarker::Specific,
        triggers: &["específico"],
    },
    KeywordFamily {
        tag: SpecificityMarker::Detailed,
        triggers: &["detalhado"],
    },
    KeywordFamily {
        tag: SpecificityMarker::Exact,
        triggers: &["exato"],
    },
];

pub const KNOWLEDGE_DOMAIN_FAMILIES: &[KeywordFamily<KnowledgeDomain>] = &[
    KeywordFamily {
        tag: KnowledgeDomain::Technology,
        triggers: &["código", "programa", "aplicativo", "software"],
    },
    KeywordFamily {
        tag: KnowledgeDomain::Art,
        triggers: &["imagem", "desenho", "arte", "criativo"],
    },
    KeywordFamily {
        tag: KnowledgeDomain::Science,
        triggers: &["ciência", "pesquisa", "experimento", "dados"],
    },
];

/// Priority order matters: technology, art, education, business.
pub const PRIMARY_DOMAIN_FAMILIES: &[KeywordFamily<PrimaryDomain>] = &[
    KeywordFamily {
        tag: PrimaryDomain::Technology,
        triggers: &["código", "programa", "app", "software", "computador"],
    },
    KeywordFamily {
        tag: PrimaryDomain::Art,
        triggers: &["imagem", "arte", "desenho", "pintura", "criativo"],
    },
    KeywordFamily {
        tag: PrimaryDomain::Education,
        triggers: &["aprender", "ensinar", "estudar", "educação"],
    },
    KeywordFamily {
        tag: PrimaryDomain::Business,
        triggers: &["negócio", "empresa", "marketing", "vendas"],
    },
];

pub const REQUIREMENT_FAMILIES: &[KeywordFamily<Requirement>] = &[
    KeywordFamily {
        tag: Requirement::HighQuality,
        triggers: &["profissional"],
    },
    KeywordFamily {
        tag: Requirement::FastExecution,
        triggers: &["rápido"],
    },
    KeywordFamily {
        tag: Requirement::HighDetail,
        triggers: &["detalhado"],
    },
];

/// Tool selection, in execution priority order.
pub const TOOL_FAMILIES: &[KeywordFamily<&str>] = &[
    KeywordFamily {
        tag: brx_tools::image_generation::NAME,
        triggers: &["imagem", "foto", "desenho"],
    },
    KeywordFamily {
        tag: brx_tools::code_generation::NAME,
        triggers: &["código", "programa", "app"],
    },
    KeywordFamily {
        tag: brx_tools::text_generation::NAME,
        triggers: &["texto", "escrever", "documento"],
    },
    KeywordFamily {
        tag: brx_tools::web_research::NAME,
        triggers: &["pesquisar", "encontrar", "buscar"],
    },
];
