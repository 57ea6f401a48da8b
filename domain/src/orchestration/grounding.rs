//! Grounding policy: does a question need live information?
//!
//! The decision feeds two things: the model registry (online variant
//! substitution) and whether tool declarations are offered to the model.
//!
//! | Decision | Online variant | Tools offered |
//! |----------|:---:|:---:|
//! | `Required` | if available | when no online variant |
//! | `ModelDecides` | no | yes |
//! | `NotNeeded` | no | no |

use serde::{Deserialize, Serialize};

/// Outcome of a grounding policy for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundingDecision {
    /// The question needs live data
    Required,
    /// Answerable from the model's own knowledge
    NotNeeded,
    /// Let the model request tools if it wants
    ModelDecides,
}

impl GroundingDecision {
    /// Whether the registry should substitute an online variant
    pub fn is_required(&self) -> bool {
        matches!(self, GroundingDecision::Required)
    }

    /// Whether tool declarations may be offered at all
    pub fn allows_tools(&self) -> bool {
        !matches!(self, GroundingDecision::NotNeeded)
    }
}

/// Pluggable heuristic deciding whether a question needs grounding.
pub trait GroundingPolicy: Send + Sync {
    fn decide(&self, question: &str) -> GroundingDecision;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Configurable selection of the grounding policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroundingPolicyKind {
    /// [`KeywordGroundingPolicy`]
    #[default]
    Keywords,
    /// [`ModelDecidesPolicy`]
    Model,
}

impl GroundingPolicyKind {
    pub fn build(self, reference_year: u16) -> Box<dyn GroundingPolicy> {
        match self {
            GroundingPolicyKind::Keywords => Box::new(KeywordGroundingPolicy::new(reference_year)),
            GroundingPolicyKind::Model => Box::new(ModelDecidesPolicy),
        }
    }
}

impl std::str::FromStr for GroundingPolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keywords" | "keyword" => Ok(GroundingPolicyKind::Keywords),
            "model" => Ok(GroundingPolicyKind::Model),
            other => Err(format!("unknown grounding policy '{}'", other)),
        }
    }
}

/// Always delegates to the model's own tool-call decision.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelDecidesPolicy;

impl GroundingPolicy for ModelDecidesPolicy {
    fn decide(&self, _question: &str) -> GroundingDecision {
        GroundingDecision::ModelDecides
    }

    fn name(&self) -> &'static str {
        "model"
    }
}

// Phrases are matched on accent-folded, lowercased word tokens.

/// Generic freshness cues. Vetoed by educational phrasing.
const FRESHNESS_CUES: &[&str] = &[
    "hoje",
    "agora",
    "atualmente",
    "atual",
    "recentemente",
    "ontem",
    "neste momento",
    "esta semana",
    "este mes",
    "semana passada",
    "mes passado",
    "ultimas",
    "ultima hora",
    "cotacao",
    "cambio",
    "previsao do tempo",
    "quem ganhou",
    "quem venceu",
    "today",
    "tonight",
    "now",
    "currently",
    "current",
    "recently",
    "yesterday",
    "this week",
    "last week",
    "this month",
    "latest",
    "exchange rate",
    "weather forecast",
    "who won",
];

/// Current-events phrasing. Never vetoed.
const CURRENT_EVENTS_CUES: &[&str] = &[
    "noticias",
    "noticia",
    "manchetes",
    "novidades",
    "aconteceu hoje",
    "o que aconteceu no mundo",
    "esta acontecendo",
    "esta a acontecer",
    "ao vivo",
    "eleicao",
    "eleicoes",
    "news",
    "headlines",
    "breaking",
    "what happened today",
    "election",
];

/// Office holders: "who is the president" needs today's answer.
const OFFICE_HOLDER_CUES: &[&str] = &[
    "presidente",
    "primeiro ministro",
    "ministro",
    "lider",
    "governador",
    "prefeito",
    "president",
    "prime minister",
    "governor",
    "mayor",
];

/// Past-tense or historical framing turns an office holder question into
/// a history question.
const HISTORICAL_MARKERS: &[&str] = &["foi", "foram", "was", "were", "historia", "history"];

const EDUCATIONAL_CUES: &[&str] = &[
    "como resolver",
    "como calcular",
    "como fazer",
    "como estudar",
    "o que e",
    "definicao",
    "conceito",
    "explicacao",
    "exercicio",
    "exercicios",
    "formula",
    "teorema",
    "historia de",
    "historia do",
    "historia da",
    "how to solve",
    "how to calculate",
    "definition",
    "theorem",
    "history of",
];

/// Keyword and date heuristic over Portuguese and English phrasing.
#[derive(Debug, Clone)]
pub struct KeywordGroundingPolicy {
    /// Years at or after this one are treated as "recent"
    reference_year: u16,
}

impl KeywordGroundingPolicy {
    pub fn new(reference_year: u16) -> Self {
        Self { reference_year }
    }

    fn mentions_recent_year(&self, tokens: &[String]) -> bool {
        tokens.iter().any(|t| {
            t.len() == 4
                && t.chars().all(|c| c.is_ascii_digit())
                && t.parse::<u16>().is_ok_and(|y| y >= self.reference_year)
        })
    }
}

impl Default for KeywordGroundingPolicy {
    fn default() -> Self {
        Self::new(2024)
    }
}

impl GroundingPolicy for KeywordGroundingPolicy {
    fn decide(&self, question: &str) -> GroundingDecision {
        let tokens = tokenize(question);

        let current_events = contains_any(&tokens, CURRENT_EVENTS_CUES);
        let office_holder = contains_any(&tokens, OFFICE_HOLDER_CUES)
            && !contains_any(&tokens, HISTORICAL_MARKERS);
        let freshness = contains_any(&tokens, FRESHNESS_CUES) || self.mentions_recent_year(&tokens);
        let educational = contains_any(&tokens, EDUCATIONAL_CUES);

        if current_events || office_holder || (freshness && !educational) {
            GroundingDecision::Required
        } else {
            GroundingDecision::NotNeeded
        }
    }

    fn name(&self) -> &'static str {
        "keywords"
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.chars().flat_map(char::to_lowercase).map(fold_accent).collect())
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

fn contains_any(tokens: &[String], phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| contains_phrase(tokens, phrase))
}

fn contains_phrase(tokens: &[String], phrase: &str) -> bool {
    let words: Vec<&str> = phrase.split(' ').collect();
    tokens
        .windows(words.len())
        .any(|window| window.iter().zip(&words).all(|(t, w)| t == w))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(question: &str) -> GroundingDecision {
        KeywordGroundingPolicy::new(2024).decide(question)
    }

    #[test]
    fn test_arithmetic_needs_no_grounding() {
        assert_eq!(decide("What is 2+2?"), GroundingDecision::NotNeeded);
        assert_eq!(decide("Quanto é 7 vezes 8?"), GroundingDecision::NotNeeded);
    }

    #[test]
    fn test_current_president_needs_grounding() {
        assert_eq!(
            decide("Who is the current president of the United States in 2025?"),
            GroundingDecision::Required
        );
        assert_eq!(
            decide("Quem é o presidente de Portugal?"),
            GroundingDecision::Required
        );
    }

    #[test]
    fn test_historical_office_holder() {
        assert_eq!(
            decide("Quem foi o primeiro presidente do Brasil?"),
            GroundingDecision::NotNeeded
        );
    }

    #[test]
    fn test_freshness_cues_with_accents() {
        assert_eq!(
            decide("Qual é a cotação do euro hoje?"),
            GroundingDecision::Required
        );
        assert_eq!(
            decide("Vai chover em Lisboa esta semana?"),
            GroundingDecision::Required
        );
    }

    #[test]
    fn test_educational_phrasing_vetoes_freshness() {
        assert_eq!(
            decide("Como resolver a equação que vimos hoje na aula?"),
            GroundingDecision::NotNeeded
        );
    }

    #[test]
    fn test_educational_does_not_veto_news() {
        assert_eq!(
            decide("O que é notícia hoje sobre as eleições?"),
            GroundingDecision::Required
        );
    }

    #[test]
    fn test_recent_year_is_a_cue() {
        assert_eq!(
            decide("Quais foram os vencedores dos prémios em 2025?"),
            GroundingDecision::Required
        );
        assert_eq!(
            decide("O que aconteceu em 1755 em Lisboa?"),
            GroundingDecision::NotNeeded
        );
        assert_eq!(
            decide("O que aconteceu hoje em Lisboa?"),
            GroundingDecision::Required
        );
        assert_eq!(
            decide("Explica o terramoto de 1755"),
            GroundingDecision::NotNeeded
        );
    }

    #[test]
    fn test_substring_is_not_a_match() {
        // "now" inside "know", "atual" inside "atualizar"
        assert_eq!(
            decide("I want to know about atoms and how to atualizar notes"),
            GroundingDecision::NotNeeded
        );
    }

    #[test]
    fn test_model_decides_policy() {
        let policy = ModelDecidesPolicy;
        assert_eq!(policy.decide("anything"), GroundingDecision::ModelDecides);
        assert!(policy.decide("x").allows_tools());
        assert!(!policy.decide("x").is_required());
    }

    #[test]
    fn test_policy_kind_parsing_and_build() {
        assert_eq!(
            "Keywords".parse::<GroundingPolicyKind>().unwrap(),
            GroundingPolicyKind::Keywords
        );
        assert!("magic".parse::<GroundingPolicyKind>().is_err());
        assert_eq!(GroundingPolicyKind::Model.build(2024).name(), "model");
        assert_eq!(GroundingPolicyKind::default().build(2024).name(), "keywords");
    }
}
