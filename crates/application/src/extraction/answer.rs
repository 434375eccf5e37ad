//! Answer-marker location and token normalization.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Literal marker preceding the answer in model output.
pub const ANSWER_MARKER: &str = "Answer:";

/// First bracket group: an opener, a run without closers, then any closer.
static BRACKET_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[{\[(]([^)}\]]*)[}\])]").unwrap()
});

/// How much text after the marker belongs to the answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerScope {
    /// Everything up to the end of the text
    ToEnd,
    /// Up to the next line break
    FirstLine,
}

/// Trimmed text following the last `Answer:` marker.
pub fn answer_tail(text: &str, scope: AnswerScope) -> Result<&str, ExtractionError> {
    let (_, tail) = text
        .rsplit_once(ANSWER_MARKER)
        .ok_or(ExtractionError::NoAnswerMarker)?;

    let tail = match scope {
        AnswerScope::ToEnd => tail,
        AnswerScope::FirstLine => tail.split('\n').next().unwrap_or_default(),
    };

    Ok(tail.trim())
}

/// Format-detection rule that produced a normalized answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationRule {
    /// `[a, b, c]`: brackets stripped
    BracketWrapped,
    /// `a -> b -> c`: segments rejoined with commas
    ArrowChain,
    /// First `{...}`, `[...]` or `(...)` group after dropping quotes
    Delimited,
    /// Already a bare comma list (quotes dropped)
    Bare,
}

/// A bare comma-separated token list and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAnswer {
    /// Rule that matched
    pub rule: NormalizationRule,
    /// Comma-separated body
    pub body: String,
}

impl NormalizedAnswer {
    /// Parse the body as integers.
    pub fn integers(&self) -> Result<Vec<i64>, ExtractionError> {
        parse_integers(&self.body)
    }
}

/// Reduce answer text to a bare comma-separated list.
///
/// Rules are tried in order; the first that applies wins.
pub fn normalize(text: &str) -> NormalizedAnswer {
    let trimmed = text.trim();

    if trimmed.len() >= 2 && trimmed.starts_with('[') && trimmed.ends_with(']') {
        return NormalizedAnswer {
            rule: NormalizationRule::BracketWrapped,
            body: trimmed[1..trimmed.len() - 1].to_string(),
        };
    }

    if trimmed.contains("->") {
        let body = trimmed
            .split("->")
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(",");
        return NormalizedAnswer {
            rule: NormalizationRule::ArrowChain,
            body,
        };
    }

    let unquoted: String = trimmed.chars().filter(|c| !matches!(c, '\'' | '"')).collect();

    if let Some(group) = BRACKET_GROUP.captures(&unquoted).and_then(|caps| caps.get(1)) {
        return NormalizedAnswer {
            rule: NormalizationRule::Delimited,
            body: group.as_str().to_string(),
        };
    }

    NormalizedAnswer {
        rule: NormalizationRule::Bare,
        body: unquoted,
    }
}

/// Split on commas and parse each trimmed token as an integer.
pub fn parse_integers(body: &str) -> Result<Vec<i64>, ExtractionError> {
    if body.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }

    body.split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<i64>()
                .map_err(|_| ExtractionError::InvalidToken(token.to_string()))
        })
        .collect()
}

/// Locate, normalize and parse an integer-sequence answer.
pub fn extract_integers(text: &str, scope: AnswerScope) -> Result<Vec<i64>, ExtractionError> {
    let tail = answer_tail(text, scope)?;
    normalize(tail).integers()
}
