//! Composite quality metric for one recognition result.
//!
//! Only `overall` participates in candidate ranking; `structure` and
//! `readability` are informational.

use serde::Serialize;

use super::entities::extract_entities;

/// Quality metrics for a normalized recognition result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityScores {
    /// Ranking metric: `min(1, 0.7*confidence + 0.2*[words>50] + 0.1*[entities])`.
    pub overall: f32,
    /// Line density, `min(1, lines/10)`.
    pub structure: f32,
    /// Word density, `min(1, words/100)`.
    pub readability: f32,
    /// Mean token confidence carried through from the engine.
    pub confidence: f32,
}

impl QualityScores {
    pub fn zero() -> Self {
        Self {
            overall: 0.0,
            structure: 0.0,
            readability: 0.0,
            confidence: 0.0,
        }
    }
}

/// Compute quality metrics for normalized text at a given confidence.
pub fn calculate_quality(text: &str, confidence: f32) -> QualityScores {
    if text.is_empty() {
        return QualityScores::zero();
    }

    let word_count = text.split_whitespace().count();
    let line_count = text.split('\n').count();

    let mut overall = confidence * 0.7;
    if word_count > 50 {
        overall += 0.2;
    }
    if !extract_entities(text).is_empty() {
        overall += 0.1;
    }

    QualityScores {
        overall: overall.min(1.0),
        structure: (line_count as f32 / 10.0).min(1.0),
        readability: (word_count as f32 / 100.0).min(1.0),
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_scores_zero() {
        assert_eq!(calculate_quality("", 0.9), QualityScores::zero());
    }

    #[test]
    fn monotonic_in_confidence() {
        let text = "Employment contract between the parties";
        let mut previous = -1.0f32;
        for step in 0..=10 {
            let confidence = step as f32 / 10.0;
            let overall = calculate_quality(text, confidence).overall;
            assert!(overall >= previous, "overall dropped at confidence {confidence}");
            previous = overall;
        }
    }

    #[test]
    fn word_count_and_entities_add_bonuses() {
        let short = calculate_quality("short text", 0.5);
        assert!((short.overall - 0.35).abs() < 1e-6);

        let long: String = std::iter::repeat("word").take(60).collect::<Vec<_>>().join(" ");
        let with_words = calculate_quality(&long, 0.5);
        assert!((with_words.overall - 0.55).abs() < 1e-6);

        let with_entity = calculate_quality("contact hr@acme.com", 0.5);
        assert!((with_entity.overall - 0.45).abs() < 1e-6);
    }

    #[test]
    fn overall_is_capped_at_one() {
        let long: String = std::iter::repeat("mail@acme.com").take(60).collect::<Vec<_>>().join(" ");
        assert_eq!(calculate_quality(&long, 1.0).overall, 1.0);
    }
}
