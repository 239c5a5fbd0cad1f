//! Intent matcher: nearest labeled pattern by cosine similarity.

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::models::UNKNOWN_INTENT;
use crate::nlp::index::PatternIndex;
use crate::nlp::normalizer::TextNormalizer;
use crate::Result;

/// Recognized tag plus the raw best similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentMatch {
    pub tag: String,
    /// Best similarity in [0, 1]. Kept even when the tag is forced to unknown.
    pub score: f32,
}

impl IntentMatch {
    pub fn unknown() -> Self {
        Self {
            tag: UNKNOWN_INTENT.to_string(),
            score: 0.0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.tag == UNKNOWN_INTENT
    }
}

/// Match `text` against `index`. Scores below `threshold` become unknown.
pub fn match_intent(
    index: &PatternIndex,
    normalizer: &TextNormalizer,
    text: &str,
    threshold: f32,
) -> IntentMatch {
    match try_match_intent(index, normalizer, text, threshold) {
        Ok(result) => result,
        Err(e) => {
            error!("Intent recognition failed: {}", e);
            IntentMatch::unknown()
        }
    }
}

fn try_match_intent(
    index: &PatternIndex,
    normalizer: &TextNormalizer,
    text: &str,
    threshold: f32,
) -> Result<IntentMatch> {
    let PatternIndex::Built(index) = index else {
        return Ok(IntentMatch::unknown());
    };

    let cleaned = normalizer.normalize(text);
    if cleaned.is_empty() {
        return Ok(IntentMatch::unknown());
    }

    let Some((row, score)) = index.best_match(&cleaned)? else {
        return Ok(IntentMatch::unknown());
    };

    let tag = match index.tag(row) {
        Some(tag) if score >= threshold => tag.to_string(),
        _ => UNKNOWN_INTENT.to_string(),
    };

    info!("Intent recognized: {} (score: {:.3})", tag, score);

    Ok(IntentMatch { tag, score })
}

/// Pattern index bundled with its normalizer and threshold.
#[derive(Debug, Clone)]
pub struct IntentMatcher {
    index: PatternIndex,
    normalizer: TextNormalizer,
    threshold: f32,
}

impl IntentMatcher {
    pub fn new(index: PatternIndex, normalizer: TextNormalizer, threshold: f32) -> Self {
        Self {
            index,
            normalizer,
            threshold,
        }
    }

    pub fn recognize(&self, text: &str) -> IntentMatch {
        match_intent(&self.index, &self.normalizer, text, self.threshold)
    }

    pub fn recognize_with_threshold(&self, text: &str, threshold: f32) -> IntentMatch {
        match_intent(&self.index, &self.normalizer, text, threshold)
    }

    pub fn index(&self) -> &PatternIndex {
        &self.index
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntentRecord;

    fn records() -> Vec<IntentRecord> {
        vec![
            IntentRecord::new("greeting", &["merhaba", "selam", "iyi günler", "günaydın"], &[]),
            IntentRecord::new(
                "product_info",
                &["hangi ürünler var", "ürün bilgisi istiyorum", "katalog", "fiyat listesi"],
                &[],
            ),
            IntentRecord::new(
                "order_status",
                &["siparişim nerede", "kargo takibi", "sipariş durumu", "ne zaman gelecek"],
                &[],
            ),
            IntentRecord::new(
                "refund",
                &["iade etmek istiyorum", "para iadesi", "geri ödeme", "ürünü geri vermek"],
                &[],
            ),
        ]
    }

    fn matcher() -> IntentMatcher {
        let normalizer = TextNormalizer::turkish();
        let index = PatternIndex::build(&records(), &normalizer);
        IntentMatcher::new(index, normalizer, 0.7)
    }

    #[test]
    fn test_exact_pattern_matches_owner() {
        let matcher = matcher();
        let result = matcher.recognize("Merhaba!");
        assert_eq!(result.tag, "greeting");
        assert!(result.score > 0.99);

        assert_eq!(matcher.recognize("KARGO TAKİBİ").tag, "order_status");
    }

    #[test]
    fn test_every_pattern_recovers_its_tag() {
        let matcher = matcher();
        for record in records() {
            for pattern in &record.patterns {
                let result = matcher.recognize_with_threshold(pattern, 0.0);
                assert_eq!(result.tag, record.tag, "pattern: {}", pattern);
            }
        }
    }

    #[test]
    fn test_below_threshold_keeps_raw_score() {
        let matcher = matcher();
        let partial = matcher.recognize_with_threshold("kargo", 0.0);
        assert_eq!(partial.tag, "order_status");
        assert!(partial.score > 0.0 && partial.score < 1.0);

        let strict = matcher.recognize_with_threshold("kargo", 0.99);
        assert!(strict.is_unknown());
        assert_eq!(strict.score, partial.score);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let matcher = matcher();
        let texts = ["kargo", "ürün bilgisi", "merhaba", "para", "xyz"];
        let thresholds = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

        for text in texts {
            let mut seen_unknown = false;
            for threshold in thresholds {
                let result = matcher.recognize_with_threshold(text, threshold);
                if seen_unknown {
                    assert!(result.is_unknown(), "{} at {}", text, threshold);
                }
                seen_unknown |= result.is_unknown();
            }
        }
    }

    #[test]
    fn test_unknown_inputs() {
        let matcher = matcher();
        let result = matcher.recognize("xyzabc123");
        assert!(result.is_unknown());
        assert!(result.score < 0.7);

        assert_eq!(matcher.recognize("?!?"), IntentMatch::unknown());
        assert_eq!(matcher.recognize(""), IntentMatch::unknown());
    }

    #[test]
    fn test_empty_index_is_always_unknown() {
        let matcher = IntentMatcher::new(PatternIndex::Empty, TextNormalizer::turkish(), 0.0);
        for text in ["merhaba", "kargo takibi", "", "xyz"] {
            assert_eq!(matcher.recognize(text), IntentMatch::unknown());
        }
    }
}
