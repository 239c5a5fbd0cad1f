//! Sentiment estimation
//!
//! Two strategies behind one estimator: a pretrained classifier reached
//! through [`SentimentModel`], or the built-in lexical scorer. The strategy
//! is chosen once at startup and never changes afterwards.

pub mod lexicon;
pub mod remote;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::NlpSection;
use crate::error::ResponderError;
use crate::models::{ConfidenceBand, SentimentLabel, SentimentResult};
use crate::nlp::TextNormalizer;
use crate::Result;

pub use lexicon::LexicalAnalyzer;
pub use remote::RemoteSentimentModel;

/// Polarity above this is positive, below its negation negative.
pub const POLARITY_NEUTRAL_BAND: f32 = 0.1;

/// Text sent once at startup to check that the classifier answers.
const PROBE_TEXT: &str = "merhaba";

/// One (label, score) pair as returned by a pretrained classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f32,
}

/// External multi-class sentiment capability.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    fn name(&self) -> &str;
    async fn scores(&self, text: &str) -> Result<Vec<LabelScore>>;
}

/// Map a classifier label onto the canonical set.
pub fn canonical_label(raw: &str) -> Result<SentimentLabel> {
    match raw.trim().to_uppercase().as_str() {
        "POSITIVE" | "POS" | "LABEL_2" => Ok(SentimentLabel::Positive),
        "NEGATIVE" | "NEG" | "LABEL_0" => Ok(SentimentLabel::Negative),
        "NEUTRAL" | "NEU" | "LABEL_1" => Ok(SentimentLabel::Neutral),
        other => Err(ResponderError::SentimentModelError(format!(
            "unrecognized label '{}'",
            other
        ))),
    }
}

/// Confidence band for a classifier probability.
pub fn model_confidence(score: f32) -> ConfidenceBand {
    if score > 0.8 {
        ConfidenceBand::High
    } else if score > 0.6 {
        ConfidenceBand::Medium
    } else {
        ConfidenceBand::Low
    }
}

/// Confidence band for a lexical polarity magnitude.
pub fn polarity_confidence(score: f32) -> ConfidenceBand {
    if score > 0.5 {
        ConfidenceBand::High
    } else if score > 0.3 {
        ConfidenceBand::Medium
    } else {
        ConfidenceBand::Low
    }
}

/// Turn a polarity in [-1, 1] into a sentiment result.
pub fn from_polarity(polarity: f32) -> SentimentResult {
    let polarity = polarity.clamp(-1.0, 1.0);

    let label = if polarity > POLARITY_NEUTRAL_BAND {
        SentimentLabel::Positive
    } else if polarity < -POLARITY_NEUTRAL_BAND {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    let score = polarity.abs();

    SentimentResult {
        label,
        score,
        confidence: polarity_confidence(score),
    }
}

/// Pick the top-scoring label and normalize it.
pub fn from_label_scores(scores: &[LabelScore]) -> Result<SentimentResult> {
    let best = scores
        .iter()
        .filter(|entry| entry.score.is_finite())
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| ResponderError::SentimentModelError("no usable scores".to_string()))?;

    let score = best.score.clamp(0.0, 1.0);

    Ok(SentimentResult {
        label: canonical_label(&best.label)?,
        score,
        confidence: model_confidence(score),
    })
}

#[derive(Clone)]
enum Strategy {
    Lexical,
    Pretrained(Arc<dyn SentimentModel>),
}

/// Sentiment estimator with a fixed strategy.
#[derive(Clone)]
pub struct SentimentEstimator {
    strategy: Strategy,
    lexical: LexicalAnalyzer,
    normalizer: TextNormalizer,
}

impl SentimentEstimator {
    pub fn lexical(normalizer: TextNormalizer) -> Self {
        Self {
            strategy: Strategy::Lexical,
            lexical: LexicalAnalyzer::new(),
            normalizer,
        }
    }

    pub fn pretrained(model: Arc<dyn SentimentModel>, normalizer: TextNormalizer) -> Self {
        Self {
            strategy: Strategy::Pretrained(model),
            lexical: LexicalAnalyzer::new(),
            normalizer,
        }
    }

    /// Select the strategy once: the configured endpoint if it answers a
    /// probe, otherwise the lexical scorer for the rest of the process.
    pub async fn load(nlp: &NlpSection, normalizer: TextNormalizer) -> Self {
        let Some(endpoint) = nlp.sentiment_endpoint.as_deref() else {
            info!("No sentiment endpoint configured, using lexical sentiment");
            return Self::lexical(normalizer);
        };

        info!("Loading sentiment model: {}", nlp.sentiment_model);

        let token = env::var("SENTIMENT_API_TOKEN").ok();
        let model = match RemoteSentimentModel::new(endpoint, &nlp.sentiment_model, token) {
            Ok(model) => model,
            Err(e) => {
                error!("Sentiment model client not built: {}", e);
                return Self::lexical(normalizer);
            }
        };

        match model.scores(PROBE_TEXT).await.and_then(|s| from_label_scores(&s)) {
            Ok(_) => {
                info!("Sentiment model ready: {}", model.endpoint());
                Self::pretrained(Arc::new(model), normalizer)
            }
            Err(e) => {
                error!("Sentiment model load failed: {}", e);
                info!("Falling back to lexical sentiment");
                Self::lexical(normalizer)
            }
        }
    }

    pub fn strategy_name(&self) -> String {
        match &self.strategy {
            Strategy::Lexical => "lexical".to_string(),
            Strategy::Pretrained(model) => format!("pretrained:{}", model.name()),
        }
    }

    pub fn is_pretrained(&self) -> bool {
        matches!(self.strategy, Strategy::Pretrained(_))
    }

    /// Estimate sentiment for raw text.
    pub async fn estimate(&self, text: &str) -> SentimentResult {
        let cleaned = self.normalizer.normalize(text);
        if cleaned.is_empty() {
            return SentimentResult::default();
        }

        match &self.strategy {
            Strategy::Lexical => self.estimate_lexical(&cleaned),
            Strategy::Pretrained(model) => {
                match model.scores(&cleaned).await.and_then(|s| from_label_scores(&s)) {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("Pretrained sentiment failed, using lexical: {}", e);
                        self.estimate_lexical(&cleaned)
                    }
                }
            }
        }
    }

    fn estimate_lexical(&self, cleaned: &str) -> SentimentResult {
        from_polarity(self.lexical.polarity(cleaned))
    }
}
