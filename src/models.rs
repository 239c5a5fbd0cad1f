//! Core data models for the responder

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag used when no pattern clears the confidence threshold.
pub const UNKNOWN_INTENT: &str = "unknown";

/// Tag carried by error-shaped payloads.
pub const ERROR_INTENT: &str = "error";

//
// ================= Intent Data =================
//

/// A labeled intent: example phrases plus candidate replies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntentRecord {
    pub tag: String,
    pub patterns: Vec<String>,
    #[serde(default)]
    pub responses: Vec<String>,
}

impl IntentRecord {
    pub fn new(tag: &str, patterns: &[&str], responses: &[&str]) -> Self {
        Self {
            tag: tag.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            responses: responses.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// The validated intent set, immutable after load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntentDataset {
    pub intents: Vec<IntentRecord>,
}

impl IntentDataset {
    pub fn new(intents: Vec<IntentRecord>) -> Self {
        Self { intents }
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    /// First record carrying `tag`, if any.
    pub fn find(&self, tag: &str) -> Option<&IntentRecord> {
        self.intents.iter().find(|record| record.tag == tag)
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> Vec<String> {
        self.intents.iter().map(|record| record.tag.clone()).collect()
    }
}

//
// ================= Sentiment =================
//

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Magnitude of the polarity in [0, 1], not a probability.
    pub score: f32,
    pub confidence: ConfidenceBand,
}

impl Default for SentimentResult {
    fn default() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            score: 0.5,
            confidence: ConfidenceBand::Low,
        }
    }
}

impl SentimentResult {
    pub fn is_strongly_negative(&self) -> bool {
        self.label == SentimentLabel::Negative && self.score > 0.6
    }
}

//
// ================= Response =================
//

/// Structured reply for one message. Built fresh per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub text: String,
    pub intent: String,
    pub intent_confidence: f32,
    pub sentiment: SentimentResult,
    pub timestamp: String,
    pub bot_name: String,
}

impl ResponsePayload {
    pub fn is_error(&self) -> bool {
        self.intent == ERROR_INTENT
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotInfo {
    pub name: String,
    pub version: String,
    pub language: String,
    pub supported_intents: Vec<String>,
    pub features: Vec<String>,
    pub sentiment_strategy: String,
    pub index_fingerprint: Option<String>,
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConfidenceBand::Low => "low",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::High => "high",
        };
        write!(f, "{}", s)
    }
}
