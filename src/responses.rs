//! Response selection
//!
//! Rules are tried in a fixed order and the first one with candidates wins:
//! strong negative sentiment, configured intent replies, dataset replies,
//! the unknown-intent set, then a single default reply.

use rand::Rng;
use std::sync::Arc;
use tracing::debug;

use crate::config::BotConfig;
use crate::error::ResponderError;
use crate::models::{IntentDataset, SentimentResult, UNKNOWN_INTENT};
use crate::Result;

pub const DEFAULT_NEGATIVE_RESPONSES: [&str; 2] = [
    "Anlıyorum, bu durum sizi rahatsız etmiş. Size en iyi şekilde yardımcı olmaya çalışacağım.",
    "Üzgünüm bu deneyimi yaşadığınız için. Sorununuzu çözmek için buradayım.",
];

pub const DEFAULT_UNKNOWN_RESPONSES: [&str; 2] = [
    "Üzgünüm, sorunuzu tam olarak anlayamadım. Lütfen daha detaylı açıklayabilir misiniz?",
    "Bu konuda size yardımcı olmak için daha fazla bilgiye ihtiyacım var.",
];

pub const DEFAULT_RESPONSE: &str = "Size nasıl yardımcı olabilirim?";

/// Uniform choice among `len` candidates.
pub trait ResponsePicker: Send + Sync {
    /// Index in `0..len`; `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Thread-local RNG backed picker.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl ResponsePicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always the first candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstPicker;

impl ResponsePicker for FirstPicker {
    fn pick(&self, _len: usize) -> usize {
        0
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct SelectionInput<'a> {
    pub tag: &'a str,
    pub sentiment: &'a SentimentResult,
    pub config: &'a BotConfig,
    pub dataset: &'a IntentDataset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRule {
    NegativeSentiment,
    ConfiguredIntent,
    DatasetIntent,
    UnknownIntent,
    Fallback,
}

impl SelectionRule {
    /// Evaluation order.
    pub const ORDER: [SelectionRule; 5] = [
        SelectionRule::NegativeSentiment,
        SelectionRule::ConfiguredIntent,
        SelectionRule::DatasetIntent,
        SelectionRule::UnknownIntent,
        SelectionRule::Fallback,
    ];

    /// Candidate replies for this rule, `None` when it does not apply.
    pub fn candidates<'a>(&self, input: &SelectionInput<'a>) -> Option<Vec<&'a str>> {
        let candidates: Vec<&'a str> = match self {
            SelectionRule::NegativeSentiment => {
                if !input.sentiment.is_strongly_negative() {
                    return None;
                }
                configured_or_default(
                    input.config.responses.negative_sentiment.as_deref(),
                    &DEFAULT_NEGATIVE_RESPONSES,
                )
            }
            SelectionRule::ConfiguredIntent => input
                .config
                .intent_responses(input.tag)
                .iter()
                .map(String::as_str)
                .collect(),
            SelectionRule::DatasetIntent => input
                .dataset
                .intents
                .iter()
                .find(|record| record.tag == input.tag && !record.responses.is_empty())
                .map(|record| record.responses.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            SelectionRule::UnknownIntent => {
                if input.tag != UNKNOWN_INTENT {
                    return None;
                }
                configured_or_default(
                    input.config.responses.unknown.as_deref(),
                    &DEFAULT_UNKNOWN_RESPONSES,
                )
            }
            SelectionRule::Fallback => vec![DEFAULT_RESPONSE],
        };

        if candidates.is_empty() {
            None
        } else {
            Some(candidates)
        }
    }
}

fn configured_or_default<'a>(configured: Option<&'a [String]>, defaults: &[&'static str]) -> Vec<&'a str> {
    match configured {
        Some(list) if !list.is_empty() => list.iter().map(String::as_str).collect(),
        _ => defaults.to_vec(),
    }
}

/// Chosen reply and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub text: String,
    pub rule: SelectionRule,
}

#[derive(Clone)]
pub struct ResponseSelector {
    picker: Arc<dyn ResponsePicker>,
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new(Arc::new(RandomPicker))
    }
}

impl ResponseSelector {
    pub fn new(picker: Arc<dyn ResponsePicker>) -> Self {
        Self { picker }
    }

    pub fn select(&self, input: &SelectionInput<'_>) -> Result<Selection> {
        for rule in SelectionRule::ORDER {
            let Some(candidates) = rule.candidates(input) else {
                continue;
            };

            let choice = self.picker.pick(candidates.len());
            let text = candidates.get(choice).ok_or_else(|| {
                ResponderError::SelectionError(format!(
                    "picker returned {} for {} candidates",
                    choice,
                    candidates.len()
                ))
            })?;

            debug!("Response selected by {:?}", rule);

            return Ok(Selection {
                text: text.to_string(),
                rule,
            });
        }

        Err(ResponderError::SelectionError("no rule produced a response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntentResponses;
    use crate::models::{ConfidenceBand, IntentRecord, SentimentLabel};

    fn sentiment(label: SentimentLabel, score: f32) -> SentimentResult {
        SentimentResult {
            label,
            score,
            confidence: ConfidenceBand::High,
        }
    }

    fn dataset() -> IntentDataset {
        IntentDataset::new(vec![
            IntentRecord::new("greeting", &["merhaba"], &["Merhaba!", "Selam!"]),
            IntentRecord::new("silent", &["sessiz"], &[]),
        ])
    }

    fn config_with_greeting() -> BotConfig {
        let mut config = BotConfig::default();
        config.intents.insert(
            "greeting".to_string(),
            IntentResponses {
                responses: vec!["Hoş geldiniz!".to_string()],
            },
        );
        config
    }

    fn select(tag: &str, sentiment: &SentimentResult, config: &BotConfig) -> Selection {
        let dataset = dataset();
        let input = SelectionInput {
            tag,
            sentiment,
            config,
            dataset: &dataset,
        };
        ResponseSelector::default().select(&input).unwrap()
    }

    #[test]
    fn test_negative_sentiment_overrides_intent() {
        let negative = sentiment(SentimentLabel::Negative, 0.9);
        let config = config_with_greeting();

        for tag in ["greeting", "unknown", "silent", "missing"] {
            let selection = select(tag, &negative, &config);
            assert_eq!(selection.rule, SelectionRule::NegativeSentiment);
            assert!(DEFAULT_NEGATIVE_RESPONSES.contains(&selection.text.as_str()));
        }
    }

    #[test]
    fn test_weak_negative_does_not_override() {
        let weak = sentiment(SentimentLabel::Negative, 0.6);
        let selection = select("greeting", &weak, &BotConfig::default());
        assert_eq!(selection.rule, SelectionRule::DatasetIntent);
    }

    #[test]
    fn test_configured_negative_set() {
        let mut config = BotConfig::default();
        config.responses.negative_sentiment = Some(vec!["Çok üzgünüz.".to_string()]);

        let selection = select("greeting", &sentiment(SentimentLabel::Negative, 0.7), &config);
        assert_eq!(selection.text, "Çok üzgünüz.");
    }

    #[test]
    fn test_config_beats_dataset() {
        let selection = select("greeting", &SentimentResult::default(), &config_with_greeting());
        assert_eq!(selection.rule, SelectionRule::ConfiguredIntent);
        assert_eq!(selection.text, "Hoş geldiniz!");
    }

    #[test]
    fn test_dataset_responses() {
        let selection = select("greeting", &SentimentResult::default(), &BotConfig::default());
        assert_eq!(selection.rule, SelectionRule::DatasetIntent);
        assert!(["Merhaba!", "Selam!"].contains(&selection.text.as_str()));
    }

    #[test]
    fn test_unknown_set() {
        let selection = select(UNKNOWN_INTENT, &SentimentResult::default(), &BotConfig::default());
        assert_eq!(selection.rule, SelectionRule::UnknownIntent);
        assert!(DEFAULT_UNKNOWN_RESPONSES.contains(&selection.text.as_str()));

        let mut config = BotConfig::default();
        config.responses.unknown = Some(vec![]);
        let selection = select(UNKNOWN_INTENT, &SentimentResult::default(), &config);
        assert!(DEFAULT_UNKNOWN_RESPONSES.contains(&selection.text.as_str()));
    }

    #[test]
    fn test_fallback_for_tag_without_replies() {
        for tag in ["silent", "missing"] {
            let selection = select(tag, &SentimentResult::default(), &BotConfig::default());
            assert_eq!(selection.rule, SelectionRule::Fallback);
            assert_eq!(selection.text, DEFAULT_RESPONSE);
        }
    }

    #[test]
    fn test_first_picker_is_deterministic() {
        let dataset = dataset();
        let config = BotConfig::default();
        let neutral = SentimentResult::default();
        let input = SelectionInput {
            tag: "greeting",
            sentiment: &neutral,
            config: &config,
            dataset: &dataset,
        };

        let selector = ResponseSelector::new(Arc::new(FirstPicker));
        for _ in 0..5 {
            assert_eq!(selector.select(&input).unwrap().text, "Merhaba!");
        }
    }

    #[test]
    fn test_out_of_range_pick_is_an_error() {
        struct Broken;
        impl ResponsePicker for Broken {
            fn pick(&self, len: usize) -> usize {
                len
            }
        }

        let dataset = dataset();
        let config = BotConfig::default();
        let neutral = SentimentResult::default();
        let input = SelectionInput {
            tag: "greeting",
            sentiment: &neutral,
            config: &config,
            dataset: &dataset,
        };

        assert!(ResponseSelector::new(Arc::new(Broken)).select(&input).is_err());
    }

    #[test]
    fn test_random_picker_stays_in_range() {
        let picker = RandomPicker;
        for len in 1..10 {
            for _ in 0..20 {
                assert!(picker.pick(len) < len);
            }
        }
    }
}
