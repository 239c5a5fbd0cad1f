//! Conversation responder
//!
//! Wires normalizer, intent matcher, sentiment estimator and response
//! selector into one call. `respond` always returns a well-formed payload:
//! validation failures and internal errors become error-shaped payloads.

use chrono::Local;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::config::BotConfig;
use crate::dataset::load_intent_dataset;
use crate::error::ResponderError;
use crate::models::{BotInfo, IntentDataset, ResponsePayload, SentimentResult, ERROR_INTENT};
use crate::nlp::{IntentMatch, IntentMatcher, PatternIndex, TextNormalizer};
use crate::responses::{ResponseSelector, SelectionInput};
use crate::sentiment::SentimentEstimator;
use crate::Result;

pub const EMPTY_MESSAGE_TEXT: &str = "Mesaj boş olamaz";
pub const FAILURE_TEXT: &str = "Bir hata oluştu, lütfen tekrar deneyin";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FEATURES: [&str; 4] = [
    "Intent Recognition",
    "Sentiment Analysis",
    "Automatic Response",
    "Turkish Language Support",
];

/// Read-only state built once at startup and shared by every request.
pub struct BotContext {
    config: BotConfig,
    dataset: IntentDataset,
    matcher: IntentMatcher,
    estimator: SentimentEstimator,
}

impl BotContext {
    /// Build the pattern index from `dataset` using the configured language.
    pub fn new(config: BotConfig, dataset: IntentDataset, estimator: SentimentEstimator) -> Self {
        let normalizer = TextNormalizer::for_language(&config.bot.language);
        let index = PatternIndex::build(&dataset.intents, &normalizer);
        let matcher = IntentMatcher::new(index, normalizer, config.confidence_threshold());

        Self {
            config,
            dataset,
            matcher,
            estimator,
        }
    }

    /// Load the dataset named in `config` and pick the sentiment strategy.
    pub async fn load(config: BotConfig) -> Self {
        let dataset = load_intent_dataset(&config.nlp.intent_data_path);
        let normalizer = TextNormalizer::for_language(&config.bot.language);
        let estimator = SentimentEstimator::load(&config.nlp, normalizer).await;

        Self::new(config, dataset, estimator)
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn dataset(&self) -> &IntentDataset {
        &self.dataset
    }

    pub fn matcher(&self) -> &IntentMatcher {
        &self.matcher
    }

    pub fn estimator(&self) -> &SentimentEstimator {
        &self.estimator
    }
}

#[derive(Clone)]
pub struct ConversationResponder {
    context: Arc<BotContext>,
    selector: ResponseSelector,
}

impl ConversationResponder {
    pub fn new(context: Arc<BotContext>, selector: ResponseSelector) -> Self {
        Self { context, selector }
    }

    /// Full startup: config from `BOT_CONFIG`, dataset, sentiment strategy.
    pub async fn from_env() -> Self {
        Self::from_config(BotConfig::from_env()).await
    }

    pub async fn from_config(config: BotConfig) -> Self {
        info!("Customer service bot starting");
        let context = BotContext::load(config).await;
        info!(
            "Customer service bot ready: {} intents, {} patterns, sentiment={}",
            context.dataset.intents.len(),
            context.matcher.index().len(),
            context.estimator.strategy_name()
        );

        Self::new(Arc::new(context), ResponseSelector::default())
    }

    pub fn context(&self) -> &BotContext {
        &self.context
    }

    pub fn bot_name(&self) -> &str {
        &self.context.config.bot.name
    }

    /// Answer one customer message. Never fails.
    pub async fn respond(&self, message: &str) -> ResponsePayload {
        if message.trim().is_empty() {
            return self.error_payload(EMPTY_MESSAGE_TEXT);
        }

        let started = Instant::now();

        let outcome = AssertUnwindSafe(self.try_respond(message)).catch_unwind().await;

        match outcome {
            Ok(Ok(payload)) => {
                info!(
                    intent = %payload.intent,
                    sentiment = %payload.sentiment.label,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Response generated"
                );
                payload
            }
            Ok(Err(e)) => {
                error!("Response generation failed: {}", e);
                self.error_payload(FAILURE_TEXT)
            }
            Err(_) => {
                error!("Response generation panicked");
                self.error_payload(FAILURE_TEXT)
            }
        }
    }

    async fn try_respond(&self, message: &str) -> Result<ResponsePayload> {
        let sentiment = self.analyze_sentiment(message).await;
        let intent = self.recognize_intent(message);

        if !intent.score.is_finite() {
            return Err(ResponderError::IndexError(format!(
                "invalid intent score {}",
                intent.score
            )));
        }

        let input = SelectionInput {
            tag: &intent.tag,
            sentiment: &sentiment,
            config: &self.context.config,
            dataset: &self.context.dataset,
        };
        let selection = self.selector.select(&input)?;

        Ok(ResponsePayload {
            text: selection.text,
            intent: intent.tag,
            intent_confidence: intent.score,
            sentiment,
            timestamp: timestamp(),
            bot_name: self.bot_name().to_string(),
        })
    }

    pub fn recognize_intent(&self, message: &str) -> IntentMatch {
        self.context.matcher.recognize(message)
    }

    pub async fn analyze_sentiment(&self, message: &str) -> SentimentResult {
        self.context.estimator.estimate(message).await
    }

    /// Error-shaped payload with neutral sentiment and zero confidence.
    pub fn error_payload(&self, text: &str) -> ResponsePayload {
        if text != EMPTY_MESSAGE_TEXT {
            warn!("Returning error payload: {}", text);
        }

        ResponsePayload {
            text: text.to_string(),
            intent: ERROR_INTENT.to_string(),
            intent_confidence: 0.0,
            sentiment: SentimentResult::default(),
            timestamp: timestamp(),
            bot_name: self.bot_name().to_string(),
        }
    }

    pub fn bot_info(&self) -> BotInfo {
        let bot = &self.context.config.bot;

        BotInfo {
            name: bot.name.clone(),
            version: bot.version.clone(),
            language: bot.language.clone(),
            supported_intents: self.context.dataset.tags(),
            features: FEATURES.iter().map(|f| f.to_string()).collect(),
            sentiment_strategy: self.context.estimator.strategy_name(),
            index_fingerprint: self.context.matcher.index().fingerprint().map(str::to_string),
        }
    }
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
