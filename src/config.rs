//! Bot configuration
//!
//! Read once at startup from a TOML file. Every field has a default, and a
//! missing or malformed file yields `BotConfig::default()` instead of failing.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::Path;
use tracing::{error, info, warn};

use crate::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.7;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub bot: BotSection,
    pub nlp: NlpSection,
    pub responses: ResponsesSection,
    pub intents: HashMap<String, IntentResponses>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotSection {
    pub name: String,
    pub version: String,
    pub language: String,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            name: "Akıllı Müşteri Hizmetleri Asistanı".to_string(),
            version: "1.0.0".to_string(),
            language: "tr".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NlpSection {
    pub intent_data_path: String,
    pub sentiment_model: String,
    /// Inference endpoint for the pretrained classifier. Unset means lexical only.
    pub sentiment_endpoint: Option<String>,
    pub confidence_threshold: f32,
}

impl Default for NlpSection {
    fn default() -> Self {
        Self {
            intent_data_path: "data/intent_training_data.json".to_string(),
            sentiment_model: "cardiffnlp/twitter-xlm-roberta-base-sentiment".to_string(),
            sentiment_endpoint: None,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

/// Optional overrides for the canned reply sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsesSection {
    pub negative_sentiment: Option<Vec<String>>,
    pub unknown: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentResponses {
    pub responses: Vec<String>,
}

impl BotConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BotConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Read and parse a config file, propagating failures.
    pub fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load a config file, falling back to defaults on any failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        match Self::try_load(path) {
            Ok(config) => {
                info!("Configuration loaded: {}", path.display());
                config.sanitized()
            }
            Err(crate::error::ResponderError::IoError(e)) => {
                error!("Configuration file not readable ({}): {}", path.display(), e);
                Self::default()
            }
            Err(e) => {
                error!("Configuration parse error ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load using `BOT_CONFIG` (or the default path), then apply env overrides.
    pub fn from_env() -> Self {
        let path = env::var("BOT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path).with_env_overrides()
    }

    /// `SENTIMENT_ENDPOINT` wins over the file value when set.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = env::var("SENTIMENT_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                self.nlp.sentiment_endpoint = Some(endpoint);
            }
        }

        self
    }

    /// Clamp values that would make matching meaningless.
    fn sanitized(mut self) -> Self {
        let threshold = self.nlp.confidence_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            warn!(
                "confidence_threshold {} out of range, using {}",
                threshold, DEFAULT_CONFIDENCE_THRESHOLD
            );
            self.nlp.confidence_threshold = DEFAULT_CONFIDENCE_THRESHOLD;
        }
        self
    }

    pub fn confidence_threshold(&self) -> f32 {
        self.nlp.confidence_threshold
    }

    /// Configured replies for `tag`, empty when absent.
    pub fn intent_responses(&self, tag: &str) -> &[String] {
        self.intents
            .get(tag)
            .map(|entry| entry.responses.as_slice())
            .unwrap_or(&[])
    }
}
