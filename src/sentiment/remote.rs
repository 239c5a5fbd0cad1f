//! HTTP-backed pretrained sentiment classifier
//!
//! Talks to a Hugging Face style inference endpoint: POST `{"inputs": text}`
//! and receive `[[{"label", "score"}, ...]]` (or the flat variant).
//! Uses a long-lived reqwest::Client for connection pooling.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

use crate::error::ResponderError;
use crate::sentiment::{LabelScore, SentimentModel};
use crate::Result;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RemoteSentimentModel {
    client: Client,
    endpoint: String,
    model_name: String,
    api_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

impl RemoteSentimentModel {
    /// `endpoint` may contain a `{model}` placeholder, replaced by `model_name`.
    pub fn new(endpoint: &str, model_name: &str, api_token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.replace("{model}", model_name),
            model_name: model_name.to_string(),
            api_token: api_token.filter(|token| !token.trim().is_empty()),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SentimentModel for RemoteSentimentModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn scores(&self, text: &str) -> Result<Vec<LabelScore>> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&InferenceRequest { inputs: text });

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            error!("Sentiment endpoint request failed: {}", e);
            ResponderError::SentimentModelError(format!("request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ResponderError::SentimentModelError(format!(
                "endpoint returned {}: {}",
                status, body
            )));
        }

        let body: Value = response.json().await?;
        let scores = parse_scores(&body)?;
        debug!("Sentiment endpoint returned {} labels", scores.len());

        Ok(scores)
    }
}

/// Accepts `[[{label, score}]]` or `[{label, score}]`.
pub fn parse_scores(body: &Value) -> Result<Vec<LabelScore>> {
    let outer = body.as_array().ok_or_else(|| {
        ResponderError::SentimentModelError(format!("unexpected response shape: {}", body))
    })?;

    let items = match outer.first() {
        Some(Value::Array(inner)) => inner,
        _ => outer,
    };

    let scores: Vec<LabelScore> = items
        .iter()
        .map(|item| serde_json::from_value(item.clone()))
        .collect::<std::result::Result<_, _>>()?;

    if scores.is_empty() {
        return Err(ResponderError::SentimentModelError(
            "endpoint returned no labels".to_string(),
        ));
    }

    Ok(scores)
}
