//! Intent dataset loading
//!
//! The dataset is a JSON document `{"intents": [{tag, patterns, responses}]}`.
//! Records are validated one by one; a bad record is dropped, a bad file
//! yields an empty dataset.

use serde_json::Value;
use std::path::Path;
use tracing::{error, info, warn};

use crate::error::ResponderError;
use crate::models::{IntentDataset, IntentRecord};
use crate::Result;

/// Load the dataset at `path`, recovering to an empty set on any failure.
pub fn load_intent_dataset(path: impl AsRef<Path>) -> IntentDataset {
    let path = path.as_ref();

    match try_load_intent_dataset(path) {
        Ok(dataset) => {
            info!("Intent data loaded: {} intents ({})", dataset.intents.len(), path.display());
            dataset
        }
        Err(e) => {
            error!("Intent data not loaded ({}): {}", path.display(), e);
            IntentDataset::default()
        }
    }
}

pub fn try_load_intent_dataset(path: &Path) -> Result<IntentDataset> {
    let content = std::fs::read_to_string(path)?;
    parse_intent_dataset(&content)
}

/// Parse and validate a dataset document.
pub fn parse_intent_dataset(content: &str) -> Result<IntentDataset> {
    let root: Value = serde_json::from_str(content)?;

    let entries = root
        .get("intents")
        .ok_or_else(|| ResponderError::DatasetError("missing 'intents' key".to_string()))?
        .as_array()
        .ok_or_else(|| ResponderError::DatasetError("'intents' is not a list".to_string()))?;

    let intents = entries.iter().filter_map(validate_record).collect();

    Ok(IntentDataset::new(intents))
}

fn validate_record(entry: &Value) -> Option<IntentRecord> {
    let tag = entry
        .get("tag")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();

    if tag.is_empty() {
        warn!("Dropping intent without tag");
        return None;
    }

    let Some(patterns) = string_list(entry.get("patterns")) else {
        warn!("Dropping intent '{}': patterns missing or malformed", tag);
        return None;
    };

    if patterns.is_empty() {
        warn!("Dropping intent '{}': no patterns", tag);
        return None;
    }

    let Some(responses) = string_list(entry.get("responses")) else {
        warn!("Dropping intent '{}': responses missing or malformed", tag);
        return None;
    };

    Some(IntentRecord {
        tag: tag.to_string(),
        patterns,
        responses,
    })
}

/// A JSON array of strings. Non-string items are skipped.
fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;

    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
    )
}
