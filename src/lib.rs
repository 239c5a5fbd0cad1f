//! Customer Service Responder
//!
//! A rule-assisted customer service bot that:
//! - Normalizes incoming text (Turkish-aware casing)
//! - Recognizes intents with a TF-IDF pattern index and cosine similarity
//! - Estimates sentiment with a pretrained endpoint or a lexical fallback
//! - Picks a canned reply through an ordered set of fallback rules
//!
//! PIPELINE:
//! INPUT → NORMALIZE → MATCH INTENT → ESTIMATE SENTIMENT → SELECT RESPONSE

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod nlp;
pub mod responder;
pub mod responses;
pub mod sentiment;

pub use error::Result;

// Re-export common types
pub use config::BotConfig;
pub use models::*;
pub use responder::{BotContext, ConversationResponder};
