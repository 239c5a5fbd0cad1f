//! Intent recognition
//!
//! Normalizer, TF-IDF pattern index, and nearest-pattern matcher.

pub mod index;
pub mod matcher;
pub mod normalizer;

pub use index::{PatternIndex, VectorizerSettings};
pub use matcher::{match_intent, IntentMatch, IntentMatcher};
pub use normalizer::{normalize, CaseRules, TextNormalizer};
