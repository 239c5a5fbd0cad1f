//! Pattern index: TF-IDF vectors for every labeled example phrase.
//!
//! Terms are unigrams and bigrams over whitespace tokens of the normalized
//! pattern. IDF is smoothed (`ln((1 + n) / (1 + df)) + 1`) and every row is
//! L2-normalized, so cosine similarity reduces to a dot product.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use tracing::{info, warn};

use crate::error::ResponderError;
use crate::models::IntentRecord;
use crate::nlp::normalizer::TextNormalizer;
use crate::Result;

/// Vectorizer limits applied while building the vocabulary.
#[derive(Debug, Clone, Copy)]
pub struct VectorizerSettings {
    pub max_features: usize,
    /// Inclusive n-gram range over whitespace tokens.
    pub ngram_range: (usize, usize),
    /// Minimum number of patterns a term must appear in.
    pub min_df: usize,
    /// Maximum fraction of patterns a term may appear in.
    pub max_df: f32,
}

impl Default for VectorizerSettings {
    fn default() -> Self {
        Self {
            max_features: 1000,
            ngram_range: (1, 2),
            min_df: 1,
            max_df: 0.95,
        }
    }
}

/// Sparse, L2-normalized vector sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f32)>,
}

impl SparseVector {
    fn from_weights(weights: BTreeMap<usize, f32>) -> Self {
        let norm = weights.values().map(|w| w * w).sum::<f32>().sqrt();
        if norm == 0.0 {
            return Self::default();
        }

        Self {
            entries: weights.into_iter().map(|(id, w)| (id, w / norm)).collect(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Dot product of two sorted sparse vectors.
    pub fn dot(&self, other: &SparseVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;

        while i < self.entries.len() && j < other.entries.len() {
            let (a_id, a_w) = self.entries[i];
            let (b_id, b_w) = other.entries[j];
            match a_id.cmp(&b_id) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }

        sum
    }
}

/// Fitted vector space plus the row matrix and the owning tag per row.
#[derive(Debug, Clone)]
pub struct TfIdfIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    ngram_range: (usize, usize),
    rows: Vec<SparseVector>,
    tags: Vec<String>,
    patterns: Vec<String>,
    fingerprint: String,
}

/// Built once from the intent records, read-only afterwards.
#[derive(Debug, Clone)]
pub enum PatternIndex {
    /// No usable pattern survived; every query is unknown.
    Empty,
    Built(TfIdfIndex),
}

impl PatternIndex {
    /// Build with the default vectorizer settings.
    pub fn build(records: &[IntentRecord], normalizer: &TextNormalizer) -> Self {
        Self::build_with(records, normalizer, VectorizerSettings::default())
    }

    pub fn build_with(
        records: &[IntentRecord],
        normalizer: &TextNormalizer,
        settings: VectorizerSettings,
    ) -> Self {
        let mut patterns = Vec::new();
        let mut tags = Vec::new();

        for record in records {
            for pattern in &record.patterns {
                let cleaned = normalizer.normalize(pattern);
                if !cleaned.is_empty() {
                    patterns.push(cleaned);
                    tags.push(record.tag.clone());
                }
            }
        }

        if patterns.is_empty() {
            warn!("No usable patterns, intent recognition disabled");
            return PatternIndex::Empty;
        }

        match TfIdfIndex::fit(patterns, tags, settings) {
            Ok(index) => {
                info!(
                    "Pattern index built: {} patterns, {} terms",
                    index.len(),
                    index.vocabulary_size()
                );
                PatternIndex::Built(index)
            }
            Err(e) => {
                warn!("Pattern index not built: {}", e);
                PatternIndex::Empty
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PatternIndex::Empty)
    }

    pub fn len(&self) -> usize {
        match self {
            PatternIndex::Empty => 0,
            PatternIndex::Built(index) => index.len(),
        }
    }

    pub fn fingerprint(&self) -> Option<&str> {
        match self {
            PatternIndex::Empty => None,
            PatternIndex::Built(index) => Some(index.fingerprint()),
        }
    }
}

impl TfIdfIndex {
    fn fit(
        patterns: Vec<String>,
        tags: Vec<String>,
        settings: VectorizerSettings,
    ) -> Result<Self> {
        let n_documents = patterns.len();
        let ngram_range = settings.ngram_range;

        let term_counts: Vec<HashMap<String, u32>> = patterns
            .iter()
            .map(|pattern| count_terms(pattern, ngram_range))
            .collect();

        let mut document_frequency: HashMap<&str, usize> = HashMap::new();
        let mut corpus_frequency: HashMap<&str, u32> = HashMap::new();
        for counts in &term_counts {
            for (term, count) in counts {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
                *corpus_frequency.entry(term.as_str()).or_insert(0) += count;
            }
        }

        let max_doc_count = settings.max_df * n_documents as f32;
        let mut kept: Vec<&str> = document_frequency
            .iter()
            .filter(|&(_, &df)| df >= settings.min_df && df as f32 <= max_doc_count)
            .map(|(term, _)| *term)
            .collect();

        if kept.is_empty() {
            return Err(ResponderError::IndexError(
                "no terms remain after document-frequency pruning".to_string(),
            ));
        }

        if kept.len() > settings.max_features {
            kept.sort_by(|a, b| corpus_frequency[b].cmp(&corpus_frequency[a]).then(a.cmp(b)));
            kept.truncate(settings.max_features);
        }
        kept.sort_unstable();

        let vocabulary: HashMap<String, usize> = kept
            .iter()
            .enumerate()
            .map(|(id, term)| (term.to_string(), id))
            .collect();

        let n = n_documents as f32;
        let idf: Vec<f32> = kept
            .iter()
            .map(|term| ((1.0 + n) / (1.0 + document_frequency[term] as f32)).ln() + 1.0)
            .collect();

        let fingerprint = fingerprint(&patterns, &tags);

        let mut index = Self {
            vocabulary,
            idf,
            ngram_range,
            rows: Vec::with_capacity(n_documents),
            tags,
            patterns,
            fingerprint,
        };

        index.rows = term_counts.iter().map(|counts| index.weigh(counts)).collect();

        Ok(index)
    }

    /// Project normalized text into the fitted space. Unseen terms are ignored.
    pub fn transform(&self, normalized: &str) -> SparseVector {
        self.weigh(&count_terms(normalized, self.ngram_range))
    }

    fn weigh(&self, counts: &HashMap<String, u32>) -> SparseVector {
        let weights: BTreeMap<usize, f32> = counts
            .iter()
            .filter_map(|(term, &count)| {
                self.vocabulary
                    .get(term)
                    .map(|&id| (id, count as f32 * self.idf[id]))
            })
            .collect();

        SparseVector::from_weights(weights)
    }

    /// Cosine similarity of `query` against every row, in row order.
    pub fn similarities(&self, query: &SparseVector) -> Result<Vec<f32>> {
        self.rows
            .iter()
            .map(|row| {
                let score = row.dot(query);
                if score.is_finite() {
                    Ok(score.clamp(0.0, 1.0))
                } else {
                    Err(ResponderError::IndexError(format!(
                        "non-finite similarity ({})",
                        score
                    )))
                }
            })
            .collect()
    }

    /// Highest-scoring row; the earliest row wins ties.
    pub fn best_match(&self, normalized: &str) -> Result<Option<(usize, f32)>> {
        let query = self.transform(normalized);
        let scores = self.similarities(&query)?;

        let mut best: Option<(usize, f32)> = None;
        for (row, score) in scores.into_iter().enumerate() {
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((row, score)),
            }
        }

        Ok(best)
    }

    pub fn tag(&self, row: usize) -> Option<&str> {
        self.tags.get(row).map(String::as_str)
    }

    pub fn pattern(&self, row: usize) -> Option<&str> {
        self.patterns.get(row).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Term counts for n-grams in `ngram_range` over whitespace tokens.
fn count_terms(text: &str, ngram_range: (usize, usize)) -> HashMap<String, u32> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let (min_n, max_n) = ngram_range;
    let mut counts = HashMap::new();

    for n in min_n.max(1)..=max_n {
        for gram in tokens.windows(n) {
            *counts.entry(gram.join(" ")).or_insert(0) += 1;
        }
    }

    counts
}

fn fingerprint(patterns: &[String], tags: &[String]) -> String {
    let mut hasher = Sha256::new();
    for (pattern, tag) in patterns.iter().zip(tags) {
        hasher.update(tag.as_bytes());
        hasher.update(b"\t");
        hasher.update(pattern.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records() -> Vec<IntentRecord> {
        vec![
            IntentRecord::new("greeting", &["merhaba", "selam", "iyi günler"], &[]),
            IntentRecord::new("order_status", &["siparişim nerede", "kargo takibi"], &[]),
            IntentRecord::new("refund", &["iade etmek istiyorum", "para iadesi"], &[]),
        ]
    }

    fn built(index: &PatternIndex) -> &TfIdfIndex {
        match index {
            PatternIndex::Built(index) => index,
            PatternIndex::Empty => panic!("expected a built index"),
        }
    }

    #[test]
    fn test_count_terms_unigrams_and_bigrams() {
        let counts = count_terms("iade etmek istiyorum", (1, 2));
        assert_eq!(counts.len(), 5);
        assert_eq!(counts["iade etmek"], 1);
        assert_eq!(counts["istiyorum"], 1);
    }

    #[test]
    fn test_build_skips_empty_patterns() {
        let records = vec![
            IntentRecord::new("noise", &["!!!", "   "], &[]),
            IntentRecord::new("greeting", &["merhaba", "selam"], &[]),
        ];
        let index = PatternIndex::build(&records, &TextNormalizer::turkish());

        assert_eq!(index.len(), 2);
        assert_eq!(built(&index).tag(0), Some("greeting"));
    }

    #[test]
    fn test_no_usable_patterns_is_empty() {
        let records = vec![IntentRecord::new("noise", &["???"], &[])];
        let index = PatternIndex::build(&records, &TextNormalizer::turkish());
        assert!(index.is_empty());
        assert!(index.fingerprint().is_none());

        assert!(PatternIndex::build(&[], &TextNormalizer::turkish()).is_empty());
    }

    #[test]
    fn test_single_pattern_prunes_to_empty() {
        // Every term appears in 100% of patterns, above the 95% ceiling.
        let records = vec![IntentRecord::new("greeting", &["merhaba"], &[])];
        assert!(PatternIndex::build(&records, &TextNormalizer::turkish()).is_empty());
    }

    #[test]
    fn test_max_features_caps_vocabulary() {
        let settings = VectorizerSettings {
            max_features: 3,
            ..VectorizerSettings::default()
        };
        let index = PatternIndex::build_with(&sample_records(), &TextNormalizer::turkish(), settings);
        assert_eq!(built(&index).vocabulary_size(), 3);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let index = PatternIndex::build(&sample_records(), &TextNormalizer::turkish());
        let index = built(&index);

        for row in 0..index.len() {
            let vector = index.transform(index.pattern(row).unwrap());
            let norm = vector.dot(&vector);
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_out_of_vocabulary_query_is_zero() {
        let index = PatternIndex::build(&sample_records(), &TextNormalizer::turkish());
        let index = built(&index);

        let query = index.transform("xyzabc123");
        assert!(query.is_zero());

        let (_, score) = index.best_match("xyzabc123").unwrap().unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_best_match_ties_pick_first_row() {
        let records = vec![
            IntentRecord::new("first", &["ortak kelime"], &[]),
            IntentRecord::new("second", &["ortak kelime"], &[]),
            IntentRecord::new("other", &["başka bir şey"], &[]),
        ];
        let index = PatternIndex::build(&records, &TextNormalizer::turkish());
        let index = built(&index);

        let (row, _) = index.best_match("ortak kelime").unwrap().unwrap();
        assert_eq!(index.tag(row), Some("first"));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let normalizer = TextNormalizer::turkish();
        let a = PatternIndex::build(&sample_records(), &normalizer);
        let b = PatternIndex::build(&sample_records(), &normalizer);
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut records = sample_records();
        records[0].patterns.push("günaydın".to_string());
        let c = PatternIndex::build(&records, &normalizer);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }
}
