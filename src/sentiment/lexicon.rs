//! Lexical polarity scoring
//!
//! Each known word carries a polarity in [-1, 1]. Intensifiers scale the
//! next polar word, negators flip it (or the word right before them, which
//! covers Turkish "memnun değilim"). The text polarity is the mean over
//! polar words.
//!
//! Turkish is agglutinative, so a token with no exact entry falls back to
//! the longest lexicon stem it starts with ("sinirliyim" → "sinirli").
//! A privative suffix after the stem ("sorunsuz") flips the stem's polarity.

use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

/// Weight applied to a negated word.
const NEGATION_FACTOR: f32 = -0.5;

/// Shortest stem, in characters, eligible for prefix matching.
const MIN_STEM_CHARS: usize = 4;

/// Turkish "-sız" suffix family ("without").
const PRIVATIVE_SUFFIXES: [&str; 4] = ["sız", "siz", "suz", "süz"];

lazy_static! {
    static ref POLARITY: HashMap<&'static str, f32> = {
        let entries: &[(&str, f32)] = &[
            // Turkish, positive
            ("güzel", 0.7), ("harika", 0.9), ("mükemmel", 1.0), ("muhteşem", 1.0),
            ("şahane", 0.9), ("süper", 0.8), ("iyi", 0.6), ("memnun", 0.7),
            ("memnunum", 0.8), ("mutlu", 0.8), ("mutluyum", 0.8), ("teşekkürler", 0.5),
            ("teşekkür", 0.5), ("sağol", 0.4), ("sağolun", 0.4), ("başarılı", 0.6),
            ("hızlı", 0.4), ("kaliteli", 0.6), ("seviyorum", 0.8), ("beğendim", 0.7),
            ("tebrikler", 0.6), ("kolay", 0.4), ("memnuniyet", 0.6),
            // Turkish, negative
            ("kötü", -0.7), ("berbat", -1.0), ("rezalet", -1.0), ("korkunç", -0.9),
            ("iğrenç", -0.9), ("saçma", -0.6), ("şikayet", -0.4), ("şikayetçiyim", -0.6),
            ("rahatsız", -0.5), ("rahatsızım", -0.6), ("sorun", -0.3), ("problem", -0.3),
            ("hata", -0.3), ("bozuk", -0.6), ("yavaş", -0.4), ("geç", -0.3),
            ("kızgın", -0.8), ("kızgınım", -0.8), ("sinirli", -0.7), ("üzgün", -0.6),
            ("üzgünüm", -0.6), ("çalışmıyor", -0.5), ("memnuniyetsiz", -0.7),
            ("pahalı", -0.3), ("maalesef", -0.3), ("nefret", -0.9),
            // English
            ("good", 0.7), ("great", 0.8), ("excellent", 1.0), ("love", 0.5),
            ("amazing", 0.6), ("wonderful", 1.0), ("happy", 0.8), ("awesome", 1.0),
            ("best", 1.0), ("thanks", 0.2), ("nice", 0.6), ("perfect", 1.0),
            ("bad", -0.7), ("terrible", -1.0), ("awful", -1.0), ("hate", -0.8),
            ("horrible", -1.0), ("worst", -1.0), ("sad", -0.5), ("angry", -0.5),
            ("disappointed", -0.75), ("poor", -0.4), ("broken", -0.4), ("slow", -0.3),
        ];
        entries.iter().copied().collect()
    };

    static ref INTENSIFIERS: HashMap<&'static str, f32> = {
        let entries: &[(&str, f32)] = &[
            ("çok", 1.3), ("gerçekten", 1.3), ("aşırı", 1.5), ("oldukça", 1.2),
            ("biraz", 0.6), ("very", 1.3), ("really", 1.2), ("extremely", 1.5),
            ("so", 1.3), ("slightly", 0.6),
        ];
        entries.iter().copied().collect()
    };

    static ref NEGATORS: HashSet<&'static str> = [
        "değil", "değilim", "değildi", "değiliz", "not", "never", "no",
        "dont", "doesnt", "didnt", "isnt", "wasnt",
    ]
    .into_iter()
    .collect();
}

/// Lexicon-based polarity scorer. Expects normalized text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalAnalyzer;

impl LexicalAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Polarity in [-1, 1]; 0 when no polar word is present.
    pub fn polarity(&self, normalized: &str) -> f32 {
        let mut scores: Vec<f32> = Vec::new();
        let mut modifier: Option<f32> = None;
        let mut negate_next = false;
        let mut previous_was_polar = false;

        for token in normalized.split_whitespace() {
            if let Some(&factor) = INTENSIFIERS.get(token) {
                modifier = Some(factor);
                previous_was_polar = false;
                continue;
            }

            if is_negator(token) {
                match scores.last_mut() {
                    Some(last) if previous_was_polar => *last *= NEGATION_FACTOR,
                    _ => negate_next = true,
                }
                previous_was_polar = false;
                continue;
            }

            match word_polarity(token) {
                Some(base) => {
                    let mut value = base * modifier.take().unwrap_or(1.0);
                    if negate_next {
                        value *= NEGATION_FACTOR;
                        negate_next = false;
                    }
                    scores.push(value.clamp(-1.0, 1.0));
                    previous_was_polar = true;
                }
                None => {
                    // Intensifiers only reach the word right after them.
                    modifier = None;
                    previous_was_polar = false;
                }
            }
        }

        if scores.is_empty() {
            return 0.0;
        }

        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        mean.clamp(-1.0, 1.0)
    }
}

/// Longest entry of at least `MIN_STEM_CHARS` characters that `token` starts with.
fn longest_stem<'a>(token: &str, entries: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    entries
        .filter(|stem| stem.chars().count() >= MIN_STEM_CHARS && token.starts_with(stem))
        .max_by_key(|stem| stem.len())
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(token) || longest_stem(token, NEGATORS.iter().copied()).is_some()
}

fn word_polarity(token: &str) -> Option<f32> {
    if let Some(&value) = POLARITY.get(token) {
        return Some(value);
    }

    let stem = longest_stem(token, POLARITY.keys().copied())?;
    let base = POLARITY[stem];
    let suffix = &token[stem.len()..];

    if PRIVATIVE_SUFFIXES.iter().any(|privative| suffix.starts_with(privative)) {
        Some(base * NEGATION_FACTOR)
    } else {
        Some(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polarity(text: &str) -> f32 {
        LexicalAnalyzer::new().polarity(text)
    }

    #[test]
    fn test_neutral_text() {
        assert_eq!(polarity("merhaba"), 0.0);
        assert_eq!(polarity("siparişim nerede"), 0.0);
        assert_eq!(polarity(""), 0.0);
    }

    #[test]
    fn test_polar_words() {
        assert!(polarity("harika bir ürün") > 0.5);
        assert_eq!(polarity("berbat hizmet"), -1.0);
        assert!(polarity("this is terrible") < -0.5);
    }

    #[test]
    fn test_intensifier_scales_next_word() {
        assert!(polarity("çok güzel") > polarity("güzel"));
        assert!(polarity("biraz yavaş") > polarity("yavaş"));
        assert_eq!(polarity("çok memnunum"), 1.0);
    }

    #[test]
    fn test_postfix_negation() {
        let negated = polarity("memnun değilim");
        assert!(negated < 0.0);
        assert!((negated - (-0.35)).abs() < 1e-6);
    }

    #[test]
    fn test_prefix_negation() {
        assert!(polarity("not good") < 0.0);
        assert!(polarity("not bad") > 0.0);
    }

    #[test]
    fn test_mean_over_polar_words() {
        let mixed = polarity("güzel ama pahalı");
        assert!((mixed - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_inflected_words_use_their_stem() {
        assert_eq!(polarity("sinirliyim"), polarity("sinirli"));
        assert_eq!(polarity("kötüydü"), polarity("kötü"));
        assert_eq!(polarity("berbattı"), -1.0);
        assert!(polarity("şikayetim var") < -0.3);
        assert!(polarity("harikaydı") > 0.5);
    }

    #[test]
    fn test_short_entries_need_exact_match() {
        // "iyi" and "geç" are below the stem length.
        assert_eq!(polarity("iyiyim"), 0.0);
        assert_eq!(polarity("geçen hafta"), 0.0);
    }

    #[test]
    fn test_privative_suffix_flips_stem() {
        assert!(polarity("sorunsuz") > 0.0);
        assert!(polarity("hatasız teslimat") > 0.0);
        assert!(polarity("sorunlu") < 0.0);
    }

    #[test]
    fn test_inflected_negators() {
        assert!((polarity("memnun değildi") - (-0.35)).abs() < 1e-6);
        assert!(polarity("güzel değilmiş") < 0.0);
    }

    #[test]
    fn test_intensifier_does_not_skip_words() {
        assert_eq!(polarity("çok sipariş verdim ama kötü"), polarity("kötü"));
        assert!(polarity("çok kötü") < polarity("kötü"));
    }
}
