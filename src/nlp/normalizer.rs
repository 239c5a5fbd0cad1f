//! Text normalization shared by index construction and query time.

/// Casing rules applied before filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseRules {
    /// Dotted/dotless i: `I` → `ı`, `İ` → `i`.
    Turkish,
    /// Unicode lower-casing.
    Standard,
}

#[derive(Debug, Clone, Copy)]
pub struct TextNormalizer {
    rules: CaseRules,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::turkish()
    }
}

impl TextNormalizer {
    pub fn new(rules: CaseRules) -> Self {
        Self { rules }
    }

    pub fn turkish() -> Self {
        Self::new(CaseRules::Turkish)
    }

    /// Pick casing rules from an ISO 639-1 language code.
    pub fn for_language(code: &str) -> Self {
        match code.trim().to_lowercase().as_str() {
            "tr" | "az" => Self::new(CaseRules::Turkish),
            _ => Self::new(CaseRules::Standard),
        }
    }

    pub fn rules(&self) -> CaseRules {
        self.rules
    }

    /// Lower-case, drop everything except letters, digits and whitespace,
    /// then collapse whitespace runs to single spaces.
    pub fn normalize(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let mut lowered = String::with_capacity(raw.len());
        for c in raw.chars() {
            self.push_lowercase(c, &mut lowered);
        }

        let filtered: String = lowered
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect();

        filtered.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn push_lowercase(&self, c: char, out: &mut String) {
        match (self.rules, c) {
            (CaseRules::Turkish, 'I') => out.push('ı'),
            // Unicode maps İ to "i" + U+0307; keep the plain letter.
            (_, 'İ') => out.push('i'),
            _ => out.extend(c.to_lowercase()),
        }
    }
}

/// Normalize with the Turkish rules used by default.
pub fn normalize(raw: &str) -> String {
    TextNormalizer::turkish().normalize(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_cleanup() {
        assert_eq!(normalize("Merhaba! Nasılsın?"), "merhaba nasılsın");
        assert_eq!(normalize("Çok güzel!"), "çok güzel");
        assert_eq!(normalize("Merhaba    dünya"), "merhaba dünya");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("Test@#$%^&*()"), "test");
        assert_eq!(normalize("   \t\n  "), "");
    }

    #[test]
    fn test_turkish_letters_survive() {
        assert_eq!(normalize("ŞİKAYET ĞÜÖÇ"), "şikayet ğüöç");
        assert_eq!(normalize("IŞIK"), "ışık");
        assert_eq!(normalize("İade"), "iade");
    }

    #[test]
    fn test_standard_rules() {
        let normalizer = TextNormalizer::for_language("en");
        assert_eq!(normalizer.rules(), CaseRules::Standard);
        assert_eq!(normalizer.normalize("I WANT A Refund!"), "i want a refund");
        assert_eq!(normalizer.normalize("İstanbul"), "istanbul");
    }

    #[test]
    fn test_language_selection() {
        assert_eq!(TextNormalizer::for_language("TR").rules(), CaseRules::Turkish);
        assert_eq!(TextNormalizer::for_language("az").rules(), CaseRules::Turkish);
        assert_eq!(TextNormalizer::for_language("de").rules(), CaseRules::Standard);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Merhaba! Nasılsın?",
            "  SİPARİŞİM   nerede??? ",
            "Iğdır'dan 3 ürün",
            "mixed\tWHITE\nspace",
            "emoji 😀 ve ÇÖP",
            "",
        ];

        for normalizer in [TextNormalizer::turkish(), TextNormalizer::for_language("en")] {
            for input in inputs {
                let once = normalizer.normalize(input);
                assert_eq!(normalizer.normalize(&once), once, "input: {:?}", input);
            }
        }
    }
}
