//! Keyword categories used to boost relevant stories.
//!
//! Categories are plain data: a name and a list of trigger terms. The
//! [`KeywordMatcher`] compiles each category into one case-insensitive regex
//! and counts how many *categories* a title hits, not how many terms.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A named bucket of trigger terms.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeywordCategory {
    pub name: String,
    pub terms: Vec<String>,
}

impl KeywordCategory {
    fn from_static(name: &str, terms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            terms: terms.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// The built-in category table.
pub static DEFAULT_CATEGORIES: Lazy<Vec<KeywordCategory>> = Lazy::new(|| {
    vec![
        KeywordCategory::from_static(
            "AI/ML",
            &[
                "ai",
                "artificial intelligence",
                "machine learning",
                "deep learning",
                "llm",
                "chatgpt",
                "openai",
                "gpt",
                "neural network",
                "robotics",
                "quantum",
                "breakthrough",
            ],
        ),
        KeywordCategory::from_static(
            "Big Tech",
            &["apple", "google", "microsoft", "meta", "amazon", "tesla", "nvidia"],
        ),
        KeywordCategory::from_static(
            "Startups & Funding",
            &[
                "startup",
                "funding",
                "raises",
                "raised",
                "series a",
                "seed round",
                "ipo",
                "acquisition",
                "launch",
                "launched",
                "launches",
                "release",
                "released",
                "innovation",
            ],
        ),
        KeywordCategory::from_static(
            "Security & Crypto",
            &[
                "security",
                "breach",
                "vulnerability",
                "exploit",
                "ransomware",
                "malware",
                "blockchain",
                "cryptocurrency",
                "crypto",
                "bitcoin",
            ],
        ),
    ]
});

#[derive(Debug, Clone)]
struct CompiledCategory {
    name: String,
    pattern: Regex,
}

/// Counts distinct keyword categories in a story title.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    categories: Vec<CompiledCategory>,
}

impl KeywordMatcher {
    /// Compile a category table.
    ///
    /// Terms match case-insensitively on word boundaries and tolerate a
    /// trailing plural `s`. A term that starts or ends in punctuation (`c++`,
    /// `.net`) needs a non-word character or the edge of the title on that
    /// side instead. Categories without terms never match.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined pattern exceeds the regex size limit.
    pub fn from_categories(categories: &[KeywordCategory]) -> Result<Self, regex::Error> {
        let mut compiled = Vec::with_capacity(categories.len());
        for category in categories {
            let terms: Vec<String> = category
                .terms
                .iter()
                .map(|t| t.trim())
                .filter(|t| !t.is_empty())
                .map(term_pattern)
                .collect();
            if terms.is_empty() {
                debug!(category = %category.name, "Skipping keyword category with no terms");
                continue;
            }
            let pattern = Regex::new(&format!(r"(?i)(?:{})", terms.join("|")))?;
            compiled.push(CompiledCategory {
                name: category.name.clone(),
                pattern,
            });
        }
        Ok(Self {
            categories: compiled,
        })
    }

    /// Number of distinct categories with at least one term in `title`.
    pub fn match_count(&self, title: &str) -> usize {
        self.categories
            .iter()
            .filter(|c| c.pattern.is_match(title))
            .count()
    }

    /// Names of the categories matched by `title`, in table order.
    pub fn matched_categories<'a>(&'a self, title: &str) -> Vec<&'a str> {
        self.categories
            .iter()
            .filter(|c| c.pattern.is_match(title))
            .map(|c| c.name.as_str())
            .collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Regex for one non-empty, trimmed term.
fn term_pattern(term: &str) -> String {
    let body = regex::escape(&term.to_lowercase()).replace(' ', r"\s+");
    let lead = match term.chars().next() {
        Some(c) if is_word_char(c) => r"\b",
        _ => r"(?:^|\W)",
    };
    let tail = match term.chars().last() {
        Some(c) if is_word_char(c) => r"s?\b",
        _ => r"(?:\W|$)",
    };
    format!("{lead}{body}{tail}")
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        // The built-in table only contains escaped literals.
        Self::from_categories(&DEFAULT_CATEGORIES).unwrap_or(Self {
            categories: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_four_categories() {
        assert_eq!(DEFAULT_CATEGORIES.len(), 4);
        assert_eq!(KeywordMatcher::default().categories.len(), 4);
    }

    #[test]
    fn test_case_insensitive() {
        let matcher = KeywordMatcher::default();
        assert_eq!(
            matcher.match_count("ChatGPT gets memory"),
            matcher.match_count("chatgpt gets memory")
        );
        assert_eq!(matcher.match_count("CHATGPT GETS MEMORY"), 1);
    }

    #[test]
    fn test_counts_categories_not_occurrences() {
        let matcher = KeywordMatcher::default();
        assert_eq!(matcher.match_count("Apple and Google settle lawsuit"), 1);
        assert_eq!(matcher.match_count("ChatGPT maker OpenAI hires"), 1);
    }

    #[test]
    fn test_multiple_categories() {
        let matcher = KeywordMatcher::default();
        let title = "Google patches security flaw in AI startup's product";
        assert_eq!(matcher.match_count(title), 4);
        assert_eq!(
            matcher.matched_categories(title),
            vec!["AI/ML", "Big Tech", "Startups & Funding", "Security & Crypto"]
        );
    }

    #[test]
    fn test_unmatched_text_yields_zero() {
        let matcher = KeywordMatcher::default();
        assert_eq!(matcher.match_count("Local bakery opens"), 0);
        assert_eq!(matcher.match_count(""), 0);
    }

    #[test]
    fn test_word_boundaries() {
        let matcher = KeywordMatcher::default();
        // "ai" must not fire inside ordinary words
        assert_eq!(matcher.match_count("He said the train was late"), 0);
        assert_eq!(matcher.match_count("Metadata formats compared"), 0);
        assert_eq!(matcher.match_count("Why AI agents fail"), 1);
    }

    #[test]
    fn test_plural_and_multi_word_terms() {
        let matcher = KeywordMatcher::default();
        assert_eq!(matcher.match_count("Startups are hiring again"), 1);
        assert_eq!(matcher.match_count("A primer on machine   learning"), 1);
    }

    #[test]
    fn test_custom_table() {
        let categories = vec![
            KeywordCategory {
                name: "Rust".to_string(),
                terms: vec!["rust".to_string(), "cargo".to_string()],
            },
            KeywordCategory {
                name: "Empty".to_string(),
                terms: vec![" ".to_string()],
            },
        ];
        let matcher = KeywordMatcher::from_categories(&categories).unwrap();
        assert_eq!(matcher.match_count("Cargo gets a new resolver"), 1);
        assert_eq!(matcher.match_count("Apple ships new chip"), 0);
    }

    #[test]
    fn test_terms_with_regex_metacharacters_are_literal() {
        let categories = vec![KeywordCategory {
            name: "Langs".to_string(),
            terms: vec!["c++".to_string()],
        }];
        let matcher = KeywordMatcher::from_categories(&categories).unwrap();
        assert_eq!(matcher.match_count("cpp is not c"), 0);
        assert_eq!(matcher.match_count("c and cpp compared"), 0);
    }

    #[test]
    fn test_terms_with_punctuation_edges() {
        let categories = vec![KeywordCategory {
            name: "Langs".to_string(),
            terms: vec!["c++".to_string(), ".net".to_string(), "c#".to_string()],
        }];
        let matcher = KeywordMatcher::from_categories(&categories).unwrap();
        assert_eq!(matcher.match_count("Why C++ is still fast"), 1);
        assert_eq!(matcher.match_count("Porting .NET apps"), 1);
        assert_eq!(matcher.match_count("C# 13 ships"), 1);
        assert_eq!(matcher.match_count("Notes on c++, briefly"), 1);
        assert_eq!(matcher.match_count("Learning C++"), 1);
        // the punctuation edge still needs a boundary
        assert_eq!(matcher.match_count("abc++ is a typo"), 0);
        assert_eq!(matcher.match_count("Porting x.net apps"), 0);
        assert_eq!(matcher.match_count("C#x is not a language"), 0);
    }

    #[test]
    fn test_inflected_release_terms() {
        let matcher = KeywordMatcher::default();
        assert_eq!(matcher.match_count("Rust 1.90 released"), 1);
        assert_eq!(matcher.match_count("SpaceX launched Starship"), 1);
        assert_eq!(matcher.match_count("Mozilla launches a new browser"), 1);
        // "ai" still does not fire on inflection-like words
        assert_eq!(matcher.match_count("Foreign aid increases"), 0);
    }
}
