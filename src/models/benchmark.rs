use std::collections::BTreeSet;

use serde::Serialize;

use super::enums::{Direction, RiskDomain};

/// Reference data for one test, owned by the benchmark registry.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkEntry {
    pub test_id: String,
    pub display_name: String,
    /// Empty for unitless tests (ratios, qualitative results).
    pub canonical_unit: String,
    pub low_bound: Option<f64>,
    pub high_bound: Option<f64>,
    pub risk_domains: BTreeSet<RiskDomain>,
    pub critical_low: Option<f64>,
    pub critical_high: Option<f64>,
    pub unit_family: Option<String>,
    pub qualitative: Option<QualitativeTable>,
}

/// Keyword → direction mapping for tests reported as text ("Reactive", "Trace").
#[derive(Debug, Clone, Default, Serialize)]
pub struct QualitativeTable {
    /// Lowercase keywords, longest first so "non-reactive" wins over "reactive".
    keywords: Vec<(String, Direction)>,
}

impl QualitativeTable {
    pub fn new<I>(keywords: I) -> Self
    where
        I: IntoIterator<Item = (String, Direction)>,
    {
        let mut keywords: Vec<(String, Direction)> = keywords
            .into_iter()
            .map(|(k, d)| (k.trim().to_lowercase(), d))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        keywords.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        keywords.dedup_by(|a, b| a.0 == b.0);
        Self { keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|(k, _)| k.as_str())
    }

    /// Find the first keyword present in `text` as a whole word.
    /// Returns the keyword and the direction it maps to.
    pub fn match_keyword(&self, text: &str) -> Option<(&str, Direction)> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .find(|(k, _)| contains_word(&lower, k))
            .map(|(k, d)| (k.as_str(), *d))
    }
}

/// Whole-word containment: the match must not be glued to letters or to a
/// hyphenated prefix ("non-reactive" must not count as "reactive").
fn contains_word(haystack: &str, needle: &str) -> bool {
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let before_ok = haystack[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric() && c != '-');
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        start = end;
    }
    false
}

impl BenchmarkEntry {
    pub fn is_qualitative(&self) -> bool {
        self.low_bound.is_none() && self.high_bound.is_none()
    }

    pub fn is_unitless(&self) -> bool {
        self.canonical_unit.is_empty()
    }

    pub fn has_domain(&self, domain: RiskDomain) -> bool {
        self.risk_domains.contains(&domain)
    }
}
