//! Numeric tokens, decimal conventions and inline reference ranges.

use std::sync::LazyLock;

use regex::Regex;

use super::types::InlineRange;
use crate::pipeline_config::NumberLocale;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)*").unwrap());

/// `70 - 100`, `70–100`, `70 to 100`
static BOUNDED_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)*)\s*(?:-|–|—|to)\s*(\d+(?:[.,]\d+)*)").unwrap()
});

/// `< 200`, `≤ 5.6`, `up to 40`
static UPPER_LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:<=?|≤|\bup\s*to\b|\bbelow\b|\bless\s+than\b)\s*(\d+(?:[.,]\d+)*)").unwrap()
});

/// `> 40`, `≥ 90`
static LOWER_LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:>=?|≥|\babove\b|\bmore\s+than\b)\s*(\d+(?:[.,]\d+)*)").unwrap()
});

/// A number as it appears in a line, with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberToken<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

pub fn number_tokens(text: &str) -> impl Iterator<Item = NumberToken<'_>> {
    NUMBER.find_iter(text).map(|m| NumberToken {
        text: m.as_str(),
        start: m.start(),
        end: m.end(),
    })
}

/// True when the number at `start..end` begins a token of its own rather
/// than sitting inside a word (`B12`, `HbA1c`), a hyphenated name
/// (`25-Hydroxy`) or a worded parenthetical (`(2 hrs)`, `(25 OH)`).
pub fn starts_token(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let before_ok = before.map_or(true, |c| {
        c.is_whitespace() || matches!(c, ':' | '=' | '(' | '[' | '<' | '>' | '≤' | '≥')
    });
    if !before_ok {
        return false;
    }
    if before == Some('(') && parenthetical_has_words(&text[end..]) {
        return false;
    }
    let mut after = text[end..].chars();
    !matches!((after.next(), after.next()), (Some('-'), Some(c)) if c.is_alphabetic())
}

/// Letters before the closing `)`. `(70-100)` has none.
fn parenthetical_has_words(after: &str) -> bool {
    after
        .split(')')
        .next()
        .is_some_and(|inner| inner.chars().any(char::is_alphabetic))
}

/// First number in `text` that begins a token.
pub fn first_value_token(text: &str) -> Option<NumberToken<'_>> {
    value_token_after(text, 0)
}

/// First number at or after byte `from` that begins a token.
pub fn value_token_after(text: &str, from: usize) -> Option<NumberToken<'_>> {
    number_tokens(text).find(|t| t.start >= from && starts_token(text, t.start, t.end))
}

/// True when the line opens with a number (used for line joining).
pub fn starts_with_number(text: &str) -> bool {
    text.trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}

/// Parse a numeric token under the configured decimal convention.
pub fn parse_number(raw: &str, locale: NumberLocale) -> Option<f64> {
    let canonical = match locale {
        NumberLocale::Point => raw.replace(',', ""),
        NumberLocale::Comma => raw.replace('.', "").replace(',', "."),
        NumberLocale::Either => either_to_point(raw),
    };
    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn either_to_point(raw: &str) -> String {
    let commas = raw.matches(',').count();
    let points = raw.matches('.').count();
    match (commas, points) {
        (0, 0) => raw.to_string(),
        (0, 1) => raw.to_string(),
        (0, _) => raw.replace('.', ""),
        (1, 0) if groups_thousands(raw) => raw.replace(',', ""),
        (1, 0) => raw.replace(',', "."),
        (_, 0) => raw.replace(',', ""),
        _ => {
            // Both marks present: the last one is the decimal mark.
            let last_comma = raw.rfind(',');
            let last_point = raw.rfind('.');
            if last_comma > last_point {
                raw.replace('.', "").replace(',', ".")
            } else {
                raw.replace(',', "")
            }
        }
    }
}

/// `250,000` or `1,250`: a single comma, three-digit tail, non-zero integer part.
fn groups_thousands(raw: &str) -> bool {
    raw.split_once(',').is_some_and(|(int, frac)| {
        frac.len() == 3 && int.len() <= 3 && !int.trim_start_matches('0').is_empty()
    })
}

/// Parse an inline reference range from the text that follows the value.
/// A bounded range wins over one-sided limits.
pub fn parse_inline_range(text: &str, locale: NumberLocale) -> Option<InlineRange> {
    if let Some(caps) = BOUNDED_RANGE.captures(text) {
        let low = parse_number(&caps[1], locale)?;
        let high = parse_number(&caps[2], locale)?;
        if low <= high {
            return Some(InlineRange {
                low: Some(low),
                high: Some(high),
            });
        }
        return None;
    }
    if let Some(caps) = UPPER_LIMIT.captures(text) {
        return parse_number(&caps[1], locale).map(|high| InlineRange {
            low: None,
            high: Some(high),
        });
    }
    if let Some(caps) = LOWER_LIMIT.captures(text) {
        return parse_number(&caps[1], locale).map(|low| InlineRange {
            low: Some(low),
            high: None,
        });
    }
    None
}
