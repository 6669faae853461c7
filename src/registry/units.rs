//! Unit symbol normalization and per-family conversion tables.
//!
//! Two spellings are the same unit when their normalized symbols are equal:
//! `µg/dL`, `ug/dl` and `mcg/dL` all normalize to `ug/dl`. Conversion between
//! different units only happens through a named family table from the
//! registry, each row giving the factor that maps a value in that unit to the
//! test's canonical unit.

use serde::Serialize;

/// Ordered rewrite rules applied after lowercasing and whitespace removal.
/// Longer spellings come before their prefixes ("million" before "mill").
const SYMBOL_REWRITES: &[(&str, &str)] = &[
    ("μ", "u"),
    ("µ", "u"),
    ("mcg", "ug"),
    ("mcl", "ul"),
    ("mcmol", "umol"),
    ("gms/", "g/"),
    ("gm/", "g/"),
    ("litre", "l"),
    ("liter", "l"),
    ("ltr", "l"),
    ("cumm", "ul"),
    ("mm³", "ul"),
    ("mm3", "ul"),
    ("¹²", "^12"),
    ("²", "2"),
    ("³", "^3"),
    ("⁶", "^6"),
    ("⁹", "^9"),
    ("x10", "10"),
    ("×10", "10"),
    ("*10", "10"),
    ("thousand", "10^3"),
    ("thou", "10^3"),
    ("million", "10^6"),
    ("mill", "10^6"),
    ("lakh", "10^5"),
    ("hour", "h"),
    ("hr", "h"),
];

/// Bare symbols accepted as a unit token even without `/`, `%` or `^`.
const KNOWN_UNIT_SYMBOLS: &[&str] = &[
    "g", "mg", "ug", "ng", "pg", "fl", "u", "iu", "miu", "meq", "mmol", "umol", "nmol",
    "pmol", "sec", "s", "mm", "mmhg", "cells", "copies", "ratio", "index",
];

/// Normalize a unit spelling to a comparable symbol.
///
/// Case-insensitive, whitespace-free, micro sign folded to `u`, common
/// synonyms rewritten. Returns an empty string for an empty unit.
pub fn normalize_unit_symbol(raw: &str) -> String {
    let mut symbol: String = raw
        .trim()
        .trim_matches(|c| matches!(c, '(' | ')' | '[' | ']' | ',' | ';'))
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    for (from, to) in SYMBOL_REWRITES {
        if symbol.contains(from) {
            symbol = symbol.replace(from, to);
        }
    }
    // A caret-less "103/ul" (lost superscript) is left alone.
    if let Some(rest) = symbol.strip_prefix("k/") {
        symbol = format!("10^3/{rest}");
    }
    symbol
}

/// Heuristic: does this token read as a unit rather than a word or a value?
pub fn is_unit_token(token: &str) -> bool {
    let trimmed = token.trim_matches(|c| matches!(c, '(' | ')' | '[' | ']' | ',' | ';'));
    if trimmed.is_empty() {
        return false;
    }
    let symbol = normalize_unit_symbol(trimmed);
    // Powers of ten: `10³/µL`, `10¹²/L`, `x10³`.
    if symbol.starts_with("10^")
        && trimmed.starts_with(|c: char| c.is_ascii_digit() || matches!(c, 'x' | 'X' | '×' | '*'))
    {
        return true;
    }
    // Values and ranges are never units.
    if trimmed.starts_with(|c: char| c.is_ascii_digit()) && !trimmed.contains('^') {
        return false;
    }
    if trimmed.contains(['/', '%', '^', 'µ', 'μ']) {
        return true;
    }
    KNOWN_UNIT_SYMBOLS.contains(&symbol.as_str())
}

/// One convertible unit within a family.
#[derive(Debug, Clone, Serialize)]
pub struct UnitConversion {
    /// Unit as written in the registry, for display.
    pub unit: String,
    /// Normalized symbol used for matching.
    pub symbol: String,
    /// Multiply a value in `unit` by this to obtain the canonical unit.
    pub factor: f64,
}

impl UnitConversion {
    pub fn new(unit: &str, factor: f64) -> Self {
        Self {
            unit: unit.to_string(),
            symbol: normalize_unit_symbol(unit),
            factor,
        }
    }

    pub fn to_canonical(&self, value: f64) -> f64 {
        value * self.factor
    }

    pub fn from_canonical(&self, value: f64) -> f64 {
        value / self.factor
    }
}

/// Named conversion table shared by related tests (e.g. all cholesterol fractions).
#[derive(Debug, Clone, Serialize)]
pub struct UnitFamily {
    pub name: String,
    pub conversions: Vec<UnitConversion>,
}

impl UnitFamily {
    /// Find the conversion row for a raw unit spelling.
    pub fn find(&self, raw_unit: &str) -> Option<&UnitConversion> {
        let symbol = normalize_unit_symbol(raw_unit);
        if symbol.is_empty() {
            return None;
        }
        self.conversions.iter().find(|c| c.symbol == symbol)
    }
}

/// True when two unit spellings denote the same unit.
pub fn same_unit(a: &str, b: &str) -> bool {
    normalize_unit_symbol(a) == normalize_unit_symbol(b)
}
