//! Single-line row parsing: `<label> <value> [unit] [flag] [range] [flag]`.

use super::numeric::{first_value_token, parse_inline_range, value_token_after, NumberToken};
use super::types::InlineRange;
use crate::models::AbnormalFlag;
use crate::pipeline_config::NumberLocale;
use crate::registry::units::is_unit_token;

/// A line split into its row parts. Borrowed from the line where possible.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow<'a> {
    pub label: &'a str,
    pub value: &'a str,
    /// Byte offset of the value within the line.
    pub value_start: usize,
    pub unit: String,
    pub inline_range: Option<InlineRange>,
    pub report_flag: Option<AbnormalFlag>,
}

const LABEL_TRAILERS: &[char] = &[':', '=', '(', '[', '<', '>', '≤', '≥', '-', '–', '.', ','];

/// Split a line into label and value. `None` when there is no numeric token
/// or the text before it is not a label (see [`is_label`]).
pub fn parse_row(line: &str, locale: NumberLocale) -> Option<ParsedRow<'_>> {
    let mut token = first_value_token(line)?;
    if opens_label(line, &token) {
        token = value_token_after(line, token.end)?;
    }
    let label = line[..token.start]
        .trim_end_matches(|c: char| c.is_whitespace() || LABEL_TRAILERS.contains(&c))
        .trim();
    if !is_label(label) {
        return None;
    }

    let rest = &line[token.end..];
    let (unit, consumed, leading_flag) = take_unit(rest);
    let tail = &rest[consumed..];

    Some(ParsedRow {
        label,
        value: token.text,
        value_start: token.start,
        unit,
        inline_range: parse_inline_range(tail, locale),
        report_flag: leading_flag.or_else(|| find_flag(tail)),
    })
}

/// A leading integer that names the test rather than reporting it:
/// `25 OH Vitamin D`, `25(OH)D`, `2 hr PP Glucose`.
fn opens_label(line: &str, token: &NumberToken<'_>) -> bool {
    let leading = line[..token.start].trim().is_empty();
    if !leading || !token.text.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let Some(word) = line[token.end..].split_whitespace().next() else {
        return false;
    };
    word.trim_start_matches('(')
        .chars()
        .next()
        .is_some_and(char::is_alphabetic)
        && !is_unit_token(word)
}

/// Starts with a letter, or with a number that belongs to the name: glued
/// to letters (`25-Hydroxy`, `25(OH)D`) or followed by a word (`25 OH`).
fn is_label(label: &str) -> bool {
    let mut words = label.split_whitespace();
    let Some(first) = words.next() else {
        return false;
    };
    match first.chars().next() {
        Some(c) if c.is_alphabetic() => true,
        Some(c) if c.is_ascii_digit() => {
            first.chars().any(char::is_alphabetic)
                || words
                    .next()
                    .is_some_and(|w| w.chars().next().is_some_and(char::is_alphabetic))
        }
        _ => false,
    }
}

/// Read the unit right after the value. A flag may sit between the value and
/// the unit (`130 H mg/dL`). A following `/…` token is joined (`mg /dL`).
/// Returns the unit, the bytes of `rest` consumed and any flag seen on the way.
fn take_unit(rest: &str) -> (String, usize, Option<AbnormalFlag>) {
    let mut flag = None;
    let mut cursor = 0usize;

    for _ in 0..2 {
        let Some((start, end)) = next_token(rest, cursor) else {
            break;
        };
        let token = &rest[start..end];
        let bare = strip_brackets(token);

        if flag.is_none() {
            if let Some(f) = AbnormalFlag::from_report_token(bare) {
                flag = Some(f);
                cursor = end;
                continue;
            }
        }
        if !is_unit_token(token) {
            break;
        }

        let mut unit = bare.to_string();
        let mut consumed = end;
        if let Some((next_start, next_end)) = next_token(rest, end) {
            let next = &rest[next_start..next_end];
            if next.starts_with('/') && next.len() > 1 {
                unit.push_str(strip_brackets(next));
                consumed = next_end;
            }
        }
        return (unit, consumed, flag);
    }
    (String::new(), cursor, flag)
}

/// Byte span of the next whitespace-delimited token at or after `from`.
fn next_token(text: &str, from: usize) -> Option<(usize, usize)> {
    let offset = text[from..].find(|c: char| !c.is_whitespace())?;
    let start = from + offset;
    let end = text[start..]
        .find(char::is_whitespace)
        .map_or(text.len(), |i| start + i);
    Some((start, end))
}

fn strip_brackets(token: &str) -> &str {
    token.trim_matches(|c| matches!(c, '(' | ')' | '[' | ']' | ',' | ';'))
}

/// First flag token in the tail, trying two-word forms ("Critical High") first.
fn find_flag(tail: &str) -> Option<AbnormalFlag> {
    let tokens: Vec<&str> = tail.split_whitespace().map(strip_brackets).collect();
    for (i, token) in tokens.iter().enumerate() {
        if let Some(next) = tokens.get(i + 1) {
            let pair = format!("{token} {next}");
            if let Some(flag) = AbnormalFlag::from_report_token(&pair) {
                return Some(flag);
            }
        }
        if let Some(flag) = AbnormalFlag::from_report_token(token) {
            return Some(flag);
        }
    }
    None
}
