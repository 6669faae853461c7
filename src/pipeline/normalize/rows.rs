//! Logical-line reconstruction: joining broken lines, collapsing column
//! whitespace and splitting side-by-side rows.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::AbnormalFlag;
use crate::pipeline::extraction::numeric::starts_with_number;
use crate::registry::units::is_unit_token;

static SLASH_SPACING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*/\s*").unwrap());

/// Labels longer than this are not considered when splitting rows.
const MAX_LABEL_TOKENS: usize = 5;

/// Join lines that an extractor broke apart:
/// a decimal split after its mark (`13.` / `5 g/dL`) is glued back, and a
/// label-only line followed by a line starting with a number is joined with
/// a space.
pub fn join_lines(lines: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(previous) = out.last_mut() {
            if ends_with_broken_decimal(previous) && starts_with_digit(&line) {
                previous.push_str(line.trim_start());
                continue;
            }
            if is_label_only(previous) && starts_with_number(&line) {
                previous.push(' ');
                previous.push_str(line.trim_start());
                continue;
            }
        }
        out.push(line);
    }
    out
}

fn ends_with_broken_decimal(line: &str) -> bool {
    let mut tail = line.trim_end().chars().rev();
    matches!(
        (tail.next(), tail.next()),
        (Some('.' | ','), Some(d)) if d.is_ascii_digit()
    )
}

fn starts_with_digit(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn is_label_only(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && !line.chars().any(|c| c.is_ascii_digit())
}

/// Tabs and pipes become spaces, spaces around `/` are removed
/// (`mg / dL` → `mg/dL`), runs of whitespace collapse to one space.
pub fn collapse_whitespace(line: &str) -> String {
    let spaced: String = line
        .chars()
        .map(|c| if c == '|' || c == '\t' { ' ' } else { c })
        .collect();
    let tightened = SLASH_SPACING.replace_all(&spaced, "/");
    tightened.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_number_token(token: &str) -> bool {
    token
        .trim_start_matches(['(', '[', '<', '>', '≤', '≥', ':', '='])
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}

fn starts_with_letter(token: &str) -> bool {
    token.chars().next().is_some_and(char::is_alphabetic)
}

fn is_flag_token(token: &str) -> bool {
    let bare = token.trim_matches(|c| matches!(c, '(' | ')' | '[' | ']'));
    AbnormalFlag::from_report_token(bare).is_some()
}

/// Split a collapsed line holding several rows side by side.
///
/// A split happens before a token that follows a completed value, starts
/// with a letter, is neither a unit nor a flag, and opens a label (up to the
/// next number) that `resolves` accepts.
pub fn split_rows<F>(line: &str, resolves: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    let tokens: Vec<&str> = line.split(' ').filter(|t| !t.is_empty()).collect();
    let mut rows = Vec::new();
    let mut segment_start = 0usize;
    let mut has_label = false;
    let mut value_seen = false;

    for i in 0..tokens.len() {
        let token = tokens[i];
        if is_number_token(token) {
            value_seen |= has_label;
            continue;
        }
        if !starts_with_letter(token) {
            continue;
        }
        if !value_seen {
            has_label = true;
            continue;
        }
        if is_unit_token(token) || is_flag_token(token) {
            continue;
        }
        let Some(value_at) = tokens[i..].iter().position(|t| is_number_token(t)) else {
            break;
        };
        if value_at > MAX_LABEL_TOKENS {
            continue;
        }
        let label = tokens[i..i + value_at].join(" ");
        if resolves(&label) {
            rows.push(tokens[segment_start..i].join(" "));
            segment_start = i;
            has_label = true;
            value_seen = false;
        }
    }
    rows.push(tokens[segment_start..].join(" "));
    rows.retain(|r| !r.is_empty());
    rows
}
