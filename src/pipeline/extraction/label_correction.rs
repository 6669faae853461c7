//! Post-OCR label correction against the registry's alias table.
//!
//! Only accepts a correction when confidence is high: the label is at least 5
//! characters, the edit distance is at most 2 and the closest alias is
//! unique (ties between aliases of the same test are not ambiguous).

use crate::models::LabelCorrection;
use crate::registry::alias::normalize_label;
use crate::registry::BenchmarkRegistry;

pub const MIN_LABEL_CHARS: usize = 5;
pub const MAX_EDIT_DISTANCE: u32 = 2;

/// Try to map an unresolved label onto a known alias.
pub fn correct_label(raw_label: &str, registry: &BenchmarkRegistry) -> Option<LabelCorrection> {
    let label = normalize_label(raw_label);
    let label_len = label.chars().count();
    if label_len < MIN_LABEL_CHARS {
        return None;
    }

    let mut best: Option<(&str, &str)> = None;
    let mut best_distance = MAX_EDIT_DISTANCE + 1;
    let mut ambiguous = false;

    for (alias, test_id) in registry.alias_keys() {
        let len_diff = (label_len as i64 - alias.chars().count() as i64).unsigned_abs();
        if len_diff > u64::from(MAX_EDIT_DISTANCE) {
            continue;
        }

        let dist = edit_distance(&label, alias);
        if dist < best_distance {
            best_distance = dist;
            best = Some((alias, test_id));
            ambiguous = false;
        } else if dist == best_distance && best.is_some_and(|(_, id)| id != test_id) {
            ambiguous = true;
        }
    }

    // Distance 0 means the label already resolves; nothing to correct.
    if ambiguous || best_distance == 0 {
        return None;
    }
    best.map(|(alias, test_id)| LabelCorrection {
        raw_label: raw_label.to_string(),
        corrected_to: alias.to_string(),
        test_id: test_id.to_string(),
        distance: best_distance,
    })
}

/// Compute Levenshtein edit distance between two strings.
fn edit_distance(a: &str, b: &str) -> u32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n as u32;
    }
    if n == 0 {
        return m as u32;
    }

    let mut prev: Vec<u32> = (0..=n as u32).collect();
    let mut curr = vec![0u32; n + 1];

    for (i, &a_ch) in a_chars.iter().enumerate() {
        curr[0] = (i + 1) as u32;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = u32::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}
