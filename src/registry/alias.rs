//! Label normalization for alias lookup.
//!
//! Resolution is a plain table lookup over a short, deterministic list of
//! label variants. Nothing fuzzy happens here; OCR correction lives in the
//! extraction stage and is opt-in.

const SPECIMEN_PREFIXES: &[&str] = &["serum ", "s. ", "s.", "plasma ", "blood "];

/// Characters trimmed from both ends of a label. Parentheses are kept so
/// `glucose (fasting)` survives intact.
fn is_edge_punctuation(c: char) -> bool {
    matches!(
        c,
        ':' | ';' | ',' | '.' | '-' | '=' | '*' | '#' | '|' | '_' | '\u{2013}' | '\u{2014}'
    )
}

/// Lower-case, collapse whitespace, trim edge punctuation, fold `μ` to `µ`.
pub fn normalize_label(raw: &str) -> String {
    let lowered = raw.replace('μ', "µ").to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| is_edge_punctuation(c) || c.is_whitespace())
        .to_string()
}

/// Ordered, deduplicated lookup variants of a label.
///
/// 1. the normalized label
/// 2. parentheses removed, content kept: `glucose (fasting)` → `glucose fasting`
/// 3. parenthetical dropped: `sgot (ast)` → `sgot`
/// 4. each of the above with a leading specimen prefix dropped
pub fn label_variants(raw: &str) -> Vec<String> {
    let base = normalize_label(raw);
    if base.is_empty() {
        return Vec::new();
    }

    let mut variants = vec![base.clone()];
    if base.contains(['(', ')']) {
        push_unique(&mut variants, normalize_label(&base.replace(['(', ')'], " ")));
        push_unique(&mut variants, normalize_label(&drop_parentheticals(&base)));
    }

    let unprefixed: Vec<String> = variants
        .iter()
        .filter_map(|v| strip_specimen_prefix(v))
        .collect();
    for v in unprefixed {
        push_unique(&mut variants, v);
    }
    variants
}

fn push_unique(variants: &mut Vec<String>, candidate: String) {
    if !candidate.is_empty() && !variants.contains(&candidate) {
        variants.push(candidate);
    }
}

/// Remove every `( … )` group. An unclosed `(` drops the rest of the label.
fn drop_parentheticals(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut depth = 0usize;
    for c in label.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

fn strip_specimen_prefix(label: &str) -> Option<String> {
    SPECIMEN_PREFIXES.iter().find_map(|prefix| {
        label
            .strip_prefix(prefix)
            .map(normalize_label)
            .filter(|rest| !rest.is_empty())
    })
}
