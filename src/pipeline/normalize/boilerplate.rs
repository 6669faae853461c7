//! Repeated header/footer removal across pages.

use std::collections::{HashMap, HashSet};

/// Lower-cased line with every digit run masked as `#`, whitespace collapsed.
/// "Page 2 of 5" and "Page 3 of 5" share the key "page # of #".
pub fn pattern_key(line: &str) -> String {
    let mut key = String::with_capacity(line.len());
    let mut in_digits = false;
    for c in line.trim().chars().flat_map(char::to_lowercase) {
        if c.is_ascii_digit() {
            if !in_digits {
                key.push('#');
            }
            in_digits = true;
            continue;
        }
        in_digits = false;
        if c.is_whitespace() {
            if !key.ends_with(' ') {
                key.push(' ');
            }
        } else {
            key.push(c);
        }
    }
    key
}

fn in_zone(index: usize, len: usize, zone: usize) -> bool {
    index < zone || index + zone >= len
}

/// Drop head/tail lines whose pattern key repeats on at least `min_pages`
/// pages. `is_protected` keeps lines that must survive even when repeated
/// (a result row printed at the top of every page is still a result).
/// Returns the remaining pages and the number of lines removed.
pub fn strip_boilerplate<F>(
    pages: Vec<Vec<String>>,
    zone: usize,
    min_pages: usize,
    is_protected: F,
) -> (Vec<Vec<String>>, usize)
where
    F: Fn(&str) -> bool,
{
    if pages.len() < min_pages.max(2) || zone == 0 {
        return (pages, 0);
    }

    let mut page_counts: HashMap<String, usize> = HashMap::new();
    for page in &pages {
        let keys: HashSet<String> = page
            .iter()
            .enumerate()
            .filter(|(i, _)| in_zone(*i, page.len(), zone))
            .map(|(_, line)| pattern_key(line))
            .collect();
        for key in keys {
            *page_counts.entry(key).or_default() += 1;
        }
    }

    let repeated: HashSet<&str> = page_counts
        .iter()
        .filter(|(_, count)| **count >= min_pages)
        .map(|(key, _)| key.as_str())
        .collect();
    if repeated.is_empty() {
        return (pages, 0);
    }

    let mut removed = 0usize;
    let stripped = pages
        .iter()
        .map(|page| {
            let len = page.len();
            page.iter()
                .enumerate()
                .filter(|(i, line)| {
                    let drop = in_zone(*i, len, zone)
                        && repeated.contains(pattern_key(line).as_str())
                        && !is_protected(line);
                    if drop {
                        removed += 1;
                    }
                    !drop
                })
                .map(|(_, line)| line.clone())
                .collect()
        })
        .collect();
    (stripped, removed)
}
