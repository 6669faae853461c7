//! Lines that are never test rows: metadata, headers, signatures.

use std::sync::LazyLock;

use regex::Regex;

/// Shorter lines cannot hold a label and a value.
pub const MIN_ROW_CHARS: usize = 4;

static NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^(?:
            page\s*\d+ |
            page\s+no\b |
            date\b | dated\b |
            (?:report|collection|sample|specimen|received|reported|registered)\s*(?:date|time|on)\b |
            sample\s*(?:id|no) | lab\s*(?:id|no) | barcode\b | accession\b | uhid\b | mrn\b |
            patient\b | name\s*: | mr\.|mrs\.|ms\. |
            age\b | sex\b | gender\b | dob\b | date\s+of\s+birth |
            referred | ref\.?\s*by | ref\.?\s*doctor | consultant\b |
            test\s*name | investigation\b | parameter\b |
            this\s+report | end\s+of\s+report | \*\*\s*end |
            dr\. | doctor\b | chief\b | pathologist\b | signature\b | authori[sz]ed\b |
            method\b | note\b | interpretation\b | comments?\b | remarks?\b |
            tel\b | phone\b | fax\b | email\b | www\. | https?://
        )",
    )
    .unwrap()
});

/// Column-header rows: "Test  Result  Unit  Reference Range".
static HEADER_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:result|value|observed)\b.*\b(?:unit|units)\b.*\b(?:range|interval|reference)\b")
        .unwrap()
});

pub fn is_noise_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.chars().count() < MIN_ROW_CHARS
        || trimmed.chars().all(|c| !c.is_alphanumeric())
        || NOISE.is_match(trimmed)
        || HEADER_ROW.is_match(trimmed)
}
