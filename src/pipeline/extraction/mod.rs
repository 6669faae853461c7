//! Value Extractor: normalized lines → resolved matches and extraction misses.

pub mod label_correction;
pub mod noise;
pub mod numeric;
pub mod row;
pub mod types;

pub use types::*;

use crate::models::{ExtractionMiss, LabelCorrection};
use crate::pipeline::normalize::{NormalizedLine, NormalizedText};
use crate::pipeline_config::PipelineConfig;
use crate::registry::alias::normalize_label;
use crate::registry::BenchmarkRegistry;

/// Everything the extractor found in one report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub matches: Vec<ResolvedMatch>,
    pub misses: Vec<ExtractionMiss>,
    pub corrections: Vec<LabelCorrection>,
}

/// Extract candidate rows from every non-noise line, in source order.
pub fn extract(
    text: &NormalizedText,
    registry: &BenchmarkRegistry,
    config: &PipelineConfig,
) -> Extraction {
    let mut out = Extraction::default();
    for line in &text.lines {
        if noise::is_noise_line(&line.text) {
            continue;
        }
        extract_line(line, registry, config, &mut out);
    }

    tracing::debug!(
        matches = out.matches.len(),
        misses = out.misses.len(),
        corrections = out.corrections.len(),
        "Extraction complete"
    );
    out
}

fn extract_line(
    line: &NormalizedLine,
    registry: &BenchmarkRegistry,
    config: &PipelineConfig,
    out: &mut Extraction,
) {
    let Some(parsed) = row::parse_row(&line.text, config.number_locale) else {
        // No label + number: only a qualitative keyword row can still match.
        if let Some(found) = qualitative_row(line, registry) {
            out.matches.push(found);
        }
        return;
    };

    let resolved = match registry.resolve_alias(parsed.label) {
        Some(test_id) => Some(test_id.to_string()),
        None if config.ocr_label_correction => {
            label_correction::correct_label(parsed.label, registry).map(|fix| {
                tracing::debug!(
                    raw_label = %fix.raw_label,
                    corrected_to = %fix.corrected_to,
                    distance = fix.distance,
                    "Label corrected"
                );
                let test_id = fix.test_id.clone();
                out.corrections.push(fix);
                test_id
            })
        }
        None => None,
    };

    let Some(test_id) = resolved else {
        tracing::debug!(line = line.line_number, label = parsed.label, "Unresolved label");
        out.misses.push(ExtractionMiss {
            line_number: line.line_number,
            source_offset: line.offset,
            raw_label: parsed.label.to_string(),
            line: line.text.clone(),
        });
        return;
    };

    // A qualitative test that also prints an index value: the keyword decides.
    if let Some(table) = registry
        .lookup(&test_id)
        .and_then(|entry| entry.qualitative.as_ref())
    {
        let remainder = &line.text[parsed.value_start..];
        if table.match_keyword(remainder).is_some() {
            out.matches.push(ResolvedMatch {
                test_id,
                raw: keyword_match(line, parsed.label, remainder),
            });
            return;
        }
    }

    out.matches.push(ResolvedMatch {
        test_id,
        raw: RawMatch {
            raw_test_label: parsed.label.to_string(),
            raw_value: parsed.value.to_string(),
            raw_unit: parsed.unit,
            source_offset: line.offset,
            line_number: line.line_number,
            inline_range: parsed.inline_range,
            report_flag: parsed.report_flag,
            qualitative: false,
        },
    });
}

/// Longest leading word span that resolves to a qualitative test whose
/// keyword table matches the rest of the line.
fn qualitative_row(line: &NormalizedLine, registry: &BenchmarkRegistry) -> Option<ResolvedMatch> {
    let words: Vec<(usize, &str)> = word_spans(&line.text);
    for split in (1..words.len()).rev() {
        let rest_start = words[split].0;
        let label = line.text[..rest_start].trim_end();
        let Some(entry) = registry.resolve(label) else {
            continue;
        };
        let Some(table) = entry.qualitative.as_ref() else {
            continue;
        };
        let remainder = &line.text[rest_start..];
        if table.match_keyword(remainder).is_some() {
            return Some(ResolvedMatch {
                test_id: entry.test_id.clone(),
                raw: keyword_match(line, label, remainder),
            });
        }
    }
    None
}

fn keyword_match(line: &NormalizedLine, label: &str, remainder: &str) -> RawMatch {
    RawMatch {
        raw_test_label: normalize_label(label),
        raw_value: remainder
            .trim()
            .trim_start_matches([':', '-', '='])
            .trim()
            .to_string(),
        raw_unit: String::new(),
        source_offset: line.offset,
        line_number: line.line_number,
        inline_range: None,
        report_flag: None,
        qualitative: true,
    }
}

/// Start offsets of whitespace-separated words.
fn word_spans(text: &str) -> Vec<(usize, &str)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some(i),
            (true, Some(s)) => {
                spans.push((s, &text[s..i]));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, &text[s..]));
    }
    spans
}
