//! Text Normalizer: raw extracted text → one stream of logical lines.
//!
//! Steps per report: sanitize each page, strip repeated headers/footers
//! across pages, join broken lines, collapse column whitespace, split
//! side-by-side rows. Never fails.

pub mod boilerplate;
pub mod rows;
pub mod sanitize;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::pipeline::extraction::row::parse_row;
use crate::pipeline_config::PipelineConfig;
use crate::registry::BenchmarkRegistry;

static PAGE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*-{2,}[ \t]*page[ \t]*break[ \t]*-{2,}[ \t]*$").unwrap());

/// One logical line of the normalized stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedLine {
    pub text: String,
    /// Byte offset of the line in [`NormalizedText::text`].
    pub offset: usize,
    /// 1-based page the line came from.
    pub page: usize,
    /// 1-based position in the normalized stream.
    pub line_number: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizedText {
    /// Lines joined with `\n`. Offsets index into this.
    pub text: String,
    pub lines: Vec<NormalizedLine>,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split raw text into pages on form feeds and `--- Page Break ---` markers.
pub fn split_pages(raw: &str) -> Vec<&str> {
    raw.split('\x0c')
        .flat_map(|chunk| PAGE_BREAK.split(chunk))
        .collect()
}

/// Normalize a raw report; pages are detected from break markers.
pub fn normalize(raw: &str, registry: &BenchmarkRegistry, config: &PipelineConfig) -> NormalizedText {
    normalize_pages(&split_pages(raw), registry, config)
}

/// Normalize a report given as an explicit page list.
pub fn normalize_pages(
    pages: &[&str],
    registry: &BenchmarkRegistry,
    config: &PipelineConfig,
) -> NormalizedText {
    let sanitized: Vec<Vec<String>> = pages.iter().map(|p| sanitize::sanitize_page(p)).collect();

    let is_result_row = |line: &str| {
        let collapsed = rows::collapse_whitespace(line);
        parse_row(&collapsed, config.number_locale)
            .is_some_and(|row| registry.resolve_alias(row.label).is_some())
    };
    let (kept, boilerplate_removed) = boilerplate::strip_boilerplate(
        sanitized,
        config.boilerplate_zone_lines,
        config.min_repeated_pages,
        is_result_row,
    );

    let mut out = NormalizedText::default();
    for (page_index, page_lines) in kept.into_iter().enumerate() {
        for joined in rows::join_lines(page_lines) {
            let collapsed = rows::collapse_whitespace(&joined);
            if collapsed.is_empty() {
                continue;
            }
            for row in rows::split_rows(&collapsed, |label| registry.resolve_alias(label).is_some()) {
                push_line(&mut out, row, page_index + 1);
            }
        }
    }

    tracing::debug!(
        pages = pages.len(),
        lines = out.lines.len(),
        boilerplate_removed,
        "Text normalized"
    );
    out
}

fn push_line(out: &mut NormalizedText, text: String, page: usize) {
    if !out.text.is_empty() {
        out.text.push('\n');
    }
    let offset = out.text.len();
    out.text.push_str(&text);
    let line_number = out.lines.len() + 1;
    out.lines.push(NormalizedLine {
        text,
        offset,
        page,
        line_number,
    });
}
