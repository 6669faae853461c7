//! Lab Report Processor.
//!
//! Single entry point that drives the full pipeline:
//! normalize → extract → reconcile → classify → aggregate → validate.
//!
//! Processing is infallible: anything that cannot be read degrades into the
//! report's diagnostics. The registry is shared read-only, so one processor
//! can serve many reports in parallel.

use std::sync::Arc;

use rayon::prelude::*;
use uuid::Uuid;

use crate::models::{Diagnostics, ExtractionMiss, Report};
use crate::pipeline::aggregate::aggregate;
use crate::pipeline::classify::{classify, ClassifiedRow};
use crate::pipeline::extraction::{extract, ResolvedMatch};
use crate::pipeline::normalize::{normalize, normalize_pages, NormalizedText};
use crate::pipeline::reconcile::reconcile;
use crate::pipeline::validation::validate;
use crate::pipeline_config::PipelineConfig;
use crate::registry::BenchmarkRegistry;

/// Namespace for report ids: UUID v5 of the normalized text.
const REPORT_NAMESPACE: Uuid = Uuid::from_u128(0x6c61_626c_656e_5300_8000_0000_7265_706f);

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

/// Turns raw report text into a [`Report`].
#[derive(Debug, Clone)]
pub struct LabReportProcessor {
    registry: Arc<BenchmarkRegistry>,
    config: PipelineConfig,
}

impl LabReportProcessor {
    pub fn new(registry: Arc<BenchmarkRegistry>, config: PipelineConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &BenchmarkRegistry {
        &self.registry
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Process one report given as a single string (pages detected from
    /// form feeds and page-break markers).
    pub fn process(&self, raw: &str) -> Report {
        let span = tracing::info_span!("process_report", chars = raw.len());
        let _enter = span.enter();
        self.run(normalize(raw, &self.registry, &self.config))
    }

    /// Process one report given as an explicit page list.
    pub fn process_pages(&self, pages: &[&str]) -> Report {
        let span = tracing::info_span!("process_report", pages = pages.len());
        let _enter = span.enter();
        self.run(normalize_pages(pages, &self.registry, &self.config))
    }

    /// Process independent reports in parallel. Output order equals input order.
    pub fn process_batch<S>(&self, reports: &[S]) -> Vec<Report>
    where
        S: AsRef<str> + Sync,
    {
        reports
            .par_iter()
            .map(|raw| self.process(raw.as_ref()))
            .collect()
    }

    fn run(&self, text: NormalizedText) -> Report {
        let report_id = Uuid::new_v5(&REPORT_NAMESPACE, text.text.as_bytes());
        let extraction = extract(&text, &self.registry, &self.config);

        let mut misses = extraction.misses;
        let mut rows: Vec<ClassifiedRow> = Vec::with_capacity(extraction.matches.len());
        for found in &extraction.matches {
            match self.classify_match(found) {
                Some(row) => rows.push(row),
                None => misses.push(unreadable_value(found, &text)),
            }
        }
        misses.sort_by_key(|miss| miss.source_offset);

        let aggregated = aggregate(rows);
        let warnings = validate(&aggregated.rows, &self.config);
        let unresolved_units = aggregated.unresolved_units();

        let report = Report {
            report_id,
            findings: aggregated.rows.into_iter().map(|row| row.finding).collect(),
            diagnostics: Diagnostics {
                duplicate_conflicts: aggregated.duplicate_conflicts,
                extraction_misses: misses,
                unresolved_units,
                label_corrections: extraction.corrections,
                warnings,
            },
        };

        tracing::info!(
            report_id = %report.report_id,
            lines = text.lines.len(),
            findings = report.findings.len(),
            abnormal = report.abnormal_findings().count(),
            misses = report.diagnostics.extraction_misses.len(),
            conflicts = report.diagnostics.duplicate_conflicts.len(),
            warnings = report.diagnostics.warnings.len(),
            "Report processed"
        );
        report
    }

    fn classify_match(&self, found: &ResolvedMatch) -> Option<ClassifiedRow> {
        let entry = self.registry.lookup(&found.test_id)?;
        let value = reconcile(found, entry, &self.registry, self.config.number_locale)?;
        Some(classify(value, entry))
    }
}

/// A resolved row whose value token does not parse as a number.
fn unreadable_value(found: &ResolvedMatch, text: &NormalizedText) -> ExtractionMiss {
    tracing::warn!(
        test_id = %found.test_id,
        value = %found.raw.raw_value,
        line = found.raw.line_number,
        "Unreadable value"
    );
    let line = text
        .lines
        .get(found.raw.line_number.saturating_sub(1))
        .map(|l| l.text.clone())
        .unwrap_or_default();
    ExtractionMiss {
        line_number: found.raw.line_number,
        source_offset: found.raw.source_offset,
        raw_label: found.raw.raw_test_label.clone(),
        line,
    }
}
