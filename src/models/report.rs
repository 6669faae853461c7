use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Severity;
use super::finding::Finding;

/// Ordered findings plus the non-fatal diagnostics gathered on the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Derived from the normalized text: identical input, identical id.
    pub report_id: Uuid,
    pub findings: Vec<Finding>,
    pub diagnostics: Diagnostics,
}

/// Everything that degraded gracefully instead of failing the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub duplicate_conflicts: Vec<DuplicateConflict>,
    pub extraction_misses: Vec<ExtractionMiss>,
    /// test_ids whose unit could not be reconciled.
    pub unresolved_units: Vec<String>,
    pub label_corrections: Vec<LabelCorrection>,
    pub warnings: Vec<ValidationWarning>,
}

/// Two extractions for one test disagreed; the later one was kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateConflict {
    pub test_id: String,
    pub previous: String,
    pub replacement: String,
    pub previous_offset: usize,
    pub replacement_offset: usize,
}

/// A row that looked like a test result but whose label is not in the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMiss {
    pub line_number: usize,
    pub source_offset: usize,
    pub raw_label: String,
    pub line: String,
}

/// A label accepted only after OCR typo correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCorrection {
    pub raw_label: String,
    pub corrected_to: String,
    pub test_id: String,
    pub distance: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// Outside life-compatible limits: more likely an extraction error than a result.
    ImplausibleValue {
        test_id: String,
        value: f64,
        plausible_min: f64,
        plausible_max: f64,
    },
    /// The lab's printed flag disagrees with the computed direction.
    FlagMismatch {
        test_id: String,
        printed: String,
        computed: String,
        source_offset: usize,
    },
}

impl Report {
    pub fn empty(report_id: Uuid) -> Self {
        Self {
            report_id,
            findings: Vec::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn get(&self, test_id: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.test_id == test_id)
    }

    pub fn abnormal_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.is_abnormal())
    }

    pub fn critical_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
    }

    /// Findings whose unit was reconciled; safe to explain without caveats.
    pub fn confident_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.unit_confidence.is_trustworthy())
    }

    /// Findings that must be surfaced with a caveat.
    pub fn low_confidence_findings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| !f.unit_confidence.is_trustworthy())
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }
}

impl Diagnostics {
    pub fn is_clean(&self) -> bool {
        self.duplicate_conflicts.is_empty()
            && self.extraction_misses.is_empty()
            && self.unresolved_units.is_empty()
            && self.label_corrections.is_empty()
            && self.warnings.is_empty()
    }
}
