use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::enums::{Direction, RiskDomain, Severity, UnitConfidence};

/// A single classified lab result: the externally visible unit of output.
///
/// Quantitative tests carry `value`; qualitative tests carry `value_text`.
/// `unit` is the canonical unit, except for `Unresolved` findings where it is
/// the unit as printed on the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub test_id: String,
    pub display_name: String,
    pub value: Option<f64>,
    pub value_text: Option<String>,
    pub unit: String,
    pub direction: Direction,
    pub severity: Severity,
    pub risk_domains: BTreeSet<RiskDomain>,
    pub unit_confidence: UnitConfidence,
    /// Byte offset of the source row in the normalized text.
    pub source_offset: usize,
}

impl Finding {
    pub fn is_abnormal(&self) -> bool {
        self.direction != Direction::Normal
    }

    /// Same observed result, ignoring where it was found.
    pub fn same_reading(&self, other: &Finding) -> bool {
        self.value == other.value
            && self.value_text == other.value_text
            && self.unit == other.unit
    }

    /// Value formatted for logs and diagnostics.
    pub fn display_value(&self) -> String {
        match (&self.value, &self.value_text) {
            (Some(v), _) if self.unit.is_empty() => format!("{v}"),
            (Some(v), _) => format!("{v} {}", self.unit),
            (None, Some(text)) => text.clone(),
            (None, None) => String::new(),
        }
    }
}
