//! Classifier: reconciled value + benchmark entry → Finding.
//!
//! Direction compares against the effective bounds (printed range where the
//! row has one, registry otherwise). Severity buckets the out-of-range span
//! between the effective bound and the critical threshold, or an implied
//! limit when the entry has none.

use crate::models::{
    AbnormalFlag, BenchmarkEntry, Direction, Finding, Severity, UnitConfidence,
};
use crate::pipeline::extraction::InlineRange;
use crate::pipeline::reconcile::ReconciledValue;

/// A Finding plus the row context validation still needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedRow {
    pub finding: Finding,
    pub report_flag: Option<AbnormalFlag>,
    pub inline_range: Option<InlineRange>,
}

/// Bounds a numeric value is judged against.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Thresholds {
    low: Option<f64>,
    high: Option<f64>,
    critical_low: Option<f64>,
    critical_high: Option<f64>,
    /// Base for the implied high-side limit.
    reference_high: Option<f64>,
}

impl Thresholds {
    fn for_value(value: &ReconciledValue, entry: &BenchmarkEntry) -> Option<Self> {
        let printed = value.inline_range.unwrap_or_default();
        if value.unit_confidence == UnitConfidence::Unresolved {
            // Registry bounds are in another unit; only the printed range applies.
            if printed.low.is_none() && printed.high.is_none() {
                return None;
            }
            return Some(Self {
                low: printed.low,
                high: printed.high,
                critical_low: None,
                critical_high: None,
                reference_high: printed.high,
            });
        }
        Some(Self {
            low: printed.low.or(entry.low_bound),
            high: printed.high.or(entry.high_bound),
            critical_low: entry.critical_low,
            critical_high: entry.critical_high,
            reference_high: entry.high_bound.or(printed.high),
        })
    }
}

/// Classify one reconciled value against its entry.
pub fn classify(value: ReconciledValue, entry: &BenchmarkEntry) -> ClassifiedRow {
    let (direction, severity) = match (value.numeric_value, value.value_text.as_deref()) {
        (Some(_), _) if entry.is_qualitative() => (Direction::Normal, Severity::None),
        (Some(v), _) => Thresholds::for_value(&value, entry)
            .map_or((Direction::Normal, Severity::None), |t| grade(v, &t)),
        (None, Some(text)) => classify_text(text, entry),
        (None, None) => (Direction::Normal, Severity::None),
    };

    tracing::debug!(
        test_id = %entry.test_id,
        direction = %direction,
        severity = %severity,
        "Classified"
    );

    ClassifiedRow {
        finding: Finding {
            test_id: entry.test_id.clone(),
            display_name: entry.display_name.clone(),
            value: value.numeric_value,
            value_text: value.value_text,
            unit: value.unit,
            direction,
            severity,
            risk_domains: entry.risk_domains.clone(),
            unit_confidence: value.unit_confidence,
            source_offset: value.source_offset,
        },
        report_flag: value.report_flag,
        inline_range: value.inline_range,
    }
}

fn classify_text(text: &str, entry: &BenchmarkEntry) -> (Direction, Severity) {
    let direction = entry
        .qualitative
        .as_ref()
        .and_then(|table| table.match_keyword(text))
        .map_or(Direction::Normal, |(_, direction)| direction);
    match direction {
        Direction::Normal => (Direction::Normal, Severity::None),
        other => (other, Severity::Mild),
    }
}

fn grade(v: f64, t: &Thresholds) -> (Direction, Severity) {
    if let Some(low) = t.low.filter(|low| v < *low) {
        if t.critical_low.is_some_and(|c| v <= c) {
            return (Direction::Low, Severity::Critical);
        }
        let limit = t.critical_low.unwrap_or(0.0);
        return (Direction::Low, bucket(low - v, low - limit));
    }
    if let Some(high) = t.high.filter(|high| v > *high) {
        if t.critical_high.is_some_and(|c| v >= c) {
            return (Direction::High, Severity::Critical);
        }
        let limit = t.critical_high.unwrap_or_else(|| implied_high_limit(high, t.reference_high));
        return (Direction::High, bucket(v - high, limit - high));
    }
    (Direction::Normal, Severity::None)
}

fn implied_high_limit(high: f64, reference_high: Option<f64>) -> f64 {
    match reference_high {
        Some(base) if base > 0.0 => base * 2.0,
        _ if high > 0.0 => high * 2.0,
        _ => high + 1.0,
    }
}

/// Nearer half of the span → Mild, farther half → Moderate.
fn bucket(distance: f64, span: f64) -> Severity {
    if span <= 0.0 || distance <= span / 2.0 {
        Severity::Mild
    } else {
        Severity::Moderate
    }
}
