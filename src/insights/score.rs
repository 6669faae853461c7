//! Composite health score, 0 (many far-off results) to 100 (all normal).
//!
//! Each finding owns an equal share of 100 points. An abnormal finding loses
//! part of its share along a soft curve of its deviation from the violated
//! bound: `share * d / (d + 20)` with `d` capped at 100 %.

use crate::models::{BenchmarkEntry, Direction, Finding, Report};
use crate::registry::BenchmarkRegistry;

const DEVIATION_CAP_PCT: f64 = 100.0;
const PENALTY_KNEE_PCT: f64 = 20.0;

/// Deviation charged when none can be computed (qualitative results,
/// unreconciled units, or a finding abnormal only against its printed range).
pub const NOMINAL_DEVIATION_PCT: f64 = 20.0;

/// Percentage distance from the violated registry bound. A zero bound uses 1
/// as denominator. `None` when the registry bound is not violated or the
/// value is not comparable to it.
pub fn deviation_pct(finding: &Finding, entry: &BenchmarkEntry) -> Option<f64> {
    if !finding.unit_confidence.is_trustworthy() {
        return None;
    }
    let value = finding.value?;
    let (bound, distance) = match finding.direction {
        Direction::Normal => return Some(0.0),
        Direction::Low => {
            let low = entry.low_bound?;
            (low, low - value)
        }
        Direction::High => {
            let high = entry.high_bound?;
            (high, value - high)
        }
    };
    if distance <= 0.0 {
        return None;
    }
    let denominator = if bound == 0.0 { 1.0 } else { bound.abs() };
    Some(distance / denominator * 100.0)
}

/// Score for a report; 100 for an empty one.
pub fn health_score(report: &Report, registry: &BenchmarkRegistry) -> u8 {
    if report.findings.is_empty() {
        return 100;
    }
    let share = 100.0 / report.findings.len() as f64;

    let penalty: f64 = report
        .abnormal_findings()
        .map(|finding| {
            let d = registry
                .lookup(&finding.test_id)
                .and_then(|entry| deviation_pct(finding, entry))
                .unwrap_or(NOMINAL_DEVIATION_PCT)
                .min(DEVIATION_CAP_PCT);
            share * d / (d + PENALTY_KNEE_PCT)
        })
        .sum();

    (100.0 - penalty).round().clamp(0.0, 100.0) as u8
}
