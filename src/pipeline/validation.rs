//! Report validation: checks classified rows for values and flags that
//! look like extraction errors. Produces warnings, never drops a Finding.

use crate::models::{AbnormalFlag, Direction, UnitConfidence, ValidationWarning};
use crate::pipeline::classify::ClassifiedRow;
use crate::pipeline_config::PipelineConfig;

/// Life-compatible limits per test, in the registry's canonical unit.
/// A value outside these is more likely a misread than a result.
struct PlausibleRange {
    test_id: &'static str,
    min: f64,
    max: f64,
}

const LAB_PLAUSIBILITY: &[PlausibleRange] = &[
    // Electrolytes (mEq/L, mg/dL)
    PlausibleRange { test_id: "potassium", min: 0.5, max: 15.0 },
    PlausibleRange { test_id: "sodium", min: 80.0, max: 200.0 },
    PlausibleRange { test_id: "chloride", min: 60.0, max: 150.0 },
    PlausibleRange { test_id: "calcium", min: 2.0, max: 20.0 },
    PlausibleRange { test_id: "magnesium", min: 0.2, max: 12.0 },
    PlausibleRange { test_id: "phosphorus", min: 0.3, max: 30.0 },
    // Renal (mg/dL)
    PlausibleRange { test_id: "creatinine", min: 0.05, max: 25.0 },
    PlausibleRange { test_id: "urea", min: 3.0, max: 500.0 },
    PlausibleRange { test_id: "bun", min: 1.0, max: 230.0 },
    // Glucose (mg/dL, %)
    PlausibleRange { test_id: "fasting_glucose", min: 9.0, max: 1100.0 },
    PlausibleRange { test_id: "random_glucose", min: 9.0, max: 1100.0 },
    PlausibleRange { test_id: "pp_glucose", min: 9.0, max: 1100.0 },
    PlausibleRange { test_id: "hba1c", min: 2.0, max: 20.0 },
    // Hematology
    PlausibleRange { test_id: "hemoglobin", min: 1.0, max: 25.0 },
    PlausibleRange { test_id: "hematocrit", min: 5.0, max: 75.0 },
    PlausibleRange { test_id: "platelets", min: 1.0, max: 2000.0 },
    PlausibleRange { test_id: "wbc", min: 0.1, max: 500.0 },
    PlausibleRange { test_id: "rbc", min: 0.5, max: 10.0 },
    // Liver
    PlausibleRange { test_id: "sgpt", min: 0.0, max: 10000.0 },
    PlausibleRange { test_id: "sgot", min: 0.0, max: 10000.0 },
    PlausibleRange { test_id: "alkaline_phosphatase", min: 0.0, max: 5000.0 },
    PlausibleRange { test_id: "ggt", min: 0.0, max: 5000.0 },
    PlausibleRange { test_id: "total_bilirubin", min: 0.0, max: 60.0 },
    PlausibleRange { test_id: "albumin", min: 0.5, max: 6.0 },
    // Lipids (mg/dL)
    PlausibleRange { test_id: "total_cholesterol", min: 20.0, max: 800.0 },
    PlausibleRange { test_id: "triglycerides", min: 9.0, max: 4500.0 },
    PlausibleRange { test_id: "hdl", min: 4.0, max: 200.0 },
    PlausibleRange { test_id: "ldl", min: 4.0, max: 600.0 },
    // Thyroid
    PlausibleRange { test_id: "tsh", min: 0.01, max: 200.0 },
    PlausibleRange { test_id: "free_t4", min: 0.08, max: 8.0 },
    PlausibleRange { test_id: "free_t3", min: 0.3, max: 20.0 },
];

/// Run every check over the aggregated rows.
pub fn validate(rows: &[ClassifiedRow], config: &PipelineConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    // Missing flags only count against a report that prints flags at all.
    let report_prints_flags = rows.iter().any(|row| row.report_flag.is_some());

    for row in rows {
        if config.plausibility_checks {
            check_plausibility(row, &mut warnings);
        }
        check_flag_consistency(row, report_prints_flags, &mut warnings);
    }

    for warning in &warnings {
        match warning {
            ValidationWarning::ImplausibleValue { test_id, value, .. } => {
                tracing::warn!(test_id = %test_id, value, "Implausible value");
            }
            ValidationWarning::FlagMismatch {
                test_id,
                printed,
                computed,
                ..
            } => {
                tracing::warn!(test_id = %test_id, printed = %printed, computed = %computed, "Printed flag disagrees");
            }
        }
    }
    warnings
}

fn check_plausibility(row: &ClassifiedRow, warnings: &mut Vec<ValidationWarning>) {
    let finding = &row.finding;
    if finding.unit_confidence == UnitConfidence::Unresolved {
        return;
    }
    let Some(value) = finding.value else {
        return;
    };
    let Some(range) = LAB_PLAUSIBILITY
        .iter()
        .find(|r| r.test_id == finding.test_id)
    else {
        return;
    };
    if value < range.min || value > range.max {
        warnings.push(ValidationWarning::ImplausibleValue {
            test_id: finding.test_id.clone(),
            value,
            plausible_min: range.min,
            plausible_max: range.max,
        });
    }
}

/// The printed flag disagrees with the computed direction, or the row is
/// out of its own printed range but carries no flag.
fn check_flag_consistency(
    row: &ClassifiedRow,
    report_prints_flags: bool,
    warnings: &mut Vec<ValidationWarning>,
) {
    let finding = &row.finding;
    if finding.value.is_none() {
        return;
    }
    let computed = finding.direction;

    let mismatch = match row.report_flag {
        Some(AbnormalFlag::Abnormal) => computed == Direction::Normal,
        Some(flag) => flag.direction() != Some(computed),
        None => {
            report_prints_flags && row.inline_range.is_some() && computed != Direction::Normal
        }
    };
    if !mismatch {
        return;
    }

    warnings.push(ValidationWarning::FlagMismatch {
        test_id: finding.test_id.clone(),
        printed: row
            .report_flag
            .map_or_else(|| "none".to_string(), |flag| flag.as_str().to_string()),
        computed: computed.as_str().to_string(),
        source_offset: finding.source_offset,
    });
}
