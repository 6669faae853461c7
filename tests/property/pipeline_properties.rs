use std::sync::{Arc, LazyLock};

use lablens_lib::models::{BenchmarkEntry, Direction, Severity, UnitConfidence};
use lablens_lib::pipeline::classify::classify;
use lablens_lib::pipeline::normalize::normalize;
use lablens_lib::pipeline::reconcile::ReconciledValue;
use lablens_lib::{BenchmarkRegistry, LabReportProcessor, PipelineConfig};
use proptest::prelude::*;

static REGISTRY: LazyLock<Arc<BenchmarkRegistry>> =
    LazyLock::new(|| Arc::new(BenchmarkRegistry::builtin().unwrap()));

fn bounded_entries() -> Vec<&'static BenchmarkEntry> {
    REGISTRY
        .entries()
        .iter()
        .filter(|e| e.low_bound.is_some() && e.high_bound.is_some())
        .collect()
}

fn with_critical_low() -> Vec<&'static BenchmarkEntry> {
    REGISTRY
        .entries()
        .iter()
        .filter(|e| e.low_bound.is_some() && e.critical_low.is_some())
        .collect()
}

fn exact(entry: &BenchmarkEntry, v: f64) -> ReconciledValue {
    ReconciledValue {
        test_id: entry.test_id.clone(),
        numeric_value: Some(v),
        value_text: None,
        unit: entry.canonical_unit.clone(),
        printed_unit: entry.canonical_unit.clone(),
        unit_confidence: UnitConfidence::Exact,
        inline_range: None,
        report_flag: None,
        source_offset: 0,
    }
}

proptest! {
    #[test]
    fn within_bounds_is_normal(pick in any::<prop::sample::Index>(), f in 0.0f64..=1.0) {
        let entries = bounded_entries();
        let entry = pick.get(&entries);
        let (low, high) = (entry.low_bound.unwrap(), entry.high_bound.unwrap());
        let v = (low + f * (high - low)).clamp(low, high);

        let finding = classify(exact(entry, v), entry).finding;
        prop_assert_eq!(finding.direction, Direction::Normal);
        prop_assert_eq!(finding.severity, Severity::None);
    }

    #[test]
    fn between_critical_and_low_is_graded(pick in any::<prop::sample::Index>(), f in 0.001f64..0.999) {
        let entries = with_critical_low();
        let entry = pick.get(&entries);
        let (critical, low) = (entry.critical_low.unwrap(), entry.low_bound.unwrap());
        let v = critical + f * (low - critical);
        prop_assume!(critical < v && v < low);

        let finding = classify(exact(entry, v), entry).finding;
        prop_assert_eq!(finding.direction, Direction::Low);
        prop_assert!(
            matches!(finding.severity, Severity::Mild | Severity::Moderate),
            "{} at {}: {:?}", entry.test_id, v, finding.severity
        );
    }

    #[test]
    fn at_or_below_critical_low_is_critical(pick in any::<prop::sample::Index>(), below in 0.0f64..100.0) {
        let entries = with_critical_low();
        let entry = pick.get(&entries);
        let v = entry.critical_low.unwrap() - below;

        let finding = classify(exact(entry, v), entry).finding;
        prop_assert_eq!(finding.direction, Direction::Low);
        prop_assert_eq!(finding.severity, Severity::Critical);
    }

    #[test]
    fn severity_never_critical_without_threshold(pick in any::<prop::sample::Index>(), v in -1e4f64..1e6) {
        let entries: Vec<_> = bounded_entries()
            .into_iter()
            .filter(|e| e.critical_low.is_none() && e.critical_high.is_none())
            .collect();
        let entry = pick.get(&entries);

        let finding = classify(exact(entry, v), entry).finding;
        prop_assert_ne!(finding.severity, Severity::Critical);
        prop_assert_eq!(finding.direction == Direction::Normal, finding.severity == Severity::None);
    }

    #[test]
    fn conversion_round_trips(pick in any::<prop::sample::Index>(), v in 1e-3f64..1e6) {
        let conversions: Vec<_> = REGISTRY
            .entries()
            .iter()
            .filter_map(|e| e.unit_family.as_deref())
            .filter_map(|name| REGISTRY.family(name))
            .flat_map(|family| family.conversions.iter())
            .collect();
        let conversion = pick.get(&conversions);

        let back = conversion.from_canonical(conversion.to_canonical(v));
        prop_assert!(((back - v) / v).abs() < 1e-6, "{} -> {}", v, back);
    }

    #[test]
    fn normalizer_offsets_are_valid(raw in "[a-zA-Z0-9µ .,:/|()<>\\t\\n\\x0c-]{0,400}") {
        let text = normalize(&raw, &REGISTRY, &PipelineConfig::default());
        for line in &text.lines {
            prop_assert_eq!(&text.text[line.offset..line.offset + line.text.len()], line.text.as_str());
            prop_assert!(!line.text.is_empty());
        }
    }

    #[test]
    fn processing_is_idempotent(
        rows in prop::collection::vec(
            (
                prop::sample::select(vec!["Hb", "Sodium", "TSH", "LDL", "Creatinine", "Platelet Count", "Unknownium"]),
                0.1f64..500.0,
                prop::sample::select(vec!["", "mg/dL", "g/dL", "mmol/L", "mEq/L", "10^3/µL"]),
            ),
            0..12,
        )
    ) {
        let raw: String = rows
            .iter()
            .map(|(label, v, unit)| format!("{label} {v:.2} {unit}\n"))
            .collect();
        let processor = LabReportProcessor::new(REGISTRY.clone(), PipelineConfig::default());

        let first = processor.process(&raw);
        let second = processor.process(&raw);
        prop_assert_eq!(&first, &second);
        prop_assert!(first.findings.len() <= rows.len());

        let mut ids: Vec<&str> = first.findings.iter().map(|f| f.test_id.as_str()).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), total, "test_ids must be unique");
    }
}
