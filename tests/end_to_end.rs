//! Whole-pipeline behavior over realistic report text.

use std::io::Write;
use std::sync::Arc;

use lablens_lib::insights::summarize;
use lablens_lib::models::{Direction, RiskDomain, Severity, UnitConfidence, ValidationWarning};
use lablens_lib::pipeline_config::NumberLocale;
use lablens_lib::{BenchmarkRegistry, LabReportProcessor, PipelineConfig};

fn processor() -> LabReportProcessor {
    processor_with(PipelineConfig::default())
}

fn processor_with(config: PipelineConfig) -> LabReportProcessor {
    LabReportProcessor::new(Arc::new(BenchmarkRegistry::builtin().unwrap()), config)
}

const MULTI_PAGE: &[&str] = &[
    "SUNRISE DIAGNOSTICS PVT LTD\n\
     Patient: John Doe   Age: 45 Years   Sex: M\n\
     Test Name            Result   Unit        Reference Range\n\
     COMPLETE BLOOD COUNT\n\
     Hemoglobin           11.2     g/dL        13.0 - 17.0   L\n\
     Total Leucocyte Count 7,800   /cumm       4000 - 11000\n\
     Platelet Count       250,000  /cumm       150000 - 410000\n\
     Page 1 of 2",
    "SUNRISE DIAGNOSTICS PVT LTD\n\
     Patient: John Doe   Age: 45 Years   Sex: M\n\
     LIPID PROFILE\n\
     Total Cholesterol    245      mg/dL       < 200        H\n\
     HDL Cholesterol      38       mg/dL       > 40         L\n\
     Triglycerides        2.1      mmol/L\n\
     HBsAg                Non Reactive\n\
     Page 2 of 2",
];

#[test]
fn scenario_fasting_glucose_with_printed_range() {
    let report = processor().process("Glucose (Fasting): 130 mg/dL (70-100)");
    assert_eq!(report.findings.len(), 1);
    let f = &report.findings[0];
    assert_eq!(f.test_id, "fasting_glucose");
    assert_eq!(f.direction, Direction::High);
    assert_eq!(f.severity, Severity::Critical);
    assert_eq!(f.risk_domains.iter().copied().collect::<Vec<_>>(), vec![RiskDomain::Metabolic]);
    assert_eq!(f.unit_confidence, UnitConfidence::Exact);
}

#[test]
fn scenario_hemoglobin_without_unit() {
    let report = processor().process("Hemoglobin 11.2");
    let f = report.get("hemoglobin").unwrap();
    assert_eq!(f.direction, Direction::Low);
    assert!(matches!(f.severity, Severity::Mild | Severity::Moderate));
    assert_eq!(f.unit_confidence, UnitConfidence::Assumed);
    assert_eq!(f.unit, "g/dL");
}

#[test]
fn scenario_unknown_label() {
    let report = processor().process("Unobtainium Level 42 mg/dL");
    assert!(report.findings.is_empty());
    assert_eq!(report.diagnostics.extraction_misses.len(), 1);
    assert_eq!(report.diagnostics.extraction_misses[0].raw_label, "Unobtainium Level");
}

#[test]
fn alias_spellings_resolve_to_one_test() {
    let registry = BenchmarkRegistry::builtin().unwrap();
    let hb = registry.resolve_alias("Hb");
    assert_eq!(hb, Some("hemoglobin"));
    assert_eq!(registry.resolve_alias("Hemoglobin"), hb);
    assert_eq!(registry.resolve_alias("HGB"), hb);
    assert_eq!(registry.resolve_alias("S. Hemoglobin"), hb);
}

#[test]
fn multi_page_report() {
    let report = processor().process_pages(MULTI_PAGE);
    let ids: Vec<&str> = report.findings.iter().map(|f| f.test_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "hemoglobin",
            "wbc",
            "platelets",
            "total_cholesterol",
            "hdl",
            "triglycerides",
            "hbsag"
        ]
    );

    let wbc = report.get("wbc").unwrap();
    assert_eq!(wbc.unit_confidence, UnitConfidence::Converted);
    assert!((wbc.value.unwrap() - 7.8).abs() < 1e-9);
    assert_eq!(wbc.direction, Direction::Normal);

    let platelets = report.get("platelets").unwrap();
    assert!((platelets.value.unwrap() - 250.0).abs() < 1e-9);

    let tg = report.get("triglycerides").unwrap();
    assert_eq!(tg.unit_confidence, UnitConfidence::Converted);
    assert_eq!(tg.unit, "mg/dL");
    assert_eq!(tg.direction, Direction::High);

    let hdl = report.get("hdl").unwrap();
    assert_eq!(hdl.direction, Direction::Low);

    let hbsag = report.get("hbsag").unwrap();
    assert_eq!(hbsag.value_text.as_deref(), Some("Non Reactive"));
    assert_eq!(hbsag.direction, Direction::Normal);

    assert!(report.diagnostics.extraction_misses.is_empty());
    assert!(report.diagnostics.duplicate_conflicts.is_empty());
}

#[test]
fn multi_page_insights() {
    let p = processor();
    let report = p.process_pages(MULTI_PAGE);
    let insights = summarize(&report, p.registry());
    assert!(insights.health_score < 100);
    let cardio = insights
        .risk_summary
        .iter()
        .find(|r| r.domain == RiskDomain::Cardiovascular)
        .unwrap();
    assert_eq!((cardio.abnormal, cardio.total), (3, 3));
    assert_eq!(insights.risk_summary[0].level, lablens_lib::models::RiskLevel::High);
}

#[test]
fn side_by_side_columns() {
    let report = processor().process("Hemoglobin 13.5 g/dL | WBC 7.2 10^3/µL | Platelets 250 10^3/µL");
    let ids: Vec<&str> = report.findings.iter().map(|f| f.test_id.as_str()).collect();
    assert_eq!(ids, vec!["hemoglobin", "wbc", "platelets"]);
    assert!(report.findings.iter().all(|f| f.unit_confidence == UnitConfidence::Exact));
    assert!(report.abnormal_findings().next().is_none());
}

#[test]
fn si_units_are_converted() {
    let report = processor().process("Fasting Glucose 7.2 mmol/L\nCreatinine 88.4 µmol/L");
    let glucose = report.get("fasting_glucose").unwrap();
    assert_eq!(glucose.unit_confidence, UnitConfidence::Converted);
    assert!((glucose.value.unwrap() - 129.7152).abs() < 1e-6);
    assert_eq!(glucose.severity, Severity::Critical);

    let creatinine = report.get("creatinine").unwrap();
    assert_eq!(creatinine.unit_confidence, UnitConfidence::Converted);
    assert!((creatinine.value.unwrap() - 1.0).abs() < 0.01);
}

#[test]
fn number_in_label_parenthetical_is_not_the_value() {
    let report = processor().process("Glucose PP (2 hrs) 160 mg/dL");
    assert_eq!(report.findings.len(), 1);
    let pp = &report.findings[0];
    assert_eq!(pp.test_id, "pp_glucose");
    assert_eq!(pp.value, Some(160.0));
    assert_eq!(pp.unit_confidence, UnitConfidence::Exact);
    assert_eq!((pp.direction, pp.severity), (Direction::High, Severity::Mild));

    let report = processor().process("Glucose (2 hr PP): 160 mg/dL");
    assert!(report.diagnostics.extraction_misses.is_empty());
    let pp = report.get("pp_glucose").unwrap();
    assert_eq!(pp.value, Some(160.0));
    assert_eq!(pp.direction, Direction::High);
}

#[test]
fn superscript_cell_count_units() {
    let report = processor().process("RBC 4.5 10¹²/L\nPlatelets 250 10³/µL");
    let rbc = report.get("rbc").unwrap();
    assert_eq!(rbc.unit_confidence, UnitConfidence::Converted);
    assert_eq!(rbc.value, Some(4.5));
    assert_eq!(rbc.direction, Direction::Normal);

    let platelets = report.get("platelets").unwrap();
    assert_eq!(platelets.unit_confidence, UnitConfidence::Exact);
    assert_eq!(platelets.value, Some(250.0));

    let report = processor().process("RBC 4.5 ×10¹²/L");
    let rbc = report.get("rbc").unwrap();
    assert_eq!(rbc.unit_confidence, UnitConfidence::Converted);
    assert!(report.diagnostics.unresolved_units.is_empty());
}

#[test]
fn number_led_vitamin_d_labels() {
    let report = processor().process("25-Hydroxy Vitamin D 32 ng/mL");
    let vit_d = report.get("vitamin_d").unwrap();
    assert_eq!(vit_d.value, Some(32.0));
    assert_eq!(vit_d.direction, Direction::Normal);
    assert_eq!(vit_d.unit_confidence, UnitConfidence::Exact);

    for line in ["25 OH Vitamin D 12 ng/mL", "25(OH)D 12 ng/mL", "Vitamin D (25 OH) 12 ng/mL"] {
        let report = processor().process(line);
        assert!(report.diagnostics.extraction_misses.is_empty(), "{line}");
        let vit_d = report.get("vitamin_d").unwrap();
        assert_eq!(vit_d.value, Some(12.0), "{line}");
        assert_eq!(vit_d.direction, Direction::Low, "{line}");
    }
}

#[test]
fn unresolved_unit_is_carried_with_flag() {
    let report = processor().process("Sodium 3.2 g/L");
    let sodium = report.get("sodium").unwrap();
    assert_eq!(sodium.unit_confidence, UnitConfidence::Unresolved);
    assert_eq!(sodium.value, Some(3.2));
    assert_eq!(sodium.unit, "g/L");
    assert_eq!(report.low_confidence_findings().count(), 1);
    assert_eq!(report.confident_findings().count(), 0);
    // no plausibility warning against a foreign unit
    assert!(report.diagnostics.warnings.is_empty());
}

#[test]
fn duplicate_tests_keep_last_value() {
    let report = processor().process("Hb 11.2 g/dL\nSodium 140 mEq/L\nHemoglobin 12.0 g/dL");
    let ids: Vec<&str> = report.findings.iter().map(|f| f.test_id.as_str()).collect();
    assert_eq!(ids, vec!["hemoglobin", "sodium"]);
    assert_eq!(report.get("hemoglobin").unwrap().value, Some(12.0));
    let conflict = &report.diagnostics.duplicate_conflicts[0];
    assert_eq!(conflict.previous, "11.2 g/dL");
    assert_eq!(conflict.replacement, "12 g/dL");
}

#[test]
fn qualitative_results() {
    let report = processor().process("HBsAg: Reactive\nAnti HCV Negative\nUrine Protein Trace");
    let hbsag = report.get("hbsag").unwrap();
    assert_eq!((hbsag.direction, hbsag.severity), (Direction::High, Severity::Mild));
    let protein = report.get("urine_protein").unwrap();
    assert_eq!(protein.direction, Direction::High);
    assert_eq!(report.get("anti_hcv").unwrap().direction, Direction::Normal);
}

#[test]
fn decimal_comma_locales() {
    let report = processor().process("Hemoglobin 13,5 g/dL");
    assert_eq!(report.get("hemoglobin").unwrap().value, Some(13.5));

    let comma = processor_with(PipelineConfig {
        number_locale: NumberLocale::Comma,
        ..PipelineConfig::default()
    });
    let report = comma.process("Platelets 1.250,5 10^3/µL");
    assert_eq!(report.get("platelets").unwrap().value, Some(1250.5));
}

#[test]
fn implausible_value_warning() {
    let report = processor().process("Potassium 42 mEq/L");
    let potassium = report.get("potassium").unwrap();
    assert_eq!(potassium.severity, Severity::Critical);
    assert!(matches!(
        report.diagnostics.warnings.as_slice(),
        [ValidationWarning::ImplausibleValue { .. }]
    ));
}

#[test]
fn printed_flag_mismatch_warning() {
    let report = processor().process("Sodium 140 mEq/L 136 - 145 H");
    assert_eq!(report.get("sodium").unwrap().direction, Direction::Normal);
    assert!(matches!(
        report.diagnostics.warnings.as_slice(),
        [ValidationWarning::FlagMismatch { .. }]
    ));
}

#[test]
fn identical_input_identical_report() {
    let p = processor();
    let a = p.process_pages(MULTI_PAGE);
    let b = p.process_pages(MULTI_PAGE);
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn batch_matches_sequential() {
    let p = processor();
    let inputs: Vec<String> = (0..16)
        .map(|i| format!("Hemoglobin {}.{} g/dL\nSodium {} mEq/L", 9 + i % 8, i % 10, 128 + i))
        .collect();
    let batch = p.process_batch(&inputs);
    let sequential: Vec<_> = inputs.iter().map(|s| p.process(s)).collect();
    assert_eq!(batch, sequential);
}

#[test]
fn report_serializes_to_json() {
    let report = processor().process("Glucose (Fasting): 130 mg/dL (70-100)\nUnobtainium 3");
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["findings"][0]["direction"], "high");
    assert_eq!(json["findings"][0]["severity"], "critical");
    assert_eq!(json["findings"][0]["risk_domains"][0], "metabolic");
    assert_eq!(json["diagnostics"]["extraction_misses"][0]["raw_label"], "Unobtainium");
    assert!(json["report_id"].is_string());
}

#[test]
fn custom_registry_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"{
            "tests": [{
                "test_id": "lactate",
                "display_name": "Lactate",
                "canonical_unit": "mmol/L",
                "low_bound": 0.5,
                "high_bound": 2.2,
                "critical_high": 4.0,
                "risk_domains": ["metabolic"],
                "aliases": ["lactic acid"]
            }]
        }"#,
    )
    .unwrap();

    let registry = BenchmarkRegistry::discover(Some(file.path())).unwrap();
    assert_eq!(registry.len(), 1);
    let p = LabReportProcessor::new(Arc::new(registry), PipelineConfig::default());

    let report = p.process("Lactic Acid 4.5 mmol/L\nHemoglobin 13.5 g/dL");
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].severity, Severity::Critical);
    assert_eq!(report.diagnostics.extraction_misses.len(), 1);
}
