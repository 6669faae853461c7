//! Per-domain risk summary.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{Finding, RiskDomain, RiskLevel, Severity};

/// How one risk domain fared across the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainRisk {
    pub domain: RiskDomain,
    pub level: RiskLevel,
    pub abnormal: usize,
    pub total: usize,
    pub highest_severity: Severity,
    pub test_ids: Vec<String>,
}

/// Bucket the abnormal share of a domain.
pub fn risk_level(abnormal: usize, total: usize) -> RiskLevel {
    if abnormal == 0 || total == 0 {
        return RiskLevel::Normal;
    }
    let ratio = abnormal as f64 / total as f64;
    if ratio < 0.4 {
        RiskLevel::Low
    } else if ratio < 0.7 {
        RiskLevel::Moderate
    } else {
        RiskLevel::High
    }
}

/// One entry per domain present in `findings`, highest level first, then
/// in domain order.
pub fn risk_summary(findings: &[Finding]) -> Vec<DomainRisk> {
    let mut by_domain: BTreeMap<RiskDomain, DomainRisk> = BTreeMap::new();
    for finding in findings {
        for domain in &finding.risk_domains {
            let entry = by_domain.entry(*domain).or_insert_with(|| DomainRisk {
                domain: *domain,
                level: RiskLevel::Normal,
                abnormal: 0,
                total: 0,
                highest_severity: Severity::None,
                test_ids: Vec::new(),
            });
            entry.total += 1;
            if finding.is_abnormal() {
                entry.abnormal += 1;
            }
            entry.highest_severity = entry.highest_severity.max(finding.severity);
            entry.test_ids.push(finding.test_id.clone());
        }
    }

    let mut summary: Vec<DomainRisk> = by_domain
        .into_values()
        .map(|mut risk| {
            risk.level = risk_level(risk.abnormal, risk.total);
            risk
        })
        .collect();
    // Stable: ties keep domain order.
    summary.sort_by_key(|risk| Reverse(risk.level));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, UnitConfidence};
    use std::collections::BTreeSet;

    fn make_finding(test_id: &str, domains: &[RiskDomain], severity: Severity) -> Finding {
        Finding {
            test_id: test_id.into(),
            display_name: test_id.into(),
            value: Some(1.0),
            value_text: None,
            unit: String::new(),
            direction: if severity == Severity::None {
                Direction::Normal
            } else {
                Direction::High
            },
            severity,
            risk_domains: domains.iter().copied().collect::<BTreeSet<_>>(),
            unit_confidence: UnitConfidence::Exact,
            source_offset: 0,
        }
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(risk_level(0, 5), RiskLevel::Normal);
        assert_eq!(risk_level(1, 5), RiskLevel::Low);
        assert_eq!(risk_level(2, 5), RiskLevel::Moderate);
        assert_eq!(risk_level(3, 5), RiskLevel::Moderate);
        assert_eq!(risk_level(4, 5), RiskLevel::High);
        assert_eq!(risk_level(1, 1), RiskLevel::High);
        assert_eq!(risk_level(0, 0), RiskLevel::Normal);
    }

    #[test]
    fn sorted_by_level_then_domain() {
        let findings = vec![
            make_finding("hemoglobin", &[RiskDomain::Blood], Severity::None),
            make_finding("tsh", &[RiskDomain::Thyroid], Severity::Mild),
            make_finding("ldl", &[RiskDomain::Cardiovascular], Severity::None),
            make_finding(
                "fasting_glucose",
                &[RiskDomain::Metabolic],
                Severity::Critical,
            ),
        ];
        let summary = risk_summary(&findings);
        let order: Vec<(RiskDomain, RiskLevel)> =
            summary.iter().map(|r| (r.domain, r.level)).collect();
        assert_eq!(
            order,
            vec![
                (RiskDomain::Metabolic, RiskLevel::High),
                (RiskDomain::Thyroid, RiskLevel::High),
                (RiskDomain::Cardiovascular, RiskLevel::Normal),
                (RiskDomain::Blood, RiskLevel::Normal),
            ]
        );
        assert_eq!(summary[0].highest_severity, Severity::Critical);
    }

    #[test]
    fn multi_domain_findings_count_in_each() {
        let findings = vec![
            make_finding(
                "potassium",
                &[RiskDomain::Electrolytes, RiskDomain::Cardiovascular],
                Severity::Moderate,
            ),
            make_finding("hdl", &[RiskDomain::Cardiovascular], Severity::None),
            make_finding("ldl", &[RiskDomain::Cardiovascular], Severity::None),
        ];
        let summary = risk_summary(&findings);
        let cardio = summary
            .iter()
            .find(|r| r.domain == RiskDomain::Cardiovascular)
            .unwrap();
        assert_eq!((cardio.abnormal, cardio.total), (1, 3));
        assert_eq!(cardio.level, RiskLevel::Low);
        assert_eq!(cardio.test_ids, vec!["potassium", "hdl", "ldl"]);

        let electrolytes = summary
            .iter()
            .find(|r| r.domain == RiskDomain::Electrolytes)
            .unwrap();
        assert_eq!(electrolytes.level, RiskLevel::High);
        assert_eq!(electrolytes.highest_severity, Severity::Moderate);
    }

    #[test]
    fn empty_findings() {
        assert!(risk_summary(&[]).is_empty());
    }
}
