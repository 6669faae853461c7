//! Report-level insights derived from the Findings: a composite health score
//! and a per-domain risk summary. Descriptive only, not clinical grading.

pub mod risk;
pub mod score;

use serde::Serialize;

use crate::models::Report;
use crate::registry::BenchmarkRegistry;

pub use risk::{risk_level, risk_summary, DomainRisk};
pub use score::health_score;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub health_score: u8,
    pub risk_summary: Vec<DomainRisk>,
}

pub fn summarize(report: &Report, registry: &BenchmarkRegistry) -> Insights {
    Insights {
        health_score: health_score(report, registry),
        risk_summary: risk_summary(&report.findings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskDomain, RiskLevel};
    use crate::pipeline::LabReportProcessor;
    use crate::pipeline_config::PipelineConfig;
    use std::sync::Arc;

    #[test]
    fn summarizes_processed_report() {
        let registry = Arc::new(BenchmarkRegistry::builtin().unwrap());
        let processor = LabReportProcessor::new(registry.clone(), PipelineConfig::default());
        let report = processor.process(
            "Hemoglobin 14.1 g/dL\nTSH 9.2 mIU/L\nFree T4 1.1 ng/dL\nSodium 140 mEq/L",
        );
        let insights = summarize(&report, &registry);

        assert!(insights.health_score < 100);
        assert!(insights.health_score > 50);
        assert_eq!(insights.risk_summary[0].domain, RiskDomain::Thyroid);
        assert_eq!(insights.risk_summary[0].level, RiskLevel::Moderate);
        assert_eq!(insights.risk_summary.len(), 3);
    }

    #[test]
    fn empty_report() {
        let registry = BenchmarkRegistry::builtin().unwrap();
        let insights = summarize(&Report::empty(uuid::Uuid::nil()), &registry);
        assert_eq!(insights.health_score, 100);
        assert!(insights.risk_summary.is_empty());
    }
}
