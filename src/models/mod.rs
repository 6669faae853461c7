pub mod benchmark;
pub mod enums;
pub mod finding;
pub mod report;

pub use benchmark::{BenchmarkEntry, QualitativeTable};
pub use enums::{
    AbnormalFlag, Direction, ModelError, RiskDomain, RiskLevel, Severity, UnitConfidence,
};
pub use finding::Finding;
pub use report::{
    Diagnostics, DuplicateConflict, ExtractionMiss, LabelCorrection, Report, ValidationWarning,
};
