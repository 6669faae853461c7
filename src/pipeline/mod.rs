pub mod normalize;
pub mod extraction;
pub mod reconcile;
pub mod classify;
pub mod aggregate;
pub mod validation; // Plausibility and printed-flag checks
pub mod processor;

pub use processor::LabReportProcessor;
