pub mod cli;
pub mod config;
pub mod insights; // Health score + per-domain risk summary
pub mod models;
pub mod pipeline;
pub mod pipeline_config;
pub mod registry;

pub use models::{Finding, Report};
pub use pipeline::LabReportProcessor;
pub use pipeline_config::PipelineConfig;
pub use registry::BenchmarkRegistry;
