//! Pipeline configuration.
//!
//! Every knob has a default that reproduces the standard behavior, so an
//! empty JSON object is a valid configuration. Unknown keys are rejected.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// How `,` and `.` inside a number are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberLocale {
    /// A lone `,` or `.` between digits is the decimal mark. `1,250` with a
    /// three-digit tail is read as a thousands group.
    #[default]
    Either,
    /// `.` is decimal, `,` groups thousands.
    Point,
    /// `,` is decimal, `.` groups thousands.
    Comma,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub number_locale: NumberLocale,
    /// Accept unique near-miss labels (edit distance ≤ 2). Every correction
    /// is recorded in the report diagnostics.
    pub ocr_label_correction: bool,
    /// Lines at the head and tail of each page examined for repeated boilerplate.
    pub boilerplate_zone_lines: usize,
    /// Pages a head/tail line must repeat on to be treated as boilerplate.
    pub min_repeated_pages: usize,
    /// Flag values outside life-compatible limits.
    pub plausibility_checks: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            number_locale: NumberLocale::Either,
            ocr_label_correction: false,
            boilerplate_zone_lines: 3,
            min_repeated_pages: 2,
            plausibility_checks: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Pipeline config read failed ({0}): {1}")]
    Read(String, String),

    #[error("Pipeline config parse failed ({0}): {1}")]
    Parse(String, String),

    #[error("Invalid pipeline config: {0}")]
    Invalid(String),
}

// ═══════════════════════════════════════════════════════════
// Loading
// ═══════════════════════════════════════════════════════════

impl PipelineConfig {
    pub fn from_json(json: &str, source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError::Parse(source.to_string(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = path.display().to_string();
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(source.clone(), e.to_string()))?;
        let config = Self::from_json(&json, &source)?;
        tracing::info!(source = %source, ?config, "Pipeline config loaded");
        Ok(config)
    }

    /// Explicit path if given, else the per-user file when present, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match crate::config::user_pipeline_config_path().filter(|p| p.is_file()) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_repeated_pages < 2 {
            return Err(ConfigError::Invalid(format!(
                "min_repeated_pages must be at least 2, got {}",
                self.min_repeated_pages
            )));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
