//! Command-line surface: `lablens analyze` and `lablens registry`.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;

use crate::config;
use crate::insights::{summarize, Insights};
use crate::models::Report;
use crate::pipeline::LabReportProcessor;
use crate::pipeline_config::{ConfigError, NumberLocale, PipelineConfig};
use crate::registry::{BenchmarkRegistry, RegistryError};

#[derive(Parser, Debug)]
#[command(name = "lablens", version)]
#[command(about = "Turn lab-report text into classified findings", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Debug-level logs on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Benchmark registry JSON (default: $LABLENS_REGISTRY, user config, built-in)
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze report text files and print the reports as JSON
    Analyze {
        /// Text files; `-` reads stdin
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Pipeline config JSON (default: user config, built-in defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the decimal convention
        #[arg(long)]
        locale: Option<LocaleArg>,

        /// Accept near-miss labels (logged in diagnostics)
        #[arg(long)]
        ocr_correction: bool,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Inspect the benchmark registry
    Registry {
        #[command(subcommand)]
        action: RegistryAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegistryAction {
    /// List every test with its unit and range
    List,
    /// Validate a registry file (or the discovered one)
    Check {
        path: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaleArg {
    Either,
    Point,
    Comma,
}

impl From<LocaleArg> for NumberLocale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::Either => NumberLocale::Either,
            LocaleArg::Point => NumberLocale::Point,
            LocaleArg::Comma => NumberLocale::Comma,
        }
    }
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot read {path}: {source}")]
    Input {
        path: String,
        source: std::io::Error,
    },

    #[error("Cannot write {path}: {source}")]
    Output {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// One analyzed input as printed by `lablens analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzedFile {
    pub file: String,
    pub report: Report,
    pub insights: Insights,
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Analyze {
            files,
            config,
            locale,
            ocr_correction,
            output,
            compact,
        } => {
            let registry = Arc::new(BenchmarkRegistry::discover(cli.registry.as_deref())?);
            let mut pipeline = PipelineConfig::discover(config.as_deref())?;
            if let Some(locale) = locale {
                pipeline.number_locale = locale.into();
            }
            pipeline.ocr_label_correction |= ocr_correction;

            let analyzed = analyze_files(&files, registry, pipeline)?;
            let json = if compact {
                serde_json::to_string(&analyzed)?
            } else {
                serde_json::to_string_pretty(&analyzed)?
            };
            write_output(output.as_deref(), &json)
        }
        Commands::Registry { action } => match action {
            RegistryAction::List => {
                let registry = BenchmarkRegistry::discover(cli.registry.as_deref())?;
                print!("{}", format_registry(&registry));
                Ok(())
            }
            RegistryAction::Check { path } => {
                let explicit = path.as_deref().or(cli.registry.as_deref());
                let registry = BenchmarkRegistry::discover(explicit)?;
                println!(
                    "ok: {} tests, {} aliases ({})",
                    registry.len(),
                    registry.alias_keys().len(),
                    registry.source()
                );
                Ok(())
            }
        },
    }
}

/// Read every input, process them in parallel, attach insights.
pub fn analyze_files(
    files: &[PathBuf],
    registry: Arc<BenchmarkRegistry>,
    pipeline: PipelineConfig,
) -> Result<Vec<AnalyzedFile>, CliError> {
    let texts = files
        .iter()
        .map(|path| read_input(path))
        .collect::<Result<Vec<String>, CliError>>()?;

    let processor = LabReportProcessor::new(registry, pipeline);
    let reports = processor.process_batch(&texts);

    Ok(files
        .iter()
        .zip(reports)
        .map(|(path, report)| AnalyzedFile {
            file: path.display().to_string(),
            insights: summarize(&report, processor.registry()),
            report,
        })
        .collect())
}

fn read_input(path: &Path) -> Result<String, CliError> {
    let err = |source| CliError::Input {
        path: path.display().to_string(),
        source,
    };
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).map_err(err)?;
        return Ok(text);
    }
    std::fs::read_to_string(path).map_err(err)
}

fn write_output(path: Option<&Path>, json: &str) -> Result<(), CliError> {
    match path {
        Some(path) => {
            std::fs::write(path, json).map_err(|source| CliError::Output {
                path: path.display().to_string(),
                source,
            })?;
            tracing::info!(path = %path.display(), "Report written");
            Ok(())
        }
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn format_registry(registry: &BenchmarkRegistry) -> String {
    let mut out = format!(
        "{} v{}: {} ({} tests)\n",
        config::APP_NAME,
        config::APP_VERSION,
        registry.source(),
        registry.len()
    );
    for entry in registry.entries() {
        let range = match (entry.low_bound, entry.high_bound) {
            (Some(low), Some(high)) => format!("{low}-{high}"),
            (Some(low), None) => format!(">= {low}"),
            (None, Some(high)) => format!("<= {high}"),
            (None, None) => "qualitative".to_string(),
        };
        out.push_str(&format!(
            "{:<22} {:<26} {:<16} {}\n",
            entry.test_id, entry.display_name, entry.canonical_unit, range
        ));
    }
    out
}
