//! Benchmark registry: reference ranges, aliases and unit families.
//!
//! Loaded once at startup, validated, then shared read-only behind an `Arc`.
//! Every malformed entry is a fatal [`RegistryError`]; nothing downstream
//! ever sees a half-valid registry.

pub mod alias;
mod loader;
pub mod units;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config;
use crate::models::BenchmarkEntry;
use alias::label_variants;
use units::{normalize_unit_symbol, UnitConversion, UnitFamily};

/// Default registry compiled into the binary.
const BUILTIN_REGISTRY: &str = include_str!("../../resources/benchmarks.json");
const BUILTIN_SOURCE: &str = "builtin";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry read failed ({0}): {1}")]
    Read(String, String),

    #[error("Registry parse failed ({0}): {1}")]
    Parse(String, String),

    #[error("Test entry #{0} has an empty test_id")]
    EmptyTestId(usize),

    #[error("Duplicate test_id: {0}")]
    DuplicateTestId(String),

    #[error("Test {0} has no reference bounds and is not qualitative")]
    MissingBounds(String),

    #[error("Qualitative test {0} has no keyword table")]
    MissingKeywords(String),

    #[error("Test {0} has a non-finite bound")]
    NonFiniteBound(String),

    #[error("Test {test_id}: low bound {low} exceeds high bound {high}")]
    InvertedBounds { test_id: String, low: f64, high: f64 },

    #[error("Test {test_id}: critical threshold {threshold} lies inside normal bound {bound}")]
    CriticalInsideRange {
        test_id: String,
        threshold: f64,
        bound: f64,
    },

    #[error("Alias '{alias}' maps to both {first} and {second}")]
    AliasConflict {
        alias: String,
        first: String,
        second: String,
    },

    #[error("Test {test_id} references unknown unit family '{family}'")]
    UnknownFamily { test_id: String, family: String },

    #[error("Unit family {family}: factor {factor} for {unit} must be finite and positive")]
    InvalidFactor {
        family: String,
        unit: String,
        factor: f64,
    },
}

/// Immutable lookup tables over the benchmark entries.
#[derive(Debug)]
pub struct BenchmarkRegistry {
    source: String,
    entries: Vec<BenchmarkEntry>,
    by_id: HashMap<String, usize>,
    aliases: HashMap<String, usize>,
    families: HashMap<String, UnitFamily>,
}

impl BenchmarkRegistry {
    /// The registry bundled with the binary.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json(BUILTIN_REGISTRY, BUILTIN_SOURCE)
    }

    /// Load a registry file from disk.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let source = path.display().to_string();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::Read(source.clone(), e.to_string()))?;
        Self::from_json(&json, &source)
    }

    /// Parse and validate registry JSON. `source` only labels errors and logs.
    pub fn from_json(json: &str, source: &str) -> Result<Self, RegistryError> {
        let file = loader::parse(json, source)?;
        let loaded = loader::build(file)?;

        tracing::info!(
            source,
            tests = loaded.entries.len(),
            aliases = loaded.aliases.len(),
            unit_families = loaded.families.len(),
            "Benchmark registry loaded"
        );

        Ok(Self {
            source: source.to_string(),
            entries: loaded.entries,
            by_id: loaded.by_id,
            aliases: loaded.aliases,
            families: loaded.families,
        })
    }

    /// Pick the registry the process should use.
    ///
    /// First match wins: explicit path, `LABLENS_REGISTRY`, the per-user
    /// `benchmarks.json` in the config directory, then the bundled default.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, RegistryError> {
        match locate(explicit) {
            Some(path) => Self::load(&path),
            None => Self::builtin(),
        }
    }

    /// Where the registry came from (`builtin` or a file path).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn lookup(&self, test_id: &str) -> Option<&BenchmarkEntry> {
        self.by_id.get(test_id).map(|&i| &self.entries[i])
    }

    /// Map a raw report label to its canonical test_id.
    pub fn resolve_alias(&self, raw_label: &str) -> Option<&str> {
        label_variants(raw_label)
            .iter()
            .find_map(|variant| self.aliases.get(variant))
            .map(|&i| self.entries[i].test_id.as_str())
    }

    /// Alias resolution followed by lookup.
    pub fn resolve(&self, raw_label: &str) -> Option<&BenchmarkEntry> {
        self.resolve_alias(raw_label)
            .and_then(|test_id| self.lookup(test_id))
    }

    /// Entries in registry-file order.
    pub fn entries(&self) -> &[BenchmarkEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every normalized alias key with the test_id it maps to, sorted by key.
    pub fn alias_keys(&self) -> Vec<(&str, &str)> {
        let mut keys: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(k, &i)| (k.as_str(), self.entries[i].test_id.as_str()))
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn family(&self, name: &str) -> Option<&UnitFamily> {
        self.families.get(name)
    }

    /// Conversion row for a printed unit within the test's unit family.
    pub fn conversion_for(&self, test_id: &str, raw_unit: &str) -> Option<&UnitConversion> {
        let entry = self.lookup(test_id)?;
        let family = self.family(entry.unit_family.as_deref()?)?;
        family.find(raw_unit)
    }

    /// True when the printed unit is the test's canonical unit.
    pub fn is_canonical_unit(&self, test_id: &str, raw_unit: &str) -> bool {
        self.lookup(test_id).is_some_and(|entry| {
            let symbol = normalize_unit_symbol(raw_unit);
            !symbol.is_empty() && symbol == normalize_unit_symbol(&entry.canonical_unit)
        })
    }
}

fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(config::REGISTRY_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    config::user_registry_path().filter(|p| p.is_file())
}
