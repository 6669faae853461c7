//! Registry file format and load-time validation.
//!
//! The raw structs mirror the JSON one to one and reject unknown fields, so a
//! typo in a hand-edited registry fails loudly instead of silently dropping
//! a threshold.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Deserialize;

use super::alias::normalize_label;
use super::units::{UnitConversion, UnitFamily};
use super::RegistryError;
use crate::models::{BenchmarkEntry, Direction, QualitativeTable, RiskDomain};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RegistryFile {
    #[serde(default)]
    pub unit_families: BTreeMap<String, Vec<FamilyRow>>,
    pub tests: Vec<BenchmarkSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct FamilyRow {
    pub unit: String,
    pub factor: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct BenchmarkSpec {
    pub test_id: String,
    pub display_name: String,
    #[serde(default)]
    pub canonical_unit: String,
    #[serde(default)]
    pub low_bound: Option<f64>,
    #[serde(default)]
    pub high_bound: Option<f64>,
    #[serde(default)]
    pub risk_domains: Vec<RiskDomain>,
    #[serde(default)]
    pub critical_low: Option<f64>,
    #[serde(default)]
    pub critical_high: Option<f64>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub qualitative: bool,
    #[serde(default)]
    pub keywords: BTreeMap<String, Direction>,
    #[serde(default)]
    pub unit_family: Option<String>,
}

/// Validated, index-ready registry content.
pub(crate) struct LoadedRegistry {
    pub entries: Vec<BenchmarkEntry>,
    pub by_id: HashMap<String, usize>,
    pub aliases: HashMap<String, usize>,
    pub families: HashMap<String, UnitFamily>,
}

pub(crate) fn parse(json: &str, source: &str) -> Result<RegistryFile, RegistryError> {
    serde_json::from_str(json).map_err(|e| RegistryError::Parse(source.to_string(), e.to_string()))
}

pub(crate) fn build(file: RegistryFile) -> Result<LoadedRegistry, RegistryError> {
    let families = build_families(file.unit_families)?;

    let mut entries: Vec<BenchmarkEntry> = Vec::with_capacity(file.tests.len());
    let mut by_id = HashMap::with_capacity(file.tests.len());
    let mut aliases: HashMap<String, usize> = HashMap::new();

    for (position, spec) in file.tests.into_iter().enumerate() {
        let test_id = spec.test_id.trim().to_string();
        if test_id.is_empty() {
            return Err(RegistryError::EmptyTestId(position));
        }
        if by_id.contains_key(&test_id) {
            return Err(RegistryError::DuplicateTestId(test_id));
        }
        validate_spec(&test_id, &spec, &families)?;

        let index = entries.len();
        let names = std::iter::once(test_id.as_str())
            .chain(std::iter::once(spec.display_name.as_str()))
            .chain(spec.aliases.iter().map(String::as_str));
        for name in names {
            let key = normalize_label(name);
            if key.is_empty() {
                continue;
            }
            match aliases.get(&key) {
                Some(&existing) if existing != index => {
                    return Err(RegistryError::AliasConflict {
                        alias: key,
                        first: entries[existing].test_id.clone(),
                        second: test_id.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    aliases.insert(key, index);
                }
            }
        }

        by_id.insert(test_id.clone(), index);
        entries.push(into_entry(test_id, spec));
    }

    Ok(LoadedRegistry {
        entries,
        by_id,
        aliases,
        families,
    })
}

fn build_families(
    raw: BTreeMap<String, Vec<FamilyRow>>,
) -> Result<HashMap<String, UnitFamily>, RegistryError> {
    let mut families = HashMap::with_capacity(raw.len());
    for (name, rows) in raw {
        let mut conversions = Vec::with_capacity(rows.len());
        for row in rows {
            if !row.factor.is_finite() || row.factor <= 0.0 {
                return Err(RegistryError::InvalidFactor {
                    family: name,
                    unit: row.unit,
                    factor: row.factor,
                });
            }
            conversions.push(UnitConversion::new(&row.unit, row.factor));
        }
        families.insert(name.clone(), UnitFamily { name, conversions });
    }
    Ok(families)
}

fn validate_spec(
    test_id: &str,
    spec: &BenchmarkSpec,
    families: &HashMap<String, UnitFamily>,
) -> Result<(), RegistryError> {
    let has_bounds = spec.low_bound.is_some() || spec.high_bound.is_some();
    if !has_bounds && !spec.qualitative {
        return Err(RegistryError::MissingBounds(test_id.to_string()));
    }
    if spec.qualitative && spec.keywords.is_empty() {
        return Err(RegistryError::MissingKeywords(test_id.to_string()));
    }

    for value in [
        spec.low_bound,
        spec.high_bound,
        spec.critical_low,
        spec.critical_high,
    ]
    .into_iter()
    .flatten()
    {
        if !value.is_finite() {
            return Err(RegistryError::NonFiniteBound(test_id.to_string()));
        }
    }

    if let (Some(low), Some(high)) = (spec.low_bound, spec.high_bound) {
        if low > high {
            return Err(RegistryError::InvertedBounds {
                test_id: test_id.to_string(),
                low,
                high,
            });
        }
    }
    if let (Some(critical), Some(low)) = (spec.critical_low, spec.low_bound) {
        if critical > low {
            return Err(RegistryError::CriticalInsideRange {
                test_id: test_id.to_string(),
                threshold: critical,
                bound: low,
            });
        }
    }
    if let (Some(critical), Some(high)) = (spec.critical_high, spec.high_bound) {
        if critical < high {
            return Err(RegistryError::CriticalInsideRange {
                test_id: test_id.to_string(),
                threshold: critical,
                bound: high,
            });
        }
    }

    if let Some(family) = &spec.unit_family {
        if !families.contains_key(family) {
            return Err(RegistryError::UnknownFamily {
                test_id: test_id.to_string(),
                family: family.clone(),
            });
        }
    }
    Ok(())
}

fn into_entry(test_id: String, spec: BenchmarkSpec) -> BenchmarkEntry {
    let qualitative = if spec.qualitative || !spec.keywords.is_empty() {
        Some(QualitativeTable::new(spec.keywords))
    } else {
        None
    };
    BenchmarkEntry {
        test_id,
        display_name: spec.display_name.trim().to_string(),
        canonical_unit: spec.canonical_unit.trim().to_string(),
        low_bound: spec.low_bound,
        high_bound: spec.high_bound,
        risk_domains: spec.risk_domains.into_iter().collect::<BTreeSet<_>>(),
        critical_low: spec.critical_low,
        critical_high: spec.critical_high,
        unit_family: spec.unit_family,
        qualitative,
    }
}
