//! Report Aggregator: merges classified rows by test_id.
//!
//! Order is first occurrence; the value is the last one seen. Differing
//! repeats are recorded as conflicts, identical repeats merge silently.

use std::collections::HashMap;

use crate::models::{DuplicateConflict, UnitConfidence};
use crate::pipeline::classify::ClassifiedRow;

/// Rows after merging, plus what the merge had to overwrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregated {
    pub rows: Vec<ClassifiedRow>,
    pub duplicate_conflicts: Vec<DuplicateConflict>,
}

impl Aggregated {
    /// test_ids whose unit could not be reconciled, in report order.
    pub fn unresolved_units(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|row| row.finding.unit_confidence == UnitConfidence::Unresolved)
            .map(|row| row.finding.test_id.clone())
            .collect()
    }
}

pub fn aggregate(rows: Vec<ClassifiedRow>) -> Aggregated {
    let mut out = Aggregated::default();
    let mut position: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let Some(&index) = position.get(&row.finding.test_id) else {
            position.insert(row.finding.test_id.clone(), out.rows.len());
            out.rows.push(row);
            continue;
        };

        let previous = &out.rows[index].finding;
        if !previous.same_reading(&row.finding) {
            tracing::debug!(
                test_id = %row.finding.test_id,
                previous = %previous.display_value(),
                replacement = %row.finding.display_value(),
                "Duplicate test, later value kept"
            );
            out.duplicate_conflicts.push(DuplicateConflict {
                test_id: row.finding.test_id.clone(),
                previous: previous.display_value(),
                replacement: row.finding.display_value(),
                previous_offset: previous.source_offset,
                replacement_offset: row.finding.source_offset,
            });
        }
        out.rows[index] = row;
    }
    out
}
