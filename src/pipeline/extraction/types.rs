use serde::Serialize;

use crate::models::AbnormalFlag;

/// Reference range printed on the report next to the value.
/// Either side may be missing (`< 200`, `≥ 90`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct InlineRange {
    pub low: Option<f64>,
    pub high: Option<f64>,
}

/// One candidate test row as it appears in the normalized text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawMatch {
    pub raw_test_label: String,
    /// Numeric token as printed, or the qualitative text for keyword rows.
    pub raw_value: String,
    /// Possibly empty.
    pub raw_unit: String,
    /// Byte offset of the row in the normalized text.
    pub source_offset: usize,
    pub line_number: usize,
    pub inline_range: Option<InlineRange>,
    pub report_flag: Option<AbnormalFlag>,
    /// True when `raw_value` is a keyword rather than a number.
    pub qualitative: bool,
}

/// A raw match whose label resolved to a registry test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedMatch {
    pub test_id: String,
    pub raw: RawMatch,
}
