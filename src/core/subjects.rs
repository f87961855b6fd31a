use crate::core::schema::SubjectSchema;
use crate::core::{Record, SubjectComponent};

/// Best-effort integer parse of a marks cell.
///
/// Leading whitespace and an optional sign are accepted, then the leading
/// digit run is used (`"85.5"` -> 85, `"42abc"` -> 42). Anything without a
/// digit prefix is 0, and negative values clamp to 0.
pub fn parse_marks(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..digits_end];

    if digits.is_empty() || negative {
        return 0;
    }

    // 超過 u32 範圍時取上限
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Collects every `_Obtained` / `_Max_Marks` cell of the record, in header order.
pub fn extract_components(record: &Record, schema: &SubjectSchema) -> Vec<SubjectComponent> {
    schema
        .component_columns()
        .iter()
        .map(|column| SubjectComponent {
            name: column.clone(),
            obtained: parse_marks(record.field(column)),
        })
        .collect()
}
