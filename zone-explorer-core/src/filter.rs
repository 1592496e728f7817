//! Record filter and sort
//!
//! Applied to the cached record list every time a zone is expanded, with the
//! allow-list read fresh from settings. The cache itself keeps every record.

use std::cmp::Ordering;

use crate::types::AppRecord;

/// Keep records whose type is in `allowed_types` (case-insensitive) and sort
/// them by type, then by name.
///
/// Names compare case-insensitively first and fall back to the exact string,
/// so the order is total and the function is idempotent.
pub fn filter_and_sort(records: &[AppRecord], allowed_types: &[String]) -> Vec<AppRecord> {
    let mut kept: Vec<AppRecord> = records
        .iter()
        .filter(|r| {
            allowed_types
                .iter()
                .any(|t| t.trim().eq_ignore_ascii_case(r.record_type.as_str()))
        })
        .cloned()
        .collect();
    kept.sort_by(compare_records);
    kept
}

fn compare_records(a: &AppRecord, b: &AppRecord) -> Ordering {
    a.record_type
        .as_str()
        .cmp(b.record_type.as_str())
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
