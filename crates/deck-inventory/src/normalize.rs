//! Normalization of raw provider records.

use crate::entry::{AppEntry, RawAppRecord};
use feruca::Collator;
use serde_json::Value;
use std::cmp::Ordering;

/// Sentinel for any missing text field.
pub const UNKNOWN: &str = "Unknown";

/// Sentinel package id when the provider omitted one.
pub const UNKNOWN_PACKAGE: &str = "unknown.package";

/// Normalize a raw record into an `AppEntry`.
///
/// Empty strings count as missing. `force_personal` is set for providers
/// without profile awareness; otherwise only a literal `true` marks a work app.
pub fn normalize(raw: &RawAppRecord, force_personal: bool) -> AppEntry {
    let package_name = non_empty(raw.package_name.as_deref());

    let display_name = non_empty(raw.app_name.as_deref())
        .or_else(|| package_name.and_then(|p| p.rsplit('.').next()).filter(|s| !s.is_empty()))
        .unwrap_or(UNKNOWN)
        .to_string();

    let is_work_profile = !force_personal && matches!(raw.is_work_profile, Some(Value::Bool(true)));

    AppEntry {
        display_name,
        package_id: package_name.unwrap_or(UNKNOWN_PACKAGE).to_string(),
        version_name: non_empty(raw.version_name.as_deref())
            .unwrap_or(UNKNOWN)
            .to_string(),
        version_code: version_code_text(raw.version_code.as_ref()),
        is_work_profile,
    }
}

/// Locale-aware ordering of display names using the CLDR root collation,
/// with exact comparison as the tie-breaker.
pub fn compare_display_names(a: &str, b: &str) -> Ordering {
    collate(&mut Collator::default(), a, b)
}

/// Stable sort by display name.
pub fn sort_entries(entries: &mut [AppEntry]) {
    let mut collator = Collator::default();
    entries.sort_by(|a, b| collate(&mut collator, &a.display_name, &b.display_name));
}

fn collate(collator: &mut Collator, a: &str, b: &str) -> Ordering {
    collator.collate(a, b).then_with(|| a.cmp(b))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

fn version_code_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => UNKNOWN.to_string(),
    }
}
