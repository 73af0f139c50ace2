// Parsing of dashboard UI input values
use chrono::{DateTime, NaiveDateTime, Utc};

pub const DEFAULT_ENTRIES_FROM_LATEST: u32 = 100;
pub const MAX_ENTRIES_FROM_LATEST: u32 = 1000;

/// Number of latest entries to plot, defaulting to 100 and kept within the
/// bounds of the UI's number input.
pub fn entries_from_latest(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_ENTRIES_FROM_LATEST)
        .clamp(1, MAX_ENTRIES_FROM_LATEST)
}

/// Parse the value of an HTML `datetime-local` input, e.g. `2024-03-01T08:30`.
/// The browser sends no offset; the value is read as UTC.
pub fn from_datetime_local(value: Option<&str>) -> Option<DateTime<Utc>> {
    let value = value?.trim();
    ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|t| t.and_utc())
}
