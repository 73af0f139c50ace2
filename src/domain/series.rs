// Time series data domain models
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// Values one entity attribute took, aligned with [`EntitySeries::index`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeSeries {
    pub name: String,
    pub values: Vec<serde_json::Value>,
}

/// Time-indexed table of an entity's attribute values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySeries {
    pub entity_id: String,
    /// Unix epoch milliseconds, one per row.
    pub index: Vec<i64>,
    pub attributes: Vec<AttributeSeries>,
}

impl EntitySeries {
    pub fn new(entity_id: String, index: Vec<i64>, attributes: Vec<AttributeSeries>) -> Self {
        Self {
            entity_id,
            index,
            attributes,
        }
    }

    pub fn empty(entity_id: impl Into<String>) -> Self {
        Self::new(entity_id.into(), Vec::new(), Vec::new())
    }
}

/// Which slice of a series to fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesQuery {
    pub entries_from_latest: Option<u32>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl SeriesQuery {
    pub fn latest(entries: u32) -> Self {
        Self {
            entries_from_latest: Some(entries),
            ..Default::default()
        }
    }

    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            entries_from_latest: None,
            from: Some(from),
            to: Some(to),
        }
    }
}

/// Parse a timestamp as stored by the time-series database. Offsets are
/// honoured; timestamps without one are taken to be UTC.
pub fn parse_timestamp_ms(value: &str) -> Option<i64> {
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| t.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_with_offset() {
        assert_eq!(parse_timestamp_ms("1970-01-01T00:00:01.500+00:00"), Some(1500));
        assert_eq!(parse_timestamp_ms("1970-01-01T01:00:00+01:00"), Some(0));
    }

    #[test]
    fn test_parse_timestamp_without_offset() {
        assert_eq!(parse_timestamp_ms("1970-01-01T00:00:02.000"), Some(2000));
        assert_eq!(parse_timestamp_ms("1970-01-01T00:00:03"), Some(3000));
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert_eq!(parse_timestamp_ms("yesterday"), None);
    }
}
