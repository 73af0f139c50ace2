// Inspection reports - Latest verdict per inspected item
use super::series::EntitySeries;
use serde::Serialize;
use std::collections::BTreeMap;

pub const CONFORMANCE_ATTRIBUTE: &str = "conformance_indicator";
pub const OKAY_ATTRIBUTE: &str = "okay";
pub const SPEC_ATTRIBUTE: &str = "spec";

/// How far one inspected item is from its spec. Raw material and tweezers
/// inspections both collapse into this shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionReport {
    pub id: String,
    /// 0 means no significant deviation, 1 means probably scrap.
    pub conformance: f64,
    pub scrap: bool,
    pub spec: String,
}

impl InspectionReport {
    /// Placeholder row plotted while there is no data.
    pub fn empty() -> Self {
        Self {
            id: String::new(),
            conformance: 0.0,
            scrap: false,
            spec: String::new(),
        }
    }

    /// Report built from the most recent row of an entity's series. Items
    /// are normally inspected once, but a re-inspection supersedes earlier
    /// ones. `None` when the series has no rows.
    pub fn from_entity_series(series: &EntitySeries) -> Option<Self> {
        let row = most_recent_row(&series.index)?;
        let value = |name: &str| {
            series
                .attributes
                .iter()
                .find(|a| a.name == name)
                .and_then(|a| a.values.get(row))
        };

        Some(Self {
            id: series.entity_id.clone(),
            conformance: value(CONFORMANCE_ATTRIBUTE)
                .and_then(|v| v.as_f64())
                .unwrap_or(1.0),
            scrap: !value(OKAY_ATTRIBUTE)
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            spec: value(SPEC_ATTRIBUTE)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string(),
        })
    }
}

/// One report per entity, in entity ID order.
pub fn report_frame(frames: &BTreeMap<String, EntitySeries>) -> Vec<InspectionReport> {
    frames
        .values()
        .filter_map(InspectionReport::from_entity_series)
        .collect()
}

// Position of the latest timestamp; the first one wins a tie.
fn most_recent_row(index: &[i64]) -> Option<usize> {
    index
        .iter()
        .enumerate()
        .fold(None, |latest: Option<(usize, i64)>, (row, &t)| match latest {
            Some((_, best)) if best >= t => latest,
            _ => Some((row, t)),
        })
        .map(|(row, _)| row)
}
