// HTTP request handlers
use crate::domain::inspection_report::{report_frame, InspectionReport};
use crate::domain::series::{EntitySeries, SeriesQuery};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::BoardState;
use crate::presentation::inputs::{entries_from_latest, from_datetime_local};
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct Version {
    pub dazzler: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct LatestQuery {
    pub entity_id: Option<String>,
    pub entries_from_latest: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Service version
pub async fn read_version() -> Json<Version> {
    Json(Version {
        dazzler: env!("CARGO_PKG_VERSION"),
    })
}

/// IDs of the entities the board can show
pub async fn entity_ids(headers: HeaderMap, State(state): State<Arc<BoardState>>) -> impl IntoResponse {
    let ids = match state.source.entity_ids(&state.fiware, state.entity_type).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(
                "Error fetching {} entity IDs for {}: {:#}",
                state.entity_type,
                state.fiware.service,
                e
            );
            Vec::new()
        }
    };

    respond(&ids, &headers).await
}

/// Latest entries of the selected entity
pub async fn latest_entity_series(
    Query(query): Query<LatestQuery>,
    headers: HeaderMap,
    State(state): State<Arc<BoardState>>,
) -> impl IntoResponse {
    let Some(entity_id) = query.entity_id.filter(|id| !id.is_empty()) else {
        return respond(&EntitySeries::empty(""), &headers).await;
    };

    let series_query = SeriesQuery::latest(entries_from_latest(query.entries_from_latest));
    let series = match state
        .source
        .entity_series(&state.fiware, &entity_id, state.entity_type, &series_query)
        .await
    {
        Ok(series) => series,
        Err(e) => {
            tracing::warn!("Error fetching series of {}: {:#}", entity_id, e);
            EntitySeries::empty(entity_id)
        }
    };

    respond(&series, &headers).await
}

/// Every entity of the board's type within the selected time window
pub async fn entity_type_window(
    Query(query): Query<WindowQuery>,
    headers: HeaderMap,
    State(state): State<Arc<BoardState>>,
) -> impl IntoResponse {
    let frames = fetch_window(&state, &query).await;
    respond(&frames, &headers).await
}

/// Latest inspection verdict of every item inspected within the selected
/// time window. No data gives a single empty row so there is still
/// something to plot.
pub async fn inspection_report_window(
    Query(query): Query<WindowQuery>,
    headers: HeaderMap,
    State(state): State<Arc<BoardState>>,
) -> impl IntoResponse {
    let frames = fetch_window(&state, &query).await;
    let mut reports = report_frame(&frames);
    if reports.is_empty() {
        reports.push(InspectionReport::empty());
    }
    respond(&reports, &headers).await
}

async fn fetch_window(state: &BoardState, query: &WindowQuery) -> BTreeMap<String, EntitySeries> {
    let from = from_datetime_local(query.from.as_deref());
    let to = from_datetime_local(query.to.as_deref());

    match (from, to) {
        (Some(from), Some(to)) => state
            .source
            .entity_type_series(&state.fiware, state.entity_type, &SeriesQuery::between(from, to))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Error fetching {} series: {:#}", state.entity_type, e);
                BTreeMap::new()
            }),
        _ => BTreeMap::new(),
    }
}

async fn respond<T: Serialize>(data: &T, headers: &HeaderMap) -> axum::response::Response {
    match json_response(data, accepts_brotli(headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
