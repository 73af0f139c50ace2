// Entity monitor board - Latest entries of one entity, refreshed on a timer
use crate::application::dashboard::{BoardContext, Dashboard, DashboardBuilder, Layout};
use crate::domain::fiware::FiwareContext;
use crate::presentation::app_state::BoardState;
use crate::presentation::handlers::{entity_ids, latest_entity_series};
use axum::routing::get;
use std::sync::Arc;

pub const GRAPH_REFRESH_RATE_MILLIS: u64 = 5 * 1000;

pub struct EntityMonitorBoard {
    title: &'static str,
    entity_type: &'static str,
    explanation: &'static str,
}

impl EntityMonitorBoard {
    pub const fn new(title: &'static str, entity_type: &'static str, explanation: &'static str) -> Self {
        Self {
            title,
            entity_type,
            explanation,
        }
    }
}

impl DashboardBuilder for EntityMonitorBoard {
    fn build(&self, mut dashboard: Dashboard, ctx: &BoardContext) -> anyhow::Result<Dashboard> {
        dashboard.set_layout(Layout {
            title: self.title.to_string(),
            tenant: ctx.address.tenant().to_string(),
            service_path: ctx.address.service_path(),
            explanation: self.explanation.to_string(),
            refresh_rate_millis: Some(GRAPH_REFRESH_RATE_MILLIS),
            endpoints: vec!["entities".to_string(), "series".to_string()],
        });

        let state = Arc::new(BoardState {
            source: ctx.source.clone(),
            fiware: FiwareContext::from(&ctx.address),
            entity_type: self.entity_type,
        });
        let dashboard = dashboard
            .route("/entities", get(entity_ids).with_state(state.clone()))?
            .route("/series", get(latest_entity_series).with_state(state))?;

        Ok(dashboard)
    }
}
