// Entities frame board - Every entity of a type within a time window
use crate::application::dashboard::{BoardContext, Dashboard, DashboardBuilder, Layout};
use crate::domain::fiware::FiwareContext;
use crate::presentation::app_state::BoardState;
use crate::presentation::handlers::{entity_type_window, inspection_report_window};
use axum::routing::get;
use std::sync::Arc;

pub struct EntitiesFrameBoard {
    title: &'static str,
    entity_type: &'static str,
    explanation: &'static str,
}

impl EntitiesFrameBoard {
    pub const fn new(title: &'static str, entity_type: &'static str, explanation: &'static str) -> Self {
        Self {
            title,
            entity_type,
            explanation,
        }
    }
}

impl DashboardBuilder for EntitiesFrameBoard {
    fn build(&self, mut dashboard: Dashboard, ctx: &BoardContext) -> anyhow::Result<Dashboard> {
        // Loaded on demand only, so no refresh timer.
        dashboard.set_layout(Layout {
            title: self.title.to_string(),
            tenant: ctx.address.tenant().to_string(),
            service_path: ctx.address.service_path(),
            explanation: self.explanation.to_string(),
            refresh_rate_millis: None,
            endpoints: vec!["series".to_string(), "report".to_string()],
        });

        let state = Arc::new(BoardState {
            source: ctx.source.clone(),
            fiware: FiwareContext::from(&ctx.address),
            entity_type: self.entity_type,
        });
        // `/series` has the raw frames, `/report` one inspection verdict per entity.
        let dashboard = dashboard
            .route("/series", get(entity_type_window).with_state(state.clone()))?
            .route("/report", get(inspection_report_window).with_state(state))?;

        Ok(dashboard)
    }
}
