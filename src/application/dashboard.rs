// Dashboard app - One isolated, address-scoped dashboard instance
use crate::application::timeseries_source::TimeSeriesSource;
use crate::domain::path_address::{PathAddress, PathError};
use axum::{
    routing::{get, MethodRouter},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

/// Figure template and UI theme every dashboard is rendered with.
pub const THEME: &str = "slate";

/// Routes every dashboard serves itself.
const RESERVED_ROUTES: [&str; 2] = ["/", "/_config"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("route {0} is reserved for the dashboard itself")]
    Reserved(String),

    #[error("route {0} is already taken")]
    Duplicate(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardConfig {
    /// Base path the browser uses to reach this dashboard; ends with `/`.
    pub requests_pathname_prefix: String,
    pub theme: &'static str,
}

/// Page description the browser renders and then keeps refreshing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: String,
    pub tenant: String,
    pub service_path: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_rate_millis: Option<u64>,
    /// Data endpoints relative to the dashboard base path.
    pub endpoints: Vec<String>,
}

/// Everything a builder may need besides the dashboard itself.
#[derive(Clone)]
pub struct BoardContext {
    pub address: PathAddress,
    pub source: Arc<dyn TimeSeriesSource>,
}

/// Populates a freshly created dashboard with its layout and data endpoints.
///
/// Called exactly once per mounted dashboard, synchronously, at startup.
pub trait DashboardBuilder: Send + Sync {
    fn build(&self, dashboard: Dashboard, ctx: &BoardContext) -> anyhow::Result<Dashboard>;
}

impl<F> DashboardBuilder for F
where
    F: Fn(Dashboard, &BoardContext) -> anyhow::Result<Dashboard> + Send + Sync,
{
    fn build(&self, dashboard: Dashboard, ctx: &BoardContext) -> anyhow::Result<Dashboard> {
        self(dashboard, ctx)
    }
}

pub struct Dashboard {
    config: DashboardConfig,
    layout: Option<Layout>,
    routes: Vec<String>,
    router: Router,
}

impl Dashboard {
    pub fn new(requests_pathname_prefix: impl Into<String>) -> Self {
        Self {
            config: DashboardConfig {
                requests_pathname_prefix: requests_pathname_prefix.into(),
                theme: THEME,
            },
            layout: None,
            routes: Vec::new(),
            router: Router::new(),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Work out which tenant and service path this dashboard serves from the
    /// base path it was configured with.
    pub fn address(&self) -> Result<PathAddress, PathError> {
        PathAddress::parse(&self.config.requests_pathname_prefix)
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = Some(layout);
    }

    /// Add one of the board's data endpoints. `path` is relative to the base
    /// path; `/`, `/_config` and paths already added are refused.
    pub fn route(mut self, path: &str, handler: MethodRouter) -> Result<Self, RouteError> {
        if RESERVED_ROUTES.contains(&path) {
            return Err(RouteError::Reserved(path.to_string()));
        }
        if self.routes.iter().any(|r| r == path) {
            return Err(RouteError::Duplicate(path.to_string()));
        }

        self.routes.push(path.to_string());
        self.router = self.router.route(path, handler);
        Ok(self)
    }

    pub fn into_router(self) -> Router {
        let config = self.config;
        let mut router = self
            .router
            .route("/_config", get(move || async move { Json(config) }));

        if let Some(layout) = self.layout {
            router = router.route("/", get(move || async move { Json(layout) }));
        }

        router
    }
}
