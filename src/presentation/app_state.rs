// Board state for dashboard data handlers
use crate::application::timeseries_source::TimeSeriesSource;
use crate::domain::fiware::FiwareContext;
use std::sync::Arc;

/// What a board's data handlers share: where to read from, on whose behalf,
/// and which entity type the board shows.
#[derive(Clone)]
pub struct BoardState {
    pub source: Arc<dyn TimeSeriesSource>,
    pub fiware: FiwareContext,
    pub entity_type: &'static str,
}
