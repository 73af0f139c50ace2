// Data source trait for time series access
use crate::domain::fiware::FiwareContext;
use crate::domain::series::{EntitySeries, SeriesQuery};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Read access to the tenant-scoped time series store.
///
/// Every call carries the [`FiwareContext`] of the dashboard making it, so one
/// source can serve all tenants.
#[async_trait]
pub trait TimeSeriesSource: Send + Sync {
    /// Series of a single entity
    async fn entity_series(
        &self,
        ctx: &FiwareContext,
        entity_id: &str,
        entity_type: &str,
        query: &SeriesQuery,
    ) -> anyhow::Result<EntitySeries>;

    /// Series of every entity of a type, keyed by entity ID
    async fn entity_type_series(
        &self,
        ctx: &FiwareContext,
        entity_type: &str,
        query: &SeriesQuery,
    ) -> anyhow::Result<BTreeMap<String, EntitySeries>>;

    /// IDs of the entities of a type that have data
    async fn entity_ids(&self, ctx: &FiwareContext, entity_type: &str) -> anyhow::Result<Vec<String>>;
}
