// QuantumLeap data source implementation
use crate::application::timeseries_source::TimeSeriesSource;
use crate::domain::fiware::FiwareContext;
use crate::domain::series::{parse_timestamp_ms, AttributeSeries, EntitySeries, SeriesQuery};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct QuantumLeapSource {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QlEntitySeries {
    entity_id: String,
    #[serde(default)]
    index: Vec<String>,
    #[serde(default)]
    attributes: Vec<QlAttribute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QlAttribute {
    attr_name: String,
    #[serde(default)]
    values: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct QlTypeSeries {
    #[serde(default)]
    entities: Vec<QlEntitySeries>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QlEntitySummary {
    entity_id: String,
}

impl From<QlEntitySeries> for EntitySeries {
    fn from(series: QlEntitySeries) -> Self {
        // Rows whose timestamp can't be read are dropped together with
        // their attribute values so the table stays aligned.
        let parsed: Vec<Option<i64>> = series.index.iter().map(|t| parse_timestamp_ms(t)).collect();
        let index = parsed.iter().flatten().copied().collect();
        let attributes = series
            .attributes
            .into_iter()
            .map(|a| AttributeSeries {
                name: a.attr_name,
                values: a
                    .values
                    .into_iter()
                    .zip(&parsed)
                    .filter(|(_, t)| t.is_some())
                    .map(|(v, _)| v)
                    .collect(),
            })
            .collect();

        EntitySeries::new(series.entity_id, index, attributes)
    }
}

impl QuantumLeapSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn entity_url(&self, entity_id: &str, entity_type: &str, query: &SeriesQuery) -> String {
        let mut params = vec![format!("type={}", urlencoding::encode(entity_type))];
        params.extend(Self::query_params(query));
        format!(
            "{}/v2/entities/{}?{}",
            self.base_url,
            urlencoding::encode(entity_id),
            params.join("&")
        )
    }

    fn type_url(&self, entity_type: &str, query: &SeriesQuery) -> String {
        let params = Self::query_params(query);
        let url = format!("{}/v2/types/{}", self.base_url, urlencoding::encode(entity_type));
        if params.is_empty() {
            url
        } else {
            format!("{}?{}", url, params.join("&"))
        }
    }

    fn entities_url(&self, entity_type: &str) -> String {
        format!(
            "{}/v2/entities?type={}",
            self.base_url,
            urlencoding::encode(entity_type)
        )
    }

    fn query_params(query: &SeriesQuery) -> Vec<String> {
        let mut params = Vec::new();
        if let Some(n) = query.entries_from_latest {
            params.push(format!("lastN={}", n));
        }
        if let Some(from) = query.from {
            let from = from.to_rfc3339_opts(SecondsFormat::Millis, true);
            params.push(format!("fromDate={}", urlencoding::encode(&from)));
        }
        if let Some(to) = query.to {
            let to = to.to_rfc3339_opts(SecondsFormat::Millis, true);
            params.push(format!("toDate={}", urlencoding::encode(&to)));
        }
        params
    }

    /// GET `url` within the tenant scope of `ctx`. `None` means QuantumLeap
    /// has no data for the request.
    async fn execute_query<T: DeserializeOwned>(&self, ctx: &FiwareContext, url: &str) -> Result<Option<T>> {
        tracing::debug!(
            "QuantumLeap query (service={}, service_path={}): {}",
            ctx.service,
            ctx.service_path,
            url
        );

        let response = self
            .client
            .get(url)
            .header(FiwareContext::SERVICE_HEADER, &ctx.service)
            .header(FiwareContext::SERVICE_PATH_HEADER, &ctx.service_path)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to send request to QuantumLeap")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("QuantumLeap query failed with status {}: {}", status, body);
        }

        let data = response
            .json::<T>()
            .await
            .context("Failed to parse QuantumLeap response")?;
        Ok(Some(data))
    }
}

#[async_trait]
impl TimeSeriesSource for QuantumLeapSource {
    async fn entity_series(
        &self,
        ctx: &FiwareContext,
        entity_id: &str,
        entity_type: &str,
        query: &SeriesQuery,
    ) -> Result<EntitySeries> {
        let url = self.entity_url(entity_id, entity_type, query);
        let series: Option<QlEntitySeries> = self.execute_query(ctx, &url).await?;
        Ok(series
            .map(EntitySeries::from)
            .unwrap_or_else(|| EntitySeries::empty(entity_id)))
    }

    async fn entity_type_series(
        &self,
        ctx: &FiwareContext,
        entity_type: &str,
        query: &SeriesQuery,
    ) -> Result<BTreeMap<String, EntitySeries>> {
        let url = self.type_url(entity_type, query);
        let series: Option<QlTypeSeries> = self.execute_query(ctx, &url).await?;
        Ok(series
            .map(|s| {
                s.entities
                    .into_iter()
                    .map(|e| (e.entity_id.clone(), EntitySeries::from(e)))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn entity_ids(&self, ctx: &FiwareContext, entity_type: &str) -> Result<Vec<String>> {
        let url = self.entities_url(entity_type);
        let summaries: Option<Vec<QlEntitySummary>> = self.execute_query(ctx, &url).await?;
        let ids: Vec<String> = summaries
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.entity_id)
            .collect();

        tracing::debug!("Found {} {} entities for {}", ids.len(), entity_type, ctx.service);
        Ok(ids)
    }
}
