//! Vegetation catalog backed by the Earth Engine REST `value:compute` endpoint.
//!
//! Queries are sent as serialized expression graphs. Only the handful of
//! algorithms needed for a region-mean NDVI are built here.

use crate::clients::error::ProviderError;
use crate::clients::request::send_json;
use crate::clients::vegetation_client::{CompositeReduction, DateWindow, VegetationCatalog};
use crate::config::ProviderConfig;
use crate::normalize::error::NormalizeError;
use crate::normalize::vegetation::{catalog_date, NDVI_BAND};
use crate::utils::build_http_client;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::{json, Value};

const PROVIDER: &str = "earth_engine";

pub const BOUNDARY_TABLE: &str = "FAO/GAUL/2015/level1";
pub const BOUNDARY_NAME_PROPERTY: &str = "ADM1_NAME";
pub const NDVI_COLLECTION: &str = "MODIS/061/MOD13Q1";
pub const NDVI_SCALE_FACTOR: f64 = 0.0001;
const TIME_START: &str = "system:time_start";

pub struct EarthEngineCatalog {
    http: Client,
    base_url: String,
    project: Option<String>,
    token: Option<String>,
}

impl EarthEngineCatalog {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            http: build_http_client(config.request_timeout).map_err(ProviderError::HttpClient)?,
            base_url: config.earth_engine_base_url.trim_end_matches('/').to_string(),
            project: config.earth_engine_project.clone(),
            token: config.earth_engine_token.clone(),
        })
    }

    /// Evaluates one expression node and returns its `result`.
    pub async fn compute(&self, node: Value) -> Result<Value, ProviderError> {
        let project = self
            .project
            .as_deref()
            .ok_or_else(|| ProviderError::not_configured(PROVIDER, "EARTH_ENGINE_PROJECT is not set"))?;
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| ProviderError::not_configured(PROVIDER, "EARTH_ENGINE_TOKEN is not set"))?;

        let url = format!("{}/projects/{}/value:compute", self.base_url, project);
        let request = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "expression": expression(node) }));

        let mut response: Value = send_json(request, &url).await?;
        match response.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(NormalizeError::malformed("vegetation", "compute response has no 'result'").into()),
        }
    }
}

#[async_trait]
impl VegetationCatalog for EarthEngineCatalog {
    async fn boundary_exists(&self, region: &str) -> Result<bool, ProviderError> {
        let size = self.compute(size(boundaries(region))).await?;
        Ok(size.as_u64().unwrap_or(0) > 0)
    }

    async fn reduce_latest(
        &self,
        region: &str,
        window: DateWindow,
        scale_m: f64,
    ) -> Result<CompositeReduction, ProviderError> {
        let composites = composites_in(window);
        let count = self.compute(size(composites.clone())).await?;
        if count.as_u64().unwrap_or(0) == 0 {
            return Ok(CompositeReduction::empty());
        }

        let latest = latest(composites);
        let (reduction, time_start) = tokio::try_join!(
            self.compute(region_mean(latest.clone(), region, scale_m)),
            self.compute(invoke(
                "Element.get",
                json!({ "object": latest, "property": constant(TIME_START) }),
            )),
        )?;

        Ok(CompositeReduction { reduction, time_start })
    }
}

fn expression(node: Value) -> Value {
    json!({ "result": "0", "values": { "0": node } })
}

fn invoke(function: &str, arguments: Value) -> Value {
    json!({ "functionInvocationValue": { "functionName": function, "arguments": arguments } })
}

fn constant(value: impl Into<Value>) -> Value {
    json!({ "constantValue": value.into() })
}

fn size(collection: Value) -> Value {
    invoke("Collection.size", json!({ "collection": collection }))
}

fn boundaries(region: &str) -> Value {
    invoke(
        "Collection.filter",
        json!({
            "collection": invoke("Collection.loadTable", json!({ "tableId": constant(BOUNDARY_TABLE) })),
            "filter": invoke(
                "Filter.equals",
                json!({
                    "leftField": constant(BOUNDARY_NAME_PROPERTY),
                    "rightValue": constant(region),
                }),
            ),
        }),
    )
}

fn composites_in(window: DateWindow) -> Value {
    let date = |d: NaiveDate| invoke("Date", json!({ "value": constant(catalog_date(d)) }));
    invoke(
        "Collection.filter",
        json!({
            "collection": invoke("ImageCollection.load", json!({ "id": constant(NDVI_COLLECTION) })),
            "filter": invoke(
                "Filter.dateRangeContains",
                json!({
                    "leftValue": invoke(
                        "DateRange",
                        json!({ "start": date(window.start), "end": date(window.end) }),
                    ),
                    "rightField": constant(TIME_START),
                }),
            ),
        }),
    )
}

/// Newest composite by acquisition time; ties keep catalog order.
fn latest(composites: Value) -> Value {
    invoke(
        "Collection.first",
        json!({
            "collection": invoke(
                "Collection.limit",
                json!({
                    "collection": composites,
                    "limit": constant(1),
                    "key": constant(TIME_START),
                    "ascending": constant(false),
                }),
            ),
        }),
    )
}

fn region_mean(image: Value, region: &str, scale_m: f64) -> Value {
    let ndvi = invoke(
        "Image.multiply",
        json!({
            "image1": invoke(
                "Image.select",
                json!({ "input": image, "bandSelectors": constant(json!([NDVI_BAND])) }),
            ),
            "image2": invoke("Image.constant", json!({ "value": constant(NDVI_SCALE_FACTOR) })),
        }),
    );
    let geometry = invoke(
        "Feature.geometry",
        json!({ "feature": invoke("Collection.first", json!({ "collection": boundaries(region) })) }),
    );
    invoke(
        "Image.reduceRegion",
        json!({
            "image": ndvi,
            "reducer": invoke("Reducer.mean", json!({})),
            "geometry": geometry,
            "scale": constant(scale_m),
        }),
    )
}
