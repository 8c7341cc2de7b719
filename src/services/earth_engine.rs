use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use crate::core::layers::{self, Composite, LayerDefinition};
use crate::models::{LayerSource, TileLayer};

/// Errors that can occur when requesting map tiles
#[derive(Debug, Error)]
pub enum GeospatialError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Anything that can turn a layer source into an XYZ tile layer
#[async_trait]
pub trait TileProvider: Send + Sync {
    async fn tile_layer(&self, source: &LayerSource) -> Result<TileLayer, GeospatialError>;
}

/// Earth Engine REST client
///
/// Registers a map for each layer expression and hands back the tile
/// template. The access token is issued out of band.
pub struct EarthEngineClient {
    base_url: String,
    project: String,
    access_token: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct MapResponse {
    name: Option<String>,
}

impl EarthEngineClient {
    /// Create a new Earth Engine client
    pub fn new(
        base_url: String,
        project: String,
        access_token: String,
        timeout: Duration,
    ) -> Result<Self, GeospatialError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project,
            access_token,
            client,
        })
    }

    fn maps_url(&self) -> String {
        format!("{}/projects/{}/maps", self.base_url, self.project)
    }
}

#[async_trait]
impl TileProvider for EarthEngineClient {
    async fn tile_layer(&self, source: &LayerSource) -> Result<TileLayer, GeospatialError> {
        let definition = layers::definition(source.layer);
        let body = map_request(&definition, source);

        tracing::debug!("Registering {} map for {}", source.layer, definition.dataset);

        let response = self
            .client
            .post(self.maps_url())
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            return Err(GeospatialError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MapResponse = response
            .json()
            .await
            .map_err(|e| GeospatialError::InvalidResponse(e.to_string()))?;

        let name = parsed
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| GeospatialError::InvalidResponse("Missing map name".into()))?;

        Ok(TileLayer {
            layer: source.layer,
            title: source.layer.tile_title().to_string(),
            url_template: format!("{}/{}/tiles/{{z}}/{{x}}/{{y}}", self.base_url, name),
            attribution: definition.attribution.to_string(),
        })
    }
}

fn invoke(function: &str, arguments: Value) -> Value {
    json!({
        "functionInvocationValue": {
            "functionName": function,
            "arguments": arguments,
        }
    })
}

fn constant(value: impl Into<Value>) -> Value {
    json!({ "constantValue": value.into() })
}

/// Build the Earth Engine expression graph for a layer
pub fn layer_expression(definition: &LayerDefinition, source: &LayerSource) -> Value {
    let collection = invoke(
        "ImageCollection.load",
        json!({ "id": constant(definition.dataset) }),
    );

    let image = match definition.composite {
        Composite::First => invoke("Collection.first", json!({ "collection": collection })),
        Composite::Mosaic => invoke("ImageCollection.mosaic", json!({ "collection": collection })),
        Composite::Mode => {
            let mut filtered = collection;
            if let Some(range) = source.date_range {
                filtered = invoke(
                    "Collection.filter",
                    json!({
                        "collection": filtered,
                        "filter": invoke("Filter.dateRangeContains", json!({
                            "leftValue": invoke("DateRange", json!({
                                "start": constant(range.start.to_string()),
                                "end": constant(range.end.to_string()),
                            })),
                            "rightField": constant("system:time_start"),
                        })),
                    }),
                );
            }
            let region = invoke(
                "GeometryConstructors.BBox",
                json!({
                    "west": constant(source.region.west()),
                    "south": constant(source.region.south()),
                    "east": constant(source.region.east()),
                    "north": constant(source.region.north()),
                }),
            );
            filtered = invoke(
                "Collection.filter",
                json!({
                    "collection": filtered,
                    "filter": invoke("Filter.intersects", json!({
                        "leftField": constant(".all"),
                        "rightValue": region,
                    })),
                }),
            );
            invoke(
                "ImageCollection.reduce",
                json!({
                    "collection": filtered,
                    "reducer": invoke("Reducer.mode", json!({})),
                }),
            )
        }
    };

    let band = definition.band.map(|band| match definition.composite {
        Composite::Mode => format!("{}_mode", band),
        _ => band.to_string(),
    });

    let image = match band {
        Some(band) => invoke(
            "Image.select",
            json!({ "input": image, "bandSelectors": constant(vec![band]) }),
        ),
        None => image,
    };

    json!({ "result": "0", "values": { "0": image } })
}

/// Full body for `projects/{project}/maps`
pub fn map_request(definition: &LayerDefinition, source: &LayerSource) -> Value {
    let mut body = json!({
        "expression": layer_expression(definition, source),
        "fileFormat": "AUTO_JPEG_PNG",
    });

    let mut visualization = serde_json::Map::new();
    if let (Some(min), Some(max)) = (definition.min, definition.max) {
        visualization.insert("ranges".into(), json!([{ "min": min, "max": max }]));
    }
    if !definition.palette.is_empty() {
        let colors: Vec<String> = definition
            .palette
            .iter()
            .map(|c| c.trim_start_matches('#').to_string())
            .collect();
        visualization.insert("paletteColors".into(), json!(colors));
    }
    if !visualization.is_empty() {
        body["visualizationOptions"] = Value::Object(visualization);
    }

    body
}
