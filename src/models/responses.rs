use serde::{Deserialize, Serialize};

use crate::models::domain::{Basemap, ComparisonView, ExtractedAttributes, LandCoverLayer, Legend};

/// Response for the analyze endpoint
///
/// Each part degrades independently: a failed narrative or map leaves its
/// field empty and adds a warning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub request_id: String,
    pub query: String,
    pub attributes: Option<ExtractedAttributes>,
    pub extraction_error: Option<String>,
    pub analysis: Option<String>,
    pub view: Option<ComparisonView>,
    pub warnings: Vec<String>,
}

/// Response for the extract endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    pub query: String,
    pub attributes: ExtractedAttributes,
}

/// Layer catalogue served to the page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueResponse {
    pub layers: Vec<LandCoverLayer>,
    pub legends: Vec<Legend>,
    pub basemaps: Vec<Basemap>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub cached_layers: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
