use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tracing::Instrument;
use validator::Validate;

use crate::core::{
    layers, AttributeExtractor, ComparisonBuilder, ComparisonError, NarrativeAnalyzer,
};
use crate::models::{
    AnalysisResponse, CatalogueResponse, ErrorResponse, ExtractResponse, HealthResponse,
    LandCoverLayer, QueryRequest, ViewRequest,
};
use crate::services::CachedTileProvider;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<AttributeExtractor>,
    pub analyzer: Arc<NarrativeAnalyzer>,
    pub comparison: ComparisonBuilder,
    pub tiles: Arc<CachedTileProvider>,
    pub model_name: String,
}

/// Configure all analysis routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/layers", web::get().to(layer_catalogue))
        .route("/extract", web::post().to(extract))
        .route("/analyze", web::post().to(analyze))
        .route("/view", web::post().to(view));
}

fn error_response(status: u16, error: &str, message: String) -> HttpResponse {
    let body = ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status,
    };
    match status {
        400 => HttpResponse::BadRequest().json(body),
        422 => HttpResponse::UnprocessableEntity().json(body),
        502 => HttpResponse::BadGateway().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

fn comparison_error_response(e: ComparisonError) -> HttpResponse {
    match &e {
        ComparisonError::UnavailableLayer(_) => {
            error_response(400, "Layer not available", e.to_string())
        }
        ComparisonError::Layer { .. } => {
            error_response(502, "Failed to load map layers", e.to_string())
        }
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.model_name.clone(),
        cached_layers: state.tiles.stats().entries,
        timestamp: chrono::Utc::now(),
    })
}

/// Layer catalogue endpoint
///
/// GET /api/v1/layers
async fn layer_catalogue() -> impl Responder {
    HttpResponse::Ok().json(CatalogueResponse {
        layers: LandCoverLayer::ALL.to_vec(),
        legends: LandCoverLayer::ALL.iter().map(|l| layers::legend(*l)).collect(),
        basemaps: layers::basemaps(),
    })
}

/// Extract attributes only
///
/// POST /api/v1/extract
///
/// Request body:
/// ```json
/// { "query": "Show changes in Hyderabad from 2015 to 2023" }
/// ```
async fn extract(state: web::Data<AppState>, req: web::Json<QueryRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    match state.extractor.extract(&req.query).await {
        Ok(attributes) => HttpResponse::Ok().json(ExtractResponse {
            query: req.query.clone(),
            attributes,
        }),
        Err(e) => {
            tracing::warn!("Attribute extraction failed: {}", e);
            error_response(422, "Invalid date in model response", e.to_string())
        }
    }
}

/// Full page computation: attributes, narrative and comparison view
///
/// POST /api/v1/analyze
///
/// Request body:
/// ```json
/// {
///   "query": "string",
///   "left": "ESA Land Cover",
///   "right": "Dynamic World",
///   "legend": "Dynamic World"
/// }
/// ```
///
/// Layer fields are optional. Narrative and map failures are reported as
/// warnings; a malformed date suppresses the attribute-derived parts only.
async fn analyze(state: web::Data<AppState>, req: web::Json<QueryRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!("analyze", request_id = %request_id);

    let response = run_analysis(&state, &req, request_id).instrument(span).await;
    HttpResponse::Ok().json(response)
}

async fn run_analysis(state: &AppState, req: &QueryRequest, request_id: String) -> AnalysisResponse {
    tracing::info!("Analyzing query: {}", req.query);

    let mut warnings = Vec::new();

    let (attributes, extraction_error) = match state.extractor.extract(&req.query).await {
        Ok(attrs) => (Some(attrs), None),
        Err(e) => {
            tracing::warn!("Attribute extraction failed: {}", e);
            (None, Some(e.to_string()))
        }
    };

    let analysis = match state.analyzer.analyze(&req.query).await {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!("Narrative analysis failed: {}", e);
            warnings.push(format!("Error generating analysis: {}", e));
            None
        }
    };

    let view = match &attributes {
        Some(attrs) => match state.comparison.build(attrs, &req.selection()).await {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::error!("Comparison view failed: {}", e);
                warnings.push(format!("Error building map: {}", e));
                None
            }
        },
        None => None,
    };

    AnalysisResponse {
        request_id,
        query: req.query.clone(),
        attributes,
        extraction_error,
        analysis,
        view,
        warnings,
    }
}

/// Recompute the comparison view from user-edited inputs
///
/// POST /api/v1/view
///
/// Request body:
/// ```json
/// {
///   "longitude": 78.4867,
///   "latitude": 17.385,
///   "zoom": 11,
///   "start_date": "2015-01-01",
///   "end_date": "2023-01-01",
///   "left": "ESA Land Cover"
/// }
/// ```
async fn view(state: web::Data<AppState>, req: web::Json<ViewRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(400, "Validation failed", errors.to_string());
    }

    match state.comparison.build(&req.attributes(), &req.selection()).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => {
            tracing::warn!("Comparison view failed: {}", e);
            comparison_error_response(e)
        }
    }
}
