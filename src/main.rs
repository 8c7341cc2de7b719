use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use landuse_lens::config::Settings;
use landuse_lens::core::{AttributeDefaults, AttributeExtractor, ComparisonBuilder, NarrativeAnalyzer};
use landuse_lens::routes::{self, AppState};
use landuse_lens::services::{CachedTileProvider, EarthEngineClient, GeminiClient, LanguageModel, TileProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

fn io_error(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, message)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let loaded = match std::env::var("LANDUSE_CONFIG") {
        Ok(path) => Settings::load_from(path),
        Err(_) => Settings::load(),
    };

    // LOG_LEVEL / LOG_FORMAT win over the [logging] section
    let logging = loaded.as_ref().map(|s| s.logging.clone()).unwrap_or_default();
    let log_level = std::env::var("LOG_LEVEL").unwrap_or(logging.level);
    let log_format = std::env::var("LOG_FORMAT").unwrap_or(logging.format);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Landuse Lens...");

    let settings = loaded.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io_error(format!("Configuration error: {}", e))
    })?;

    info!("Configuration loaded successfully");

    if settings.llm.api_key.is_empty() {
        warn!("No language model API key configured (set GOOGLE_API_KEY)");
    }
    if settings.earth_engine.project.is_empty() || settings.earth_engine.access_token.is_empty() {
        warn!("Earth Engine project or token missing (set EARTHENGINE_PROJECT / EARTHENGINE_TOKEN)");
    }

    let model: Arc<dyn LanguageModel> = Arc::new(
        GeminiClient::new(
            settings.llm.endpoint.clone(),
            settings.llm.api_key.clone(),
            settings.llm.model.clone(),
            Duration::from_secs(settings.llm.timeout_secs.unwrap_or(30)),
        )
        .map_err(|e| io_error(format!("Failed to create language model client: {}", e)))?,
    );

    info!("Language model client initialized ({})", settings.llm.model);

    let earth_engine: Arc<dyn TileProvider> = Arc::new(
        EarthEngineClient::new(
            settings.earth_engine.endpoint.clone(),
            settings.earth_engine.project.clone(),
            settings.earth_engine.access_token.clone(),
            Duration::from_secs(settings.earth_engine.timeout_secs.unwrap_or(60)),
        )
        .map_err(|e| io_error(format!("Failed to create Earth Engine client: {}", e)))?,
    );

    let tiles = Arc::new(CachedTileProvider::new(
        earth_engine,
        settings.layers.cache_size,
        settings.layers.cache_ttl_secs,
    ));

    info!(
        "Earth Engine client initialized (layer cache: {} entries, TTL: {}s)",
        settings.layers.cache_size, settings.layers.cache_ttl_secs
    );

    let defaults = AttributeDefaults::from(&settings.extraction);
    info!("Attribute defaults: {:?}", defaults);

    let app_state = AppState {
        extractor: Arc::new(AttributeExtractor::new(model.clone(), defaults)),
        analyzer: Arc::new(NarrativeAnalyzer::new(model)),
        comparison: ComparisonBuilder::new(tiles.clone()),
        tiles,
        model_name: settings.llm.model.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
