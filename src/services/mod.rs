// Service exports
pub mod earth_engine;
pub mod layer_cache;
pub mod llm;

pub use earth_engine::{EarthEngineClient, GeospatialError, TileProvider};
pub use layer_cache::{CachedTileProvider, LayerCacheStats};
pub use llm::{GeminiClient, LanguageModel, LlmError};
