use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::core::layers::cache_key;
use crate::models::{LayerSource, TileLayer};
use crate::services::earth_engine::{GeospatialError, TileProvider};

/// Tile provider wrapper that remembers resolved layers
///
/// Static products resolve to the same map on every request, so they are
/// served from memory until the TTL lapses. Failures are never stored.
pub struct CachedTileProvider {
    inner: Arc<dyn TileProvider>,
    cache: moka::future::Cache<String, TileLayer>,
}

/// Cache statistics
#[derive(Debug, Clone, Copy)]
pub struct LayerCacheStats {
    pub entries: u64,
}

impl CachedTileProvider {
    pub fn new(inner: Arc<dyn TileProvider>, capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, cache }
    }

    pub fn stats(&self) -> LayerCacheStats {
        LayerCacheStats {
            entries: self.cache.entry_count(),
        }
    }
}

#[async_trait]
impl TileProvider for CachedTileProvider {
    async fn tile_layer(&self, source: &LayerSource) -> Result<TileLayer, GeospatialError> {
        let key = cache_key(source);

        if let Some(layer) = self.cache.get(&key).await {
            tracing::trace!("Layer cache hit: {}", key);
            return Ok(layer);
        }

        tracing::trace!("Layer cache miss: {}", key);
        let layer = self.inner.tile_layer(source).await?;
        self.cache.insert(key, layer.clone()).await;

        Ok(layer)
    }
}
