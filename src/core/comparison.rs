use std::sync::Arc;
use thiserror::Error;

use crate::core::layers;
use crate::models::{
    ComparisonView, ExtractedAttributes, LandCoverLayer, LayerSelection, MapCenter, TileLayer,
};
use crate::services::{GeospatialError, TileProvider};

/// Errors that can occur while assembling the split map
#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("Failed to load {layer}: {source}")]
    Layer {
        layer: LandCoverLayer,
        #[source]
        source: GeospatialError,
    },

    #[error("Layer not available: {0}")]
    UnavailableLayer(LandCoverLayer),
}

/// Assembles the side-by-side comparison view
///
/// # Stages
/// 1. Resolve every catalogue layer (Dynamic World may drop out)
/// 2. Pick left/right layers and the legend
/// 3. Attach basemaps and warnings
#[derive(Clone)]
pub struct ComparisonBuilder {
    tiles: Arc<dyn TileProvider>,
}

impl ComparisonBuilder {
    pub fn new(tiles: Arc<dyn TileProvider>) -> Self {
        Self { tiles }
    }

    pub async fn build(
        &self,
        attributes: &ExtractedAttributes,
        selection: &LayerSelection,
    ) -> Result<ComparisonView, ComparisonError> {
        let mut warnings = Vec::new();
        let mut available: Vec<TileLayer> = Vec::with_capacity(LandCoverLayer::ALL.len());

        for layer in LandCoverLayer::ALL {
            let source = layers::source_for(layer, attributes);
            if layer.is_time_dependent() && !source.region.contains(&attributes.center()) {
                tracing::warn!(
                    "Map center {},{} lies outside the {} composite region",
                    attributes.longitude,
                    attributes.latitude,
                    layer
                );
            }
            match self.tiles.tile_layer(&source).await {
                Ok(tile) => available.push(tile),
                Err(e) if layer == LandCoverLayer::DynamicWorld => {
                    tracing::warn!("Dynamic World layer unavailable: {}", e);
                    warnings.push(format!("Error loading Dynamic World layer: {}", e));
                }
                Err(err) => return Err(ComparisonError::Layer { layer, source: err }),
            }
        }

        let options: Vec<LandCoverLayer> = available.iter().map(|t| t.layer).collect();
        let (left, right, legend_layer) = select_layers(&options, selection)?;

        let find = |layer: LandCoverLayer| {
            available
                .iter()
                .find(|t| t.layer == layer)
                .cloned()
                .ok_or(ComparisonError::UnavailableLayer(layer))
        };

        let view = ComparisonView {
            center: MapCenter {
                longitude: attributes.longitude,
                latitude: attributes.latitude,
            },
            zoom: attributes.zoom,
            date_range: attributes.date_range(),
            left: find(left)?,
            right: find(right)?,
            legend_layer,
            legend: layers::legend(legend_layer),
            basemaps: layers::basemaps(),
            options,
            warnings,
        };

        tracing::debug!(
            "Comparison view: {} | {} (legend {}) at {},{} z{}",
            left,
            right,
            legend_layer,
            view.center.longitude,
            view.center.latitude,
            view.zoom
        );

        Ok(view)
    }
}

/// Resolve the left, right and legend layers against the available options
///
/// Defaults: left is the second option, right the first, legend follows right.
pub fn select_layers(
    options: &[LandCoverLayer],
    selection: &LayerSelection,
) -> Result<(LandCoverLayer, LandCoverLayer, LandCoverLayer), ComparisonError> {
    let first = *options
        .first()
        .ok_or(ComparisonError::UnavailableLayer(LandCoverLayer::EsaLandCover))?;

    let pick = |requested: Option<LandCoverLayer>, fallback: LandCoverLayer| match requested {
        Some(layer) if options.contains(&layer) => Ok(layer),
        Some(layer) => Err(ComparisonError::UnavailableLayer(layer)),
        None => Ok(fallback),
    };

    let left = pick(selection.left, options.get(1).copied().unwrap_or(first))?;
    let right = pick(selection.right, first)?;
    let legend = pick(selection.legend, right)?;

    Ok((left, right, legend))
}

#[cfg(test)]
mod tests {
    use super::*;
    use LandCoverLayer::*;

    #[test]
    fn test_default_selection_with_all_layers() {
        let options = [DynamicWorld, EsaLandCover, EsriLandCover];
        let (left, right, legend) = select_layers(&options, &LayerSelection::default()).unwrap();

        assert_eq!(left, EsaLandCover);
        assert_eq!(right, DynamicWorld);
        assert_eq!(legend, DynamicWorld);
    }

    #[test]
    fn test_default_selection_without_dynamic_world() {
        let options = [EsaLandCover, EsriLandCover];
        let (left, right, legend) = select_layers(&options, &LayerSelection::default()).unwrap();

        assert_eq!(left, EsriLandCover);
        assert_eq!(right, EsaLandCover);
        assert_eq!(legend, EsaLandCover);
    }

    #[test]
    fn test_explicit_selection() {
        let options = [DynamicWorld, EsaLandCover, EsriLandCover];
        let selection = LayerSelection {
            left: Some(DynamicWorld),
            right: Some(EsriLandCover),
            legend: None,
        };
        let (left, right, legend) = select_layers(&options, &selection).unwrap();

        assert_eq!((left, right, legend), (DynamicWorld, EsriLandCover, EsriLandCover));
    }

    #[test]
    fn test_unavailable_selection_rejected() {
        let options = [EsaLandCover, EsriLandCover];
        let selection = LayerSelection {
            legend: Some(DynamicWorld),
            ..Default::default()
        };

        assert!(matches!(
            select_layers(&options, &selection),
            Err(ComparisonError::UnavailableLayer(DynamicWorld))
        ));
    }
}
