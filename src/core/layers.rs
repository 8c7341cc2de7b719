//! Land-cover layer catalogue: datasets, visualization, legends and basemaps.

use crate::models::{
    Basemap, BasemapKind, BoundingBox, ExtractedAttributes, LandCoverLayer, LayerSource, Legend,
    LegendEntry,
};

/// How an image collection is reduced to a single image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    First,
    Mosaic,
    /// Per-pixel mode of `band` over the filtered collection
    Mode,
}

/// Static description of a land-cover product
#[derive(Debug, Clone, Copy)]
pub struct LayerDefinition {
    pub layer: LandCoverLayer,
    pub dataset: &'static str,
    pub band: Option<&'static str>,
    pub composite: Composite,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub palette: &'static [&'static str],
    pub legend_key: &'static str,
    pub attribution: &'static str,
}

pub const DYNAMIC_WORLD_DATASET: &str = "GOOGLE/DYNAMICWORLD/V1";
pub const ESA_WORLDCOVER_DATASET: &str = "ESA/WorldCover/v100";
pub const ESRI_LULC_DATASET: &str = "projects/sat-io/open-datasets/landcover/ESRI_Global-LULC_10m";

const DYNAMIC_WORLD_CLASSES: &[(&str, &str)] = &[
    ("Water", "#419BDF"),
    ("Trees", "#397D49"),
    ("Grass", "#88B053"),
    ("Flooded vegetation", "#7A87C6"),
    ("Crops", "#E49635"),
    ("Shrub and scrub", "#DFC35A"),
    ("Built", "#C4281B"),
    ("Bare", "#A59B8F"),
    ("Snow and ice", "#B39FE1"),
];

const DYNAMIC_WORLD_PALETTE: &[&str] = &[
    "#419BDF", "#397D49", "#88B053", "#7A87C6", "#E49635",
    "#DFC35A", "#C4281B", "#A59B8F", "#B39FE1",
];

const ESA_WORLDCOVER_CLASSES: &[(&str, &str)] = &[
    ("10 Trees", "#006400"),
    ("20 Shrubland", "#FFBB22"),
    ("30 Grassland", "#FFFF4C"),
    ("40 Cropland", "#F096FF"),
    ("50 Built-up", "#FA0000"),
    ("60 Barren / sparse vegetation", "#B4B4B4"),
    ("70 Snow and ice", "#F0F0F0"),
    ("80 Open water", "#0064C8"),
    ("90 Herbaceous wetland", "#0096A0"),
    ("95 Mangroves", "#00CF75"),
    ("100 Moss and lichen", "#FAE6A0"),
];

const ESRI_LULC_CLASSES: &[(&str, &str)] = &[
    ("Water", "#1A5BAB"),
    ("Trees", "#358221"),
    ("Grass", "#A7D282"),
    ("Flooded Vegetation", "#87D19E"),
    ("Crops", "#FFDB5C"),
    ("Scrub/Shrub", "#EECFA8"),
    ("Built Area", "#ED022A"),
    ("Bare Ground", "#EDE9E4"),
    ("Snow/Ice", "#F2FAFF"),
    ("Clouds", "#C8C8C8"),
];

const ESRI_LULC_PALETTE: &[&str] = &[
    "#1A5BAB", "#358221", "#A7D282", "#87D19E", "#FFDB5C",
    "#EECFA8", "#ED022A", "#EDE9E4", "#F2FAFF", "#C8C8C8",
];

/// Catalogue entry for a layer
pub fn definition(layer: LandCoverLayer) -> LayerDefinition {
    match layer {
        LandCoverLayer::DynamicWorld => LayerDefinition {
            layer,
            dataset: DYNAMIC_WORLD_DATASET,
            band: Some("label"),
            composite: Composite::Mode,
            min: Some(0.0),
            max: Some(8.0),
            palette: DYNAMIC_WORLD_PALETTE,
            legend_key: "Dynamic_World",
            attribution: "Google Dynamic World",
        },
        LandCoverLayer::EsaLandCover => LayerDefinition {
            layer,
            dataset: ESA_WORLDCOVER_DATASET,
            band: Some("Map"),
            composite: Composite::First,
            min: None,
            max: None,
            palette: &[],
            legend_key: "ESA_WorldCover",
            attribution: "ESA WorldCover 2020",
        },
        LandCoverLayer::EsriLandCover => LayerDefinition {
            layer,
            dataset: ESRI_LULC_DATASET,
            band: None,
            composite: Composite::Mosaic,
            min: Some(1.0),
            max: Some(10.0),
            palette: ESRI_LULC_PALETTE,
            legend_key: "ESRI_LandCover",
            attribution: "Esri Land Cover",
        },
    }
}

/// Built-in legend for a layer
pub fn legend(layer: LandCoverLayer) -> Legend {
    let classes = match layer {
        LandCoverLayer::DynamicWorld => DYNAMIC_WORLD_CLASSES,
        LandCoverLayer::EsaLandCover => ESA_WORLDCOVER_CLASSES,
        LandCoverLayer::EsriLandCover => ESRI_LULC_CLASSES,
    };

    Legend {
        key: definition(layer).legend_key.to_string(),
        title: layer.tile_title().to_string(),
        entries: classes
            .iter()
            .map(|(label, color)| LegendEntry {
                label: label.to_string(),
                color: color.to_string(),
            })
            .collect(),
    }
}

/// Background layers added to every map
pub fn basemaps() -> Vec<Basemap> {
    let terrascope = |name: &str, wms_layer: &str| Basemap {
        name: name.to_string(),
        kind: BasemapKind::Wms,
        url: "https://services.terrascope.be/wms/v2".to_string(),
        wms_layer: Some(wms_layer.to_string()),
        attribution: "ESA WorldCover".to_string(),
    };

    vec![
        terrascope("ESA WorldCover 2020 S2 FCC", "WORLDCOVER_2020_S2_FCC"),
        terrascope("ESA WorldCover 2020 S2 TCC", "WORLDCOVER_2020_S2_TCC"),
        Basemap {
            name: "HYBRID".to_string(),
            kind: BasemapKind::Xyz,
            url: "https://mt1.google.com/vt/lyrs=y&x={x}&y={y}&z={z}".to_string(),
            wms_layer: None,
            attribution: "Google".to_string(),
        },
    ]
}

/// Source parameters for fetching `layer` around the given attributes
pub fn source_for(layer: LandCoverLayer, attributes: &ExtractedAttributes) -> LayerSource {
    LayerSource {
        layer,
        date_range: layer.is_time_dependent().then(|| attributes.date_range()),
        region: BoundingBox::global(),
    }
}

/// Cache key for a layer source; static products share one entry
pub fn cache_key(source: &LayerSource) -> String {
    match source.date_range {
        Some(range) => format!("layer:{:?}:{}:{}", source.layer, range.start, range.end),
        None => format!("layer:{:?}", source.layer),
    }
}
