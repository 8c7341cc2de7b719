use chrono::NaiveDate;
use geo::{coord, Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;
pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 20;

/// Location and time window inferred from a free-text query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractedAttributes {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: u8,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl ExtractedAttributes {
    /// Map center as a geo point (x = longitude, y = latitude)
    pub fn center(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    /// Dates ordered so the earlier one comes first
    pub fn date_range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    pub fn is_in_range(&self) -> bool {
        (MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.longitude)
            && (MIN_LATITUDE..=MAX_LATITUDE).contains(&self.latitude)
            && self.zoom <= MAX_ZOOM
    }
}

/// Field values as found in a model response, before dates are parsed
/// and defaults applied
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawAttributes {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub zoom: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Which stage of the response parser produced the fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    Json,
    Fallback,
}

/// Inclusive date interval with `start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }
}

/// Geographic bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    rect: Rect<f64>,
}

impl BoundingBox {
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            rect: Rect::new(coord! { x: west, y: south }, coord! { x: east, y: north }),
        }
    }

    /// Near-global region used for Dynamic World composites
    pub fn global() -> Self {
        Self::new(-179.0, -89.0, 179.0, 89.0)
    }

    pub fn west(&self) -> f64 { self.rect.min().x }
    pub fn south(&self) -> f64 { self.rect.min().y }
    pub fn east(&self) -> f64 { self.rect.max().x }
    pub fn north(&self) -> f64 { self.rect.max().y }

    pub fn contains(&self, point: &Point<f64>) -> bool {
        point.x() >= self.west()
            && point.x() <= self.east()
            && point.y() >= self.south()
            && point.y() <= self.north()
    }
}

/// Land-cover products offered in the comparison view, in catalogue order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandCoverLayer {
    #[serde(rename = "Dynamic World")]
    DynamicWorld,
    #[serde(rename = "ESA Land Cover")]
    EsaLandCover,
    #[serde(rename = "ESRI Land Cover")]
    EsriLandCover,
}

impl LandCoverLayer {
    pub const ALL: [LandCoverLayer; 3] = [
        LandCoverLayer::DynamicWorld,
        LandCoverLayer::EsaLandCover,
        LandCoverLayer::EsriLandCover,
    ];

    /// Name shown in the layer selectors
    pub fn display_name(&self) -> &'static str {
        match self {
            LandCoverLayer::DynamicWorld => "Dynamic World",
            LandCoverLayer::EsaLandCover => "ESA Land Cover",
            LandCoverLayer::EsriLandCover => "ESRI Land Cover",
        }
    }

    /// Title given to the rendered tile layer
    pub fn tile_title(&self) -> &'static str {
        match self {
            LandCoverLayer::DynamicWorld => "Dynamic World Land Cover",
            LandCoverLayer::EsaLandCover => "ESA Land Cover",
            LandCoverLayer::EsriLandCover => "ESRI Land Cover",
        }
    }

    /// Whether the layer is computed over the query's date range
    pub fn is_time_dependent(&self) -> bool {
        matches!(self, LandCoverLayer::DynamicWorld)
    }
}

impl fmt::Display for LandCoverLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for LandCoverLayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "dynamic world" => Ok(LandCoverLayer::DynamicWorld),
            "esa land cover" | "esa" => Ok(LandCoverLayer::EsaLandCover),
            "esri land cover" | "esri" => Ok(LandCoverLayer::EsriLandCover),
            _ => Err(format!("Unknown land cover layer: {}", s)),
        }
    }
}

/// Everything the tile provider needs to produce one layer
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSource {
    pub layer: LandCoverLayer,
    pub date_range: Option<DateRange>,
    pub region: BoundingBox,
}

/// A resolved XYZ tile layer ready for the map widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayer {
    pub layer: LandCoverLayer,
    pub title: String,
    #[serde(rename = "urlTemplate")]
    pub url_template: String,
    pub attribution: String,
}

/// One class in a legend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    pub key: String,
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasemapKind {
    Xyz,
    Wms,
}

/// Background layer added beneath the comparison layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basemap {
    pub name: String,
    pub kind: BasemapKind,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wms_layer: Option<String>,
    pub attribution: String,
}

/// Requested layers for the split view; `None` means use the default
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerSelection {
    pub left: Option<LandCoverLayer>,
    pub right: Option<LandCoverLayer>,
    pub legend: Option<LandCoverLayer>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub longitude: f64,
    pub latitude: f64,
}

/// Split-map description rendered by the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonView {
    pub center: MapCenter,
    pub zoom: u8,
    #[serde(rename = "dateRange")]
    pub date_range: DateRange,
    pub options: Vec<LandCoverLayer>,
    pub left: TileLayer,
    pub right: TileLayer,
    #[serde(rename = "legendLayer")]
    pub legend_layer: LandCoverLayer,
    pub legend: Legend,
    pub basemaps: Vec<Basemap>,
    pub warnings: Vec<String>,
}
