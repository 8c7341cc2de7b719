// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Basemap, BasemapKind, BoundingBox, ComparisonView, DateRange, ExtractedAttributes,
    LandCoverLayer, LayerSelection, LayerSource, Legend, LegendEntry, MapCenter, ParseMode,
    RawAttributes, TileLayer, MAX_LATITUDE, MAX_LONGITUDE, MAX_ZOOM, MIN_LATITUDE, MIN_LONGITUDE,
    MIN_ZOOM,
};
pub use requests::{QueryRequest, ViewRequest};
pub use responses::{AnalysisResponse, CatalogueResponse, ErrorResponse, ExtractResponse, HealthResponse};
