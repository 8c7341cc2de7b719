//! Landuse Lens - natural-language land-use change explorer
//!
//! Turns a free-text question about a place and period into map
//! coordinates and dates with a language model, asks the same model for a
//! narrative analysis, and serves a split map comparing land-cover products.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{AttributeExtractor, ComparisonBuilder, NarrativeAnalyzer, parse_response};
pub use crate::models::{ExtractedAttributes, LandCoverLayer, ComparisonView, RawAttributes};
