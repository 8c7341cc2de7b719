use chrono::{Duration, Local, NaiveDate};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

use crate::config::ExtractionSettings;
use crate::core::parser::parse_response;
use crate::core::prompts::extraction_prompt;
use crate::models::{
    ExtractedAttributes, RawAttributes, MAX_LATITUDE, MAX_LONGITUDE, MAX_ZOOM, MIN_LATITUDE,
    MIN_LONGITUDE, MIN_ZOOM,
};
use crate::services::LanguageModel;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid regex"));

/// Errors surfaced by attribute extraction
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Invalid {field} '{value}': expected a YYYY-MM-DD calendar date")]
    DateFormat { field: &'static str, value: String },
}

/// Values applied to fields the model did not provide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeDefaults {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: u8,
    pub lookback_days: i64,
}

impl Default for AttributeDefaults {
    fn default() -> Self {
        Self::from(&ExtractionSettings::default())
    }
}

impl From<&ExtractionSettings> for AttributeDefaults {
    fn from(settings: &ExtractionSettings) -> Self {
        Self {
            longitude: settings.default_longitude,
            latitude: settings.default_latitude,
            zoom: settings.default_zoom,
            lookback_days: settings.lookback_days,
        }
    }
}

/// Turns a free-text query into a fully populated `ExtractedAttributes`
///
/// The model is treated as a best-effort parser: whatever it returns is
/// decoded, missing fields are defaulted and numbers are clamped into
/// range. Only a malformed date is reported back to the caller.
pub struct AttributeExtractor {
    model: Arc<dyn LanguageModel>,
    defaults: AttributeDefaults,
}

impl AttributeExtractor {
    pub fn new(model: Arc<dyn LanguageModel>, defaults: AttributeDefaults) -> Self {
        Self { model, defaults }
    }

    /// Extract attributes using the local calendar date as "today"
    pub async fn extract(&self, query: &str) -> Result<ExtractedAttributes, ExtractionError> {
        self.extract_on(query, Local::now().date_naive()).await
    }

    /// Extract attributes with an explicit reference date for the date defaults
    pub async fn extract_on(
        &self,
        query: &str,
        today: NaiveDate,
    ) -> Result<ExtractedAttributes, ExtractionError> {
        let prompt = extraction_prompt(query, self.defaults.zoom);

        let raw = match self.model.complete(&prompt).await {
            Ok(text) => {
                let parsed = parse_response(&text);
                tracing::debug!("Parsed attribute response via {:?}: {:?}", parsed.mode, parsed.attributes);
                parsed.attributes
            }
            Err(e) => {
                tracing::warn!("Attribute extraction call to {} failed, using defaults: {}", self.model.model_name(), e);
                RawAttributes::default()
            }
        };

        let attributes = assemble(raw, &self.defaults, today)?;
        tracing::info!(
            "Extracted attributes: lon={}, lat={}, zoom={}, {} to {}",
            attributes.longitude,
            attributes.latitude,
            attributes.zoom,
            attributes.start_date,
            attributes.end_date
        );

        Ok(attributes)
    }
}

/// Build the final record from parsed fields
///
/// Dates are parsed first so a malformed one fails before any defaulting.
/// Absent fields take their defaults; present numbers are clamped into range.
pub fn assemble(
    raw: RawAttributes,
    defaults: &AttributeDefaults,
    today: NaiveDate,
) -> Result<ExtractedAttributes, ExtractionError> {
    let start_date = raw
        .start_date
        .as_deref()
        .map(|value| parse_date("start_date", value))
        .transpose()?;
    let end_date = raw
        .end_date
        .as_deref()
        .map(|value| parse_date("end_date", value))
        .transpose()?;

    let longitude = clamp_degrees(
        "longitude",
        raw.longitude.unwrap_or(defaults.longitude),
        MIN_LONGITUDE,
        MAX_LONGITUDE,
    );
    let latitude = clamp_degrees(
        "latitude",
        raw.latitude.unwrap_or(defaults.latitude),
        MIN_LATITUDE,
        MAX_LATITUDE,
    );
    let zoom = match raw.zoom {
        Some(z) => clamp_zoom(z),
        None => defaults.zoom.min(MAX_ZOOM),
    };

    Ok(ExtractedAttributes {
        longitude,
        latitude,
        zoom,
        start_date: start_date.unwrap_or(today - Duration::days(defaults.lookback_days)),
        end_date: end_date.unwrap_or(today),
    })
}

/// Strict `YYYY-MM-DD` parse
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ExtractionError> {
    let error = || ExtractionError::DateFormat {
        field,
        value: value.to_string(),
    };

    if !ISO_DATE.is_match(value) {
        return Err(error());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| error())
}

fn clamp_degrees(field: &str, value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        tracing::warn!("Model returned NaN {}, using 0", field);
        return 0.0;
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        tracing::warn!("Model returned out-of-range {} {}, clamped to {}", field, value, clamped);
    }
    clamped
}

fn clamp_zoom(value: i64) -> u8 {
    let clamped = value.clamp(MIN_ZOOM as i64, MAX_ZOOM as i64);
    if clamped != value {
        tracing::warn!("Model returned out-of-range zoom {}, clamped to {}", value, clamped);
    }
    clamped as u8
}
