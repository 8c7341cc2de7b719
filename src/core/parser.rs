//! Two-stage parser for the model's attribute response.
//!
//! Stage one decodes the response as a JSON object and reads each key on
//! its own, so a mistyped value only loses that field. When the model
//! wraps the object in prose or code fences, stage two scans the raw text
//! for each key independently. Date values are passed through as text in
//! both stages; validating them is left to the extractor.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

use crate::models::{ParseMode, RawAttributes};

static LONGITUDE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""longitude":\s*"?([-\d.]+)"#).expect("Invalid regex"));
static LATITUDE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""latitude":\s*"?([-\d.]+)"#).expect("Invalid regex"));
static ZOOM_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""zoom":\s*"?(-?\d+)"#).expect("Invalid regex"));
// Quoted value of any shape, or a bare token such as 2015 or null
static START_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""start_date":\s*(?:"([^"]*)"|([^\s,}\]"]+))"#).expect("Invalid regex")
});
static END_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""end_date":\s*(?:"([^"]*)"|([^\s,}\]"]+))"#).expect("Invalid regex")
});

/// Fields read from a response and the stage that read them
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub attributes: RawAttributes,
    pub mode: ParseMode,
}

/// Parse a model response into raw attributes
pub fn parse_response(text: &str) -> ParsedResponse {
    match parse_strict(text) {
        Ok(attributes) => ParsedResponse {
            attributes,
            mode: ParseMode::Json,
        },
        Err(e) => {
            tracing::debug!("JSON parsing failed ({}), falling back to field scan", e);
            ParsedResponse {
                attributes: scan_fields(text),
                mode: ParseMode::Fallback,
            }
        }
    }
}

/// Decode the response as a single JSON object
///
/// Numbers may arrive as JSON numbers or numeric strings. Non-string dates
/// are kept as their JSON text so the date check rejects them.
pub fn parse_strict(text: &str) -> Result<RawAttributes, serde_json::Error> {
    let object: Map<String, Value> = serde_json::from_str(text.trim())?;

    Ok(RawAttributes {
        longitude: object.get("longitude").and_then(number),
        latitude: object.get("latitude").and_then(number),
        zoom: object.get("zoom").and_then(number).map(|z| z.round() as i64),
        start_date: object.get("start_date").and_then(date_text),
        end_date: object.get("end_date").and_then(date_text),
    })
}

/// Scan the raw text for each field on its own
pub fn scan_fields(text: &str) -> RawAttributes {
    RawAttributes {
        longitude: capture(&LONGITUDE_PATTERN, text).and_then(|s| s.parse().ok()),
        latitude: capture(&LATITUDE_PATTERN, text).and_then(|s| s.parse().ok()),
        zoom: capture(&ZOOM_PATTERN, text).and_then(|s| s.parse().ok()),
        start_date: capture(&START_DATE_PATTERN, text)
            .filter(|s| *s != "null")
            .map(str::to_string),
        end_date: capture(&END_DATE_PATTERN, text)
            .filter(|s| *s != "null")
            .map(str::to_string),
    }
}

fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|v: &f64| v.is_finite())
}

fn date_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// First populated capture group
fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.iter().skip(1).flatten().next())
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_json() {
        let parsed = parse_response(
            r#"{"longitude": 78.4867, "latitude": 17.385, "zoom": 11, "start_date": "2015-01-01", "end_date": "2023-01-01"}"#,
        );

        assert_eq!(parsed.mode, ParseMode::Json);
        assert_eq!(parsed.attributes.longitude, Some(78.4867));
        assert_eq!(parsed.attributes.zoom, Some(11));
        assert_eq!(parsed.attributes.end_date.as_deref(), Some("2023-01-01"));
    }

    #[test]
    fn test_null_is_absent() {
        let parsed = parse_response(r#"{"longitude": null, "latitude": 50.0}"#);
        assert_eq!(parsed.mode, ParseMode::Json);
        assert_eq!(parsed.attributes.longitude, None);
        assert_eq!(parsed.attributes.latitude, Some(50.0));
    }

    #[test]
    fn test_code_fence_falls_back() {
        let text = "```json\n{\n  \"longitude\": -58.38,\n  \"latitude\": -34.6,\n  \"zoom\": 9,\n  \"start_date\": \"2010-06-01\",\n  \"end_date\": \"2020-06-01\"\n}\n```";
        let parsed = parse_response(text);

        assert_eq!(parsed.mode, ParseMode::Fallback);
        assert_eq!(parsed.attributes.longitude, Some(-58.38));
        assert_eq!(parsed.attributes.latitude, Some(-34.6));
        assert_eq!(parsed.attributes.zoom, Some(9));
        assert_eq!(parsed.attributes.start_date.as_deref(), Some("2010-06-01"));
    }

    #[test]
    fn test_fields_scanned_independently() {
        let text = r#"Here you go: "latitude": 12.5, "zoom": "ten", "end_date": "2022-12-31""#;
        let attrs = scan_fields(text);

        assert_eq!(attrs.longitude, None);
        assert_eq!(attrs.latitude, Some(12.5));
        assert_eq!(attrs.zoom, None);
        assert_eq!(attrs.start_date, None);
        assert_eq!(attrs.end_date.as_deref(), Some("2022-12-31"));
    }

    #[test]
    fn test_unparseable_number_is_absent() {
        let attrs = scan_fields(r#"oops {"longitude": -.-, "latitude": 1.0"#);
        assert_eq!(attrs.longitude, None);
        assert_eq!(attrs.latitude, Some(1.0));
    }

    #[test]
    fn test_non_object_json_falls_back() {
        let parsed = parse_response("42");
        assert_eq!(parsed.mode, ParseMode::Fallback);
        assert_eq!(parsed.attributes, RawAttributes::default());
    }

    #[test]
    fn test_mistyped_field_does_not_abandon_json() {
        let parsed = parse_response(
            r#"{"longitude": "78.4", "latitude": 17.385, "zoom": 11.0, "start_date": "2015-01-01"}"#,
        );

        assert_eq!(parsed.mode, ParseMode::Json);
        assert_eq!(parsed.attributes.longitude, Some(78.4));
        assert_eq!(parsed.attributes.latitude, Some(17.385));
        assert_eq!(parsed.attributes.zoom, Some(11));
        assert_eq!(parsed.attributes.start_date.as_deref(), Some("2015-01-01"));
    }

    #[test]
    fn test_unusable_json_number_is_absent() {
        let parsed = parse_response(r#"{"longitude": "east", "latitude": true, "zoom": "NaN"}"#);
        assert_eq!(parsed.mode, ParseMode::Json);
        assert_eq!(parsed.attributes, RawAttributes::default());
    }

    #[test]
    fn test_non_string_json_date_kept_as_text() {
        let parsed = parse_response(r#"{"start_date": 2015, "end_date": null}"#);
        assert_eq!(parsed.mode, ParseMode::Json);
        assert_eq!(parsed.attributes.start_date.as_deref(), Some("2015"));
        assert_eq!(parsed.attributes.end_date, None);
    }

    #[test]
    fn test_scan_keeps_any_date_value() {
        let attrs = scan_fields(
            r#"Sure! {"longitude": "1.5", "start_date": "January 2015", "end_date": 2023}"#,
        );
        assert_eq!(attrs.longitude, Some(1.5));
        assert_eq!(attrs.start_date.as_deref(), Some("January 2015"));
        assert_eq!(attrs.end_date.as_deref(), Some("2023"));

        let attrs = scan_fields(r#"note: "start_date": null, "end_date": """#);
        assert_eq!(attrs.start_date, None);
        assert_eq!(attrs.end_date.as_deref(), Some(""));
    }
}
