use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{ExtractedAttributes, LandCoverLayer, LayerSelection};

/// Request carrying a free-text land-use query
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QueryRequest {
    #[validate(length(min = 1, max = 2000))]
    pub query: String,
    #[serde(default)]
    pub left: Option<LandCoverLayer>,
    #[serde(default)]
    pub right: Option<LandCoverLayer>,
    #[serde(default)]
    pub legend: Option<LandCoverLayer>,
}

impl QueryRequest {
    pub fn selection(&self) -> LayerSelection {
        LayerSelection {
            left: self.left,
            right: self.right,
            legend: self.legend,
        }
    }
}

/// Request to recompute the comparison view from user-edited inputs
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ViewRequest {
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = 0, max = 20))]
    pub zoom: u8,
    #[serde(alias = "startDate")]
    pub start_date: NaiveDate,
    #[serde(alias = "endDate")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub left: Option<LandCoverLayer>,
    #[serde(default)]
    pub right: Option<LandCoverLayer>,
    #[serde(default)]
    pub legend: Option<LandCoverLayer>,
}

impl ViewRequest {
    pub fn attributes(&self) -> ExtractedAttributes {
        ExtractedAttributes {
            longitude: self.longitude,
            latitude: self.latitude,
            zoom: self.zoom,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    pub fn selection(&self) -> LayerSelection {
        LayerSelection {
            left: self.left,
            right: self.right,
            legend: self.legend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_rejected() {
        let req = QueryRequest {
            query: String::new(),
            left: None,
            right: None,
            legend: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_view_request_out_of_range_latitude() {
        let req: ViewRequest = serde_json::from_value(serde_json::json!({
            "longitude": 10.0,
            "latitude": 200.0,
            "zoom": 11,
            "start_date": "2015-01-01",
            "end_date": "2023-01-01"
        }))
        .unwrap();

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("latitude"));
    }

    #[test]
    fn test_view_request_selection_by_display_name() {
        let req: ViewRequest = serde_json::from_value(serde_json::json!({
            "longitude": 10.0,
            "latitude": 50.0,
            "zoom": 9,
            "startDate": "2015-01-01",
            "endDate": "2023-01-01",
            "left": "ESRI Land Cover"
        }))
        .unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.selection().left, Some(LandCoverLayer::EsriLandCover));
        assert_eq!(req.selection().right, None);
        assert_eq!(req.attributes().zoom, 9);
    }
}
