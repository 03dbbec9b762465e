use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use super::plan_type::PlanType;

/// One AI-proposed itinerary item prior to user confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedItem {
    /// Ephemeral id, unique within one parse run only
    pub id: String,
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub title: String,
    pub address: String,
    pub lat: f64,
    pub lng: f64,
    pub start_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Filled in by image enrichment, re-hosted during materialization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl SuggestedItem {
    /// Free-text query used for the image lookup
    pub fn image_query(&self) -> String {
        format!("{} {}", self.title.trim(), self.address.trim())
            .trim()
            .to_string()
    }

    /// "lat,lng" string used by the persistence service
    pub fn location(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }
}

/// Wire shape of one element of the model's JSON array.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SuggestionRecord {
    #[serde(rename = "type")]
    pub plan_type: PlanType,
    pub title: String,
    pub address: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub lng: f64,
    pub start_time: String,
    #[serde(default, alias = "cost", deserialize_with = "lenient_opt_f64")]
    pub expense: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(value) => value,
        NumberOrText::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("`{}` is not a number", text)))?,
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("non-finite coordinate"))
    }
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<NumberOrText>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        NumberOrText::Number(n) => Some(n),
        NumberOrText::Text(text) => text.trim().replace(',', "").parse::<f64>().ok(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_accepts_cost_alias_and_string_numbers() {
        let record: SuggestionRecord = serde_json::from_value(serde_json::json!({
            "type": "RESTAURANT",
            "title": "Pho 10",
            "address": "10 Ly Quoc Su",
            "lat": "21.03",
            "lng": 105.85,
            "startTime": "2026-01-10T12:00:00",
            "cost": 80000
        }))
        .unwrap();
        assert_eq!(record.lat, 21.03);
        assert_eq!(record.expense, Some(80000.0));
        assert!(record.description.is_none());
    }

    #[test]
    fn test_record_missing_lat_fails() {
        let result = serde_json::from_value::<SuggestionRecord>(serde_json::json!({
            "type": "TOUR",
            "title": "Old Quarter walk",
            "address": "Hoan Kiem",
            "lng": 105.85,
            "startTime": "2026-01-10T08:00:00"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_image_query_joins_title_and_address() {
        let item = SuggestedItem {
            id: "s-1".into(),
            plan_type: PlanType::Tour,
            title: "Temple of Literature ".into(),
            address: " 58 Quoc Tu Giam".into(),
            lat: 21.0,
            lng: 105.8,
            start_time: chrono::NaiveDate::from_ymd_opt(2026, 1, 10)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            cost: None,
            description: None,
            notes: None,
            image_ref: None,
        };
        assert_eq!(item.image_query(), "Temple of Literature 58 Quoc Tu Giam");
        assert_eq!(item.location(), "21,105.8");
    }
}
