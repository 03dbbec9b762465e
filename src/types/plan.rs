use serde::{Deserialize, Serialize};

use super::plan_type::PlanFamily;

/// Body sent to a type-specific plan creation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializedPlanRequest {
    pub trip_id: String,
    pub title: String,
    pub address: String,
    /// "lat,lng"
    pub location: String,
    pub start_time: String,
    pub end_time: String,
    pub cost: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
    #[serde(rename = "type")]
    pub type_tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub details: PlanDetails,
}

/// Family-specific temporal fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlanDetails {
    #[serde(rename_all = "camelCase")]
    Lodging {
        check_in_date: String,
        check_out_date: String,
    },
    #[serde(rename_all = "camelCase")]
    Restaurant {
        reservation_date: String,
        reservation_time: String,
    },
    #[serde(rename_all = "camelCase")]
    Transit {
        arrival_date: String,
        arrival_time: String,
        arrival_location: String,
        arrival_address: String,
    },
    #[serde(rename_all = "camelCase")]
    Rental {
        pickup_date: String,
        pickup_time: String,
    },
    Activity {},
}

impl PlanDetails {
    pub fn family(&self) -> PlanFamily {
        match self {
            PlanDetails::Lodging { .. } => PlanFamily::Lodging,
            PlanDetails::Restaurant { .. } => PlanFamily::Restaurant,
            PlanDetails::Transit { .. } => PlanFamily::Transit,
            PlanDetails::Rental { .. } => PlanFamily::Rental,
            PlanDetails::Activity {} => PlanFamily::Activity,
        }
    }
}

impl MaterializedPlanRequest {
    pub fn family(&self) -> PlanFamily {
        self.details.family()
    }
}

/// Record returned by the persistence service after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPlan {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(details: PlanDetails) -> MaterializedPlanRequest {
        MaterializedPlanRequest {
            trip_id: "trip-1".into(),
            title: "Hotel A".into(),
            address: "X".into(),
            location: "10.1,106.1".into(),
            start_time: "2026-01-16T14:00:00".into(),
            end_time: "2026-01-17T14:00:00".into(),
            cost: 1_200_000.0,
            image_ref: None,
            type_tag: "LODGING",
            description: None,
            notes: None,
            details,
        }
    }

    #[test]
    fn test_lodging_serializes_flat_camel_case() {
        let request = base(PlanDetails::Lodging {
            check_in_date: "2026-01-16T14:00:00".into(),
            check_out_date: "2026-01-17T14:00:00".into(),
        });
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["tripId"], "trip-1");
        assert_eq!(value["type"], "LODGING");
        assert_eq!(value["checkInDate"], "2026-01-16T14:00:00");
        assert_eq!(value["checkOutDate"], "2026-01-17T14:00:00");
        assert!(value.get("imageRef").is_none());
    }

    #[test]
    fn test_activity_has_no_extra_fields() {
        let request = base(PlanDetails::Activity {});
        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("endTime"));
        assert!(!object.contains_key("checkInDate"));
        assert!(!object.contains_key("pickupDate"));
        assert_eq!(request.family(), PlanFamily::Activity);
    }
}
