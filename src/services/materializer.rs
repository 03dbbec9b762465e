use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::collaborators::{AssetStore, ImageDownloader, PlanStore, Session};
use crate::error::{PlannerError, Result};
use crate::types::{
    datetime::{format_local_datetime, DATE_FORMAT, TIME_FORMAT},
    CreatedPlan, MaterializedPlanRequest, PlanDetails, PlanFamily, SuggestedItem,
};

/// Outcome of saving one confirmed suggestion.
#[derive(Debug)]
pub struct ItemOutcome {
    pub suggestion_id: String,
    pub title: String,
    pub family: PlanFamily,
    pub result: std::result::Result<CreatedPlan, PlannerError>,
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-item results of one materialization call, in input order.
#[derive(Debug, Default)]
pub struct MaterializationReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl MaterializationReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn created(&self) -> impl Iterator<Item = &CreatedPlan> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }
}

/// Saves confirmed suggestions as plans, one item at a time.
#[derive(Clone)]
pub struct Materializer {
    plans: Arc<dyn PlanStore>,
    rehost: Option<(Arc<dyn ImageDownloader>, Arc<dyn AssetStore>)>,
}

impl Materializer {
    pub fn new(plans: Arc<dyn PlanStore>) -> Self {
        Self {
            plans,
            rehost: None,
        }
    }

    /// Copy externally hosted images into the internal asset store before saving
    pub fn with_image_rehosting(
        mut self,
        downloader: Arc<dyn ImageDownloader>,
        assets: Arc<dyn AssetStore>,
    ) -> Self {
        self.rehost = Some((downloader, assets));
        self
    }

    /// Save every item; fails only when items were given and none could be saved.
    pub async fn materialize(
        &self,
        session: &Session,
        trip_id: &str,
        items: &[SuggestedItem],
    ) -> Result<MaterializationReport> {
        let mut report = MaterializationReport::default();

        for item in items {
            let family = item.plan_type.family();
            let image_ref = self.resolve_image(item).await;
            let result = match build_plan_request(trip_id, item, image_ref) {
                Ok(request) => self.plans.create_plan(session, family, &request).await,
                Err(err) => Err(err),
            };
            match &result {
                Ok(created) => debug!(
                    target: "itinerary::materializer",
                    suggestion = %item.id,
                    plan = %created.id,
                    endpoint = family.endpoint(),
                    "plan created"
                ),
                Err(err) => warn!(
                    target: "itinerary::materializer",
                    suggestion = %item.id,
                    endpoint = family.endpoint(),
                    error = %err,
                    "plan creation failed"
                ),
            }

            report.outcomes.push(ItemOutcome {
                suggestion_id: item.id.clone(),
                title: item.title.clone(),
                family,
                result,
            });
        }

        info!(
            target: "itinerary::materializer",
            trip = trip_id,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "materialization finished"
        );

        if !items.is_empty() && report.succeeded() == 0 {
            return Err(PlannerError::NothingMaterialized {
                attempted: items.len(),
            });
        }
        Ok(report)
    }

    /// External URLs are re-hosted when configured; any failure drops the image.
    async fn resolve_image(&self, item: &SuggestedItem) -> Option<String> {
        let image_ref = item.image_ref.as_deref()?;
        if !is_external_url(image_ref) {
            return Some(image_ref.to_string());
        }
        let Some((downloader, assets)) = &self.rehost else {
            return Some(image_ref.to_string());
        };

        let rehosted = match downloader.download(image_ref).await {
            Ok(image) => assets.upload(image).await,
            Err(err) => Err(err),
        };

        match rehosted {
            Ok(reference) => Some(reference),
            Err(err) => {
                warn!(
                    target: "itinerary::materializer",
                    suggestion = %item.id,
                    url = image_ref,
                    error = %err,
                    "image re-hosting failed, saving without image"
                );
                None
            }
        }
    }
}

fn is_external_url(reference: &str) -> bool {
    let lower = reference.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Build the creation payload for one suggestion.
///
/// The end time is always derived from the type's default duration; a start
/// time too close to the end of the calendar fails this item only.
pub fn build_plan_request(
    trip_id: &str,
    item: &SuggestedItem,
    image_ref: Option<String>,
) -> Result<MaterializedPlanRequest> {
    let start = item.start_time;
    let family = item.plan_type.family();
    let end = start
        .checked_add_signed(item.plan_type.default_duration())
        .ok_or_else(|| PlannerError::PlanCreation {
            endpoint: family.endpoint(),
            message: format!("end time of a plan starting at {} is out of range", start),
        })?;

    let details = match family {
        PlanFamily::Lodging => PlanDetails::Lodging {
            check_in_date: format_local_datetime(&start),
            check_out_date: format_local_datetime(&end),
        },
        PlanFamily::Restaurant => PlanDetails::Restaurant {
            reservation_date: start.format(DATE_FORMAT).to_string(),
            reservation_time: start.format(TIME_FORMAT).to_string(),
        },
        PlanFamily::Transit => PlanDetails::Transit {
            arrival_date: end.format(DATE_FORMAT).to_string(),
            arrival_time: end.format(TIME_FORMAT).to_string(),
            arrival_location: item.location(),
            arrival_address: item.address.clone(),
        },
        PlanFamily::Rental => PlanDetails::Rental {
            pickup_date: start.format(DATE_FORMAT).to_string(),
            pickup_time: start.format(TIME_FORMAT).to_string(),
        },
        PlanFamily::Activity => PlanDetails::Activity {},
    };

    Ok(MaterializedPlanRequest {
        trip_id: trip_id.to_string(),
        title: item.title.clone(),
        address: item.address.clone(),
        location: item.location(),
        start_time: format_local_datetime(&start),
        end_time: format_local_datetime(&end),
        cost: item.cost.unwrap_or(0.0),
        image_ref,
        type_tag: item.plan_type.persisted_tag(),
        description: item.description.clone(),
        notes: item.notes.clone(),
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlanType;
    use chrono::{NaiveDate, NaiveDateTime};

    fn item(plan_type: PlanType) -> SuggestedItem {
        SuggestedItem {
            id: "s-1".into(),
            plan_type,
            title: "Thing".into(),
            address: "12 Hang Bac".into(),
            lat: 21.03,
            lng: 105.85,
            start_time: NaiveDate::from_ymd_opt(2026, 1, 16)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
            cost: Some(1_200_000.0),
            description: None,
            notes: Some("bring passport".into()),
            image_ref: None,
        }
    }

    #[test]
    fn test_lodging_check_in_and_out() {
        let request = build_plan_request("t1", &item(PlanType::Lodging), None).unwrap();
        assert_eq!(request.start_time, "2026-01-16T14:00:00");
        assert_eq!(request.end_time, "2026-01-17T14:00:00");
        assert_eq!(
            request.details,
            PlanDetails::Lodging {
                check_in_date: "2026-01-16T14:00:00".into(),
                check_out_date: "2026-01-17T14:00:00".into(),
            }
        );
        assert_eq!(request.location, "21.03,105.85");
        assert_eq!(request.cost, 1_200_000.0);
    }

    #[test]
    fn test_restaurant_reservation() {
        let request = build_plan_request("t1", &item(PlanType::Restaurant), None).unwrap();
        assert_eq!(request.end_time, "2026-01-16T15:00:00");
        assert_eq!(
            request.details,
            PlanDetails::Restaurant {
                reservation_date: "2026-01-16".into(),
                reservation_time: "14:00".into(),
            }
        );
    }

    #[test]
    fn test_flight_and_boat_arrival() {
        let flight = build_plan_request("t1", &item(PlanType::Flight), None).unwrap();
        assert_eq!(flight.end_time, "2026-01-16T17:00:00");
        match flight.details {
            PlanDetails::Transit {
                arrival_date,
                arrival_time,
                arrival_location,
                arrival_address,
            } => {
                assert_eq!(arrival_date, "2026-01-16");
                assert_eq!(arrival_time, "17:00");
                assert_eq!(arrival_location, "21.03,105.85");
                assert_eq!(arrival_address, "12 Hang Bac");
            }
            other => panic!("unexpected details {:?}", other),
        }

        let boat = build_plan_request("t1", &item(PlanType::Boat), None).unwrap();
        assert_eq!(boat.end_time, "2026-01-16T16:00:00");
        assert_eq!(boat.family(), PlanFamily::Transit);
    }

    #[test]
    fn test_rental_family() {
        let car = build_plan_request("t1", &item(PlanType::CarRental), None).unwrap();
        assert_eq!(car.end_time, "2026-01-16T22:00:00");
        assert_eq!(
            car.details,
            PlanDetails::Rental {
                pickup_date: "2026-01-16".into(),
                pickup_time: "14:00".into(),
            }
        );
        let train = build_plan_request("t1", &item(PlanType::Train), None).unwrap();
        assert_eq!(train.end_time, "2026-01-16T18:00:00");
        assert_eq!(train.family(), PlanFamily::Rental);
    }

    #[test]
    fn test_every_type_resolves_to_one_family() {
        let mut all = PlanType::ALL.to_vec();
        all.push(PlanType::Unmapped);
        for plan_type in all {
            let request = build_plan_request("t1", &item(plan_type), None).unwrap();
            assert_eq!(request.family(), plan_type.family());
        }
    }

    #[test]
    fn test_unmapped_goes_to_activity() {
        let request = build_plan_request("t1", &item(PlanType::Unmapped), None).unwrap();
        assert_eq!(request.family(), PlanFamily::Activity);
        assert_eq!(request.type_tag, "ACTIVITY");
        assert_eq!(request.end_time, "2026-01-16T16:00:00");
    }

    #[test]
    fn test_missing_cost_is_zero_on_the_wire() {
        let mut suggestion = item(PlanType::Tour);
        suggestion.cost = None;
        let request = build_plan_request("t1", &suggestion, Some("img.jpg".into())).unwrap();
        assert_eq!(request.cost, 0.0);
        assert_eq!(request.image_ref.as_deref(), Some("img.jpg"));
    }

    #[test]
    fn test_end_time_overflow_is_an_error() {
        let mut suggestion = item(PlanType::Lodging);
        suggestion.start_time = NaiveDateTime::MAX - chrono::Duration::hours(1);
        let err = build_plan_request("t1", &suggestion, None).unwrap_err();
        assert_eq!(err.error_code(), "PLAN_CREATION_ERROR");
        assert!(err.to_string().contains("`lodging`"));
    }

    #[test]
    fn test_external_url_detection() {
        assert!(is_external_url("https://images.pexels.com/a.jpg"));
        assert!(is_external_url("HTTP://cdn/x.png"));
        assert!(!is_external_url("a1b2c3.jpg"));
    }
}
