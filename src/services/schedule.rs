use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::warn;

use crate::types::{datetime::parse_local_datetime, DateRange, PlanRecord, TripSummary};

/// Two of a user's trips whose date ranges overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripConflict {
    pub trip_id: String,
    pub conflicting_trip_id: String,
}

/// Plans that start on the same local calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub plans: Vec<PlanRecord>,
}

/// Every trip of `user_id` (owned or shared) whose dates overlap `candidate`.
///
/// `editing_trip_id` excludes the trip being edited from its own check.
pub fn find_trip_conflicts<'a>(
    user_id: &str,
    candidate: &DateRange,
    editing_trip_id: Option<&str>,
    trips: &'a [TripSummary],
) -> Vec<&'a TripSummary> {
    trips
        .iter()
        .filter(|trip| trip.involves(user_id))
        .filter(|trip| Some(trip.id.as_str()) != editing_trip_id)
        .filter(|trip| trip.range().overlaps(candidate))
        .collect()
}

/// All overlapping pairs among the user's trips, each pair reported once.
pub fn find_all_conflicts(user_id: &str, trips: &[TripSummary]) -> Vec<TripConflict> {
    let mine: Vec<&TripSummary> = trips.iter().filter(|t| t.involves(user_id)).collect();
    let mut conflicts = Vec::new();

    for (idx, first) in mine.iter().enumerate() {
        for second in &mine[idx + 1..] {
            if first.range().overlaps(&second.range()) {
                conflicts.push(TripConflict {
                    trip_id: first.id.clone(),
                    conflicting_trip_id: second.id.clone(),
                });
            }
        }
    }
    conflicts
}

/// Group plans by the wall-clock date of their start time, oldest day first.
///
/// Plans whose start time cannot be parsed are left out.
pub fn group_plans_by_day(plans: &[PlanRecord]) -> Vec<DayBucket> {
    let mut days: BTreeMap<NaiveDate, Vec<(NaiveDateTime, &PlanRecord)>> = BTreeMap::new();

    for plan in plans {
        match parse_local_datetime(&plan.start_time) {
            Some(start) => days.entry(start.date()).or_default().push((start, plan)),
            None => warn!(
                target: "itinerary::schedule",
                plan = %plan.id,
                start_time = %plan.start_time,
                "skipping plan with unparsable start time"
            ),
        }
    }

    days.into_iter()
        .map(|(date, mut entries)| {
            entries.sort_by_key(|(start, _)| *start);
            DayBucket {
                date,
                plans: entries.into_iter().map(|(_, plan)| plan.clone()).collect(),
            }
        })
        .collect()
}
