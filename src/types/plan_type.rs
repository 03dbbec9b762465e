use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical plan type vocabulary.
///
/// The wire format carries an open string; anything outside the vocabulary
/// becomes [`PlanType::Unmapped`], which is materialized as an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanType {
    Lodging,
    Restaurant,
    Activity,
    Tour,
    Flight,
    Train,
    Boat,
    CarRental,
    Theater,
    Shopping,
    Camping,
    Religion,
    Unmapped,
}

/// Group of plan types sharing auxiliary fields and a creation endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanFamily {
    Lodging,
    Restaurant,
    /// FLIGHT and BOAT: departure plus arrival leg
    Transit,
    /// CAR_RENTAL and TRAIN: pickup date and time
    Rental,
    Activity,
}

impl PlanType {
    pub const ALL: [PlanType; 12] = [
        PlanType::Lodging,
        PlanType::Restaurant,
        PlanType::Activity,
        PlanType::Tour,
        PlanType::Flight,
        PlanType::Train,
        PlanType::Boat,
        PlanType::CarRental,
        PlanType::Theater,
        PlanType::Shopping,
        PlanType::Camping,
        PlanType::Religion,
    ];

    /// Lenient lookup: case-insensitive, spaces and dashes count as underscores.
    pub fn parse(raw: &str) -> PlanType {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                other => other.to_ascii_uppercase(),
            })
            .collect();

        match normalized.as_str() {
            "LODGING" | "HOTEL" => PlanType::Lodging,
            "RESTAURANT" => PlanType::Restaurant,
            "ACTIVITY" => PlanType::Activity,
            "TOUR" => PlanType::Tour,
            "FLIGHT" => PlanType::Flight,
            "TRAIN" => PlanType::Train,
            "BOAT" => PlanType::Boat,
            "CAR_RENTAL" | "CARRENTAL" => PlanType::CarRental,
            "THEATER" | "THEATRE" => PlanType::Theater,
            "SHOPPING" => PlanType::Shopping,
            "CAMPING" => PlanType::Camping,
            "RELIGION" => PlanType::Religion,
            _ => PlanType::Unmapped,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Lodging => "LODGING",
            PlanType::Restaurant => "RESTAURANT",
            PlanType::Activity => "ACTIVITY",
            PlanType::Tour => "TOUR",
            PlanType::Flight => "FLIGHT",
            PlanType::Train => "TRAIN",
            PlanType::Boat => "BOAT",
            PlanType::CarRental => "CAR_RENTAL",
            PlanType::Theater => "THEATER",
            PlanType::Shopping => "SHOPPING",
            PlanType::Camping => "CAMPING",
            PlanType::Religion => "RELIGION",
            PlanType::Unmapped => "UNMAPPED",
        }
    }

    pub fn family(&self) -> PlanFamily {
        match self {
            PlanType::Lodging => PlanFamily::Lodging,
            PlanType::Restaurant => PlanFamily::Restaurant,
            PlanType::Flight | PlanType::Boat => PlanFamily::Transit,
            PlanType::CarRental | PlanType::Train => PlanFamily::Rental,
            PlanType::Activity
            | PlanType::Tour
            | PlanType::Theater
            | PlanType::Shopping
            | PlanType::Camping
            | PlanType::Religion
            | PlanType::Unmapped => PlanFamily::Activity,
        }
    }

    /// Length of a plan of this type when no end time is known
    pub fn default_duration(&self) -> Duration {
        match self {
            PlanType::Lodging => Duration::hours(24),
            PlanType::Restaurant => Duration::hours(1),
            PlanType::Flight => Duration::hours(3),
            PlanType::Train => Duration::hours(4),
            PlanType::Boat => Duration::hours(2),
            PlanType::CarRental => Duration::hours(8),
            PlanType::Activity
            | PlanType::Tour
            | PlanType::Theater
            | PlanType::Shopping
            | PlanType::Camping
            | PlanType::Religion
            | PlanType::Unmapped => Duration::hours(2),
        }
    }

    /// Type tag sent to the creation endpoint
    pub fn persisted_tag(&self) -> &'static str {
        match self {
            PlanType::Unmapped => PlanType::Activity.as_str(),
            other => other.as_str(),
        }
    }
}

impl PlanFamily {
    /// Path segment of the creation endpoint for this family
    pub fn endpoint(&self) -> &'static str {
        match self {
            PlanFamily::Lodging => "lodging",
            PlanFamily::Restaurant => "restaurant",
            PlanFamily::Transit => "transit",
            PlanFamily::Rental => "rental",
            PlanFamily::Activity => "activity",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PlanType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PlanType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(PlanType::parse(&raw))
    }
}
