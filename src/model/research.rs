//! Research report types: the aggregate recorded after a beach survey.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Beach, UnknownLabel, Worker};

/// A beach survey report: who surveyed which beach, segment by segment.
///
/// Segments and images are owned by the report and written with it in a
/// single transaction. After creation only `status` changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchReport {
    pub id: Uuid,

    /// The worker who walked the beach.
    pub researcher: Worker,

    /// The surveyed beach.
    pub beach: Beach,

    /// Beach length as reported by the caller. Display only.
    pub beach_length: Option<f64>,

    /// Sum of segment lengths in meters.
    pub total_length: f64,

    /// Estimated amount of debris to collect.
    pub expected_trash_amount: u32,

    pub reported_at: Timestamp,
    pub weather: String,
    pub special_note: String,
    pub status: ReportStatus,

    /// Surveyed segments in the order they were submitted.
    pub segments: Vec<ResearchSegment>,

    /// Uploaded image file names in the order they were submitted.
    pub images: Vec<String>,
}

impl ResearchReport {
    /// Sum of the contained segment lengths.
    pub fn segment_length_sum(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }
}

/// One surveyed stretch of a beach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchSegment {
    /// Label such as `Haeundae-3`, supplied by the client.
    pub beach_name_with_index: String,
    pub start: Coordinate,
    pub end: Coordinate,
    pub main_trash_type: TrashType,

    /// Distance from `start` to `end` in meters.
    pub length: f64,
}

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Where a report stands in the assignment workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportStatus {
    /// Surveyed; a cleanup crew still has to be assigned.
    AssignmentNeeded,

    /// A cleanup crew has been assigned.
    AssignmentCompleted,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AssignmentNeeded => "ASSIGNMENT_NEEDED",
            Self::AssignmentCompleted => "ASSIGNMENT_COMPLETED",
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASSIGNMENT_NEEDED" => Ok(Self::AssignmentNeeded),
            "ASSIGNMENT_COMPLETED" => Ok(Self::AssignmentCompleted),
            other => Err(UnknownLabel(other.to_string())),
        }
    }
}

/// Dominant kind of debris observed on a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrashType {
    /// Nets, ropes, traps and other derelict fishing gear.
    FishingGear,
    Buoy,
    HouseholdWaste,
    LargeDumpedWaste,

    /// Driftwood, reeds and seaweed.
    Vegetation,
}

impl TrashType {
    pub const ALL: [Self; 5] = [
        Self::FishingGear,
        Self::Buoy,
        Self::HouseholdWaste,
        Self::LargeDumpedWaste,
        Self::Vegetation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FishingGear => "FISHING_GEAR",
            Self::Buoy => "BUOY",
            Self::HouseholdWaste => "HOUSEHOLD_WASTE",
            Self::LargeDumpedWaste => "LARGE_DUMPED_WASTE",
            Self::Vegetation => "VEGETATION",
        }
    }
}

impl fmt::Display for TrashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Labels are matched exactly; `buoy` is not `BUOY`.
impl FromStr for TrashType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trash_type_labels_parse_back() {
        for t in TrashType::ALL {
            assert_eq!(t.as_str().parse::<TrashType>().unwrap(), t);
        }
    }

    #[test]
    fn trash_type_parse_is_case_sensitive() {
        let err = "buoy".parse::<TrashType>().unwrap_err();
        assert_eq!(err.0, "buoy");
    }

    #[test]
    fn status_serializes_as_screaming_snake() {
        let json = serde_json::to_string(&ReportStatus::AssignmentNeeded).unwrap();
        assert_eq!(json, "\"ASSIGNMENT_NEEDED\"");
        assert_eq!(
            "ASSIGNMENT_COMPLETED".parse::<ReportStatus>().unwrap(),
            ReportStatus::AssignmentCompleted
        );
    }

    #[test]
    fn unknown_status_label_fails() {
        assert!("DONE".parse::<ReportStatus>().is_err());
    }
}
