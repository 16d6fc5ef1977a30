use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    format,
    geo::Coordinate,
    id::{HasId, Id},
};
use uuid::Uuid;

use crate::track::Track;

/// The persisted snapshot of an imported run, as listed in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub id: Id<RunSummary>,
    pub imported_at: DateTime<Utc>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub avg_pace_sec_per_mile: f64,
    /// The full track polyline, `[[lat, lon], ...]`.
    #[serde(with = "utility::serde::coordinate_pairs")]
    #[schemars(schema_with = "utility::serde::coordinate_pairs::schema")]
    pub preview_points: Vec<Coordinate>,
}

impl HasId for RunSummary {
    type IdType = Uuid;
}

impl RunSummary {
    /// Summarizes a processed track under a fresh id, imported now.
    pub fn from_track(track: &Track, title: Option<String>, location: Option<String>) -> Self {
        Self::from_track_at(Id::new(Uuid::new_v4()), Utc::now(), track, title, location)
    }

    pub fn from_track_at(
        id: Id<RunSummary>,
        imported_at: DateTime<Utc>,
        track: &Track,
        title: Option<String>,
        location: Option<String>,
    ) -> Self {
        Self {
            id,
            imported_at,
            title,
            location,
            distance_meters: track.total_distance(),
            duration_seconds: track.duration_seconds(),
            avg_pace_sec_per_mile: track.average_pace(),
            preview_points: track.coordinates().collect(),
        }
    }

    /// The explicit title, or one derived from the import time.
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format::default_title(&self.imported_at))
    }
}
