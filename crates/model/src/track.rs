use chrono::{DateTime, Utc};
use utility::{format::METERS_PER_MILE, geo::Coordinate};

/// A single fix exactly as it was read from a recording.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    pub coordinate: Coordinate,
    /// Meters above sea level, if the recording had it.
    pub elevation: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// A sample enriched with the metrics derived from its predecessors.
///
/// Derived fields stay zero until the track has been post-processed.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPoint {
    pub sample: RawSample,
    /// Meters travelled since the first point.
    pub distance_from_start: f64,
    /// Instantaneous speed in m/s.
    pub speed: f64,
}

impl TrackPoint {
    pub fn coordinate(&self) -> Coordinate {
        self.sample.coordinate
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.sample.timestamp
    }
}

impl From<RawSample> for TrackPoint {
    fn from(sample: RawSample) -> Self {
        Self {
            sample,
            distance_from_start: 0.0,
            speed: 0.0,
        }
    }
}

/// Seconds from `earlier` to `later`, negative if they are out of order.
pub fn seconds_between(earlier: &DateTime<Utc>, later: &DateTime<Utc>) -> f64 {
    let delta = *later - *earlier;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => delta.num_milliseconds() as f64 / 1000.0,
    }
}

/// A whole recording, ordered by time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub points: Vec<TrackPoint>,
}

impl Track {
    pub fn new(points: Vec<TrackPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Time between the first and the last point.
    pub fn duration_seconds(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => {
                seconds_between(&first.sample.timestamp, &last.sample.timestamp)
            }
            _ => 0.0,
        }
    }

    /// Meters, taken from the last point.
    pub fn total_distance(&self) -> f64 {
        self.points
            .last()
            .map(|point| point.distance_from_start)
            .unwrap_or(0.0)
    }

    /// Seconds per mile, `0.0` when the track covers no distance.
    pub fn average_pace(&self) -> f64 {
        let miles = self.total_distance() / METERS_PER_MILE;
        if miles > 0.0 {
            self.duration_seconds() / miles
        } else {
            0.0
        }
    }

    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.points.iter().map(TrackPoint::coordinate)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn point(seconds: i64, distance_from_start: f64) -> TrackPoint {
        let start = Utc.with_ymd_and_hms(2025, 10, 30, 7, 0, 0).unwrap();
        TrackPoint {
            sample: RawSample {
                coordinate: Coordinate::new(0.0, 0.0),
                elevation: None,
                timestamp: start + Duration::seconds(seconds),
            },
            distance_from_start,
            speed: 0.0,
        }
    }

    #[test]
    fn empty_track_has_zero_metrics() {
        let track = Track::default();
        assert_eq!(track.duration_seconds(), 0.0);
        assert_eq!(track.total_distance(), 0.0);
        assert_eq!(track.average_pace(), 0.0);
    }

    #[test]
    fn pace_is_seconds_per_mile() {
        let track = Track::new(vec![point(0, 0.0), point(480, 1609.34)]);
        assert_eq!(track.duration_seconds(), 480.0);
        assert_eq!(track.total_distance(), 1609.34);
        assert!((track.average_pace() - 480.0).abs() < 1e-9);
    }

    #[test]
    fn standing_still_reports_zero_pace() {
        let track = Track::new(vec![point(0, 0.0), point(60, 0.0)]);
        assert_eq!(track.duration_seconds(), 60.0);
        assert_eq!(track.average_pace(), 0.0);
    }

    #[test]
    fn fractional_seconds_are_kept() {
        let a = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let b = a + Duration::milliseconds(1500);
        assert_eq!(seconds_between(&a, &b), 1.5);
        assert_eq!(seconds_between(&b, &a), -1.5);
    }
}
