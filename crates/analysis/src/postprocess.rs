use itertools::Itertools;
use model::{track::seconds_between, RawSample, Track, TrackPoint};

/// Speeds above this are treated as GPS jumps and reported as this value.
///
/// 8 m/s is roughly a 3:20 mile. Only the reported speed is clamped, the
/// distance of the segment still counts towards the total.
pub const MAX_SPEED_MPS: f64 = 8.0;

struct Segment {
    meters: f64,
    seconds: f64,
}

impl Segment {
    fn between(from: &TrackPoint, to: &TrackPoint) -> Self {
        Self {
            meters: from.coordinate().distance_to(&to.coordinate()),
            seconds: seconds_between(&from.sample.timestamp, &to.sample.timestamp),
        }
    }

    fn speed(&self) -> f64 {
        if self.seconds > 0.0 {
            (self.meters / self.seconds).clamp(0.0, MAX_SPEED_MPS)
        } else {
            0.0
        }
    }
}

/// Fills `distance_from_start` and `speed` of every point from its
/// predecessor. Points are expected in time order and are not re-sorted.
pub fn fill_distance_and_speed(points: &mut [TrackPoint]) {
    let segments = points
        .iter()
        .tuple_windows()
        .map(|(from, to)| Segment::between(from, to))
        .collect::<Vec<_>>();

    if let Some(first) = points.first_mut() {
        first.distance_from_start = 0.0;
        first.speed = 0.0;
    }

    let mut total = 0.0;
    for (point, segment) in points.iter_mut().skip(1).zip(segments) {
        total += segment.meters;
        point.distance_from_start = total;
        point.speed = segment.speed();
    }
}

pub fn process(samples: Vec<RawSample>) -> Vec<TrackPoint> {
    let mut points = samples.into_iter().map(TrackPoint::from).collect::<Vec<_>>();
    fill_distance_and_speed(&mut points);
    points
}

pub fn build_track(samples: Vec<RawSample>) -> Track {
    Track::new(process(samples))
}
