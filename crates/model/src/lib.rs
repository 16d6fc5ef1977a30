pub mod run;
pub mod track;

pub use run::RunSummary;
pub use track::{RawSample, Track, TrackPoint};
pub use utility::geo::Coordinate;
