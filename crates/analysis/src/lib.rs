//! Pure computations over tracks: derived motion metrics and the projection of
//! a track into a drawing area.

pub mod postprocess;
pub mod projector;

pub use postprocess::{build_track, process, MAX_SPEED_MPS};
pub use projector::{CanvasPoint, CanvasSize, GeoProjector, HasCoordinate};
