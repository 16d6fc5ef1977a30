use model::{RawSample, RunSummary, TrackPoint};
use utility::geo::{BoundingBox, Coordinate};

/// Fraction of the canvas kept free on every side.
pub const DEFAULT_PADDING: f64 = 0.08;

/// Spans below this many degrees are widened to it.
pub const MIN_SPAN: f64 = 1e-9;

const MAX_PADDING: f64 = 0.49;

pub trait HasCoordinate {
    fn coordinate(&self) -> Coordinate;
}

impl HasCoordinate for Coordinate {
    fn coordinate(&self) -> Coordinate {
        *self
    }
}

impl HasCoordinate for RawSample {
    fn coordinate(&self) -> Coordinate {
        self.coordinate
    }
}

impl HasCoordinate for TrackPoint {
    fn coordinate(&self) -> Coordinate {
        self.sample.coordinate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn sanitized(self) -> Self {
        let clean = |value: f64| if value.is_finite() && value > 0.0 { value } else { 0.0 };
        Self::new(clean(self.width), clean(self.height))
    }
}

/// A point in canvas space, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

/// Placement of the unit square on one particular canvas.
struct Frame {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

/// Maps the coordinates of one track into canvas space.
///
/// The bounding box is fixed when the projector is built. Each axis of the box
/// is normalized to `0..1`, and the resulting unit square is scaled uniformly
/// to the smaller side of the padded canvas and centered, so the drawing is
/// never stretched to the canvas shape.
#[derive(Debug, Clone)]
pub struct GeoProjector {
    bounds: BoundingBox,
    padding: f64,
    coordinates: Vec<Coordinate>,
}

impl GeoProjector {
    pub fn new<P: HasCoordinate>(points: &[P]) -> Self {
        Self::with_padding(points, DEFAULT_PADDING)
    }

    /// `padding` is clamped to `0..0.49`, non-finite values use the default.
    pub fn with_padding<P: HasCoordinate>(points: &[P], padding: f64) -> Self {
        let coordinates = points.iter().map(HasCoordinate::coordinate).collect::<Vec<_>>();
        let bounds = BoundingBox::from_coordinates(coordinates.iter().copied())
            .unwrap_or_default();
        let padding = if padding.is_finite() {
            padding.clamp(0.0, MAX_PADDING)
        } else {
            DEFAULT_PADDING
        };
        Self {
            bounds,
            padding,
            coordinates,
        }
    }

    /// Projects the stored preview of a run, which is all the history keeps of
    /// its track.
    pub fn for_run(run: &RunSummary) -> Self {
        Self::new(&run.preview_points)
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// One canvas point per input point, in input order.
    pub fn project(&self, size: CanvasSize) -> Vec<CanvasPoint> {
        let frame = self.frame(size);
        self.coordinates
            .iter()
            .map(|coordinate| self.place(&frame, coordinate))
            .collect()
    }

    pub fn project_coordinate(&self, size: CanvasSize, coordinate: Coordinate) -> CanvasPoint {
        self.place(&self.frame(size), &coordinate)
    }

    fn frame(&self, size: CanvasSize) -> Frame {
        let size = size.sanitized();
        let inner_width = size.width * (1.0 - 2.0 * self.padding);
        let inner_height = size.height * (1.0 - 2.0 * self.padding);
        let scale = inner_width.min(inner_height);
        Frame {
            scale,
            offset_x: (size.width - scale) * 0.5,
            offset_y: (size.height - scale) * 0.5,
        }
    }

    fn place(&self, frame: &Frame, coordinate: &Coordinate) -> CanvasPoint {
        let latitude_span = self.bounds.latitude_span().max(MIN_SPAN);
        let longitude_span = self.bounds.longitude_span().max(MIN_SPAN);

        // canvas y grows downwards, so latitude is flipped
        let u = (coordinate.longitude - self.bounds.min_longitude) / longitude_span;
        let v = (self.bounds.max_latitude - coordinate.latitude) / latitude_span;

        CanvasPoint {
            x: frame.offset_x + u * frame.scale,
            y: frame.offset_y + v * frame.scale,
        }
    }
}
