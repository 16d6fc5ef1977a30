use std::io::{BufReader, Read};

use chrono::{DateTime, Utc};
use model::RawSample;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tokio_util::sync::CancellationToken;
use utility::geo::Coordinate;

use crate::ParseError;

const TRACK_POINT: &[u8] = b"trkpt";
const ELEVATION: &[u8] = b"ele";
const TIME: &[u8] = b"time";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Elevation,
    Time,
}

/// Everything collected for the `trkpt` that is currently open.
#[derive(Debug, Default)]
struct PendingPoint {
    latitude: Option<f64>,
    longitude: Option<f64>,
    elevation: String,
    time: String,
}

impl PendingPoint {
    fn from_element(element: &BytesStart) -> Result<Self, quick_xml::Error> {
        let mut point = Self::default();
        for attribute in element.attributes() {
            let attribute = attribute?;
            let value = attribute.unescape_value()?;
            match attribute.key.local_name().as_ref() {
                b"lat" => point.latitude = value.trim().parse().ok(),
                b"lon" => point.longitude = value.trim().parse().ok(),
                _ => {}
            }
        }
        Ok(point)
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Elevation => &mut self.elevation,
            Field::Time => &mut self.time,
        }
    }

    /// `None` if the point lacks a valid position or timestamp.
    fn finish(self) -> Option<RawSample> {
        let coordinate = Coordinate::checked(self.latitude?, self.longitude?)?;
        let timestamp = parse_timestamp(self.time.trim())?;
        let elevation = self
            .elevation
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|elevation| elevation.is_finite());
        Some(RawSample {
            coordinate,
            elevation,
            timestamp,
        })
    }
}

/// RFC 3339 with `Z` or a numeric offset, fractional seconds optional.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

#[derive(Debug, Default)]
struct ParserState {
    point: Option<PendingPoint>,
    field: Option<Field>,
    depth: usize,
    saw_root: bool,
    skipped: usize,
}

impl ParserState {
    fn start(&mut self, element: &BytesStart) -> Result<(), quick_xml::Error> {
        match element.local_name().as_ref() {
            TRACK_POINT => {
                self.point = Some(PendingPoint::from_element(element)?);
                self.field = None;
            }
            ELEVATION => self.open_field(Field::Elevation),
            TIME => self.open_field(Field::Time),
            _ => {}
        }
        Ok(())
    }

    fn open_field(&mut self, field: Field) {
        if let Some(point) = self.point.as_mut() {
            point.field_mut(field).clear();
            self.field = Some(field);
        }
    }

    fn text(&mut self, chunk: &str) {
        if let (Some(point), Some(field)) = (self.point.as_mut(), self.field) {
            point.field_mut(field).push_str(chunk);
        }
    }

    fn end(&mut self, local_name: &[u8]) -> Option<RawSample> {
        match local_name {
            TRACK_POINT => {
                self.field = None;
                let sample = self.point.take()?.finish();
                if sample.is_none() {
                    self.skip();
                }
                sample
            }
            ELEVATION | TIME => {
                self.field = None;
                None
            }
            _ => None,
        }
    }

    fn skip(&mut self) {
        self.skipped += 1;
        log::trace!("skipping track point without position or timestamp");
    }
}

/// Reads all track points from `reader`, checking `cancel` between XML events.
///
/// The document is pulled event by event through a single reusable buffer, so
/// memory use does not grow with the size of the recording beyond the samples
/// themselves.
pub fn parse_reader_cancellable<R: Read>(
    reader: R,
    cancel: &CancellationToken,
) -> Result<Vec<RawSample>, ParseError> {
    let mut reader = Reader::from_reader(BufReader::new(reader));
    let mut state = ParserState::default();
    let mut samples = Vec::new();
    let mut buf = Vec::new();

    loop {
        if cancel.is_cancelled() {
            return Err(ParseError::Cancelled);
        }
        let position = reader.buffer_position() as u64;
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                state.depth += 1;
                state.saw_root = true;
                state
                    .start(e)
                    .map_err(|why| ParseError::from_xml(why, position))?;
            }
            Ok(Event::End(ref e)) => {
                state.depth = state.depth.saturating_sub(1);
                if let Some(sample) = state.end(e.local_name().as_ref()) {
                    samples.push(sample);
                }
            }
            Ok(Event::Empty(ref e)) => {
                state.saw_root = true;
                // a self-closing trkpt can not carry a timestamp
                if e.local_name().as_ref() == TRACK_POINT {
                    state.skip();
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|why| ParseError::from_xml(why, position))?;
                state.text(&text);
            }
            Ok(Event::CData(ref e)) => {
                let text = std::str::from_utf8(e)
                    .map_err(|why| ParseError::syntax(position, why.to_string()))?;
                state.text(text);
            }
            Ok(Event::Eof) => break,
            Err(why) => return Err(ParseError::from_xml(why, reader.buffer_position() as u64)),
            _ => {}
        }
        buf.clear();
    }

    let position = reader.buffer_position() as u64;
    if !state.saw_root {
        return Err(ParseError::syntax(position, "document has no root element"));
    }
    if state.depth > 0 {
        return Err(ParseError::syntax(
            position,
            format!("unexpected end of document, {} element(s) left open", state.depth),
        ));
    }

    log::debug!(
        "parsed {} track points, skipped {}",
        samples.len(),
        state.skipped
    );
    Ok(samples)
}
