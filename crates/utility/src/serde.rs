/// Stores a polyline as `[[lat, lon], ...]`.
///
/// Deserialization is lenient: entries that are not two-element numeric arrays
/// are skipped instead of failing the surrounding document.
pub mod coordinate_pairs {
    use schemars::gen::SchemaGenerator;
    use schemars::schema::{ArrayValidation, InstanceType, Schema, SchemaObject};
    use serde::ser::SerializeSeq;
    use serde::de::IgnoredAny;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::geo::Coordinate;

    /// Either a `[lat, lon]` pair or anything else.
    #[derive(Deserialize)]
    #[serde(untagged)]
    #[allow(dead_code)]
    enum PairOrJunk {
        Pair(f64, f64),
        Junk(IgnoredAny),
    }

    pub fn serialize<S>(
        coordinates: &[Coordinate],
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(coordinates.len()))?;
        for coordinate in coordinates {
            seq.serialize_element(&[coordinate.latitude, coordinate.longitude])?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Coordinate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<PairOrJunk>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| match entry {
                PairOrJunk::Pair(latitude, longitude) => {
                    Some(Coordinate::new(latitude, longitude))
                }
                PairOrJunk::Junk(_) => None,
            })
            .collect())
    }

    pub fn schema(gen: &mut SchemaGenerator) -> Schema {
        let pair = SchemaObject {
            instance_type: Some(InstanceType::Array.into()),
            array: Some(Box::new(ArrayValidation {
                items: Some(gen.subschema_for::<f64>().into()),
                min_items: Some(2),
                max_items: Some(2),
                ..Default::default()
            })),
            ..Default::default()
        };
        SchemaObject {
            instance_type: Some(InstanceType::Array.into()),
            array: Some(Box::new(ArrayValidation {
                items: Some(Schema::Object(pair).into()),
                ..Default::default()
            })),
            ..Default::default()
        }
        .into()
    }

}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use crate::geo::Coordinate;

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super::coordinate_pairs")]
        points: Vec<Coordinate>,
    }

    #[test]
    fn writes_nested_pairs() {
        let wrapper = Wrapper {
            points: vec![Coordinate::new(1.5, -2.25), Coordinate::new(3.0, 4.0)],
        };
        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(json, r#"{"points":[[1.5,-2.25],[3.0,4.0]]}"#);
    }

    #[test]
    fn skips_entries_that_are_not_pairs() {
        let json = r#"{"points":[[1.0,2.0],[3.0],"x",[4.0,5.0,6.0],[7.0,8.0]]}"#;
        let wrapper: Wrapper = serde_json::from_str(json).unwrap();
        assert_eq!(
            wrapper.points,
            vec![Coordinate::new(1.0, 2.0), Coordinate::new(7.0, 8.0)]
        );
    }
}
