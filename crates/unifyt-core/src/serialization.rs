//! Quantity persistence: a plain JSON record
//! `{"type": "Quantity", "value": 1.5 | [..], "unit": "m / s", "version": "1.0"}`.
//!
//! The unit is stored as its rendered string and re-parsed on load, so
//! registry-defined units are not carried along. JSON has no NaN or infinity,
//! so those elements are written as the strings `"NaN"`, `"inf"` and `"-inf"`.

use crate::error::SerializationError;
use crate::quantity::{Magnitude, Quantity};
use crate::unit::Unit;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Record format version written by this crate.
pub const FORMAT_VERSION: &str = "1.0";

const QUANTITY_TYPE: &str = "Quantity";

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

/// Serialized form of a [Quantity].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(with = "magnitude_repr")]
    pub value: Magnitude,
    pub unit: String,
    #[serde(default = "default_version")]
    pub version: String,
}

mod magnitude_repr {
    use crate::quantity::Magnitude;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Element {
        Number(f64),
        NonFinite(String),
    }

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Scalar(Element),
        Array(Vec<Element>),
    }

    fn encode(v: f64) -> Element {
        match v {
            v if v.is_finite() => Element::Number(v),
            v if v.is_nan() => Element::NonFinite("NaN".to_string()),
            v if v > 0.0 => Element::NonFinite("inf".to_string()),
            _ => Element::NonFinite("-inf".to_string()),
        }
    }

    fn decode<E: serde::de::Error>(e: Element) -> Result<f64, E> {
        match e {
            Element::Number(v) => Ok(v),
            Element::NonFinite(s) => match s.as_str() {
                "NaN" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                _ => Err(E::custom(format!("invalid magnitude element '{s}'"))),
            },
        }
    }

    pub fn serialize<S: Serializer>(m: &Magnitude, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match m {
            Magnitude::Scalar(v) => Repr::Scalar(encode(*v)),
            Magnitude::Array(vs) => Repr::Array(vs.iter().copied().map(encode).collect()),
        };
        repr.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Magnitude, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Scalar(e) => decode(e).map(Magnitude::Scalar),
            Repr::Array(es) => es
                .into_iter()
                .map(decode)
                .collect::<Result<Vec<_>, _>>()
                .map(Magnitude::Array),
        }
    }
}

impl From<Quantity> for QuantityRecord {
    fn from(q: Quantity) -> Self {
        let (value, unit) = q.into_parts();
        QuantityRecord {
            kind: QUANTITY_TYPE.to_string(),
            value,
            unit: unit.to_string(),
            version: default_version(),
        }
    }
}

impl TryFrom<QuantityRecord> for Quantity {
    type Error = SerializationError;

    fn try_from(record: QuantityRecord) -> Result<Self, Self::Error> {
        if record.kind != QUANTITY_TYPE {
            return Err(SerializationError::NotAQuantity(record.kind));
        }
        let major = record.version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(SerializationError::UnsupportedVersion {
                found: record.version,
                supported: FORMAT_VERSION.to_string(),
            });
        }
        let unit = Unit::parse(&record.unit)?;
        Ok(Quantity::from_parts(record.value, unit))
    }
}

pub fn to_record(q: &Quantity) -> QuantityRecord {
    q.clone().into()
}

pub fn from_record(record: QuantityRecord) -> Result<Quantity, SerializationError> {
    record.try_into()
}

pub fn to_json(q: &Quantity) -> Result<String, SerializationError> {
    Ok(serde_json::to_string(q)?)
}

pub fn to_json_pretty(q: &Quantity) -> Result<String, SerializationError> {
    Ok(serde_json::to_string_pretty(q)?)
}

pub fn from_json(s: &str) -> Result<Quantity, SerializationError> {
    let record: QuantityRecord = serde_json::from_str(s)?;
    from_record(record)
}

/// JSON-encoded bytes.
pub fn to_bytes(q: &Quantity) -> Result<Vec<u8>, SerializationError> {
    Ok(serde_json::to_vec(q)?)
}

pub fn from_bytes(bytes: &[u8]) -> Result<Quantity, SerializationError> {
    let record: QuantityRecord = serde_json::from_slice(bytes)?;
    from_record(record)
}

/// Write the record as JSON to `path`.
pub fn save(q: &Quantity, path: impl AsRef<Path>) -> Result<(), SerializationError> {
    let path = path.as_ref();
    std::fs::write(path, to_json(q)?)?;
    tracing::debug!(path = %path.display(), quantity = %q, "saved quantity");
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> Result<Quantity, SerializationError> {
    let path = path.as_ref();
    let q = from_json(&std::fs::read_to_string(path)?)?;
    tracing::debug!(path = %path.display(), quantity = %q, "loaded quantity");
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UnitError;
    use serde_json::json;

    #[test]
    fn record_shape() {
        let q = Quantity::new(100.0, "meter").unwrap();
        let v: serde_json::Value = serde_json::from_str(&to_json(&q).unwrap()).unwrap();
        assert_eq!(
            v,
            json!({"type": "Quantity", "value": 100.0, "unit": "meter", "version": "1.0"})
        );
    }

    #[test]
    fn arrays_are_flat_sequences() {
        let q = Quantity::new(vec![1.0, 2.0, 3.0], "m/s").unwrap();
        let record = to_record(&q);
        assert_eq!(record.value, Magnitude::Array(vec![1.0, 2.0, 3.0]));
        assert_eq!(record.unit, "m / s");
        let back = from_json(&to_json_pretty(&q).unwrap()).unwrap();
        assert_eq!(back.values(), q.values());
        assert_eq!(back.unit(), q.unit());
    }

    #[test]
    fn decodes_integer_values_and_missing_version() {
        let q = from_json(r#"{"type": "Quantity", "value": 100, "unit": "km"}"#).unwrap();
        assert_eq!(q.value(), Some(100.0));
        assert_eq!(q.unit().to_string(), "km");
    }

    #[test]
    fn scaled_units_survive() {
        let q = Quantity::new(2.0, "220 yard").unwrap();
        let back = from_bytes(&to_bytes(&q).unwrap()).unwrap();
        assert_eq!(back.unit().scale(), 220.0);
        assert_eq!(back, q);
    }

    #[test]
    fn rejects_other_types_and_versions() {
        let wrong_type = json!({"type": "Unit", "value": 1.0, "unit": "m"});
        assert!(matches!(
            from_json(&wrong_type.to_string()),
            Err(SerializationError::NotAQuantity(t)) if t == "Unit"
        ));
        let wrong_version = json!({"type": "Quantity", "value": 1.0, "unit": "m", "version": "2.0"});
        assert!(matches!(
            from_json(&wrong_version.to_string()),
            Err(SerializationError::UnsupportedVersion { .. })
        ));
        let bad_unit = json!({"type": "Quantity", "value": 1.0, "unit": "m/"});
        assert!(matches!(
            from_json(&bad_unit.to_string()),
            Err(SerializationError::Unit(UnitError::Parse { .. }))
        ));
        assert!(matches!(from_json("{"), Err(SerializationError::Json(_))));
    }

    #[test]
    fn non_finite_values_survive() {
        let q = Quantity::new(f64::NAN, "m").unwrap();
        let json = to_json(&q).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["value"], "NaN");
        assert!(from_json(&json).unwrap().value().unwrap().is_nan());

        let q = Quantity::new(vec![1.0, f64::INFINITY, f64::NEG_INFINITY], "s").unwrap();
        let back = from_bytes(&to_bytes(&q).unwrap()).unwrap();
        assert_eq!(back.values(), &[1.0, f64::INFINITY, f64::NEG_INFINITY]);

        let bad = json!({"type": "Quantity", "value": "lots", "unit": "m"});
        assert!(matches!(from_json(&bad.to_string()), Err(SerializationError::Json(_))));
        let null = json!({"type": "Quantity", "value": null, "unit": "m"});
        assert!(matches!(from_json(&null.to_string()), Err(SerializationError::Json(_))));
    }

    #[test]
    fn save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("distance.json");
        let q = Quantity::new(vec![1.5, -2.0], "km").unwrap();
        save(&q, &path).unwrap();
        let back = load(&path).unwrap();
        assert_eq!(back.values(), &[1.5, -2.0]);
        assert!(matches!(
            load(dir.path().join("missing.json")),
            Err(SerializationError::Io(_))
        ));
    }

    #[test]
    fn serde_derive_goes_through_the_record() {
        let q = Quantity::new(3.0, "s").unwrap();
        let v = serde_json::to_value(&q).unwrap();
        assert_eq!(v["type"], "Quantity");
        let back: Quantity = serde_json::from_value(v).unwrap();
        assert_eq!(back, q);
    }
}
