//! Serde helpers for the wire encodings of §external-interface data.
//!
//! Field elements travel as decimal strings (big-integer safe in JSON);
//! curve points as `{ "x": "...", "y": "..." }` pairs of decimal strings.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::curve::{point_coordinates, point_from_coordinates, BaseField, Curve, ScalarField};

pub fn field_to_decimal(value: &BaseField) -> String {
    value.to_string()
}

pub fn field_from_decimal(s: &str) -> Result<BaseField, String> {
    BaseField::from_str(s).map_err(|_| format!("invalid decimal field element: {s:?}"))
}

/// Decimal-string encoding for a single base-field element.
pub mod field {
    use super::*;

    pub fn serialize<S>(value: &BaseField, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&field_to_decimal(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BaseField, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        field_from_decimal(&s).map_err(DeError::custom)
    }
}

/// Decimal-string encoding for vectors of base-field elements
/// (public-signal arrays).
pub mod field_vec {
    use super::*;

    pub fn serialize<S>(value: &[BaseField], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let decimals: Vec<String> = value.iter().map(field_to_decimal).collect();
        decimals.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<BaseField>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let decimals = Vec::<String>::deserialize(deserializer)?;
        decimals
            .into_iter()
            .map(|s| field_from_decimal(&s).map_err(DeError::custom))
            .collect()
    }
}

/// Decimal-string encoding for subgroup scalars (secrets and nonces inside
/// witness bundles; these never cross the coordinator wire).
pub mod scalar {
    use super::*;

    pub fn serialize<S>(value: &ScalarField, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<ScalarField, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ScalarField::from_str(&s)
            .map_err(|_| DeError::custom(format!("invalid decimal scalar: {s:?}")))
    }
}

/// Decimal-string encoding for vectors of subgroup scalars.
pub mod scalar_vec {
    use super::*;

    pub fn serialize<S>(value: &[ScalarField], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let decimals: Vec<String> = value.iter().map(|v| v.to_string()).collect();
        decimals.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<ScalarField>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let decimals = Vec::<String>::deserialize(deserializer)?;
        decimals
            .into_iter()
            .map(|s| {
                ScalarField::from_str(&s)
                    .map_err(|_| DeError::custom(format!("invalid decimal scalar: {s:?}")))
            })
            .collect()
    }
}

/// `{ "x": ..., "y": ... }` encoding for BabyJubJub points. The identity is
/// its affine form `(0, 1)`.
pub mod point {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Coordinates {
        x: String,
        y: String,
    }

    pub fn serialize<S>(value: &Curve, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let (x, y) = point_coordinates(value);
        Coordinates {
            x: field_to_decimal(&x),
            y: field_to_decimal(&y),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Curve, D::Error>
    where
        D: Deserializer<'de>,
    {
        let coords = Coordinates::deserialize(deserializer)?;
        let x = field_from_decimal(&coords.x).map_err(DeError::custom)?;
        let y = field_from_decimal(&coords.y).map_err(DeError::custom)?;
        point_from_coordinates(x, y).map_err(DeError::custom)
    }
}
