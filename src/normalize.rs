//! Turning property values into something a JSON encoder can emit.
//!
//! Every conversion here is lossy by design:
//!
//! * decimals become `f64`, trading precision for encoder compatibility;
//! * timestamps become wire text (see [`format_timestamp`]), which
//!   [`parse_timestamp`](crate::convert::parse_timestamp) later reads back at
//!   millisecond resolution;
//! * sets become lists whose order nothing may rely on.
//!
//! A value with no such form stays as it is and makes the encoder fail: a
//! timestamp whose year needs more than four digits, or a decimal that does
//! not parse as `f64`. A decimal beyond the `f64` range becomes an infinite
//! float, which the encoder rejects as well.

use bigdecimal::{BigDecimal, ToPrimitive};

use crate::convert::format_timestamp;
use crate::value::{Properties, Value};

/// Which values of a document get normalized before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Normalization {
    /// Every leaf in the final document, including the property maps of
    /// related and linked resources.
    #[default]
    Uniform,
    /// Only the serialized resource's own property values. Relationship
    /// property maps are encoded as they are, so a decimal, timestamp or set
    /// inside them fails to encode.
    OwnProperties,
}

/// Normalizes a single value without looking inside lists or maps.
///
/// Decimals, timestamps and sets are converted; everything else is returned
/// unchanged.
pub fn normalize(value: Value) -> Value {
    match value {
        Value::Decimal(d) => decimal_to_f64(&d).map_or(Value::Decimal(d), Value::Float),
        Value::Timestamp(ts) => format_timestamp(&ts).map_or(Value::Timestamp(ts), Value::String),
        Value::Set(set) => Value::List(set.into_vec()),
        other => other,
    }
}

/// Normalizes `value` and, recursively, everything it contains.
pub fn normalize_deep(value: Value) -> Value {
    match normalize(value) {
        Value::List(items) => Value::List(items.into_iter().map(normalize_deep).collect()),
        Value::Map(map) => Value::Map(normalize_properties(map)),
        other => other,
    }
}

/// Applies [`normalize_deep`] to every value in `properties`.
pub fn normalize_properties(properties: Properties) -> Properties {
    properties
        .into_iter()
        .map(|(key, value)| (key, normalize_deep(value)))
        .collect()
}

// Parsing the decimal text yields the nearest f64.
fn decimal_to_f64(d: &BigDecimal) -> Option<f64> {
    d.to_string().parse::<f64>().ok().or_else(|| d.to_f64())
}
