//! Conversions between wire text and typed values.
//!
//! The timestamp text format, `YYYY-MM-DD HH:MM:SS.ffffff`, is shared by both
//! directions: [`format_timestamp`] writes it and [`parse_timestamp`] reads it
//! back. It carries no UTC offset.

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::{Error, Result};
use crate::value::Value;

/// The `chrono` pattern for the wire timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Byte layout of the wire format; `d` marks a digit.
const TIMESTAMP_SHAPE: &[u8; 26] = b"dddd-dd-dd dd:dd:dd.dddddd";

const NANOS_PER_MILLI: u32 = 1_000_000;

/// Years that fit the four digit `YYYY` field.
const WIRE_YEARS: RangeInclusive<i32> = 0..=9999;

/// Renders `ts` in the wire timestamp format, always with six fractional digits.
///
/// Years outside `0000..=9999` have no fixed-width form and are rejected with
/// [`Error::TimestampRange`].
pub fn format_timestamp(ts: &NaiveDateTime) -> Result<String> {
    if !WIRE_YEARS.contains(&ts.year()) {
        return Err(Error::TimestampRange { timestamp: *ts });
    }
    Ok(ts.format(TIMESTAMP_FORMAT).to_string())
}

/// Parses wire timestamp text, dropping anything finer than a millisecond.
///
/// The store behind the API keeps millisecond resolution, so the microsecond
/// remainder modulo 1000 is subtracted on the way in:
/// `00:00:00.001500` reads back as `00:00:00.001000`.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    let format_error = || Error::TimestampFormat {
        input: text.to_owned(),
    };
    // chrono alone tolerates signs and short fields; the wire format is fixed width.
    if !has_timestamp_shape(text) {
        return Err(format_error());
    }
    let parsed = NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).map_err(|_| format_error())?;
    Ok(truncate_to_millis(parsed))
}

/// Accepts either a timestamp, returned untouched, or wire timestamp text.
pub fn convert_to_datetime(value: &Value) -> Result<NaiveDateTime> {
    match value {
        Value::Timestamp(ts) => Ok(*ts),
        Value::String(text) => parse_timestamp(text),
        other => Err(Error::TimestampFormat {
            input: other.to_string(),
        }),
    }
}

fn has_timestamp_shape(text: &str) -> bool {
    text.len() == TIMESTAMP_SHAPE.len()
        && text
            .bytes()
            .zip(TIMESTAMP_SHAPE.iter())
            .all(|(byte, &expected)| match expected {
                b'd' => byte.is_ascii_digit(),
                _ => byte == expected,
            })
}

fn truncate_to_millis(ts: NaiveDateTime) -> NaiveDateTime {
    let nanos = ts.nanosecond();
    let truncated = nanos - nanos % NANOS_PER_MILLI;
    // Only fails for leap-second nanos, which cannot come out of six digits.
    ts.with_nanosecond(truncated).unwrap_or(ts)
}

/// Parses `"true"` or `"false"`, ignoring ASCII case.
pub fn parse_boolean(text: &str) -> Result<bool> {
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Error::BooleanFormat {
            input: text.to_owned(),
        })
    }
}

/// Booleans pass through, `Null` stays absent, strings go through [`parse_boolean`].
/// Anything else is rejected rather than read as `false`.
pub fn convert_to_boolean(value: &Value) -> Result<Option<bool>> {
    match value {
        Value::Bool(b) => Ok(Some(*b)),
        Value::Null => Ok(None),
        Value::String(text) => parse_boolean(text).map(Some),
        other => Err(Error::BooleanFormat {
            input: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn at_micros(micros: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_micro_opt(0, 0, 0, micros)
            .unwrap()
    }

    #[rstest(
        text,
        micros,
        case("2020-01-01 00:00:00.000000", 0),
        case("2020-01-01 00:00:00.000500", 0),
        case("2020-01-01 00:00:00.001500", 1000),
        case("2020-01-01 00:00:00.999999", 999_000)
    )]
    fn parse_truncates_below_a_millisecond(text: &str, micros: u32) {
        assert_eq!(parse_timestamp(text).unwrap(), at_micros(micros));
    }

    #[rstest(
        text,
        case(""),
        case("2020-01-01"),
        case("2020-01-01 00:00:00"),
        case("2020-01-01 00:00:00.0005"),
        case("2020-01-01T00:00:00.000500"),
        case("2020-13-01 00:00:00.000000"),
        case("2020-1-01 00:00:00.0000000"),
        case("+2020-01-01 00:00:00.00000"),
        case("not a timestamp at all!!!!")
    )]
    fn parse_rejects_other_shapes(text: &str) {
        match parse_timestamp(text) {
            Err(Error::TimestampFormat { input }) => assert_eq!(input, text),
            other => panic!("expected a format error, got {other:?}"),
        }
    }

    #[test]
    fn format_pads_six_fraction_digits() {
        assert_eq!(
            format_timestamp(&at_micros(500)).unwrap(),
            "2020-01-01 00:00:00.000500"
        );
        assert_eq!(
            format_timestamp(&at_micros(0)).unwrap(),
            "2020-01-01 00:00:00.000000"
        );
    }

    #[rstest(year, case(0), case(1), case(9999))]
    fn edge_years_round_trip(year: i32) {
        let ts = NaiveDate::from_ymd_opt(year, 12, 31)
            .unwrap()
            .and_hms_micro_opt(23, 59, 59, 1500)
            .unwrap();
        let text = format_timestamp(&ts).unwrap();
        assert_eq!(text.len(), 26);
        assert_eq!(parse_timestamp(&text).unwrap(), ts.with_nanosecond(1_000_000).unwrap());
    }

    #[rstest(year, case(10000), case(-1))]
    fn years_without_four_digits_are_rejected(year: i32) {
        let ts = NaiveDate::from_ymd_opt(year, 1, 1)
            .unwrap()
            .and_hms_micro_opt(0, 0, 0, 1500)
            .unwrap();
        match format_timestamp(&ts) {
            Err(Error::TimestampRange { timestamp }) => assert_eq!(timestamp, ts),
            other => panic!("expected a range error, got {other:?}"),
        }
    }

    #[test]
    fn timestamps_pass_through_untruncated() {
        let ts = at_micros(1500);
        assert_eq!(convert_to_datetime(&Value::Timestamp(ts)).unwrap(), ts);
        assert_eq!(
            convert_to_datetime(&Value::from("2020-01-01 00:00:00.001500")).unwrap(),
            at_micros(1000)
        );
        assert!(convert_to_datetime(&Value::Integer(3)).is_err());
    }

    #[rstest(
        value,
        expected,
        case(Value::from("TRUE"), Some(true)),
        case(Value::from("true"), Some(true)),
        case(Value::from("False"), Some(false)),
        case(Value::from("false"), Some(false)),
        case(Value::Bool(true), Some(true)),
        case(Value::Null, None)
    )]
    fn booleans(value: Value, expected: Option<bool>) {
        assert_eq!(convert_to_boolean(&value).unwrap(), expected);
    }

    #[rstest(value, case(Value::from("maybe")), case(Value::from("")), case(Value::Integer(1)))]
    fn booleans_never_default(value: Value) {
        assert!(matches!(
            convert_to_boolean(&value),
            Err(Error::BooleanFormat { .. })
        ));
    }
}
