// crates/iec61850-scl/src/values.rs

//! Interprets `<Val>` literals according to the declared attribute type.
//!
//! Interpretation either yields a typed value, skips the literal with a
//! reason (the caller records it as a diagnostic), or fails. Failing is
//! reserved for literals that contradict their type, e.g. an enumeration
//! symbol that is not a member or an octet string that is not base64.

use crate::error::SclError;
use crate::model::templates::EnumType;
use crate::types::AttributeType;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use time::PrimitiveDateTime;
use time::macros::format_description;

const OCTET_STRING_64_CAPACITY: usize = 64;

/// A typed initial value of a data attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum DataModelValue {
    /// Enumerated or coded enum ordinal.
    Ordinal(i32),
    Integer(i64),
    Unsigned(u32),
    Boolean(bool),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// An enumeration symbol from a template default, bound once the
    /// attribute's `EnumType` is known.
    Deferred { symbol: String, enum_type: String },
}

/// Result of interpreting one literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpreted {
    Value(DataModelValue),
    /// The literal was ignored; the string says why.
    Skipped(String),
}

/// Interprets `text` as a value of `attribute_type`.
///
/// `enum_type` must be given for [`AttributeType::Enumerated`].
pub fn interpret(
    attribute_type: AttributeType,
    enum_type: Option<&EnumType>,
    text: &str,
) -> Result<Interpreted, SclError> {
    let trimmed = text.trim();
    let value = match attribute_type {
        AttributeType::Boolean => DataModelValue::Boolean(trimmed.eq_ignore_ascii_case("true")),
        AttributeType::Enumerated => {
            let enum_type = enum_type.ok_or_else(|| invalid(attribute_type, text, "no enumeration bound"))?;
            DataModelValue::Ordinal(enum_ordinal(enum_type, text)?)
        }
        t if t.is_signed_integer() => DataModelValue::Integer(parse_signed(t, trimmed)?),
        t if t.is_unsigned_integer() => DataModelValue::Unsigned(parse_unsigned(t, trimmed)?),
        AttributeType::Float32 => {
            let v = parse_float(attribute_type, trimmed)? as f32;
            if !v.is_finite() {
                return Err(invalid(attribute_type, text, "not a finite FLOAT32"));
            }
            DataModelValue::Float32(v)
        }
        AttributeType::Float64 => DataModelValue::Float64(parse_float(attribute_type, trimmed)?),
        AttributeType::CodedEnum => match coded_enum_ordinal(trimmed) {
            Some(ord) => DataModelValue::Ordinal(ord),
            None => {
                return Ok(Interpreted::Skipped(format!(
                    "unknown coded enum value \"{}\"",
                    text
                )));
            }
        },
        AttributeType::OctetString64 => {
            let bytes = STANDARD.decode(trimmed)?;
            if bytes.len() > OCTET_STRING_64_CAPACITY {
                return Err(invalid(
                    attribute_type,
                    text,
                    &format!("{} bytes exceed the capacity of 64", bytes.len()),
                ));
            }
            DataModelValue::Bytes(bytes)
        }
        t if t.is_visible_string() => DataModelValue::Text(text.to_string()),
        AttributeType::UnicodeString255 | AttributeType::Currency => {
            DataModelValue::Text(text.to_string())
        }
        AttributeType::Timestamp | AttributeType::EntryTime => match parse_timestamp(trimmed) {
            Some(ms) => DataModelValue::EpochMillis(ms),
            None => {
                return Ok(Interpreted::Skipped(format!(
                    "invalid timestamp \"{}\"",
                    text
                )));
            }
        },
        AttributeType::Quality | AttributeType::Check => {
            return Ok(Interpreted::Skipped(format!(
                "initial values of type {} are not supported",
                attribute_type
            )));
        }
        other => {
            return Err(SclError::UnsupportedValueType {
                attribute_type: other.c_name(),
            });
        }
    };
    Ok(Interpreted::Value(value))
}

/// Resolves an enumeration literal: symbol first, then a numeric ordinal
/// that must be a member of the enumeration.
pub fn enum_ordinal(enum_type: &EnumType, text: &str) -> Result<i32, SclError> {
    if let Some(ord) = enum_type.ordinal_of(text) {
        return Ok(ord);
    }
    match text.trim().parse::<i32>() {
        Ok(ord) if enum_type.contains_ordinal(ord) => Ok(ord),
        _ => Err(invalid(
            AttributeType::Enumerated,
            text,
            &format!("not a member of enumeration {}", enum_type.id),
        )),
    }
}

/// Ordinal of a double point / tap command symbol.
fn coded_enum_ordinal(symbol: &str) -> Option<i32> {
    match symbol {
        "intermediate-state" | "stop" => Some(0),
        "off" | "lower" => Some(1),
        "on" | "higher" => Some(2),
        "bad-state" | "reserved" => Some(4),
        _ => None,
    }
}

fn parse_integer(attribute_type: AttributeType, text: &str) -> Result<i64, SclError> {
    if text.is_empty() {
        return Ok(0);
    }
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let (radix, body) = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex_digits) => (16, hex_digits),
        None => (10, digits),
    };
    // one sign only
    if body.starts_with(['+', '-']) {
        return Err(invalid(attribute_type, text, "invalid digit found in string"));
    }
    let magnitude = i128::from_str_radix(body, radix)
        .map_err(|e| invalid(attribute_type, text, &e.to_string()))?;
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).map_err(|_| invalid(attribute_type, text, "out of range"))
}

fn parse_signed(attribute_type: AttributeType, text: &str) -> Result<i64, SclError> {
    let value = parse_integer(attribute_type, text)?;
    let (min, max) = match attribute_type {
        AttributeType::Int8 => (i8::MIN as i64, i8::MAX as i64),
        AttributeType::Int16 => (i16::MIN as i64, i16::MAX as i64),
        AttributeType::Int32 => (i32::MIN as i64, i32::MAX as i64),
        _ => (i64::MIN, i64::MAX),
    };
    if value < min || value > max {
        return Err(invalid(attribute_type, text, "out of range"));
    }
    Ok(value)
}

fn parse_unsigned(attribute_type: AttributeType, text: &str) -> Result<u32, SclError> {
    let value = parse_integer(attribute_type, text)?;
    let max = match attribute_type {
        AttributeType::Int8U => u8::MAX as i64,
        AttributeType::Int16U => u16::MAX as i64,
        AttributeType::Int24U => 0x00FF_FFFF,
        _ => u32::MAX as i64,
    };
    if !(0..=max).contains(&value) {
        return Err(invalid(attribute_type, text, "out of range"));
    }
    Ok(value as u32)
}

/// Accepts a comma as decimal separator.
fn parse_float(attribute_type: AttributeType, text: &str) -> Result<f64, SclError> {
    if text.is_empty() {
        return Ok(0.0);
    }
    let v = text
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|e| invalid(attribute_type, text, &e.to_string()))?;
    if !v.is_finite() {
        return Err(invalid(attribute_type, text, "not a finite number"));
    }
    Ok(v)
}

/// Parses `YYYY-MM-DDTHH:MM:SS.mmm` (UTC) into epoch milliseconds.
fn parse_timestamp(text: &str) -> Option<i64> {
    let format =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]");
    let normalized = text.replace(',', ".");
    let parsed = PrimitiveDateTime::parse(&normalized, &format).ok()?;
    let millis = parsed.assume_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(millis).ok()
}

fn invalid(attribute_type: AttributeType, value: &str, reason: &str) -> SclError {
    SclError::InvalidValue {
        attribute_type: attribute_type.c_name(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::templates::EnumVal;

    fn value(attribute_type: AttributeType, text: &str) -> DataModelValue {
        match interpret(attribute_type, None, text).unwrap() {
            Interpreted::Value(v) => v,
            Interpreted::Skipped(reason) => panic!("unexpected skip: {}", reason),
        }
    }

    fn health() -> EnumType {
        EnumType {
            id: "Health".into(),
            values: vec![
                EnumVal {
                    ord: 1,
                    symbol: "Ok".into(),
                },
                EnumVal {
                    ord: 2,
                    symbol: "Warning".into(),
                },
                EnumVal {
                    ord: 3,
                    symbol: "Alarm".into(),
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_boolean() {
        assert_eq!(value(AttributeType::Boolean, " TRUE "), DataModelValue::Boolean(true));
        assert_eq!(value(AttributeType::Boolean, "1"), DataModelValue::Boolean(false));
    }

    #[test]
    fn test_integers() {
        assert_eq!(value(AttributeType::Int32, " -42 "), DataModelValue::Integer(-42));
        assert_eq!(value(AttributeType::Int16, ""), DataModelValue::Integer(0));
        assert_eq!(value(AttributeType::Int32U, "0x10"), DataModelValue::Unsigned(16));
        assert!(interpret(AttributeType::Int8, None, "abc").is_err());
        assert!(interpret(AttributeType::Int8U, None, "256").is_err());
        assert!(interpret(AttributeType::Int32U, None, "-1").is_err());
    }

    #[test]
    fn test_integer_sign_handling() {
        assert_eq!(value(AttributeType::Int32, "+7"), DataModelValue::Integer(7));
        assert_eq!(value(AttributeType::Int16, "-0x10"), DataModelValue::Integer(-16));
        for text in ["--5", "-+5", "+-5", "++5", "0x-5"] {
            assert!(
                matches!(
                    interpret(AttributeType::Int32, None, text),
                    Err(SclError::InvalidValue { .. })
                ),
                "{} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_int64_limits() {
        assert_eq!(
            value(AttributeType::Int64, "-9223372036854775808"),
            DataModelValue::Integer(i64::MIN)
        );
        assert_eq!(
            value(AttributeType::Int64, "9223372036854775807"),
            DataModelValue::Integer(i64::MAX)
        );
        assert!(interpret(AttributeType::Int64, None, "9223372036854775808").is_err());
        assert!(interpret(AttributeType::Int64, None, "-9223372036854775809").is_err());
    }

    #[test]
    fn test_float_accepts_comma() {
        assert_eq!(value(AttributeType::Float32, "3,14"), DataModelValue::Float32(3.14));
        assert_eq!(value(AttributeType::Float64, ""), DataModelValue::Float64(0.0));
    }

    #[test]
    fn test_non_finite_floats_are_rejected() {
        for (t, text) in [
            (AttributeType::Float32, "1e39"),
            (AttributeType::Float32, "NaN"),
            (AttributeType::Float32, "-inf"),
            (AttributeType::Float64, "nan"),
            (AttributeType::Float64, "infinity"),
            (AttributeType::Float64, "1e400"),
        ] {
            assert!(
                matches!(interpret(t, None, text), Err(SclError::InvalidValue { .. })),
                "{} should be rejected for {}",
                text,
                t
            );
        }
        assert_eq!(
            value(AttributeType::Float32, "3e38"),
            DataModelValue::Float32(3.0e38_f64 as f32)
        );
    }

    #[test]
    fn test_enumerated_symbol_and_ordinal() {
        let health = health();
        let ord = |text| interpret(AttributeType::Enumerated, Some(&health), text);
        assert_eq!(
            ord("Warning").unwrap(),
            Interpreted::Value(DataModelValue::Ordinal(2))
        );
        assert_eq!(ord("3").unwrap(), Interpreted::Value(DataModelValue::Ordinal(3)));
        assert!(matches!(ord("7"), Err(SclError::InvalidValue { .. })));
        assert!(matches!(ord("Broken"), Err(SclError::InvalidValue { .. })));
    }

    #[test]
    fn test_coded_enum() {
        assert_eq!(value(AttributeType::CodedEnum, "on"), DataModelValue::Ordinal(2));
        assert_eq!(value(AttributeType::CodedEnum, "lower"), DataModelValue::Ordinal(1));
        assert_eq!(value(AttributeType::CodedEnum, "reserved"), DataModelValue::Ordinal(4));
        assert!(matches!(
            interpret(AttributeType::CodedEnum, None, "sideways").unwrap(),
            Interpreted::Skipped(_)
        ));
    }

    #[test]
    fn test_octet_string() {
        assert_eq!(
            value(AttributeType::OctetString64, "AA=="),
            DataModelValue::Bytes(vec![0x00])
        );
        assert_eq!(
            value(AttributeType::OctetString64, "AAA="),
            DataModelValue::Bytes(vec![0x00, 0x00])
        );
        assert!(matches!(
            interpret(AttributeType::OctetString64, None, "%%%"),
            Err(SclError::Base64Decoding(_))
        ));
    }

    #[test]
    fn test_octet_string_capacity() {
        let full = STANDARD.encode([0xABu8; 64]);
        assert_eq!(
            value(AttributeType::OctetString64, &full),
            DataModelValue::Bytes(vec![0xAB; 64])
        );
        let oversized = STANDARD.encode([0u8; 100]);
        assert!(matches!(
            interpret(AttributeType::OctetString64, None, &oversized),
            Err(SclError::InvalidValue {
                attribute_type: "OCTET_STRING_64",
                ..
            })
        ));
    }

    #[test]
    fn test_strings_are_verbatim() {
        assert_eq!(
            value(AttributeType::VisibleString255, " Station A "),
            DataModelValue::Text(" Station A ".into())
        );
        assert_eq!(
            value(AttributeType::Currency, "EUR"),
            DataModelValue::Text("EUR".into())
        );
    }

    #[test]
    fn test_timestamp() {
        assert_eq!(
            value(AttributeType::Timestamp, "1970-01-01T00:00:01.500"),
            DataModelValue::EpochMillis(1500)
        );
        assert_eq!(
            value(AttributeType::EntryTime, "2000-01-01T00:00:00,000"),
            DataModelValue::EpochMillis(946_684_800_000)
        );
        assert!(matches!(
            interpret(AttributeType::Timestamp, None, "yesterday").unwrap(),
            Interpreted::Skipped(_)
        ));
    }

    #[test]
    fn test_quality_and_check_are_skipped() {
        for t in [AttributeType::Quality, AttributeType::Check] {
            assert!(matches!(
                interpret(t, None, "0").unwrap(),
                Interpreted::Skipped(_)
            ));
        }
    }

    #[test]
    fn test_unsupported_type() {
        assert!(matches!(
            interpret(AttributeType::Constructed, None, "x"),
            Err(SclError::UnsupportedValueType {
                attribute_type: "CONSTRUCTED"
            })
        ));
    }
}
