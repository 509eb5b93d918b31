//! Decoders for the native representations providers use on the wire.

use {
    crate::domain::{
        error::{ParseError, truncate},
        provider::Envelope,
    },
    chrono::{DateTime, Utc},
    rust_decimal::Decimal,
    serde::Deserialize,
};

/// Amount as a decimal string (`"24.44"`) or a bare JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NativeAmount {
    Text(String),
    Number(serde_json::Number),
}

impl NativeAmount {
    /// Rejects values that would need rounding to fit a `Decimal`.
    pub fn to_decimal(&self, field: &'static str) -> Result<Decimal, ParseError> {
        let raw = match self {
            Self::Text(s) => s.trim().to_string(),
            Self::Number(n) => n.to_string(),
        };
        Decimal::from_str_exact(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| ParseError::InvalidAmount {
                field,
                value: truncate(&raw, 32),
            })
    }
}

/// Timestamp as epoch seconds or an RFC 3339 string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NativeTimestamp {
    Epoch(i64),
    Iso(String),
}

impl NativeTimestamp {
    pub fn to_utc(&self, field: &'static str) -> Result<DateTime<Utc>, ParseError> {
        match self {
            Self::Epoch(secs) => {
                DateTime::from_timestamp(*secs, 0).ok_or_else(|| ParseError::InvalidTimestamp {
                    field,
                    value: secs.to_string(),
                })
            }
            Self::Iso(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|_| ParseError::InvalidTimestamp {
                    field,
                    value: truncate(s, 40),
                }),
        }
    }
}

/// Look up a required field, rejecting both absence and `null`.
pub fn required<'a>(
    object: &'a serde_json::Map<String, serde_json::Value>,
    field: &'static str,
) -> Result<&'a serde_json::Value, ParseError> {
    match object.get(field) {
        None | Some(serde_json::Value::Null) => Err(ParseError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

pub fn required_str<'a>(
    object: &'a serde_json::Map<String, serde_json::Value>,
    field: &'static str,
) -> Result<&'a str, ParseError> {
    required(object, field)?
        .as_str()
        .ok_or(ParseError::WrongShape {
            field,
            expected: "a string",
        })
}

pub fn field_as<T: for<'de> Deserialize<'de>>(
    value: &serde_json::Value,
    field: &'static str,
    expected: &'static str,
) -> Result<T, ParseError> {
    T::deserialize(value).map_err(|_| ParseError::WrongShape { field, expected })
}

pub fn to_object(
    envelope: &Envelope,
) -> Result<serde_json::Map<String, serde_json::Value>, ParseError> {
    match envelope.decode::<serde_json::Value>()? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(ParseError::Undecodable("envelope is not a JSON object".into())),
    }
}
