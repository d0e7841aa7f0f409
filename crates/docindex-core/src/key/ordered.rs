use crate::{INTEGER_DIGITS, value::Value};
use thiserror::Error as ThisError;

const NEGATIVE_MARKER: char = '-';

/// Largest magnitude representable in `INTEGER_DIGITS` decimal digits.
const MAX_MAGNITUDE: u64 = 9_999_999_999_999_999;

/// `10^INTEGER_DIGITS`; negative values encode as its complement.
const COMPLEMENT_BASE: u64 = MAX_MAGNITUDE + 1;

// Floats above this magnitude are never within range and the cast below
// would saturate.
#[expect(clippy::cast_precision_loss)]
const MAX_MAGNITUDE_F64: f64 = MAX_MAGNITUDE as f64;

///
/// ValueEncodeError
///
/// Canonical index-encoding failures for one field value.
///

#[derive(Debug, PartialEq, ThisError)]
pub enum ValueEncodeError {
    #[error("cannot index text longer than {max} UTF-16 code units (got {len})")]
    TextTooLong { len: usize, max: usize },

    #[error("cannot index non-integer number {value}")]
    NonInteger { value: f64 },

    #[error("cannot index non-finite number")]
    NonFinite,

    #[error("integer {value} exceeds {INTEGER_DIGITS} decimal digits")]
    IntegerOutOfRange { value: i128 },
}

/// Encode one field value so lexicographic byte order matches the natural
/// value order within each kind.
///
/// Text is used verbatim. Integers are zero-padded to `INTEGER_DIGITS`
/// digits; negatives are written as `-` followed by the padded complement
/// `10^INTEGER_DIGITS - |v|`, so they sort below every non-negative value and
/// in numeric order among themselves.
pub fn canonicalize(value: &Value, max_text_len: usize) -> Result<String, ValueEncodeError> {
    match value {
        Value::Text(text) => {
            // Bounded in UTF-16 code units so astral characters cost two.
            let len = text.encode_utf16().count();
            if len > max_text_len {
                return Err(ValueEncodeError::TextTooLong {
                    len,
                    max: max_text_len,
                });
            }

            Ok(text.clone())
        }
        Value::Int(v) => encode_integer(*v),
        Value::Float(v) => encode_integer(integral_f64(*v)?),
    }
}

// Accept floats only when they carry an exact integer.
#[expect(clippy::cast_possible_truncation)]
fn integral_f64(value: f64) -> Result<i64, ValueEncodeError> {
    if !value.is_finite() {
        return Err(ValueEncodeError::NonFinite);
    }
    if value.fract() != 0.0 {
        return Err(ValueEncodeError::NonInteger { value });
    }
    if value.abs() > MAX_MAGNITUDE_F64 {
        return Err(ValueEncodeError::IntegerOutOfRange {
            value: value as i128,
        });
    }

    Ok(value as i64)
}

fn encode_integer(value: i64) -> Result<String, ValueEncodeError> {
    let magnitude = value.unsigned_abs();
    if magnitude > MAX_MAGNITUDE {
        return Err(ValueEncodeError::IntegerOutOfRange {
            value: i128::from(value),
        });
    }

    if value < 0 {
        let complement = COMPLEMENT_BASE - magnitude;
        Ok(format!(
            "{NEGATIVE_MARKER}{complement:0width$}",
            width = INTEGER_DIGITS
        ))
    } else {
        Ok(format!("{magnitude:0width$}", width = INTEGER_DIGITS))
    }
}
