//! Number-kind inference ladder.

use crate::error::{Error, ErrorKind, Result};

/// A parsed JSON number, held in the narrowest fitting representation.
///
/// The ladder tries `i64`, then `u64`, then `i128`, and finally `f64`; a
/// value that fits a lower rung never appears on a higher one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Num {
    Int(i64),
    UInt(u64),
    BigInt(i128),
    Float(f64),
}

impl Num {
    /// Converts any rung to `f64`, possibly losing precision.
    pub fn as_f64(self) -> f64 {
        match self {
            Num::Int(v) => v as f64,
            Num::UInt(v) => v as f64,
            Num::BigInt(v) => v as f64,
            Num::Float(v) => v,
        }
    }

    /// Returns the value as `i64` if this rung fits.
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Num::Int(v) => Some(v),
            Num::UInt(v) => i64::try_from(v).ok(),
            Num::BigInt(v) => i64::try_from(v).ok(),
            Num::Float(_) => None,
        }
    }

    /// Returns the value as `u64` if this rung fits.
    pub fn as_u64(self) -> Option<u64> {
        match self {
            Num::Int(v) => u64::try_from(v).ok(),
            Num::UInt(v) => Some(v),
            Num::BigInt(v) => u64::try_from(v).ok(),
            Num::Float(_) => None,
        }
    }

    /// Returns the value as `i128` unless it is a float.
    pub fn as_i128(self) -> Option<i128> {
        match self {
            Num::Int(v) => Some(v as i128),
            Num::UInt(v) => Some(v as i128),
            Num::BigInt(v) => Some(v),
            Num::Float(_) => None,
        }
    }

    /// Re-narrows a 128-bit integer onto the lowest fitting rung.
    pub(crate) fn narrow_i128(v: i128) -> Num {
        if let Ok(i) = i64::try_from(v) {
            Num::Int(i)
        } else if let Ok(u) = u64::try_from(v) {
            Num::UInt(u)
        } else {
            Num::BigInt(v)
        }
    }

    /// Parses a delimited number token starting at absolute offset `pos`.
    ///
    /// Under `float64` every token parses as `f64` and the `NaN`/`Inf`
    /// keywords (with optional sign) are accepted.
    pub(crate) fn parse(token: &[u8], pos: usize, float64: bool) -> Result<Num> {
        let invalid = || Error::new(ErrorKind::InvalidNumber, pos).ctx("number");
        let s = core::str::from_utf8(token).map_err(|_| invalid())?;
        if float64 {
            let f = match s {
                "NaN" | "+NaN" | "-NaN" => f64::NAN,
                "Inf" | "+Inf" => f64::INFINITY,
                "-Inf" => f64::NEG_INFINITY,
                _ => s.parse::<f64>().map_err(|_| invalid())?,
            };
            return Ok(Num::Float(f));
        }
        let is_float = token
            .iter()
            .any(|&b| b == b'.' || b == b'e' || b == b'E');
        if is_float {
            return s.parse::<f64>().map(Num::Float).map_err(|_| invalid());
        }
        if let Ok(i) = s.parse::<i64>() {
            Ok(Num::Int(i))
        } else if let Ok(u) = s.parse::<u64>() {
            Ok(Num::UInt(u))
        } else if let Ok(i) = s.parse::<i128>() {
            Ok(Num::BigInt(i))
        } else {
            s.parse::<f64>().map(Num::Float).map_err(|_| invalid())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Num;

    #[test]
    fn ladder_narrowest_first() {
        assert_eq!(Num::parse(b"42", 0, false).unwrap(), Num::Int(42));
        assert_eq!(Num::parse(b"-7", 0, false).unwrap(), Num::Int(-7));
        assert_eq!(
            Num::parse(b"9223372036854775807", 0, false).unwrap(),
            Num::Int(i64::MAX)
        );
        assert_eq!(
            Num::parse(b"9223372036854775808", 0, false).unwrap(),
            Num::UInt(9223372036854775808)
        );
        assert_eq!(
            Num::parse(b"18446744073709551616", 0, false).unwrap(),
            Num::BigInt(18446744073709551616)
        );
        assert_eq!(Num::parse(b"1.5", 0, false).unwrap(), Num::Float(1.5));
        assert_eq!(Num::parse(b"1e3", 0, false).unwrap(), Num::Float(1000.0));
    }

    #[test]
    fn float64_mode_parses_extended_tokens() {
        assert_eq!(Num::parse(b"3", 0, true).unwrap(), Num::Float(3.0));
        assert_eq!(
            Num::parse(b"+1.5", 0, true).unwrap(),
            Num::Float(1.5)
        );
        assert_eq!(
            Num::parse(b"-Inf", 0, true).unwrap(),
            Num::Float(f64::NEG_INFINITY)
        );
        assert!(matches!(
            Num::parse(b"NaN", 0, true).unwrap(),
            Num::Float(f) if f.is_nan()
        ));
    }

    #[test]
    fn narrowing_comes_back_down() {
        assert_eq!(Num::narrow_i128(5), Num::Int(5));
        assert_eq!(
            Num::narrow_i128(u64::MAX as i128),
            Num::UInt(u64::MAX)
        );
        assert_eq!(
            Num::narrow_i128(i128::MAX),
            Num::BigInt(i128::MAX)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(Num::parse(b"-", 0, false).is_err());
        assert!(Num::parse(b"1.2.3", 0, false).is_err());
    }
}
