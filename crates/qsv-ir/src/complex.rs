//! Complex amplitude helpers and the wire representation of complex numbers.
//!
//! Arithmetic itself comes from [`num_complex::Complex64`]; this module only
//! adds the constants, tolerant comparison, and the `{re, im}` form used at
//! every external boundary.

use num_complex::Complex64;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{IrError, IrResult};

/// `0 + 0i`.
pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);
/// `1 + 0i`.
pub const ONE: Complex64 = Complex64::new(1.0, 0.0);
/// `0 + 1i`.
pub const I: Complex64 = Complex64::new(0.0, 1.0);

/// Check whether two complex numbers are within `tol` of each other.
#[inline]
pub fn approx_eq(a: Complex64, b: Complex64, tol: f64) -> bool {
    (a - b).norm() <= tol
}

/// Complex number as exchanged with callers: `{"re": .., "im": ..}`.
///
/// Deserialization also accepts `{"real", "imag"}` objects, bare numbers,
/// and strings such as `"0.5-0.3i"` (see [`parse_complex`]).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WireComplex {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

impl From<Complex64> for WireComplex {
    fn from(c: Complex64) -> Self {
        Self { re: c.re, im: c.im }
    }
}

impl From<WireComplex> for Complex64 {
    fn from(c: WireComplex) -> Self {
        Complex64::new(c.re, c.im)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireComplexRepr {
    Parts {
        re: f64,
        #[serde(default)]
        im: f64,
    },
    Named {
        real: f64,
        #[serde(default)]
        imag: f64,
    },
    Real(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for WireComplex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = match WireComplexRepr::deserialize(deserializer)? {
            WireComplexRepr::Parts { re, im } => Complex64::new(re, im),
            WireComplexRepr::Named { real, imag } => Complex64::new(real, imag),
            WireComplexRepr::Real(re) => Complex64::new(re, 0.0),
            WireComplexRepr::Text(text) => parse_complex(&text).map_err(serde::de::Error::custom)?,
        };
        Ok(value.into())
    }
}

/// Parse a complex literal such as `1`, `i`, `-i`, `2i`, `0.5-0.3i` or `1+i`.
///
/// Whitespace is ignored.
pub fn parse_complex(text: &str) -> IrResult<Complex64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let invalid = || IrError::InvalidComplex(text.to_string());

    if compact.is_empty() {
        return Err(invalid());
    }

    let Some(body) = compact.strip_suffix('i') else {
        return parse_real(&compact).map(|re| Complex64::new(re, 0.0)).ok_or_else(invalid);
    };

    // Split at the last sign that is not leading and not part of an exponent.
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&k| matches!(bytes[k], b'+' | b'-') && !matches!(bytes[k - 1], b'e' | b'E'));

    match split {
        Some(pos) => {
            let re = parse_real(&body[..pos]).ok_or_else(invalid)?;
            let im = parse_imag_coefficient(&body[pos..]).ok_or_else(invalid)?;
            Ok(Complex64::new(re, im))
        }
        None => {
            let im = parse_imag_coefficient(body).ok_or_else(invalid)?;
            Ok(Complex64::new(0.0, im))
        }
    }
}

fn parse_real(text: &str) -> Option<f64> {
    text.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_imag_coefficient(text: &str) -> Option<f64> {
    match text {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        other => parse_real(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(text: &str) -> Complex64 {
        parse_complex(text).unwrap()
    }

    #[test]
    fn test_parse_real_and_imaginary_literals() {
        assert_eq!(parsed("1"), Complex64::new(1.0, 0.0));
        assert_eq!(parsed("-0.5"), Complex64::new(-0.5, 0.0));
        assert_eq!(parsed("i"), Complex64::new(0.0, 1.0));
        assert_eq!(parsed("-i"), Complex64::new(0.0, -1.0));
        assert_eq!(parsed("2i"), Complex64::new(0.0, 2.0));
        assert_eq!(parsed("-.25i"), Complex64::new(0.0, -0.25));
    }

    #[test]
    fn test_parse_full_complex() {
        assert_eq!(parsed("0.5-0.3i"), Complex64::new(0.5, -0.3));
        assert_eq!(parsed("1+i"), Complex64::new(1.0, 1.0));
        assert_eq!(parsed(" 1 - 2 i "), Complex64::new(1.0, -2.0));
        assert_eq!(parsed("1e-3+2e2i"), Complex64::new(1e-3, 200.0));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_complex(""), Err(IrError::InvalidComplex(_))));
        assert!(matches!(parse_complex("abc"), Err(IrError::InvalidComplex(_))));
        assert!(matches!(parse_complex("1+2j"), Err(IrError::InvalidComplex(_))));
        assert!(matches!(parse_complex("inf"), Err(IrError::InvalidComplex(_))));
    }

    #[test]
    fn test_wire_complex_accepts_all_forms() {
        let values: Vec<WireComplex> =
            serde_json::from_str(r#"[{"re": 1.0, "im": -1.0}, {"real": 0.5, "imag": 0.5}, 2.0, "-i"]"#)
                .unwrap();
        assert_eq!(values[0], WireComplex { re: 1.0, im: -1.0 });
        assert_eq!(values[1], WireComplex { re: 0.5, im: 0.5 });
        assert_eq!(values[2], WireComplex { re: 2.0, im: 0.0 });
        assert_eq!(values[3], WireComplex { re: 0.0, im: -1.0 });
    }

    #[test]
    fn test_wire_complex_serializes_as_parts() {
        let json = serde_json::to_string(&WireComplex::from(Complex64::new(0.5, -0.25))).unwrap();
        assert_eq!(json, r#"{"re":0.5,"im":-0.25}"#);
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(ONE, Complex64::new(1.0 + 1e-13, 0.0), 1e-12));
        assert!(!approx_eq(ONE, I, 1e-12));
    }
}
