//! Values passed to the `print` import.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric WebAssembly value types `print` can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    I32,
    I64,
    F32,
    F64,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// Shape of a module's declared `print` import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintSignature {
    /// `(param <kind>)`: one number.
    Number(ValueKind),
    /// `(param i32 i32)`: pointer and length of UTF-8 text in exported memory.
    Text,
}

impl PrintSignature {
    /// Classify a function type. `print` never returns anything.
    pub fn from_types(params: &[ValueKind], result_count: usize) -> Option<Self> {
        if result_count != 0 {
            return None;
        }
        match params {
            [kind] => Some(PrintSignature::Number(*kind)),
            [ValueKind::I32, ValueKind::I32] => Some(PrintSignature::Text),
            _ => None,
        }
    }
}

/// A value handed to `print`.
#[derive(Debug, Clone, PartialEq)]
pub enum PrintValue {
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Text(String),
}

/// Render a float the way JavaScript's `Number.prototype.toString` does.
///
/// Rust's `{:e}` gives the shortest round-trip digits; only their placement
/// differs. Plain notation covers decimal exponents from -7 to 20, exponent
/// notation (`1e+21`, `1.5e-7`) everything else.
fn fmt_float(value: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if value.is_nan() {
        return f.write_str("NaN");
    }
    if value.is_infinite() {
        return f.write_str(if value > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if value == 0.0 {
        return f.write_str(if value.is_sign_negative() { "-0" } else { "0" });
    }

    let sci = format!("{:e}", value.abs());
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().map_err(|_| fmt::Error)?),
        None => return Err(fmt::Error),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // value = 0.<digits> * 10^n
    let n = exponent + 1;

    if value < 0.0 {
        f.write_str("-")?;
    }
    if k <= n && n <= 21 {
        write!(f, "{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        write!(f, "{}.{}", int, frac)
    } else if -6 < n && n <= 0 {
        write!(f, "0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            write!(f, "{}e{}{}", lead, sign, exponent.abs())
        } else {
            write!(f, "{}.{}e{}{}", lead, rest, sign, exponent.abs())
        }
    }
}

impl fmt::Display for PrintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrintValue::I32(v) => write!(f, "{}", v),
            PrintValue::I64(v) => write!(f, "{}", v),
            PrintValue::F32(v) => fmt_float(f64::from(*v), f),
            PrintValue::F64(v) => fmt_float(*v, f),
            PrintValue::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_classification() {
        assert_eq!(
            PrintSignature::from_types(&[ValueKind::I32], 0),
            Some(PrintSignature::Number(ValueKind::I32))
        );
        assert_eq!(
            PrintSignature::from_types(&[ValueKind::I32, ValueKind::I32], 0),
            Some(PrintSignature::Text)
        );
        assert_eq!(PrintSignature::from_types(&[ValueKind::F64], 1), None);
        assert_eq!(PrintSignature::from_types(&[], 0), None);
        assert_eq!(PrintSignature::from_types(&[ValueKind::I64, ValueKind::I32], 0), None);
    }

    #[test]
    fn test_display_matches_console_rendering() {
        assert_eq!(PrintValue::I32(24).to_string(), "24");
        assert_eq!(PrintValue::I64(-7).to_string(), "-7");
        assert_eq!(PrintValue::F64(2.0).to_string(), "2");
        assert_eq!(PrintValue::F32(1.5).to_string(), "1.5");
        assert_eq!(PrintValue::F64(f64::INFINITY).to_string(), "Infinity");
        assert_eq!(PrintValue::F64(f64::NAN).to_string(), "NaN");
        assert_eq!(PrintValue::Text("hello".into()).to_string(), "hello");
    }

    #[test]
    fn test_float_notation_switches_like_javascript() {
        let render = |v: f64| PrintValue::F64(v).to_string();
        assert_eq!(render(1e21), "1e+21");
        assert_eq!(render(1e20), "100000000000000000000");
        assert_eq!(render(1.5e300), "1.5e+300");
        assert_eq!(render(1e-7), "1e-7");
        assert_eq!(render(1.5e-7), "1.5e-7");
        assert_eq!(render(0.000001), "0.000001");
        assert_eq!(render(123.456), "123.456");
        assert_eq!(render(-0.5), "-0.5");
        assert_eq!(render(-2.5e-10), "-2.5e-10");
        assert_eq!(PrintValue::F32(0.1).to_string(), "0.10000000149011612");
    }
}
