use serde_json::{Number, Value};

use super::{cannot_be, non_finite, Clean};
use crate::error::SieveError;

// ---------------------------------------------------------------------------
// Numeric text helpers
// ---------------------------------------------------------------------------

/// ECMAScript `WhiteSpace` and `LineTerminator`: Unicode `Zs` plus the tab,
/// form-feed and line-break controls. Unlike `char::is_whitespace` this
/// leaves U+0085 alone.
fn is_script_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{b}' | '\u{c}' | '\r' | ' ' | '\u{a0}' | '\u{1680}'
            | '\u{2000}'..='\u{200a}'
            | '\u{2028}' | '\u{2029}' | '\u{202f}' | '\u{205f}' | '\u{3000}' | '\u{feff}'
    )
}

/// Parse the longest numeric prefix of `s`, the way `parseFloat` does.
///
/// Leading whitespace is skipped and trailing garbage ignored. Returns NaN
/// when no numeric prefix exists.
pub(crate) fn parse_float(s: &str) -> f64 {
    let s = s.trim_start_matches(is_script_whitespace);
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let digits_from = |mut j: usize| {
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        j
    };

    let int_end = digits_from(i);
    let mut end = int_end;
    let mut mantissa_digits = int_end - i;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        if mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut j = end + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Render a number the way `Number.prototype.toString()` does: shortest
/// round-trip digits, exponent form below `1e-6` and from `1e21` up.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    let sci = format!("{:e}", n.abs());
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return format!("{}{}", sign, sci);
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let point = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{}.{}", int, frac)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat((-point) as usize), digits)
    } else {
        let e = point - 1;
        let e_sign = if e < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", lead, e_sign, e.abs())
        } else {
            format!("{}.{}e{}{}", lead, rest, e_sign, e.abs())
        }
    };
    format!("{}{}", sign, body)
}

/// Round to the nearest integer, ties toward positive infinity.
fn round_half_up(n: f64) -> f64 {
    let floor = n.floor();
    if n - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// JSON form of a finite number: integral values inside `i64` become
/// integers, everything else a float.
fn number_value(n: f64, source: Option<&Value>) -> Result<Value, SieveError> {
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    if n.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&n) {
        return Ok(Value::from(n as i64));
    }
    Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| non_finite(source))
}

/// Coerce to a finite `f64`, also returning the JSON value to emit.
///
/// JSON integers are emitted unchanged; floats and parsed strings share one
/// output shape, so `3.0` and `"3.0"` both come out as `3`.
fn coerce_numeric(value: Option<&Value>) -> Result<(f64, Value), SieveError> {
    let Some(value) = value else {
        return Ok((0.0, Value::from(0)));
    };
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_i64() || n.is_u64() => Ok((f, value.clone())),
            Some(f) if f.is_finite() => Ok((f, number_value(f, Some(value))?)),
            _ => Err(non_finite(Some(value))),
        },
        Value::String(s) => {
            let f = parse_float(s);
            if !f.is_finite() {
                return Err(non_finite(Some(value)));
            }
            Ok((f, number_value(f, Some(value))?))
        }
        other => Err(cannot_be(other)),
    }
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Optional range bounds shared by `number` and `integer` fields.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub gt: Option<f64>,
    pub gte: Option<f64>,
    pub lt: Option<f64>,
    pub lte: Option<f64>,
}

impl Bounds {
    fn named(&self) -> [(&'static str, Option<f64>); 4] {
        [
            ("gt", self.gt),
            ("gte", self.gte),
            ("lt", self.lt),
            ("lte", self.lte),
        ]
    }

    /// Every configured bound must be a finite number.
    pub(crate) fn ensure_finite(&self) -> Result<(), SieveError> {
        for (name, bound) in self.named() {
            if let Some(b) = bound {
                if !b.is_finite() {
                    return Err(SieveError::schema(format!(
                        "{} bound must be a finite number, got {}",
                        name,
                        format_number(b)
                    )));
                }
            }
        }
        Ok(())
    }

    /// Check `n` against gt, gte, lt, lte in that order; first violation wins.
    pub fn check(&self, n: f64, received: Option<&Value>) -> Result<(), SieveError> {
        if let Some(gt) = self.gt {
            if n <= gt {
                return Err(SieveError::validation(
                    format!("must be greater than {}", format_number(gt)),
                    received,
                ));
            }
        }
        if let Some(gte) = self.gte {
            if n < gte {
                return Err(SieveError::validation(
                    format!("must be greater than or equal to {}", format_number(gte)),
                    received,
                ));
            }
        }
        if let Some(lt) = self.lt {
            if n >= lt {
                return Err(SieveError::validation(
                    format!("must be less than {}", format_number(lt)),
                    received,
                ));
            }
        }
        if let Some(lte) = self.lte {
            if n > lte {
                return Err(SieveError::validation(
                    format!("must be less than or equal to {}", format_number(lte)),
                    received,
                ));
            }
        }
        Ok(())
    }
}

macro_rules! bound_setters {
    () => {
        /// Greater than (exclusive).
        pub fn gt(mut self, val: f64) -> Self {
            self.bounds.gt = Some(val);
            self
        }

        /// Greater than or equal (inclusive).
        pub fn gte(mut self, val: f64) -> Self {
            self.bounds.gte = Some(val);
            self
        }

        /// Less than (exclusive).
        pub fn lt(mut self, val: f64) -> Self {
            self.bounds.lt = Some(val);
            self
        }

        /// Less than or equal (inclusive).
        pub fn lte(mut self, val: f64) -> Self {
            self.bounds.lte = Some(val);
            self
        }

        pub fn bounds(&self) -> &Bounds {
            &self.bounds
        }
    };
}

// ---------------------------------------------------------------------------
// NumberField
// ---------------------------------------------------------------------------

/// Definition of a `number` field. Created via [`docsieve::number()`](crate::number).
///
/// Integers pass through unchanged, integral floats become integers, strings
/// are parsed like `parseFloat`, absent becomes `0`. Non-finite results are
/// rejected.
///
/// # Example
/// ```
/// use docsieve::prelude::*;
/// use serde_json::json;
///
/// let ratio = docsieve::number().gt(0.0).lte(1.0);
/// assert_eq!(ratio.clean(Some(&json!("0.25"))).unwrap(), Some(json!(0.25)));
/// assert!(ratio.clean(Some(&json!(0))).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct NumberField {
    bounds: Bounds,
}

impl NumberField {
    pub fn new() -> Self {
        Self::default()
    }

    bound_setters!();

    pub fn coerce(value: Option<&Value>) -> Result<f64, SieveError> {
        coerce_numeric(value).map(|(n, _)| n)
    }
}

impl Clean for NumberField {
    fn clean(&self, value: Option<&Value>) -> Result<Option<Value>, SieveError> {
        let (n, out) = coerce_numeric(value)?;
        self.bounds.check(n, value)?;
        Ok(Some(out))
    }
}

// ---------------------------------------------------------------------------
// IntegerField
// ---------------------------------------------------------------------------

/// Definition of an `integer` field. Created via [`docsieve::integer()`](crate::integer).
///
/// Coerces like [`NumberField`], then rounds to the nearest integer with
/// ties toward positive infinity (`2.5` → `3`, `-2.5` → `-2`).
#[derive(Debug, Clone, Default)]
pub struct IntegerField {
    bounds: Bounds,
}

impl IntegerField {
    pub fn new() -> Self {
        Self::default()
    }

    bound_setters!();

    pub fn coerce(value: Option<&Value>) -> Result<f64, SieveError> {
        coerce_numeric(value).map(|(n, _)| round_half_up(n))
    }
}

impl Clean for IntegerField {
    fn clean(&self, value: Option<&Value>) -> Result<Option<Value>, SieveError> {
        let n = Self::coerce(value)?;
        self.bounds.check(n, value)?;
        number_value(n, value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_float_takes_numeric_prefix() {
        assert_eq!(parse_float("3"), 3.0);
        assert_eq!(parse_float("  4.5kg"), 4.5);
        assert_eq!(parse_float("-.5"), -0.5);
        assert_eq!(parse_float("5."), 5.0);
        assert_eq!(parse_float("1e3"), 1000.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("2E-2x"), 0.02);
        assert_eq!(parse_float("0x10"), 0.0);
        assert_eq!(parse_float("+7"), 7.0);
    }

    #[test]
    fn parse_float_without_prefix_is_nan() {
        assert!(parse_float("").is_nan());
        assert!(parse_float("abc").is_nan());
        assert!(parse_float(".").is_nan());
        assert!(parse_float("-").is_nan());
        assert!(parse_float("inf").is_nan());
        assert!(parse_float("NaN").is_nan());
    }

    #[test]
    fn parse_float_skips_script_whitespace_only() {
        assert_eq!(parse_float("\t\n\u{a0}\u{2028}\u{feff}7"), 7.0);
        assert_eq!(parse_float("\u{3000}1.5"), 1.5);
        assert!(parse_float("\u{85}5").is_nan());
        assert!(parse_float("\u{180e}5").is_nan());
    }

    #[test]
    fn parse_float_reads_infinity() {
        assert_eq!(parse_float("Infinity"), f64::INFINITY);
        assert_eq!(parse_float("-Infinityx"), f64::NEG_INFINITY);
        assert_eq!(parse_float("1e999"), f64::INFINITY);
    }

    #[test]
    fn format_number_matches_script_output() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-5.5), "-5.5");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(123.456), "123.456");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e22), "1.5e+22");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.25e-7), "1.25e-7");
    }

    #[test]
    fn rounding_ties_go_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(5.6), 6.0);
        assert_eq!(round_half_up(-5.6), -6.0);
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
    }

    #[test]
    fn bounds_report_first_violation() {
        let bounds = Bounds {
            gt: Some(0.0),
            gte: Some(10.0),
            ..Bounds::default()
        };
        let err = bounds.check(0.0, None).unwrap_err();
        assert_eq!(err.message, "must be greater than 0");
        let err = bounds.check(5.0, None).unwrap_err();
        assert_eq!(err.message, "must be greater than or equal to 10");
    }
}
