//! Single-line diagnostic notation.

use std::fmt::Write as _;

use crate::date::Date;
use crate::value::Value;

impl Value {
    /// Render the value in diagnostic notation, e.g. `49([1, h'00ff', "x"])`.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        let mut out = String::new();
        write_diagnostic(self, &mut out);
        out
    }
}

fn write_diagnostic(value: &Value, out: &mut String) {
    match value {
        Value::Unsigned(n) => {
            let _ = write!(out, "{n}");
        }
        Value::Negative(n) => {
            let _ = write!(out, "{}", -1 - i128::from(*n));
        }
        Value::Bytes(b) => {
            out.push_str("h'");
            out.push_str(&hex::encode(b));
            out.push('\'');
        }
        Value::Text(s) => quote_into(s, out),
        Value::Array(items) => {
            out.push('[');
            join(items.iter(), out, |item, out| write_diagnostic(item, out));
            out.push(']');
        }
        Value::Map(m) => {
            out.push('{');
            join(m.iter(), out, write_entry);
            out.push('}');
        }
        Value::OrderedMap(m) => {
            out.push('{');
            join(m.iter(), out, write_entry);
            out.push('}');
        }
        Value::Tagged(tag, inner) => {
            let _ = write!(out, "{}(", tag.value());
            write_diagnostic(inner, out);
            out.push(')');
        }
        Value::Simple(n) => {
            let _ = write!(out, "simple({n})");
        }
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Null => out.push_str("null"),
        Value::Undefined => out.push_str("undefined"),
        Value::Half(h) => out.push_str(&format_f32(h.to_f32())),
        Value::Float(f) => out.push_str(&format_f32(*f)),
        Value::Double(d) => out.push_str(&format_f64(*d)),
        Value::Break => out.push_str("break"),
        Value::Date(d) => {
            out.push_str("1(");
            out.push_str(&date_seconds(d));
            out.push(')');
        }
    }
}

fn write_entry((key, value): (&Value, &Value), out: &mut String) {
    write_diagnostic(key, out);
    out.push_str(": ");
    write_diagnostic(value, out);
}

fn join<T>(items: impl Iterator<Item = T>, out: &mut String, mut each: impl FnMut(T, &mut String)) {
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        each(item, out);
    }
}

fn quote_into(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

pub(crate) fn date_seconds(date: &Date) -> String {
    match date.whole_seconds() {
        Some(s) => s.to_string(),
        None => format_f64(date.timestamp()),
    }
}

fn use_exponent(magnitude: f64) -> bool {
    magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude)
}

/// Shortest round-trip form of a double.
pub(crate) fn format_f64(x: f64) -> String {
    if let Some(special) = special_float(x.is_nan(), x.is_infinite(), x.is_sign_negative()) {
        return special.to_owned();
    }
    let shortest = format!("{:e}", x.abs());
    let exact = format!("{:.800e}", x.abs());
    let digits = ties_to_even(&shortest, &exact, |s| s.parse::<f64>() == Ok(x.abs()));
    render(x.is_sign_negative(), &digits, use_exponent(x.abs()))
}

/// Shortest round-trip form of a single, judged at single precision.
pub(crate) fn format_f32(x: f32) -> String {
    if let Some(special) = special_float(x.is_nan(), x.is_infinite(), x.is_sign_negative()) {
        return special.to_owned();
    }
    let shortest = format!("{:e}", x.abs());
    let exact = format!("{:.200e}", x.abs());
    let digits = ties_to_even(&shortest, &exact, |s| s.parse::<f32>() == Ok(x.abs()));
    render(x.is_sign_negative(), &digits, use_exponent(f64::from(x.abs())))
}

const fn special_float(nan: bool, infinite: bool, negative: bool) -> Option<&'static str> {
    match (nan, infinite, negative) {
        (true, _, _) => Some("NaN"),
        (false, true, false) => Some("Infinity"),
        (false, true, true) => Some("-Infinity"),
        _ => None,
    }
}

/// Significant digits `d1d2...` and exponent `e` of `d1.d2... × 10^e`.
#[derive(Debug, PartialEq, Eq)]
struct Digits {
    digits: String,
    exponent: i32,
}

fn split_scientific(s: &str) -> Option<Digits> {
    let (mantissa, exponent) = s.split_once('e')?;
    Some(Digits {
        digits: mantissa.replace('.', ""),
        exponent: exponent.parse().ok()?,
    })
}

/// Shortest digits with an exact halfway case rounded to the even digit.
///
/// `{:e}` rounds exact ties away from zero. When the exact expansion sits
/// precisely between two shortest candidates and the chosen one ends odd,
/// the lower candidate is taken if it still round-trips.
fn ties_to_even(shortest: &str, exact: &str, round_trips: impl Fn(&str) -> bool) -> Digits {
    let zero = Digits {
        digits: "0".to_owned(),
        exponent: 0,
    };
    let Some(short) = split_scientific(shortest) else {
        return zero;
    };
    let Some(full) = split_scientific(exact) else {
        return short;
    };
    let k = short.digits.len();
    if full.exponent != short.exponent || full.digits.len() <= k {
        return short;
    }

    let (lower, rest) = full.digits.split_at(k);
    let halfway = rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0');
    let odd = short
        .digits
        .bytes()
        .last()
        .is_some_and(|b| (b - b'0') % 2 == 1);
    if !halfway || !odd || lower == short.digits {
        return short;
    }

    let lower = lower.trim_end_matches('0');
    let lower = if lower.is_empty() { "0" } else { lower };
    let candidate = format!("{}.{}e{}", &lower[..1], &lower[1..], short.exponent);
    if round_trips(&candidate) {
        Digits {
            digits: lower.to_owned(),
            exponent: short.exponent,
        }
    } else {
        short
    }
}

/// Render as `1.5e+16` / `2.5e-06` or as plain decimal with a fraction.
fn render(negative: bool, d: &Digits, exponent_form: bool) -> String {
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    let (head, tail) = d.digits.split_at(1);
    if exponent_form {
        out.push_str(head);
        if !tail.is_empty() {
            out.push('.');
            out.push_str(tail);
        }
        let sign = if d.exponent < 0 { '-' } else { '+' };
        let _ = write!(out, "e{sign}{:02}", d.exponent.unsigned_abs());
        return out;
    }

    match usize::try_from(d.exponent) {
        Ok(point) => {
            let int_len = point + 1;
            if d.digits.len() > int_len {
                let (int, frac) = d.digits.split_at(int_len);
                let _ = write!(out, "{int}.{frac}");
            } else {
                let _ = write!(out, "{}{}.0", d.digits, "0".repeat(int_len - d.digits.len()));
            }
        }
        Err(_) => {
            let zeros = d.exponent.unsigned_abs() as usize - 1;
            let _ = write!(out, "0.{}{}", "0".repeat(zeros), d.digits);
        }
    }
    out
}
