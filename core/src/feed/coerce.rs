//! Total parse-with-defaults conversions for loosely typed feed fields.
//!
//! Devices send numbers both as JSON numbers and as strings, sometimes with
//! trailing units. Every function here accepts any JSON value and never fails.

use serde_json::Value;

/// Longest leading decimal literal of `text`, after leading whitespace.
pub fn leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        return None;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Longest leading integer literal of `text`, after leading whitespace.
pub fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    text[..end].parse::<i64>().ok()
}

/// Finite number carried by a JSON number or numeric string.
pub fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => leading_float(s),
        _ => None,
    }
}

/// Reading with a fallback; zero of either sign also takes the fallback.
pub fn float_or_default(value: Option<&Value>, default: f64) -> f64 {
    number(value).filter(|v| *v != 0.0).unwrap_or(default)
}

/// Non-negative whole count; fractional parts are truncated.
pub fn count_or_default(value: Option<&Value>, default: u32) -> u32 {
    let parsed = match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64)),
        Some(Value::String(s)) => leading_integer(s),
        _ => None,
    };
    parsed
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(default)
}

/// Display label; empty, zero, false and null all fall back to `default`.
pub fn label_or_default(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) if n.as_f64().is_some_and(|v| v != 0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".into(),
        Some(other) if other.is_array() || other.is_object() => other.to_string(),
        _ => default.into(),
    }
}

/// Textual flag; only non-empty strings are kept verbatim.
pub fn flag_or_default(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => default.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leading_float_reads_numeric_prefix() {
        assert_eq!(leading_float("12.5"), Some(12.5));
        assert_eq!(leading_float("  -3.25 mph"), Some(-3.25));
        assert_eq!(leading_float(".5"), Some(0.5));
        assert_eq!(leading_float("7."), Some(7.0));
        assert_eq!(leading_float("1e3x"), Some(1000.0));
        assert_eq!(leading_float("2e"), Some(2.0));
        assert_eq!(leading_float("abc"), None);
        assert_eq!(leading_float("-"), None);
        assert_eq!(leading_float("."), None);
        assert_eq!(leading_float("Infinity"), None);
    }

    #[test]
    fn leading_integer_truncates() {
        assert_eq!(leading_integer("9 sats"), Some(9));
        assert_eq!(leading_integer("7.9"), Some(7));
        assert_eq!(leading_integer("x7"), None);
    }

    #[test]
    fn numbers_default_on_anything_unparseable() {
        assert_eq!(float_or_default(Some(&json!(4.5)), 0.0), 4.5);
        assert_eq!(float_or_default(Some(&json!("88.1")), 0.0), 88.1);
        assert_eq!(float_or_default(Some(&json!("fast")), 0.0), 0.0);
        assert_eq!(float_or_default(Some(&json!(true)), 0.0), 0.0);
        assert_eq!(float_or_default(Some(&json!(null)), 0.0), 0.0);
        assert_eq!(float_or_default(None, 0.0), 0.0);
    }

    #[test]
    fn negative_zero_reads_as_positive_default() {
        let speed = float_or_default(Some(&json!("-0")), 0.0);
        assert_eq!(speed, 0.0);
        assert!(speed.is_sign_positive());
        assert!(float_or_default(Some(&json!(-0.0)), 0.0).is_sign_positive());
        assert_eq!(float_or_default(Some(&json!("-0.5")), 0.0), -0.5);
    }

    #[test]
    fn counts_are_whole_and_non_negative() {
        assert_eq!(count_or_default(Some(&json!(8)), 0), 8);
        assert_eq!(count_or_default(Some(&json!(7.9)), 0), 7);
        assert_eq!(count_or_default(Some(&json!("11")), 0), 11);
        assert_eq!(count_or_default(Some(&json!(-2)), 0), 0);
        assert_eq!(count_or_default(Some(&json!("many")), 0), 0);
    }

    #[test]
    fn labels_fall_back_on_falsy_values() {
        assert_eq!(label_or_default(Some(&json!("3D")), "N/A"), "3D");
        assert_eq!(label_or_default(Some(&json!(2)), "N/A"), "2");
        assert_eq!(label_or_default(Some(&json!("")), "N/A"), "N/A");
        assert_eq!(label_or_default(Some(&json!(0)), "N/A"), "N/A");
        assert_eq!(label_or_default(Some(&json!(false)), "N/A"), "N/A");
        assert_eq!(label_or_default(None, "N/A"), "N/A");
    }

    #[test]
    fn flags_keep_only_strings() {
        assert_eq!(flag_or_default(Some(&json!("true")), "false"), "true");
        assert_eq!(flag_or_default(Some(&json!(true)), "false"), "false");
        assert_eq!(flag_or_default(Some(&json!("")), "false"), "false");
    }
}
