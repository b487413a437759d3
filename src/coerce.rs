//! Scalar coercion utilities for loosely-typed export records
//!
//! Export values arrive as whatever the two source exporters emitted:
//! currency-formatted strings (`"$1,234.56"`), thousands-separated numbers,
//! legacy `/Date(<epoch-ms>)/` tokens, ISO date prefixes, and boolean-ish
//! flags. Every coercion here degrades instead of failing: unparseable
//! numbers become 0, unparseable dates are carried through as their raw
//! string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Convert a scalar export value to a trimmed string. Null, absent, and
/// non-scalar values become the empty string.
pub fn to_str(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// `to_str` followed by ASCII-insensitive uppercasing. Identifier keys
/// (item numbers, order numbers, lot numbers) are matched case-insensitively
/// across sources, so every index key passes through here.
pub fn to_upper(value: Option<&Value>) -> String {
    to_str(value).to_uppercase()
}

/// Convert a scalar export value to a float. Strings are stripped of `$`
/// and `,` before parsing; anything non-finite or unparseable becomes 0.
pub fn to_num(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(Value::String(s)) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| *c != '$' && *c != ',')
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    };
    match parsed {
        Some(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

/// Interpret a boolean-ish export value (`true`, `1`, `"Y"`, `"Yes"`, ...).
pub fn to_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => matches!(
            s.trim().to_uppercase().as_str(),
            "Y" | "YES" | "TRUE" | "T" | "1" | "ON"
        ),
        _ => false,
    }
}

/// A date value resolved from an export field.
///
/// `Parsed` carries a real timestamp; `Raw` carries the original string
/// when none of the known encodings matched. Raw values sort before every
/// parsed date, so date-descending lists push them to the tail.
#[derive(Debug, Clone, PartialEq)]
pub enum DateValue {
    Parsed(DateTime<Utc>),
    Raw(String),
}

impl Default for DateValue {
    fn default() -> Self {
        DateValue::Raw(String::new())
    }
}

impl DateValue {
    pub fn is_parsed(&self) -> bool {
        matches!(self, DateValue::Parsed(_))
    }

    /// True for the empty placeholder produced by absent date fields.
    pub fn is_empty(&self) -> bool {
        matches!(self, DateValue::Raw(s) if s.is_empty())
    }

    /// Millisecond sort key. Raw values sort before all parsed dates.
    pub fn sort_key(&self) -> i64 {
        match self {
            DateValue::Parsed(dt) => dt.timestamp_millis(),
            DateValue::Raw(_) => i64::MIN,
        }
    }

    /// Digits-only day bucket (`"20240115"`) for coarse range pruning.
    /// Raw values fall back to their leading digits.
    pub fn day_bucket(&self) -> String {
        match self {
            DateValue::Parsed(dt) => dt.format("%Y%m%d").to_string(),
            DateValue::Raw(s) => s.chars().filter(|c| c.is_ascii_digit()).take(8).collect(),
        }
    }
}

impl Serialize for DateValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DateValue::Parsed(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            DateValue::Raw(s) => serializer.serialize_str(s),
        }
    }
}

/// Resolve a date field across the three encodings the exporters emit:
/// legacy `/Date(<epoch-ms>)/` tokens, ISO-prefixed strings, and a couple
/// of free-form day formats. Unparseable input comes back as `Raw`.
pub fn to_date(value: Option<&Value>) -> DateValue {
    let s = to_str(value);
    if s.is_empty() {
        return DateValue::Raw(s);
    }
    if let Some(dt) = legacy_date_millis(&s).and_then(|ms| Utc.timestamp_millis_opt(ms).single()) {
        return DateValue::Parsed(dt);
    }
    if let Some(dt) = parse_iso_prefix(&s) {
        return DateValue::Parsed(dt);
    }
    for fmt in ["%m/%d/%Y", "%m/%d/%y", "%d-%b-%Y"] {
        if let Ok(day) = NaiveDate::parse_from_str(&s, fmt) {
            if let Some(dt) = day.and_hms_opt(0, 0, 0) {
                return DateValue::Parsed(Utc.from_utc_datetime(&dt));
            }
        }
    }
    DateValue::Raw(s)
}

/// Extract the epoch-millisecond payload from a `/Date(1577836800000)/`
/// token. A timezone suffix like `+0700` after the integer is ignored.
fn legacy_date_millis(s: &str) -> Option<i64> {
    let rest = s.strip_prefix("/Date(")?;
    let token = &rest[..rest.find(')')?];
    let bytes = token.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'-') | Some(b'+')));
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    token[..end].parse().ok()
}

/// Parse strings that start with a `YYYY-MM-DD` day, with or without a
/// trailing time component.
fn parse_iso_prefix(s: &str) -> Option<DateTime<Utc>> {
    let b = s.as_bytes();
    if b.len() < 10
        || !b[..4].iter().all(u8::is_ascii_digit)
        || b[4] != b'-'
        || !b[5..7].iter().all(u8::is_ascii_digit)
        || b[7] != b'-'
        || !b[8..10].iter().all(u8::is_ascii_digit)
    {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Checked slicing: byte 19 may fall inside a multibyte char in a
    // free-form tail, in which case only the day prefix is usable.
    if let Some(head) = s.get(..19) {
        if let Ok(dt) = NaiveDateTime::parse_from_str(head, "%Y-%m-%dT%H:%M:%S") {
            return Some(Utc.from_utc_datetime(&dt));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(head, "%Y-%m-%d %H:%M:%S") {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    let day = NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_str_handles_null_and_absent() {
        assert_eq!(to_str(None), "");
        assert_eq!(to_str(Some(&Value::Null)), "");
    }

    #[test]
    fn test_to_str_trims_and_converts() {
        assert_eq!(to_str(Some(&json!("  A100  "))), "A100");
        assert_eq!(to_str(Some(&json!(42))), "42");
        assert_eq!(to_str(Some(&json!(true))), "true");
    }

    #[test]
    fn test_to_str_ignores_composites() {
        assert_eq!(to_str(Some(&json!([1, 2]))), "");
        assert_eq!(to_str(Some(&json!({"a": 1}))), "");
    }

    #[test]
    fn test_to_upper() {
        assert_eq!(to_upper(Some(&json!(" abc-1 "))), "ABC-1");
    }

    #[test]
    fn test_to_num_currency_and_thousands() {
        assert_eq!(to_num(Some(&json!("$1,234.56"))), 1234.56);
        assert_eq!(to_num(Some(&json!("1,200.00"))), 1200.0);
        assert_eq!(to_num(Some(&json!("  50 "))), 50.0);
    }

    #[test]
    fn test_to_num_defaults_to_zero() {
        assert_eq!(to_num(None), 0.0);
        assert_eq!(to_num(Some(&Value::Null)), 0.0);
        assert_eq!(to_num(Some(&json!("N/A"))), 0.0);
        assert_eq!(to_num(Some(&json!(""))), 0.0);
    }

    #[test]
    fn test_to_num_numbers_pass_through() {
        assert_eq!(to_num(Some(&json!(12.5))), 12.5);
        assert_eq!(to_num(Some(&json!(-3))), -3.0);
    }

    #[test]
    fn test_to_bool_variants() {
        assert!(to_bool(Some(&json!(true))));
        assert!(to_bool(Some(&json!("Y"))));
        assert!(to_bool(Some(&json!("yes"))));
        assert!(to_bool(Some(&json!(1))));
        assert!(!to_bool(Some(&json!("N"))));
        assert!(!to_bool(Some(&json!(0))));
        assert!(!to_bool(None));
    }

    #[test]
    fn test_to_date_legacy_token() {
        let d = to_date(Some(&json!("/Date(1577836800000)/")));
        match d {
            DateValue::Parsed(dt) => assert_eq!(dt.to_rfc3339(), "2020-01-01T00:00:00+00:00"),
            DateValue::Raw(s) => panic!("expected parsed date, got raw {s:?}"),
        }
    }

    #[test]
    fn test_to_date_legacy_token_with_offset_suffix() {
        let d = to_date(Some(&json!("/Date(1577836800000+0700)/")));
        assert!(d.is_parsed());
    }

    #[test]
    fn test_to_date_iso_shapes() {
        assert!(to_date(Some(&json!("2024-01-15"))).is_parsed());
        assert!(to_date(Some(&json!("2024-01-15T08:30:00"))).is_parsed());
        assert!(to_date(Some(&json!("2024-01-15T08:30:00Z"))).is_parsed());
        assert!(to_date(Some(&json!("2024-01-15 08:30:00"))).is_parsed());
    }

    #[test]
    fn test_to_date_free_form() {
        assert!(to_date(Some(&json!("1/15/2024"))).is_parsed());
        assert!(to_date(Some(&json!("15-Jan-2024"))).is_parsed());
    }

    #[test]
    fn test_to_date_multibyte_tail_keeps_day_prefix() {
        // 'é' spans bytes 18..20 here; the time-format slice must not split
        // it. The day prefix still resolves.
        let d = to_date(Some(&json!("2024-01-15 aaaaaaaé")));
        assert!(d.is_parsed());
        assert_eq!(d.day_bucket(), "20240115");
        assert!(to_date(Some(&json!("2024-01-15T08:30:0é"))).is_parsed());
    }

    #[test]
    fn test_to_date_multibyte_prefix_is_raw() {
        assert!(!to_date(Some(&json!("données 2024-01-15"))).is_parsed());
    }

    #[test]
    fn test_to_date_unparseable_carries_raw() {
        assert_eq!(
            to_date(Some(&json!("next tuesday"))),
            DateValue::Raw("next tuesday".to_string())
        );
        assert_eq!(to_date(None), DateValue::Raw(String::new()));
    }

    #[test]
    fn test_raw_sorts_before_parsed() {
        let raw = to_date(Some(&json!("garbage")));
        let parsed = to_date(Some(&json!("1970-01-01")));
        assert!(raw.sort_key() < parsed.sort_key());
    }

    #[test]
    fn test_day_bucket() {
        let d = to_date(Some(&json!("2024-01-15T23:59:00")));
        assert_eq!(d.day_bucket(), "20240115");
        assert_eq!(DateValue::Raw("n/a".into()).day_bucket(), "");
    }

    #[test]
    fn test_date_value_serializes_as_string() {
        let parsed = to_date(Some(&json!("2024-01-15")));
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            json!("2024-01-15T00:00:00+00:00")
        );
        let raw = DateValue::Raw("bad date".into());
        assert_eq!(serde_json::to_value(&raw).unwrap(), json!("bad date"));
    }
}
