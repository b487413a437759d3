//! Coercion property tests
//!
//! The scalar coercions degrade instead of failing; these properties pin
//! that down over arbitrary input.

use proptest::prelude::*;
use serde_json::json;
use shopview::coerce::{to_date, to_num, to_str};

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Any string input coerces to a finite number, never NaN/inf.
        #[test]
        fn prop_to_num_always_finite(s in ".*") {
            let n = to_num(Some(&json!(s)));
            prop_assert!(n.is_finite());
        }

        /// Formatted currency round-trips to its numeric value.
        #[test]
        fn prop_to_num_strips_currency_formatting(value in 0.0f64..1_000_000.0) {
            let cents = (value * 100.0).round() / 100.0;
            let formatted = format!("${cents:.2}");
            let reparsed = to_num(Some(&json!(formatted)));
            prop_assert!((reparsed - cents).abs() < 1e-9);
        }

        /// Parsed dates always produce an 8-digit day bucket.
        #[test]
        fn prop_parsed_day_bucket_is_eight_digits(
            year in 1990i32..2100,
            month in 1u32..13,
            day in 1u32..29
        ) {
            let date = to_date(Some(&json!(format!("{year:04}-{month:02}-{day:02}"))));
            prop_assert!(date.is_parsed());
            let bucket = date.day_bucket();
            prop_assert_eq!(bucket.len(), 8);
            prop_assert!(bucket.chars().all(|c| c.is_ascii_digit()));
        }

        /// Date resolution is total over arbitrary unicode input, including
        /// multibyte chars straddling the fixed-format prefix lengths.
        #[test]
        fn prop_to_date_total_over_unicode(s in "\\PC{0,40}") {
            let _ = to_date(Some(&json!(s)));
        }

        /// Unparseable date strings carry their raw form through unchanged.
        #[test]
        fn prop_raw_dates_preserve_input(s in "[a-zA-Z ]{1,20}") {
            let date = to_date(Some(&json!(s)));
            if !date.is_parsed() {
                prop_assert_eq!(serde_json::to_value(&date).unwrap(), json!(s.trim()));
            }
        }

        /// String coercion always trims.
        #[test]
        fn prop_to_str_trims(s in "[a-z0-9]{0,10}") {
            let padded = format!("  {s}  ");
            prop_assert_eq!(to_str(Some(&json!(padded))), s);
        }
    }
}
