//! Column type inference and schema type validation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{DataType, ExpectedType, Value};

// Date pattern regexes - compiled once at startup. Prefix patterns accept
// trailing time components (e.g. "2020-01-15 10:30:00").
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("Invalid regex: YYYY-MM-DD"),
        Regex::new(r"^\d{2}/\d{2}/\d{4}").expect("Invalid regex: MM/DD/YYYY"),
        Regex::new(r"^\d{2}-\d{2}-\d{4}").expect("Invalid regex: DD-MM-YYYY"),
        Regex::new(r"^\d{2}\.\d{2}\.\d{4}").expect("Invalid regex: DD.MM.YYYY"),
        Regex::new(r"^\d{4}/\d{2}/\d{2}").expect("Invalid regex: YYYY/MM/DD"),
        Regex::new(r"^\d{1,2}\s+\w+\s+\d{4}$").expect("Invalid regex: D Month YYYY"),
        Regex::new(r"^\w+\s+\d{1,2},?\s+\d{4}$").expect("Invalid regex: Month D, YYYY"),
    ]
});

/// Whether a rendered value looks like a date.
pub(crate) fn is_date_like(value: &str) -> bool {
    if value.trim().is_empty() {
        return false;
    }
    DATE_PATTERNS.iter().any(|re| re.is_match(value))
}

/// Classify a column from its values.
///
/// A value that is both numeric-looking and date-looking counts toward both
/// ratios; Numeric is checked first, so an ambiguous column resolves to
/// Numeric.
pub(crate) fn infer_column_type<'a, I>(values: I) -> DataType
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut non_null_count = 0u64;
    let mut numeric_count = 0u64;
    let mut date_count = 0u64;

    for value in values {
        if value.is_null() {
            continue;
        }
        non_null_count += 1;
        if value.as_number().is_some() {
            numeric_count += 1;
        }
        if is_date_like(&value.render()) {
            date_count += 1;
        }
    }

    if non_null_count == 0 {
        return DataType::Unknown;
    }

    let numeric_ratio = numeric_count as f64 / non_null_count as f64;
    let date_ratio = date_count as f64 / non_null_count as f64;

    if numeric_ratio > 0.8 {
        DataType::Numeric
    } else if date_ratio > 0.8 {
        DataType::Date
    } else {
        DataType::Categorical
    }
}

fn is_integer_value(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_finite() && n.fract() == 0.0,
        Value::Text(s) => s.trim().parse::<i64>().is_ok(),
        _ => false,
    }
}

fn is_boolean_value(value: &Value) -> bool {
    if matches!(value, Value::Bool(_)) {
        return true;
    }
    matches!(
        value.render().to_lowercase().as_str(),
        "true" | "false" | "1" | "0"
    )
}

/// Test a non-null value against a schema-expected type. `Text` and
/// unrecognized type names always pass.
pub(crate) fn value_matches_type(value: &Value, expected: ExpectedType) -> bool {
    match expected {
        ExpectedType::Text | ExpectedType::Other => true,
        ExpectedType::Integer => is_integer_value(value),
        ExpectedType::Float => value.as_number().is_some(),
        ExpectedType::Boolean => is_boolean_value(value),
        ExpectedType::Date => is_date_like(&value.render()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(values: &[&str]) -> Vec<Value> {
        values.iter().map(|v| Value::Text(v.to_string())).collect()
    }

    #[test]
    fn date_formats_are_recognized() {
        for value in [
            "2020-01-15",
            "2020-01-15 10:30:00",
            "01/15/2020",
            "15-01-2020",
            "15.01.2020",
            "2020/01/15",
            "15 January 2020",
            "January 15, 2020",
            "January 15 2020",
        ] {
            assert!(is_date_like(value), "expected date-like: {value}");
        }
        assert!(!is_date_like("hello"));
        assert!(!is_date_like("15/1/2020"));
        assert!(!is_date_like(""));
    }

    #[test]
    fn all_numbers_infer_numeric() {
        let values = vec![Value::Number(1.0), Value::Number(2.0), Value::Text("3".into())];
        assert_eq!(infer_column_type(&values), DataType::Numeric);
    }

    #[test]
    fn dates_infer_date() {
        let values = text(&["2020-01-01", "2020-02-01", "2020-03-01"]);
        assert_eq!(infer_column_type(&values), DataType::Date);
    }

    #[test]
    fn mixed_values_infer_categorical() {
        let values = text(&["a", "b", "2020-01-01", "4"]);
        assert_eq!(infer_column_type(&values), DataType::Categorical);
    }

    #[test]
    fn all_null_infers_unknown() {
        let values = vec![Value::Null, Value::Null];
        assert_eq!(infer_column_type(&values), DataType::Unknown);
        assert_eq!(infer_column_type(std::iter::empty()), DataType::Unknown);
    }

    #[test]
    fn numeric_wins_over_date_on_ambiguous_columns() {
        // "20200115" style strings parse as numbers; none match a date
        // pattern without separators, so construct values that do both.
        let values = text(&["2020-01-01", "2020-02-02"]);
        // Sanity: these are dates, not numbers.
        assert_eq!(infer_column_type(&values), DataType::Date);

        // A column of plain digits is numeric even though dates exist
        // elsewhere; precedence only matters when both ratios pass 0.8.
        let digits = text(&["1000", "2000", "3000"]);
        assert_eq!(infer_column_type(&digits), DataType::Numeric);
    }

    #[test]
    fn null_ratio_excluded_from_denominator() {
        let values = vec![
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Number(1.0),
            Value::Number(2.0),
        ];
        assert_eq!(infer_column_type(&values), DataType::Numeric);
    }

    #[test]
    fn schema_type_validation() {
        assert!(value_matches_type(&Value::Number(3.0), ExpectedType::Integer));
        assert!(!value_matches_type(&Value::Number(3.5), ExpectedType::Integer));
        assert!(value_matches_type(&Value::Text("42".into()), ExpectedType::Integer));
        assert!(value_matches_type(&Value::Text("3.5".into()), ExpectedType::Float));
        assert!(!value_matches_type(&Value::Text("abc".into()), ExpectedType::Float));
        assert!(value_matches_type(&Value::Bool(true), ExpectedType::Boolean));
        assert!(value_matches_type(&Value::Number(1.0), ExpectedType::Boolean));
        assert!(value_matches_type(&Value::Text("FALSE".into()), ExpectedType::Boolean));
        assert!(!value_matches_type(&Value::Text("yes".into()), ExpectedType::Boolean));
        assert!(value_matches_type(&Value::Text("2020-01-01".into()), ExpectedType::Date));
        assert!(!value_matches_type(&Value::Text("soon".into()), ExpectedType::Date));
        assert!(value_matches_type(&Value::Number(1.0), ExpectedType::Text));
        assert!(value_matches_type(&Value::Text("anything".into()), ExpectedType::Other));
    }
}
