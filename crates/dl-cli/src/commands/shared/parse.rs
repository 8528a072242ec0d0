use anyhow::Context;
use chrono::NaiveDate;
use serde_json::Value;

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid {field} '{raw}' (expected YYYY-MM-DD)"))
}

pub fn parse_optional_date(raw: Option<&str>, field: &str) -> anyhow::Result<Option<NaiveDate>> {
    raw.map(|value| parse_date(value, field)).transpose()
}

/// Parse a query parameter: a JSON literal when it is one, otherwise the
/// raw text as a string.
#[must_use]
pub fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::{parse_date, parse_optional_date, parse_param};

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_date("2024-01-15", "invoice_date").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(parse_optional_date(None, "due_date").unwrap(), None);
    }

    #[test]
    fn errors_name_the_field() {
        let err = parse_date("15/01/2024", "hire_date").unwrap_err();
        assert!(err.to_string().contains("invalid hire_date '15/01/2024'"));
    }

    #[rstest]
    #[case("10", json!(10))]
    #[case("2.5", json!(2.5))]
    #[case("null", Value::Null)]
    #[case("\"quoted\"", json!("quoted"))]
    #[case("Electronics", json!("Electronics"))]
    #[case("CUST-0001", json!("CUST-0001"))]
    fn params_prefer_json(#[case] raw: &str, #[case] expected: Value) {
        assert_eq!(parse_param(raw), expected);
    }
}
