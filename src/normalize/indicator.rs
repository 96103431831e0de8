use crate::normalize::error::NormalizeError;
use crate::normalize::json::{get_opt_f64, get_opt_string};
use crate::types::readings::EconomicIndicator;
use log::debug;
use serde_json::Value;
use std::cmp::Reverse;

const SOURCE_NAME: &str = "economic_indicator";

/// Maps a `[metadata, entries]` indicator envelope onto an [`EconomicIndicator`].
///
/// A `null` or empty entry list is [`NormalizeError::NoData`]; an error
/// envelope (a single object carrying `message`) is [`NormalizeError::Malformed`].
pub fn normalize_indicator(code: &str, envelope: &Value) -> Result<EconomicIndicator, NormalizeError> {
    let parts = envelope
        .as_array()
        .ok_or_else(|| NormalizeError::malformed(SOURCE_NAME, "expected a JSON array envelope"))?;

    match parts.get(1) {
        Some(Value::Array(series)) => normalize_indicator_series(code, series),
        Some(Value::Null) => Err(NormalizeError::no_data(SOURCE_NAME)),
        Some(other) => Err(NormalizeError::malformed(
            SOURCE_NAME,
            format!("expected an entry list, got {other}"),
        )),
        None => match parts.first().and_then(|meta| meta.pointer("/message")) {
            Some(message) => Err(NormalizeError::malformed(SOURCE_NAME, message.to_string())),
            None => Err(NormalizeError::no_data(SOURCE_NAME)),
        },
    }
}

/// Picks the newest entry that carries a value.
///
/// Entries are stably sorted by year, newest first, so equal years keep
/// the provider's order. If every value is null the indicator is reported
/// with `value: None` rather than as an error.
pub fn normalize_indicator_series(
    code: &str,
    series: &[Value],
) -> Result<EconomicIndicator, NormalizeError> {
    if series.is_empty() {
        return Err(NormalizeError::no_data(SOURCE_NAME));
    }

    let mut entries: Vec<&Value> = series.iter().collect();
    entries.sort_by_key(|entry| Reverse(entry_year(entry)));

    let latest = entries
        .into_iter()
        .find_map(|entry| get_opt_f64(entry, "/value").map(|value| (value, entry)));

    match latest {
        Some((value, entry)) => Ok(EconomicIndicator {
            code: code.to_string(),
            value: Some(value),
            as_of_year: get_opt_string(entry, "/date"),
        }),
        None => {
            debug!("Indicator {} has no published value in the window", code);
            Ok(EconomicIndicator {
                code: code.to_string(),
                value: None,
                as_of_year: None,
            })
        }
    }
}

/// Leading year of dates like `2022`, `2022Q3` or `2022M07`. Unparseable dates sort last.
fn entry_year(entry: &Value) -> i32 {
    get_opt_string(entry, "/date")
        .and_then(|date| date.get(..4).and_then(|year| year.parse::<i32>().ok()))
        .unwrap_or(i32::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_non_null_wins() -> Result<(), NormalizeError> {
        let series = json!([{"value":null,"date":"2023"},{"value":1.2e13,"date":"2022"}]);
        let indicator = normalize_indicator_series(
            "NY.GDP.MKTP.CD",
            series.as_array().map(Vec::as_slice).unwrap_or_default(),
        )?;
        assert_eq!(indicator.value, Some(1.2e13));
        assert_eq!(indicator.as_of_year.as_deref(), Some("2022"));
        Ok(())
    }

    #[test]
    fn test_series_is_sorted_newest_first() -> Result<(), NormalizeError> {
        let envelope = json!([
            {"page": 1, "pages": 1, "per_page": 100, "total": 3},
            [
                {"value": 3.1, "date": "2019"},
                {"value": 2.9, "date": "2021"},
                {"value": null, "date": "2023"}
            ]
        ]);
        let indicator = normalize_indicator("SL.UEM.TOTL.ZS", &envelope)?;
        assert_eq!(indicator.value, Some(2.9));
        assert_eq!(indicator.as_of_year.as_deref(), Some("2021"));
        Ok(())
    }

    #[test]
    fn test_equal_years_keep_provider_order() -> Result<(), NormalizeError> {
        let envelope = json!([{}, [
            {"value": 10.0, "date": "2022"},
            {"value": 20.0, "date": "2022"}
        ]]);
        let indicator = normalize_indicator("SP.POP.TOTL", &envelope)?;
        assert_eq!(indicator.value, Some(10.0));
        Ok(())
    }

    #[test]
    fn test_all_null_is_absent_not_error() -> Result<(), NormalizeError> {
        let envelope = json!([{}, [{"value": null, "date": "2023"}, {"value": null, "date": "2022"}]]);
        let indicator = normalize_indicator("SP.POP.TOTL", &envelope)?;
        assert_eq!(indicator.code, "SP.POP.TOTL");
        assert_eq!(indicator.value, None);
        assert_eq!(indicator.as_of_year, None);
        Ok(())
    }

    #[test]
    fn test_empty_and_null_series_are_no_data() {
        assert!(matches!(
            normalize_indicator("X", &json!([{}, []])),
            Err(NormalizeError::NoData { .. })
        ));
        assert!(matches!(
            normalize_indicator("X", &json!([{}, null])),
            Err(NormalizeError::NoData { .. })
        ));
    }

    #[test]
    fn test_error_envelope_is_malformed() {
        let envelope = json!([{"message": [{"id": "120", "value": "Invalid value"}]}]);
        assert!(matches!(
            normalize_indicator("BAD.CODE", &envelope),
            Err(NormalizeError::Malformed { .. })
        ));
    }

    #[test]
    fn test_numeric_string_values_are_coerced() -> Result<(), NormalizeError> {
        let envelope = json!([{}, [{"value": "51712619", "date": "2023"}]]);
        let indicator = normalize_indicator("SP.POP.TOTL", &envelope)?;
        assert_eq!(indicator.value, Some(51_712_619.0));
        Ok(())
    }
}
