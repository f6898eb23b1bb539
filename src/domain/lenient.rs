//! Forgiving deserializers for the report API payload.
//!
//! The endpoint is loosely typed: numbers arrive as strings, years as
//! integers, and whole objects may be `null`. Anything that cannot be read
//! falls back to zero or empty instead of failing the section.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Values keyed by season or year (`"2024/25" -> 1_250_000.0`).
pub type YearSeries = BTreeMap<String, f64>;

/// Named series, e.g. `outras_despesas.arrendamento`.
pub type SeriesGroup = BTreeMap<String, YearSeries>;

/// Parses a decimal written either as `1234.56` or in pt-BR style
/// (`R$ 1.234,56`, `1.234.567`).
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.contains('.'), cleaned.contains(',')) {
        (true, true) => cleaned.replace('.', "").replace(',', "."),
        (false, true) => cleaned.replace(',', "."),
        (true, false) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned,
    };

    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn value_as_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => parse_decimal(s).unwrap_or(0.0),
        _ => 0.0,
    }
}

pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_as_f64).unwrap_or(0.0))
}

pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let n = number(deserializer)?;
    Ok(if n > 0.0 { n.round() as u32 } else { 0 })
}

pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_as_text).unwrap_or_default())
}

pub fn text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(value_as_text)
            .filter(|s| !s.is_empty())
            .collect(),
        _ => Vec::new(),
    })
}

pub fn series<'de, D: Deserializer<'de>>(deserializer: D) -> Result<YearSeries, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(series_from_value).unwrap_or_default())
}

pub fn series_group<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SeriesGroup, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let mut group = SeriesGroup::new();
    if let Some(Value::Object(map)) = value {
        for (key, child) in map {
            if child.is_object() {
                group.insert(key, series_from_value(&child));
            }
        }
    }
    Ok(group)
}

/// Any nested structure: a shape mismatch yields `T::default()`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

fn series_from_value(value: &Value) -> YearSeries {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), value_as_f64(v)))
            .collect(),
        _ => YearSeries::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "number")]
        amount: f64,
        #[serde(deserialize_with = "text")]
        label: String,
        #[serde(deserialize_with = "count")]
        total: u32,
        #[serde(deserialize_with = "series")]
        by_year: YearSeries,
        #[serde(deserialize_with = "text_list")]
        years: Vec<String>,
    }

    #[test]
    fn test_parse_decimal_formats() {
        assert_eq!(parse_decimal("1234.5"), Some(1234.5));
        assert_eq!(parse_decimal("R$ 1.234,56"), Some(1234.56));
        assert_eq!(parse_decimal("12,5"), Some(12.5));
        assert_eq!(parse_decimal("1.234.567"), Some(1234567.0));
        assert_eq!(parse_decimal("R$ 1.234.567"), Some(1234567.0));
        assert_eq!(parse_decimal("  "), None);
        assert_eq!(parse_decimal("abc"), None);
    }

    #[test]
    fn test_lenient_fields_accept_mixed_types() {
        let sample: Sample = serde_json::from_value(json!({
            "amount": "1.500,25",
            "label": 2024,
            "total": 3.6,
            "by_year": {"2024/25": "10", "2025/26": null, "2026/27": 7.5},
            "years": [2024, "2025/26", null]
        }))
        .unwrap();

        assert_eq!(sample.amount, 1500.25);
        assert_eq!(sample.label, "2024");
        assert_eq!(sample.total, 4);
        assert_eq!(sample.by_year.get("2024/25"), Some(&10.0));
        assert_eq!(sample.by_year.get("2025/26"), Some(&0.0));
        assert_eq!(sample.years, vec!["2024".to_string(), "2025/26".to_string()]);
    }

    #[test]
    fn test_nulls_become_defaults() {
        let sample: Sample = serde_json::from_value(json!({
            "amount": null,
            "label": null,
            "by_year": [1, 2]
        }))
        .unwrap();

        assert_eq!(sample.amount, 0.0);
        assert!(sample.label.is_empty());
        assert!(sample.by_year.is_empty());
    }
}
