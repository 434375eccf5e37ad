//! Output formatters

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// JSON formatter
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format a value as pretty JSON
    pub fn format<T: Serialize + ?Sized>(value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

/// Plain text formatter
pub struct PlainFormatter;

impl PlainFormatter {
    /// Format a value as indented `key: value` lines
    pub fn format<T: Serialize + ?Sized>(value: &T) -> Result<String> {
        let json = serde_json::to_value(value)?;
        Ok(Self::format_value(&json, 0))
    }

    fn format_value(value: &Value, indent: usize) -> String {
        let indent_str = "  ".repeat(indent);
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(arr) => arr
                .iter()
                .map(|v| format!("{}- {}", indent_str, Self::nested(v, indent + 1)))
                .collect::<Vec<_>>()
                .join("\n"),
            Value::Object(obj) => obj
                .iter()
                .map(|(k, v)| format!("{}{}: {}", indent_str, k, Self::nested(v, indent + 1)))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    // Containers start on their own line below the key
    fn nested(value: &Value, indent: usize) -> String {
        match value {
            Value::Array(arr) if !arr.is_empty() => {
                format!("\n{}", Self::format_value(value, indent))
            }
            Value::Object(obj) if !obj.is_empty() => {
                format!("\n{}", Self::format_value(value, indent))
            }
            Value::Array(_) => "[]".to_string(),
            Value::Object(_) => "{}".to_string(),
            scalar => Self::format_value(scalar, indent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestData {
        name: String,
        count: i32,
        tags: Vec<&'static str>,
    }

    fn data() -> TestData {
        TestData {
            name: "test".to_string(),
            count: 42,
            tags: vec!["graph", "planning"],
        }
    }

    #[test]
    fn test_json_formatter() {
        let result = JsonFormatter::format(&data()).unwrap();
        assert!(result.contains("\"count\": 42"));
    }

    #[test]
    fn test_plain_formatter() {
        let result = PlainFormatter::format(&data()).unwrap();
        assert_eq!(
            result,
            "name: test\ncount: 42\ntags: \n  - graph\n  - planning"
        );
    }

    #[test]
    fn test_plain_formatter_empty_containers() {
        let value = serde_json::json!({"rows": [], "extra": {}});
        let result = PlainFormatter::format(&value).unwrap();
        assert!(result.contains("rows: []"));
        assert!(result.contains("extra: {}"));
    }
}
