use crate::models::stats::AggregateResponse;
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use serde_json::Value;

pub struct DisplayFormatter;

impl DisplayFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_header(&self, text: &str) -> String {
        format!("\n=== {} ===", text.bright_white().bold())
    }

    pub fn format_stats_table(&self, rows: &[(String, String)]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

        table.add_row(Row::new(vec![
            Cell::new("Field").style_spec("b"),
            Cell::new("Value").style_spec("b"),
        ]));

        for (field, value) in rows {
            table.add_row(Row::new(vec![Cell::new(field), Cell::new(value)]));
        }

        table.to_string()
    }

    pub fn format_value(&self, value: &Value) -> String {
        match value {
            Value::Null => "-".to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Renders one platform slot: its error in red, then any fields it has.
    pub fn format_platform<T: Serialize>(&self, name: &str, slot: &T) -> String {
        let mut output = vec![self.format_header(name)];
        let value = serde_json::to_value(slot).unwrap_or(Value::Null);
        let Some(fields) = value.as_object() else {
            output.push("No data".dimmed().to_string());
            return output.join("\n");
        };

        if let Some(error) = fields.get("error") {
            output.push(format!("Error: {}", self.format_value(error)).red().to_string());
        }

        let rows: Vec<(String, String)> = fields
            .iter()
            .filter(|(field, _)| field.as_str() != "error")
            .map(|(field, value)| (field.clone(), self.format_value(value)))
            .collect();

        if rows.is_empty() {
            if fields.is_empty() {
                output.push("No data".dimmed().to_string());
            }
        } else {
            output.push(self.format_stats_table(&rows));
        }

        output.join("\n")
    }

    pub fn format_aggregate(&self, aggregate: &AggregateResponse) -> String {
        [
            self.format_platform("Codeforces", &aggregate.codeforces),
            self.format_platform("CodeChef", &aggregate.codechef),
            self.format_platform("LeetCode", &aggregate.leetcode),
            self.format_platform("GeeksforGeeks", &aggregate.geeksforgeeks),
            format!("\nLast synced: {}", aggregate.timestamp),
        ]
        .join("\n")
    }
}

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::stats::{CodeChefStats, Slot};
    use serde_json::json;

    #[test]
    fn test_error_slot_shows_message() {
        colored::control::set_override(false);
        let display = DisplayFormatter::new();
        let slot: Slot<CodeChefStats> = Slot::Failed {
            error: json!("HTTP 503"),
        };

        let output = display.format_platform("CodeChef", &slot);
        assert!(output.contains("Error: HTTP 503"));
    }

    #[test]
    fn test_fields_are_tabulated() {
        colored::control::set_override(false);
        let display = DisplayFormatter::new();
        let slot = Slot::Stats(CodeChefStats {
            rating: json!(1890),
            stars: json!("4★"),
            solved: json!(180),
            contests: Value::Null,
        });

        let output = display.format_platform("CodeChef", &slot);
        assert!(output.contains("rating"));
        assert!(output.contains("1890"));
        assert!(output.contains("4★"));
        assert!(!output.contains("Error"));
    }

    #[test]
    fn test_format_value() {
        let display = DisplayFormatter::new();
        assert_eq!(display.format_value(&Value::Null), "-");
        assert_eq!(display.format_value(&json!("expert")), "expert");
        assert_eq!(display.format_value(&json!(12)), "12");
    }
}
