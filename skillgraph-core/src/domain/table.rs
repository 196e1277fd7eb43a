use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An already-parsed tabular structure: named columns over rows of loosely
/// typed cells. This is the input contract of the ETL stage and the shape
/// in which canonical tables are persisted. Producing one of these from a
/// raw spreadsheet (encoding detection, sheet selection, format
/// auto-detection) is an upstream concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from string column names and ready-made rows. Rows
    /// are padded with nulls or truncated to the column count.
    pub fn from_rows(columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell lookup by row index and column name. Out-of-range rows and
    /// unknown columns are `None`, not a panic.
    pub fn cell(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col)
    }

    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rename a column in place. Returns false when the source name is
    /// absent (the rename is then a no-op).
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(idx) => {
                self.columns[idx] = to.to_string();
                true
            }
            None => false,
        }
    }

    /// Append a column filled with nulls and return its index.
    pub fn add_column(&mut self, name: &str) -> usize {
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(Value::Null);
        }
        self.columns.len() - 1
    }
}

/// Trimmed string form of an identifier cell. `7`, `"7"` and `" 7 "` all
/// come out as `"7"`. Spreadsheet parsers frequently deliver integer ids
/// as floats, so `7.0` folds back to `"7"` as well. Null, empty, and
/// structured cells are `None`.
pub fn id_display(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().map(|f| {
                    if f.fract() == 0.0 && f.abs() < 9e15 {
                        format!("{}", f as i64)
                    } else {
                        f.to_string()
                    }
                })
            }
        }
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Identity key for joins, de-duplication, and graph lookups: the trimmed
/// string form with leading zeros stripped from all-digit identifiers.
/// `"007"`, `" 007 "`, and integer `7` all share the key `"7"`, so
/// differently padded exports still reference the same entity.
pub fn id_key(display: &str) -> String {
    let trimmed = display.trim();
    if trimmed.len() > 1 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let stripped = trimmed.trim_start_matches('0');
        if stripped.is_empty() {
            "0".to_string()
        } else {
            stripped.to_string()
        }
    } else {
        trimmed.to_string()
    }
}

/// Identity key straight from a cell, or `None` for null/empty cells.
pub fn cell_id_key(value: &Value) -> Option<String> {
    id_display(value).map(|s| id_key(&s))
}

/// Trimmed non-empty string content of a cell, for display attributes.
pub fn cell_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%m/%d/%Y", "%Y%m%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Best-effort date parse across the formats the exporting systems
/// actually produce. Unparseable values are `None`, never an error.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
        return Some(dt.date_naive());
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(&raw, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn id_display_folds_numeric_forms() {
        assert_eq!(id_display(&json!(7)), Some("7".to_string()));
        assert_eq!(id_display(&json!(7.0)), Some("7".to_string()));
        assert_eq!(id_display(&json!(" 7 ")), Some("7".to_string()));
        assert_eq!(id_display(&json!("007")), Some("007".to_string()));
        assert_eq!(id_display(&Value::Null), None);
        assert_eq!(id_display(&json!("   ")), None);
    }

    #[test]
    fn id_key_collapses_padded_identifiers() {
        assert_eq!(id_key("007"), "7");
        assert_eq!(id_key(" 007 "), "7");
        assert_eq!(cell_id_key(&json!(7)), Some("7".to_string()));
        // non-numeric ids pass through untouched
        assert_eq!(id_key("E1"), "E1");
        assert_eq!(id_key("0"), "0");
        assert_eq!(id_key("000"), "0");
    }

    #[test]
    fn parse_date_accepts_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date(&json!("2024-03-15")), Some(expected));
        assert_eq!(parse_date(&json!("15.03.2024")), Some(expected));
        assert_eq!(parse_date(&json!("2024-03-15 08:30:00")), Some(expected));
        assert_eq!(parse_date(&json!("not a date")), None);
        assert_eq!(parse_date(&Value::Null), None);
    }

    #[test]
    fn cell_access_is_total() {
        let table = Table::from_rows(&["a", "b"], vec![vec![json!(1)]]);
        assert_eq!(table.cell(0, "a"), Some(&json!(1)));
        // short row was padded with nulls
        assert_eq!(table.cell(0, "b"), Some(&Value::Null));
        assert_eq!(table.cell(0, "missing"), None);
        assert_eq!(table.cell(9, "a"), None);
    }
}
