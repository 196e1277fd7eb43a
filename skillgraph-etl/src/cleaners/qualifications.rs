use chrono::Datelike;
use serde_json::Value;

use skillgraph_core::{parse_date, SourceKind, Table};

use super::{alias_vec, CleanerUtils, SourceCleaner};

/// End dates in this year mean "no expiration" in the exporting system.
const INDEFINITE_SENTINEL_YEAR: i32 = 9999;

/// Cleaner for qualification exports. Derives the `indefinite` flag from
/// the sentinel far-future end date before dates are normalized.
pub struct QualificationsCleaner {
    aliases: Vec<(String, String)>,
}

pub const EXPECTED_COLUMNS: &[&str] = &[
    "personal_number",
    "qualification_id",
    "qualification_name",
    "valid_from",
    "valid_until",
    "indefinite",
];

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("personalnummer", "personal_number"),
    ("employee_id", "personal_number"),
    ("qualifikations_id", "qualification_id"),
    ("qualifikationsnummer", "qualification_id"),
    ("qual_id", "qualification_id"),
    ("qualifikation", "qualification_name"),
    ("qualifikationsbezeichnung", "qualification_name"),
    ("gültig_von", "valid_from"),
    ("gültig_ab", "valid_from"),
    ("valid_since", "valid_from"),
    ("gültig_bis", "valid_until"),
    ("ablaufdatum", "valid_until"),
    ("valid_to", "valid_until"),
    ("expiry_date", "valid_until"),
];

impl QualificationsCleaner {
    pub fn new() -> Self {
        Self::with_aliases(DEFAULT_ALIASES)
    }

    pub fn with_aliases(aliases: &[(&str, &str)]) -> Self {
        Self {
            aliases: alias_vec(aliases),
        }
    }
}

impl Default for QualificationsCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCleaner for QualificationsCleaner {
    fn source_kind(&self) -> SourceKind {
        SourceKind::Qualifications
    }

    fn name(&self) -> &str {
        "qualifications"
    }

    fn expected_columns(&self) -> &'static [&'static str] {
        EXPECTED_COLUMNS
    }

    fn clean(&self, mut table: Table) -> Table {
        CleanerUtils::rename_aliases(&mut table, &self.aliases);
        CleanerUtils::coerce_id_columns(&mut table, &["personal_number", "qualification_id"]);

        // derive the indefinite flag while the raw end dates are still visible
        let indefinite = match table.column_index("indefinite") {
            Some(idx) => idx,
            None => table.add_column("indefinite"),
        };
        let until = table.column_index("valid_until");
        for row in &mut table.rows {
            let flag = until
                .and_then(|u| row.get(u))
                .and_then(parse_date)
                .map(|d| d.year() >= INDEFINITE_SENTINEL_YEAR)
                .unwrap_or(false);
            if let Some(cell) = row.get_mut(indefinite) {
                *cell = Value::Bool(flag);
            }
        }

        CleanerUtils::coerce_date_columns(&mut table, &["valid_from", "valid_until"]);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sentinel_end_date_sets_indefinite_flag() {
        let table = Table::from_rows(
            &["personalnummer", "qualifikations_id", "gültig_bis"],
            vec![
                vec![json!("1"), json!("Q1"), json!("31.12.9999")],
                vec![json!("1"), json!("Q2"), json!("31.12.2026")],
                vec![json!("1"), json!("Q3"), Value::Null],
            ],
        );
        let cleaned = QualificationsCleaner::new().clean(table);
        assert_eq!(cleaned.cell(0, "indefinite"), Some(&json!(true)));
        assert_eq!(cleaned.cell(1, "indefinite"), Some(&json!(false)));
        assert_eq!(cleaned.cell(2, "indefinite"), Some(&json!(false)));
        assert_eq!(cleaned.cell(1, "valid_until"), Some(&json!("2026-12-31")));
    }
}
