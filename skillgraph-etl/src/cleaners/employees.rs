use tracing::warn;

use skillgraph_core::{SourceKind, Table};

use super::{alias_vec, CleanerUtils, SourceCleaner};

/// Cleaner for employee master exports. Depending on which system
/// produced the file, headers arrive in German or English, and personnel
/// numbers arrive as zero-padded strings or plain integers.
pub struct EmployeesCleaner {
    aliases: Vec<(String, String)>,
}

pub const EXPECTED_COLUMNS: &[&str] = &[
    "personal_number",
    "first_name",
    "last_name",
    "profession",
    "planned_position",
    "org_unit",
];

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("personalnummer", "personal_number"),
    ("personalnr", "personal_number"),
    ("pers_nr", "personal_number"),
    ("mitarbeiternummer", "personal_number"),
    ("employee_id", "personal_number"),
    ("employee_number", "personal_number"),
    ("vorname", "first_name"),
    ("given_name", "first_name"),
    ("nachname", "last_name"),
    ("familienname", "last_name"),
    ("surname", "last_name"),
    ("beruf", "profession"),
    ("tätigkeit", "profession"),
    ("current_position", "profession"),
    ("planstelle", "planned_position"),
    ("zielposition", "planned_position"),
    ("geplante_stelle", "planned_position"),
    ("target_position", "planned_position"),
    ("organisationseinheit", "org_unit"),
    ("org_einheit", "org_unit"),
    ("orgeinheit", "org_unit"),
    ("organizational_unit", "org_unit"),
];

impl EmployeesCleaner {
    pub fn new() -> Self {
        Self::with_aliases(DEFAULT_ALIASES)
    }

    /// Use a caller-supplied alias map instead of the built-in one.
    pub fn with_aliases(aliases: &[(&str, &str)]) -> Self {
        Self {
            aliases: alias_vec(aliases),
        }
    }
}

impl Default for EmployeesCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCleaner for EmployeesCleaner {
    fn source_kind(&self) -> SourceKind {
        SourceKind::Employees
    }

    fn name(&self) -> &str {
        "employees"
    }

    fn expected_columns(&self) -> &'static [&'static str] {
        EXPECTED_COLUMNS
    }

    fn clean(&self, mut table: Table) -> Table {
        CleanerUtils::rename_aliases(&mut table, &self.aliases);
        CleanerUtils::coerce_id_columns(
            &mut table,
            &["personal_number", "planned_position", "org_unit"],
        );
        if table.has_column("personal_number") {
            CleanerUtils::dedupe_by(&mut table, "personal_number");
        } else {
            // downstream merges keyed on it cannot proceed for this table
            warn!("employees export carries no personal_number column");
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bilingual_headers_map_onto_canonical_fields() {
        let table = Table::from_rows(
            &["personalnummer", "nachname", "zielposition"],
            vec![vec![json!(7), json!("Weber"), json!("P1")]],
        );
        let cleaned = EmployeesCleaner::new().clean(table);
        assert_eq!(cleaned.cell(0, "personal_number"), Some(&json!("7")));
        assert_eq!(cleaned.cell(0, "last_name"), Some(&json!("Weber")));
        assert_eq!(cleaned.cell(0, "planned_position"), Some(&json!("P1")));
    }

    #[test]
    fn duplicate_personnel_numbers_collapse_to_first_row() {
        let table = Table::from_rows(
            &["personalnummer", "nachname"],
            vec![
                vec![json!("123"), json!("First")],
                vec![json!("123"), json!("Second")],
            ],
        );
        let cleaned = EmployeesCleaner::new().clean(table);
        assert_eq!(cleaned.row_count(), 1);
        assert_eq!(cleaned.cell(0, "last_name"), Some(&json!("First")));
    }
}
