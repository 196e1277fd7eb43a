use skillgraph_core::{SourceKind, Table};

use super::{alias_vec, CleanerUtils, SourceCleaner};

/// Cleaner for course participation exports. One row per attendance, so
/// repeated (employee, course) pairs are legitimate retakes and are not
/// de-duplicated.
pub struct CourseParticipationCleaner {
    aliases: Vec<(String, String)>,
}

pub const EXPECTED_COLUMNS: &[&str] = &[
    "personal_number",
    "course_id",
    "course_name",
    "completion_date",
];

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("personalnummer", "personal_number"),
    ("teilnehmer_nr", "personal_number"),
    ("employee_id", "personal_number"),
    ("kursnummer", "course_id"),
    ("kurs_nr", "course_id"),
    ("kurs_id", "course_id"),
    ("course_number", "course_id"),
    ("kursbezeichnung", "course_name"),
    ("kurstitel", "course_name"),
    ("course_title", "course_name"),
    ("abschlussdatum", "completion_date"),
    ("teilnahmedatum", "completion_date"),
    ("completed_on", "completion_date"),
    ("completion", "completion_date"),
];

impl CourseParticipationCleaner {
    pub fn new() -> Self {
        Self::with_aliases(DEFAULT_ALIASES)
    }

    pub fn with_aliases(aliases: &[(&str, &str)]) -> Self {
        Self {
            aliases: alias_vec(aliases),
        }
    }
}

impl Default for CourseParticipationCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCleaner for CourseParticipationCleaner {
    fn source_kind(&self) -> SourceKind {
        SourceKind::CourseParticipation
    }

    fn name(&self) -> &str {
        "course_participation"
    }

    fn expected_columns(&self) -> &'static [&'static str] {
        EXPECTED_COLUMNS
    }

    fn clean(&self, mut table: Table) -> Table {
        CleanerUtils::rename_aliases(&mut table, &self.aliases);
        CleanerUtils::coerce_id_columns(&mut table, &["personal_number", "course_id"]);
        CleanerUtils::coerce_date_columns(&mut table, &["completion_date"]);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn malformed_dates_degrade_to_null() {
        let table = Table::from_rows(
            &["personalnummer", "kursnummer", "abschlussdatum"],
            vec![
                vec![json!("1"), json!("C1"), json!("15.03.2024")],
                vec![json!("1"), json!("C2"), json!("n/a")],
            ],
        );
        let cleaned = CourseParticipationCleaner::new().clean(table);
        assert_eq!(cleaned.cell(0, "completion_date"), Some(&json!("2024-03-15")));
        assert_eq!(cleaned.cell(1, "completion_date"), Some(&Value::Null));
        // the malformed row itself is kept
        assert_eq!(cleaned.row_count(), 2);
    }
}
