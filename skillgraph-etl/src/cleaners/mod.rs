//! Per-source cleaners: one per recognized export kind, each owning the
//! alias map that translates that system's headers (bilingual, padded,
//! inconsistently cased) onto the canonical field names used everywhere
//! downstream.

pub mod course_participation;
pub mod employees;
pub mod learning_catalog;
pub mod learning_events;
pub mod org_structure;
pub mod qualifications;
pub mod role_qualifications;
pub mod skill_dictionary;
pub mod skill_mapping;

pub use course_participation::CourseParticipationCleaner;
pub use employees::EmployeesCleaner;
pub use learning_catalog::LearningCatalogCleaner;
pub use learning_events::LearningEventsCleaner;
pub use org_structure::OrgStructureCleaner;
pub use qualifications::QualificationsCleaner;
pub use role_qualifications::RoleQualificationsCleaner;
pub use skill_dictionary::SkillDictionaryCleaner;
pub use skill_mapping::SkillMappingCleaner;

use serde_json::Value;
use skillgraph_core::{id_display, id_key, parse_date, SourceKind, Table};

/// Base trait for source-specific cleaners. A cleaner never raises on
/// malformed rows or cells; it degrades the offending value to null and
/// keeps going.
pub trait SourceCleaner: Send + Sync {
    /// The source kind this cleaner handles
    fn source_kind(&self) -> SourceKind;

    /// A human-readable name for this cleaner
    fn name(&self) -> &str;

    /// The canonical columns a cleaned table of this kind should carry,
    /// used by the advisory schema check.
    fn expected_columns(&self) -> &'static [&'static str];

    /// Clean a column-normalized table into its canonical form.
    fn clean(&self, table: Table) -> Table;
}

/// Shared cleaning steps used by every cleaner implementation.
pub struct CleanerUtils;

impl CleanerUtils {
    /// Rename source aliases onto canonical names. A canonical column
    /// already present wins over any alias for the same target.
    pub fn rename_aliases(table: &mut Table, aliases: &[(String, String)]) {
        for (from, to) in aliases {
            if table.has_column(to) {
                continue;
            }
            table.rename_column(from, to);
        }
    }

    /// Cast identifier columns to trimmed string form; unusable cells
    /// become null.
    pub fn coerce_id_columns(table: &mut Table, columns: &[&str]) {
        for column in columns {
            let Some(idx) = table.column_index(column) else {
                continue;
            };
            for row in &mut table.rows {
                if let Some(cell) = row.get_mut(idx) {
                    *cell = match id_display(cell) {
                        Some(s) => Value::String(s),
                        None => Value::Null,
                    };
                }
            }
        }
    }

    /// Parse date columns into ISO strings; unparseable cells become
    /// null, never an error.
    pub fn coerce_date_columns(table: &mut Table, columns: &[&str]) {
        for column in columns {
            let Some(idx) = table.column_index(column) else {
                continue;
            };
            for row in &mut table.rows {
                if let Some(cell) = row.get_mut(idx) {
                    *cell = match parse_date(cell) {
                        Some(d) => Value::String(d.format("%Y-%m-%d").to_string()),
                        None => Value::Null,
                    };
                }
            }
        }
    }

    /// Collapse rows sharing the identity key in `column` to the first
    /// occurrence, preserving input order. Rows with a null key are kept
    /// as-is; they cannot collide with anything.
    pub fn dedupe_by(table: &mut Table, column: &str) {
        let Some(idx) = table.column_index(column) else {
            return;
        };
        let mut seen = std::collections::HashSet::new();
        let mut kept = Vec::with_capacity(table.rows.len());
        for row in table.rows.drain(..) {
            match row.get(idx).and_then(id_display).map(|s| id_key(&s)) {
                Some(key) => {
                    if seen.insert(key) {
                        kept.push(row);
                    }
                }
                None => kept.push(row),
            }
        }
        table.rows = kept;
    }
}

/// Owned alias pairs from a static default map.
pub(crate) fn alias_vec(aliases: &[(&str, &str)]) -> Vec<(String, String)> {
    aliases
        .iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
}

/// Registry connecting each source kind to its cleaner.
pub struct CleanerRegistry {
    cleaners: Vec<Box<dyn SourceCleaner>>,
}

impl CleanerRegistry {
    pub fn new() -> Self {
        Self {
            cleaners: vec![
                Box::new(EmployeesCleaner::new()),
                Box::new(CourseParticipationCleaner::new()),
                Box::new(QualificationsCleaner::new()),
                Box::new(OrgStructureCleaner::new()),
                Box::new(SkillDictionaryCleaner::new()),
                Box::new(SkillMappingCleaner::new()),
                Box::new(RoleQualificationsCleaner::new()),
                Box::new(LearningEventsCleaner::new()),
                Box::new(LearningCatalogCleaner::new()),
            ],
        }
    }

    pub fn get(&self, kind: SourceKind) -> Option<&dyn SourceCleaner> {
        self.cleaners
            .iter()
            .find(|c| c.source_kind() == kind)
            .map(|c| c.as_ref())
    }
}

impl Default for CleanerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let mut table = Table::from_rows(
            &["personal_number", "last_name"],
            vec![
                vec![json!("123"), json!("First")],
                vec![json!(" 123 "), json!("Second")],
                vec![json!(123), json!("Third")],
                vec![json!("124"), json!("Other")],
            ],
        );
        CleanerUtils::dedupe_by(&mut table, "personal_number");
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, "last_name"), Some(&json!("First")));
        assert_eq!(table.cell(1, "personal_number"), Some(&json!("124")));
    }

    #[test]
    fn id_coercion_collapses_numeric_spellings() {
        let mut table = Table::from_rows(
            &["personal_number"],
            vec![vec![json!(7)], vec![json!(" 7 ")], vec![json!("x")]],
        );
        CleanerUtils::coerce_id_columns(&mut table, &["personal_number"]);
        assert_eq!(table.cell(0, "personal_number"), Some(&json!("7")));
        assert_eq!(table.cell(1, "personal_number"), Some(&json!("7")));
        assert_eq!(table.cell(2, "personal_number"), Some(&json!("x")));
    }

    #[test]
    fn date_coercion_degrades_to_null() {
        let mut table = Table::from_rows(
            &["valid_until"],
            vec![vec![json!("31.12.2024")], vec![json!("soon")]],
        );
        CleanerUtils::coerce_date_columns(&mut table, &["valid_until"]);
        assert_eq!(table.cell(0, "valid_until"), Some(&json!("2024-12-31")));
        assert_eq!(table.cell(1, "valid_until"), Some(&Value::Null));
    }

    #[test]
    fn registry_covers_every_source_kind() {
        let registry = CleanerRegistry::new();
        for kind in SourceKind::ALL {
            assert!(registry.get(kind).is_some(), "no cleaner for {kind:?}");
        }
    }
}
