use skillgraph_core::{SourceKind, Table};

use super::{alias_vec, CleanerUtils, SourceCleaner};

/// Cleaner for the learning catalog: course titles and providers, used
/// to enrich Course nodes beyond what participation rows carry.
pub struct LearningCatalogCleaner {
    aliases: Vec<(String, String)>,
}

pub const EXPECTED_COLUMNS: &[&str] = &["course_id", "course_title", "provider"];

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("kursnummer", "course_id"),
    ("kurs_nr", "course_id"),
    ("course_number", "course_id"),
    ("kurstitel", "course_title"),
    ("kursbezeichnung", "course_title"),
    ("titel", "course_title"),
    ("anbieter", "provider"),
    ("veranstalter", "provider"),
];

impl LearningCatalogCleaner {
    pub fn new() -> Self {
        Self::with_aliases(DEFAULT_ALIASES)
    }

    pub fn with_aliases(aliases: &[(&str, &str)]) -> Self {
        Self {
            aliases: alias_vec(aliases),
        }
    }
}

impl Default for LearningCatalogCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCleaner for LearningCatalogCleaner {
    fn source_kind(&self) -> SourceKind {
        SourceKind::LearningCatalog
    }

    fn name(&self) -> &str {
        "learning_catalog"
    }

    fn expected_columns(&self) -> &'static [&'static str] {
        EXPECTED_COLUMNS
    }

    fn clean(&self, mut table: Table) -> Table {
        CleanerUtils::rename_aliases(&mut table, &self.aliases);
        CleanerUtils::coerce_id_columns(&mut table, &["course_id"]);
        CleanerUtils::dedupe_by(&mut table, "course_id");
        table
    }
}
