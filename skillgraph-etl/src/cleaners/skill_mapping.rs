use skillgraph_core::{SourceKind, Table};

use super::{alias_vec, CleanerUtils, SourceCleaner};

/// Cleaner for skill-to-course mappings.
pub struct SkillMappingCleaner {
    aliases: Vec<(String, String)>,
}

pub const EXPECTED_COLUMNS: &[&str] = &["course_id", "skill_id"];

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("kursnummer", "course_id"),
    ("kurs_nr", "course_id"),
    ("kurs_id", "course_id"),
    ("course_number", "course_id"),
    ("skill_nr", "skill_id"),
    ("kompetenz_id", "skill_id"),
    ("kompetenznummer", "skill_id"),
];

impl SkillMappingCleaner {
    pub fn new() -> Self {
        Self::with_aliases(DEFAULT_ALIASES)
    }

    pub fn with_aliases(aliases: &[(&str, &str)]) -> Self {
        Self {
            aliases: alias_vec(aliases),
        }
    }
}

impl Default for SkillMappingCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCleaner for SkillMappingCleaner {
    fn source_kind(&self) -> SourceKind {
        SourceKind::SkillMapping
    }

    fn name(&self) -> &str {
        "skill_mapping"
    }

    fn expected_columns(&self) -> &'static [&'static str] {
        EXPECTED_COLUMNS
    }

    fn clean(&self, mut table: Table) -> Table {
        CleanerUtils::rename_aliases(&mut table, &self.aliases);
        CleanerUtils::coerce_id_columns(&mut table, &["course_id", "skill_id"]);
        table
    }
}
