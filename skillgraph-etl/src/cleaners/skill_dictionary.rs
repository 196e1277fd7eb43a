use skillgraph_core::{SourceKind, Table};

use super::{alias_vec, CleanerUtils, SourceCleaner};

/// Cleaner for the skill dictionary, the authoritative list of skills.
pub struct SkillDictionaryCleaner {
    aliases: Vec<(String, String)>,
}

pub const EXPECTED_COLUMNS: &[&str] = &["skill_id", "skill_name", "description", "category"];

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("skill_nr", "skill_id"),
    ("kompetenz_id", "skill_id"),
    ("kompetenznummer", "skill_id"),
    ("kompetenz", "skill_name"),
    ("kompetenzbezeichnung", "skill_name"),
    ("skill", "skill_name"),
    ("beschreibung", "description"),
    ("kategorie", "category"),
    ("skill_category", "category"),
];

impl SkillDictionaryCleaner {
    pub fn new() -> Self {
        Self::with_aliases(DEFAULT_ALIASES)
    }

    pub fn with_aliases(aliases: &[(&str, &str)]) -> Self {
        Self {
            aliases: alias_vec(aliases),
        }
    }
}

impl Default for SkillDictionaryCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCleaner for SkillDictionaryCleaner {
    fn source_kind(&self) -> SourceKind {
        SourceKind::SkillDictionary
    }

    fn name(&self) -> &str {
        "skill_dictionary"
    }

    fn expected_columns(&self) -> &'static [&'static str] {
        EXPECTED_COLUMNS
    }

    fn clean(&self, mut table: Table) -> Table {
        CleanerUtils::rename_aliases(&mut table, &self.aliases);
        CleanerUtils::coerce_id_columns(&mut table, &["skill_id"]);
        CleanerUtils::dedupe_by(&mut table, "skill_id");
        table
    }
}
