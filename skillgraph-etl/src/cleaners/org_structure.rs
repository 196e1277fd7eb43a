use skillgraph_core::{SourceKind, Table};

use super::{alias_vec, CleanerUtils, SourceCleaner};

/// Cleaner for org hierarchy exports. Parent references may point at
/// units defined further down the file or not at all; that is the graph
/// builder's problem, not this cleaner's.
pub struct OrgStructureCleaner {
    aliases: Vec<(String, String)>,
}

pub const EXPECTED_COLUMNS: &[&str] = &[
    "org_unit_id",
    "parent_org_unit_id",
    "short_code",
    "name_de",
    "name_en",
];

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("objekt_id", "org_unit_id"),
    ("orgeh", "org_unit_id"),
    ("einheit_id", "org_unit_id"),
    ("unit_id", "org_unit_id"),
    ("übergeordnete_einheit", "parent_org_unit_id"),
    ("parent_id", "parent_org_unit_id"),
    ("parent_unit", "parent_org_unit_id"),
    ("kurzzeichen", "short_code"),
    ("kurztext", "short_code"),
    ("bezeichnung", "name_de"),
    ("name", "name_de"),
    ("bezeichnung_en", "name_en"),
    ("english_name", "name_en"),
];

impl OrgStructureCleaner {
    pub fn new() -> Self {
        Self::with_aliases(DEFAULT_ALIASES)
    }

    pub fn with_aliases(aliases: &[(&str, &str)]) -> Self {
        Self {
            aliases: alias_vec(aliases),
        }
    }
}

impl Default for OrgStructureCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCleaner for OrgStructureCleaner {
    fn source_kind(&self) -> SourceKind {
        SourceKind::OrgStructure
    }

    fn name(&self) -> &str {
        "org_structure"
    }

    fn expected_columns(&self) -> &'static [&'static str] {
        EXPECTED_COLUMNS
    }

    fn clean(&self, mut table: Table) -> Table {
        CleanerUtils::rename_aliases(&mut table, &self.aliases);
        CleanerUtils::coerce_id_columns(&mut table, &["org_unit_id", "parent_org_unit_id"]);
        CleanerUtils::dedupe_by(&mut table, "org_unit_id");
        table
    }
}
