use skillgraph_core::{SourceKind, Table};

use super::{alias_vec, CleanerUtils, SourceCleaner};

/// Cleaner for role requirement exports: which qualifications a position
/// demands.
pub struct RoleQualificationsCleaner {
    aliases: Vec<(String, String)>,
}

pub const EXPECTED_COLUMNS: &[&str] = &[
    "position_id",
    "position_title",
    "qualification_id",
    "qualification_name",
];

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("planstellen_id", "position_id"),
    ("stellen_id", "position_id"),
    ("stellennummer", "position_id"),
    ("role_id", "position_id"),
    ("stellenbezeichnung", "position_title"),
    ("role_title", "position_title"),
    ("qualifikations_id", "qualification_id"),
    ("qual_id", "qualification_id"),
    ("qualifikation", "qualification_name"),
    ("qualifikationsbezeichnung", "qualification_name"),
];

impl RoleQualificationsCleaner {
    pub fn new() -> Self {
        Self::with_aliases(DEFAULT_ALIASES)
    }

    pub fn with_aliases(aliases: &[(&str, &str)]) -> Self {
        Self {
            aliases: alias_vec(aliases),
        }
    }
}

impl Default for RoleQualificationsCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCleaner for RoleQualificationsCleaner {
    fn source_kind(&self) -> SourceKind {
        SourceKind::RoleQualifications
    }

    fn name(&self) -> &str {
        "role_qualifications"
    }

    fn expected_columns(&self) -> &'static [&'static str] {
        EXPECTED_COLUMNS
    }

    fn clean(&self, mut table: Table) -> Table {
        CleanerUtils::rename_aliases(&mut table, &self.aliases);
        CleanerUtils::coerce_id_columns(&mut table, &["position_id", "qualification_id"]);
        table
    }
}
