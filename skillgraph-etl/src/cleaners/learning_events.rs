use skillgraph_core::{SourceKind, Table};

use super::{alias_vec, CleanerUtils, SourceCleaner};

/// Cleaner for ad-hoc learning event exports. These carry no identifier
/// that joins reliably into the other tables; the cleaned table is kept
/// available for consumers, not merged.
pub struct LearningEventsCleaner {
    aliases: Vec<(String, String)>,
}

pub const EXPECTED_COLUMNS: &[&str] = &["event_id", "personal_number", "event_name", "event_date"];

const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("veranstaltungs_id", "event_id"),
    ("veranstaltungsnummer", "event_id"),
    ("personalnummer", "personal_number"),
    ("veranstaltung", "event_name"),
    ("veranstaltungstitel", "event_name"),
    ("event_title", "event_name"),
    ("datum", "event_date"),
    ("veranstaltungsdatum", "event_date"),
];

impl LearningEventsCleaner {
    pub fn new() -> Self {
        Self::with_aliases(DEFAULT_ALIASES)
    }

    pub fn with_aliases(aliases: &[(&str, &str)]) -> Self {
        Self {
            aliases: alias_vec(aliases),
        }
    }
}

impl Default for LearningEventsCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceCleaner for LearningEventsCleaner {
    fn source_kind(&self) -> SourceKind {
        SourceKind::LearningEvents
    }

    fn name(&self) -> &str {
        "learning_events"
    }

    fn expected_columns(&self) -> &'static [&'static str] {
        EXPECTED_COLUMNS
    }

    fn clean(&self, mut table: Table) -> Table {
        CleanerUtils::rename_aliases(&mut table, &self.aliases);
        CleanerUtils::coerce_id_columns(&mut table, &["event_id", "personal_number"]);
        CleanerUtils::coerce_date_columns(&mut table, &["event_date"]);
        table
    }
}
