//! Column-header normalization, the first thing that happens to every
//! raw table, plus the advisory schema-drift check.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use skillgraph_core::Table;

use crate::observability::metrics;

static NON_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}_]+").unwrap());
static UNDERSCORE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").unwrap());

/// Map an arbitrary raw header onto its canonical snake_case form:
/// lower-case, every run of characters that are not letters, digits, or
/// underscores becomes a single `_`, repeated underscores collapse, and
/// leading/trailing underscores are stripped. Idempotent, so re-cleaning
/// an already canonical table changes nothing.
pub fn normalize_header(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let replaced = NON_IDENT.replace_all(&lowered, "_");
    let collapsed = UNDERSCORE_RUNS.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// Normalize every column header of a table in place.
pub fn normalize_columns(table: &mut Table) {
    for column in &mut table.columns {
        *column = normalize_header(column);
    }
}

/// Advisory comparison of a table's columns against the expected
/// canonical set. Reported, never raised: schema drift must not alter
/// control flow.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaReport {
    pub source: String,
    pub row_count: usize,
    pub column_count: usize,
    pub missing: Vec<String>,
    pub extra: Vec<String>,
}

impl SchemaReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }
}

pub fn check_schema(source: &str, table: &Table, expected: &[&str]) -> SchemaReport {
    let missing = expected
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect::<Vec<_>>();
    let extra = table
        .columns
        .iter()
        .filter(|c| !expected.contains(&c.as_str()))
        .cloned()
        .collect::<Vec<_>>();

    let report = SchemaReport {
        source: source.to_string(),
        row_count: table.row_count(),
        column_count: table.column_count(),
        missing,
        extra,
    };
    if report.is_clean() {
        debug!(
            source,
            rows = report.row_count,
            columns = report.column_count,
            "schema matches expected canonical set"
        );
    } else {
        metrics::etl::schema_drift(source);
        warn!(
            source,
            rows = report.row_count,
            columns = report.column_count,
            missing = ?report.missing,
            extra = ?report.extra,
            "schema drift detected"
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalization_examples() {
        assert_eq!(normalize_header("Personal-Number"), "personal_number");
        assert_eq!(normalize_header("  Kurs  Nr. "), "kurs_nr");
        assert_eq!(normalize_header("Gültig bis"), "gültig_bis");
        assert_eq!(normalize_header("Name (EN)"), "name_en");
        assert_eq!(normalize_header("___"), "");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in [
            "Personal-Number",
            "  Kurs  Nr. ",
            "Gültig bis",
            "already_canonical",
            "Weird***Header!!",
            "",
        ] {
            let once = normalize_header(raw);
            assert_eq!(normalize_header(&once), once);
        }
    }

    #[test]
    fn schema_report_is_advisory() {
        let mut table = Table::from_rows(
            &["Personal-Number", "Unexpected"],
            vec![vec![json!("1"), json!("x")]],
        );
        normalize_columns(&mut table);
        let report = check_schema("employees", &table, &["personal_number", "last_name"]);
        assert_eq!(report.missing, vec!["last_name"]);
        assert_eq!(report.extra, vec!["unexpected"]);
        assert_eq!(report.row_count, 1);
        // the table itself is untouched
        assert_eq!(table.columns, vec!["personal_number", "unexpected"]);
    }
}
