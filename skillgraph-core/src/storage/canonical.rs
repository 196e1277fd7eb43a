//! Canonical table store: the stable contract between the ETL stage and
//! graph construction. One JSON file per table, keyed by a stable name.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::error::Result;
use crate::domain::Table;

/// Names of the derived merge views. Cleaned per-source tables use
/// `SourceKind::canonical_name()`.
pub mod views {
    pub const EMPLOYEE_LEARNING_PROFILE: &str = "employee_learning_profile";
    pub const SKILLS_MATRIX: &str = "skills_matrix";
    pub const COMPLIANCE_TRACKING: &str = "compliance_tracking";
    pub const GLOBAL_UNIFIED: &str = "global_unified";
}

pub struct CanonicalStore {
    dir: PathBuf,
}

impl CanonicalStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn table_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    pub fn save_table(&self, name: &str, table: &Table) -> Result<()> {
        let path = self.table_path(name);
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, table)?;
        debug!(table = name, rows = table.row_count(), path = %path.display(), "canonical table written");
        Ok(())
    }

    /// Load a table by stable name. An absent table is `Ok(None)`, not an
    /// error; callers decide whether that is worth a warning.
    pub fn load_table(&self, name: &str) -> Result<Option<Table>> {
        let path = self.table_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(&path)?;
        let table = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(table))
    }

    /// Stable names of every table currently persisted.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}
