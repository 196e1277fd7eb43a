use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use skillgraph_core::common::error::{Result, SkillGraphError};
use skillgraph_core::EdgePolicy;

/// Pipeline configuration, loaded from a TOML file. Every field has a
/// default, so a partial file (or none at all) works.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory the canonical tables are persisted under.
    pub canonical_dir: PathBuf,
    /// Path of the graph snapshot blob.
    pub snapshot_path: PathBuf,
    /// Edge-append policy for graph rebuilds.
    pub edge_policy: EdgePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            canonical_dir: PathBuf::from("data/canonical"),
            snapshot_path: PathBuf::from("data/graph.snapshot"),
            edge_policy: EdgePolicy::Additive,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist. A file that exists but does not parse is a
    /// configuration error, not something to silently paper over.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no config file found, using defaults");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| SkillGraphError::Config {
            message: format!("failed to parse {}: {e}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_file_falls_back_to_defaults() {
        let config = PipelineConfig::load(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config.canonical_dir, PathBuf::from("data/canonical"));
        assert_eq!(config.edge_policy, EdgePolicy::Additive);
    }

    #[test]
    fn partial_file_overrides_only_what_it_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skillgraph.toml");
        fs::write(&path, "edge_policy = \"deduplicate\"\n").unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.edge_policy, EdgePolicy::Deduplicate);
        assert_eq!(config.snapshot_path, PathBuf::from("data/graph.snapshot"));
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skillgraph.toml");
        fs::write(&path, "edge_policy = [not toml").unwrap();

        assert!(matches!(
            PipelineConfig::load(&path),
            Err(SkillGraphError::Config { .. })
        ));
    }
}
