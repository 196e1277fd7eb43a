//! Whole-graph snapshot persistence: one version-tagged binary blob used
//! to bootstrap a query-serving process without re-running the ETL.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::common::error::{Result, SkillGraphError};
use crate::graph::model::{Edge, Node};
use crate::graph::SkillGraph;

/// Bumped on every incompatible graph-model change so a stale blob is
/// rejected instead of silently producing a corrupt in-memory structure.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct SnapshotEnvelope {
    version: u32,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Serialize the whole graph to the configured path. The blob is
    /// written to a temp file and renamed into place, so a crash
    /// mid-write leaves the previous snapshot intact.
    pub fn save(&self, graph: &SkillGraph) -> Result<()> {
        let envelope = SnapshotEnvelope {
            version: SNAPSHOT_VERSION,
            nodes: graph.nodes().to_vec(),
            edges: graph.edges().to_vec(),
        };
        let bytes = bincode::serialize(&envelope).map_err(|e| SkillGraphError::Snapshot {
            message: format!("failed to encode snapshot: {e}"),
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;
        debug!(
            path = %self.path.display(),
            bytes = bytes.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "snapshot written"
        );
        Ok(())
    }

    /// Load the persisted graph. A missing blob bootstraps an empty
    /// graph (first run); a blob with an unknown version tag is an
    /// error.
    pub fn load(&self) -> Result<SkillGraph> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no snapshot found, starting with an empty graph");
            return Ok(SkillGraph::new());
        }
        let bytes = fs::read(&self.path)?;
        let envelope: SnapshotEnvelope =
            bincode::deserialize(&bytes).map_err(|e| SkillGraphError::Snapshot {
                message: format!("failed to decode snapshot: {e}"),
            })?;
        if envelope.version != SNAPSHOT_VERSION {
            return Err(SkillGraphError::Snapshot {
                message: format!(
                    "unsupported snapshot version {} (expected {})",
                    envelope.version, SNAPSHOT_VERSION
                ),
            });
        }
        Ok(SkillGraph::from_parts(envelope.nodes, envelope.edges))
    }
}
