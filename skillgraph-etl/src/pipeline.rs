//! Pipeline orchestration: raw tables in, canonical tables and a
//! rebuilt graph out.
//!
//! Resilience over completeness: a source that is missing or fails to
//! persist is skipped with a warning and the remaining sources still
//! flow through. The single fatal condition is ending a run with no
//! usable source data at all.

use std::collections::HashMap;

use anyhow::Result;
use tracing::{info, warn};

use skillgraph_core::common::error::SkillGraphError;
use skillgraph_core::graph::builder::build_from_store;
use skillgraph_core::storage::CanonicalStore;
use skillgraph_core::{EdgePolicy, GraphHandle, GraphStats, SkillGraph, SourceKind, Table};

use crate::cleaners::CleanerRegistry;
use crate::merge::build_views;
use crate::normalize::{check_schema, normalize_columns};
use crate::observability::metrics;

/// Result of executing one pipeline step.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: String,
    pub success: bool,
    pub processed: usize,
    pub message: String,
}

impl StepOutcome {
    pub fn success(step: &str, processed: usize, message: String) -> Self {
        Self {
            step: step.to_string(),
            success: true,
            processed,
            message,
        }
    }

    pub fn skipped(step: &str, message: String) -> Self {
        Self {
            step: step.to_string(),
            success: true,
            processed: 0,
            message,
        }
    }

    pub fn failure(step: &str, message: String) -> Self {
        Self {
            step: step.to_string(),
            success: false,
            processed: 0,
            message,
        }
    }
}

/// Per-step report of a complete pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    pub steps: Vec<StepOutcome>,
    pub tables_written: Vec<String>,
}

pub struct EtlPipeline {
    registry: CleanerRegistry,
    store: CanonicalStore,
}

impl EtlPipeline {
    pub fn new(store: CanonicalStore) -> Self {
        Self {
            registry: CleanerRegistry::new(),
            store,
        }
    }

    pub fn store(&self) -> &CanonicalStore {
        &self.store
    }

    /// Run the full ETL over whatever sources are available: normalize
    /// headers, clean per source, persist canonical tables, then build
    /// and persist the derived merge views.
    pub fn run(&self, sources: Vec<(SourceKind, Table)>) -> Result<PipelineSummary> {
        let mut raw: HashMap<SourceKind, Table> = HashMap::new();
        for (kind, table) in sources {
            if raw.insert(kind, table).is_some() {
                warn!(source = kind.canonical_name(), "duplicate source supplied, keeping the last one");
            }
        }

        info!("🔄 Starting pipeline run with {} source(s)", raw.len());
        let mut summary = PipelineSummary::default();
        let mut cleaned: HashMap<SourceKind, Table> = HashMap::new();

        for kind in SourceKind::ALL {
            let name = kind.canonical_name();
            let Some(mut table) = raw.remove(&kind) else {
                warn!(source = name, "source unavailable, skipped");
                metrics::etl::source_skipped(name);
                summary
                    .steps
                    .push(StepOutcome::skipped(name, "source unavailable".to_string()));
                continue;
            };

            normalize_columns(&mut table);
            let Some(cleaner) = self.registry.get(kind) else {
                // registry covers every kind; this is belt and suspenders
                summary
                    .steps
                    .push(StepOutcome::failure(name, "no cleaner registered".to_string()));
                continue;
            };
            let table = cleaner.clean(table);
            check_schema(name, &table, cleaner.expected_columns());

            match self.store.save_table(name, &table) {
                Ok(()) => {
                    metrics::etl::rows_cleaned(name, table.row_count() as u64);
                    summary.steps.push(StepOutcome::success(
                        name,
                        table.row_count(),
                        format!("cleaned {} rows", table.row_count()),
                    ));
                    summary.tables_written.push(name.to_string());
                    cleaned.insert(kind, table);
                }
                Err(e) => {
                    warn!(source = name, error = %e, "failed to persist canonical table");
                    summary
                        .steps
                        .push(StepOutcome::failure(name, format!("persist failed: {e}")));
                }
            }
        }

        if cleaned.is_empty() {
            return Err(SkillGraphError::NoSourceData {
                message: "no source produced a usable canonical table".to_string(),
            }
            .into());
        }

        for (name, view) in build_views(&cleaned) {
            match self.store.save_table(name, &view) {
                Ok(()) => {
                    summary.steps.push(StepOutcome::success(
                        name,
                        view.row_count(),
                        format!("derived view with {} rows", view.row_count()),
                    ));
                    summary.tables_written.push(name.to_string());
                }
                Err(e) => {
                    warn!(view = name, error = %e, "failed to persist derived view");
                    summary
                        .steps
                        .push(StepOutcome::failure(name, format!("persist failed: {e}")));
                }
            }
        }

        info!(
            "✅ Pipeline run complete: {} table(s) written",
            summary.tables_written.len()
        );
        Ok(summary)
    }
}

/// Rebuild a fresh graph from the canonical store.
pub fn rebuild_graph(store: &CanonicalStore, policy: EdgePolicy) -> Result<SkillGraph> {
    Ok(build_from_store(store, policy)?)
}

/// Rebuild and atomically swap the new instance into the serving
/// handle. In-flight queries against the old instance complete safely.
pub fn rebuild_and_swap(
    store: &CanonicalStore,
    policy: EdgePolicy,
    handle: &GraphHandle,
) -> Result<GraphStats> {
    let graph = build_from_store(store, policy)?;
    let stats = graph.stats();
    metrics::graph::rebuild_completed(stats.node_count, stats.edge_count);
    handle.replace(graph);
    Ok(stats)
}
