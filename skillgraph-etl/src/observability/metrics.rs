//! Counter instrumentation for the pipeline stages, recorded through the
//! `metrics` facade. Wiring an exporter is the embedding process's
//! decision; without one these calls are no-ops.

/// ETL stage metrics
pub mod etl {
    use metrics::counter;

    pub fn rows_cleaned(source: &str, count: u64) {
        counter!("skillgraph_etl_rows_cleaned_total", "source" => source.to_string())
            .increment(count);
    }

    pub fn source_skipped(source: &str) {
        counter!("skillgraph_etl_sources_skipped_total", "source" => source.to_string())
            .increment(1);
    }

    pub fn schema_drift(source: &str) {
        counter!("skillgraph_etl_schema_drift_total", "source" => source.to_string()).increment(1);
    }

    pub fn merge_completed(view: &str) {
        counter!("skillgraph_etl_merges_completed_total", "view" => view.to_string()).increment(1);
    }

    pub fn merge_skipped(view: &str) {
        counter!("skillgraph_etl_merges_skipped_total", "view" => view.to_string()).increment(1);
    }
}

/// Graph rebuild metrics
pub mod graph {
    use metrics::gauge;

    pub fn rebuild_completed(nodes: usize, edges: usize) {
        gauge!("skillgraph_graph_nodes").set(nodes as f64);
        gauge!("skillgraph_graph_edges").set(edges as f64);
    }
}
