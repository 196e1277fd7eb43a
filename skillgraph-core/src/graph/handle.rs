//! Shared handle to the currently served graph instance.
//!
//! A rebuild produces a brand-new graph and swaps it in atomically:
//! queries already running against the old instance keep the `Arc` they
//! hold and complete safely, new queries immediately see the new
//! instance. Readers never lock each other out once they hold the `Arc`.

use std::sync::{Arc, RwLock};

use crate::graph::SkillGraph;

pub struct GraphHandle {
    current: RwLock<Arc<SkillGraph>>,
}

impl GraphHandle {
    pub fn new(graph: SkillGraph) -> Self {
        Self {
            current: RwLock::new(Arc::new(graph)),
        }
    }

    /// Handle over an empty graph, for first-run bootstrap.
    pub fn empty() -> Self {
        Self::new(SkillGraph::new())
    }

    /// The instance to run queries against. Cheap: clones an `Arc` under
    /// a short read lock.
    pub fn current(&self) -> Arc<SkillGraph> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Atomically replace the served instance.
    pub fn replace(&self, graph: SkillGraph) {
        let next = Arc::new(graph);
        match self.current.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }
}

impl Default for GraphHandle {
    fn default() -> Self {
        Self::empty()
    }
}
