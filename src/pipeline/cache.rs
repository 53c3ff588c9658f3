//! Memoized pipeline results, owned by the hosting application

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::{run_pipeline, CleanedTables, PipelineConfig, SourcePair};

/// Results of previous runs, keyed by the identity of their two sources.
///
/// Entries live until [`invalidate`](Self::invalidate) or
/// [`clear`](Self::clear); a file that changes at the same location is not
/// picked up before that. Failed runs are not stored.
#[derive(Debug, Default)]
pub struct PipelineCache {
    config: PipelineConfig,
    entries: HashMap<SourcePair, Arc<CleanedTables>>,
}

impl PipelineCache {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            entries: HashMap::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Cached tables for `sources`, running the pipeline on a miss.
    pub fn get_or_run(&mut self, sources: &SourcePair) -> Option<Arc<CleanedTables>> {
        if let Some(tables) = self.entries.get(sources) {
            debug!(applications = %sources.applications, previous = %sources.previous, "cache hit");
            return Some(Arc::clone(tables));
        }

        let tables = Arc::new(run_pipeline(sources, &self.config)?);
        self.entries.insert(sources.clone(), Arc::clone(&tables));
        Some(tables)
    }

    /// Cached tables for `sources`, without running anything
    pub fn get(&self, sources: &SourcePair) -> Option<Arc<CleanedTables>> {
        self.entries.get(sources).cloned()
    }

    /// Forget the result for `sources`. Returns whether an entry was removed.
    pub fn invalidate(&mut self, sources: &SourcePair) -> bool {
        self.entries.remove(sources).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
