use std::fmt;

use crate::search::stop::StopPolicy;

/// Configuration for a search engine.
///
/// `commit_distance` controls how often a worker stores a clone of the
/// current space while descending (every `commit_distance` nodes);
/// `adapt_distance` bounds how far a recomputation may replay before an
/// intermediate clone is installed. Both trade memory for recomputation
/// effort.
pub struct Options {
    /// Number of worker threads. Must be at least 1.
    pub workers: usize,
    /// Snapshot frequency during descent. Must be at least 1.
    pub commit_distance: u32,
    /// Maximum replay span before an intermediate snapshot is installed.
    /// Must be at least 1.
    pub adapt_distance: u32,
    /// Optional early-termination policy, consulted at every node.
    pub stop: Option<Box<dyn StopPolicy>>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            workers: 1,
            commit_distance: 8,
            adapt_distance: 2,
            stop: None,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_commit_distance(mut self, commit_distance: u32) -> Self {
        self.commit_distance = commit_distance;
        self
    }

    pub fn with_adapt_distance(mut self, adapt_distance: u32) -> Self {
        self.adapt_distance = adapt_distance;
        self
    }

    pub fn with_stop(mut self, stop: Box<dyn StopPolicy>) -> Self {
        self.stop = Some(stop);
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("workers", &self.workers)
            .field("commit_distance", &self.commit_distance)
            .field("adapt_distance", &self.adapt_distance)
            .field("stop", &self.stop.is_some())
            .finish()
    }
}
