use crate::search::statistics::Statistics;

/// A trait for policies that decide when a search should be abandoned early.
///
/// The engine consults the policy on every node, before the node's status is
/// computed, so implementations are expected to be cheap.
pub trait StopPolicy: Send + Sync {
    /// Given one worker's current statistics and search depth, decides
    /// whether the search should stop.
    ///
    /// # Arguments
    ///
    /// * `stats`: The counters of the worker asking.
    /// * `depth`: The current size of that worker's search path.
    ///
    /// # Returns
    ///
    /// * `true` if the search should stop.
    /// * `false` if exploration should continue.
    fn should_stop(&self, stats: &Statistics, depth: usize) -> bool;
}

/// A policy that stops the search after a fixed number of explored nodes.
pub struct NodeLimit {
    pub max_nodes: u64,
}

impl StopPolicy for NodeLimit {
    fn should_stop(&self, stats: &Statistics, _depth: usize) -> bool {
        stats.nodes >= self.max_nodes
    }
}

/// A policy that stops the search after a fixed number of failed nodes.
pub struct FailLimit {
    pub max_failures: u64,
}

impl StopPolicy for FailLimit {
    fn should_stop(&self, stats: &Statistics, _depth: usize) -> bool {
        stats.failures >= self.max_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_limit_fires_at_threshold() {
        let policy = NodeLimit { max_nodes: 10 };
        let below = Statistics {
            nodes: 9,
            ..Statistics::default()
        };
        assert!(!policy.should_stop(&below, 4));
        let at = Statistics {
            nodes: 10,
            ..Statistics::default()
        };
        assert!(policy.should_stop(&at, 4));
    }

    #[test]
    fn fail_limit_fires_at_threshold() {
        let policy = FailLimit { max_failures: 3 };
        let below = Statistics {
            failures: 2,
            ..Statistics::default()
        };
        assert!(!policy.should_stop(&below, 0));
        let at = Statistics {
            failures: 3,
            ..Statistics::default()
        };
        assert!(policy.should_stop(&at, 0));
    }
}
