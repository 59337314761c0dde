/// Counters describing the effort spent by a search, or one worker's share
/// of it.
///
/// Worker counters are read by the engine without locking, so a snapshot
/// taken while the search is running may mix values from slightly different
/// points in time. Once [`next`](crate::search::engine::DfsEngine::next) has
/// returned `None` the counters are settled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    /// Number of nodes whose status was computed.
    pub nodes: u64,
    /// Number of failed nodes.
    pub failures: u64,
    /// Propagation effort reported by the spaces themselves.
    pub propagations: u64,
    /// Number of subtrees acquired from other workers.
    pub steals: u64,
    /// Deepest search path observed.
    pub peak_depth: usize,
    /// Path frames currently held.
    pub frames: usize,
}

impl Statistics {
    /// Folds another set of counters into this one.
    ///
    /// Counts are summed; `peak_depth` takes the maximum of the two.
    pub fn merge(&mut self, other: &Statistics) {
        self.nodes += other.nodes;
        self.failures += other.failures;
        self.propagations += other.propagations;
        self.steals += other.steals;
        self.peak_depth = self.peak_depth.max(other.peak_depth);
        self.frames += other.frames;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_sums_counts_and_maxes_depth() {
        let mut total = Statistics {
            nodes: 10,
            failures: 2,
            propagations: 40,
            steals: 1,
            peak_depth: 5,
            frames: 3,
        };
        total.merge(&Statistics {
            nodes: 7,
            failures: 1,
            propagations: 12,
            steals: 0,
            peak_depth: 9,
            frames: 2,
        });
        assert_eq!(total.nodes, 17);
        assert_eq!(total.failures, 3);
        assert_eq!(total.propagations, 52);
        assert_eq!(total.steals, 1);
        assert_eq!(total.peak_depth, 9);
        assert_eq!(total.frames, 5);
    }
}
