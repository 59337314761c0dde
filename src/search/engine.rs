use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::{
    error::{Result, SearchError},
    search::{
        options::Options,
        statistics::Statistics,
        sync::{Cmd, CmdGate, Event, Poisoned},
        worker::Worker,
    },
    space::Space,
};

/// Search state guarded by the search mutex.
struct SearchState<S: Space> {
    /// Solutions in the order workers delivered them.
    solutions: VecDeque<S>,
    /// Workers not currently idle. Zero exactly when the tree is exhausted.
    n_busy: usize,
    /// Sticky flag, set the first time any worker reports a stop.
    has_stopped: bool,
}

impl<S: Space> SearchState<S> {
    /// Whether the caller could currently be waiting on the search event.
    ///
    /// A worker-side update is only worth a signal when it turns this state
    /// into a notable one, so workers evaluate the predicate before applying
    /// their update.
    fn signal(&self) -> bool {
        self.solutions.is_empty() && self.n_busy > 0 && !self.has_stopped
    }
}

/// State shared between the engine handle and its worker threads.
pub(crate) struct Shared<S: Space> {
    pub(crate) options: Options,
    pub(crate) gate: CmdGate,
    pub(crate) workers: Vec<Worker<S>>,
    search: Mutex<SearchState<S>>,
    e_search: Event,
    /// Workers that have not yet registered termination.
    terminate: Mutex<usize>,
    e_terminate: Condvar,
}

impl<S: Space> Shared<S> {
    pub(crate) fn should_stop(&self, stats: &Statistics, depth: usize) -> bool {
        match &self.options.stop {
            Some(policy) => policy.should_stop(stats, depth),
            None => false,
        }
    }

    /// A worker delivers a solution.
    pub(crate) fn solution(&self, solution: S) -> Result<(), Poisoned> {
        let mut search = self.search.lock().map_err(|_| Poisoned)?;
        let notable = search.signal();
        search.solutions.push_back(solution);
        if notable {
            self.e_search.signal()?;
        }
        Ok(())
    }

    /// A worker reports that it has run out of work.
    pub(crate) fn idle(&self) -> Result<(), Poisoned> {
        let mut search = self.search.lock().map_err(|_| Poisoned)?;
        let notable = search.signal();
        search.n_busy -= 1;
        if notable && search.n_busy == 0 {
            self.e_search.signal()?;
        }
        Ok(())
    }

    /// A thief reports, on behalf of itself, that stolen work is in flight.
    pub(crate) fn busy(&self) -> Result<(), Poisoned> {
        let mut search = self.search.lock().map_err(|_| Poisoned)?;
        debug_assert!(search.n_busy > 0);
        search.n_busy += 1;
        Ok(())
    }

    /// A worker reports that its stop policy fired.
    pub(crate) fn stop(&self) -> Result<(), Poisoned> {
        let mut search = self.search.lock().map_err(|_| Poisoned)?;
        let notable = search.signal();
        search.has_stopped = true;
        if notable {
            debug!("stop policy fired");
            self.e_search.signal()?;
        }
        Ok(())
    }

    /// A worker registers that its thread is exiting.
    pub(crate) fn terminated(&self) {
        if let Ok(mut remaining) = self.terminate.lock() {
            *remaining -= 1;
            if *remaining == 0 {
                self.e_terminate.notify_all();
            }
        }
    }

    /// Marks the engine stopped and wakes the caller. Used on fatal faults
    /// so a caller blocked in `next()` observes the failure instead of
    /// hanging.
    pub(crate) fn poison(&self) {
        if let Ok(mut search) = self.search.lock() {
            search.has_stopped = true;
        }
        let _ = self.e_search.signal();
    }

    fn await_termination(&self) {
        if let Ok(mut remaining) = self.terminate.lock() {
            while *remaining > 0 {
                match self.e_terminate.wait(remaining) {
                    Ok(guard) => remaining = guard,
                    Err(_) => return,
                }
            }
        }
    }
}

/// A parallel depth-first search engine over a pool of work-stealing
/// workers.
///
/// The engine owns `options.workers` OS threads. Worker 0 starts with the
/// root space, the others steal their way into the tree. The caller drives
/// progress through [`next`](DfsEngine::next): between calls every worker is
/// parked, so a `DfsEngine` consumes no CPU while the caller is busy with a
/// solution.
pub struct DfsEngine<S: Space> {
    shared: Arc<Shared<S>>,
    threads: Vec<JoinHandle<()>>,
    poisoned: bool,
}

impl<S: Space> DfsEngine<S> {
    /// Creates an engine for `root` and spawns its workers.
    ///
    /// The workers start parked; no exploration happens until the first
    /// [`next`](DfsEngine::next) call.
    ///
    /// # Errors
    ///
    /// Rejects `workers == 0`, `commit_distance == 0` and
    /// `adapt_distance == 0`, and reports thread-spawn failures.
    pub fn new(root: S, options: Options) -> Result<Self> {
        if options.workers == 0 {
            return Err(SearchError::NoWorkers.into());
        }
        if options.commit_distance == 0 {
            return Err(SearchError::InvalidCommitDistance.into());
        }
        if options.adapt_distance == 0 {
            return Err(SearchError::InvalidAdaptDistance.into());
        }
        let n = options.workers;
        // The first worker gets the entire search tree; the rest start with
        // no work and find some by stealing.
        let mut workers = Vec::with_capacity(n);
        workers.push(Worker::new(0, Some(root)));
        for index in 1..n {
            workers.push(Worker::new(index, None));
        }
        let shared = Arc::new(Shared {
            options,
            gate: CmdGate::new(),
            workers,
            search: Mutex::new(SearchState {
                solutions: VecDeque::new(),
                n_busy: n,
                has_stopped: false,
            }),
            e_search: Event::new(),
            terminate: Mutex::new(n),
            e_terminate: Condvar::new(),
        });
        debug!(workers = n, "starting parallel depth-first search");
        let mut threads = Vec::with_capacity(n);
        for index in 0..n {
            let worker_shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("dfs-worker-{index}"))
                .spawn(move || Worker::run(&worker_shared, index));
            match spawned {
                Ok(handle) => threads.push(handle),
                Err(source) => {
                    let _ = shared.gate.release(Cmd::Terminate);
                    for handle in threads.drain(..) {
                        let _ = handle.join();
                    }
                    return Err(SearchError::Spawn(source).into());
                }
            }
        }
        Ok(Self {
            shared,
            threads,
            poisoned: false,
        })
    }

    /// Returns the next solution, or `None` once the tree is exhausted or
    /// the search has stopped.
    ///
    /// Blocks while workers explore. Solutions are delivered in the order
    /// workers found them; with more than one worker that order can differ
    /// between runs. After `None`, every further call returns `None`.
    pub fn next(&mut self) -> Option<S> {
        if self.poisoned {
            return None;
        }
        {
            let mut search = match self.shared.search.lock() {
                Ok(guard) => guard,
                Err(_) => {
                    self.poisoned = true;
                    return None;
                }
            };
            if let Some(solution) = search.solutions.pop_front() {
                return Some(solution);
            }
            if search.n_busy == 0 || search.has_stopped {
                return None;
            }
        }
        if self.shared.gate.release(Cmd::Work).is_err() {
            self.poisoned = true;
            return None;
        }
        // The event may carry a stale signal from a previous round whose
        // solution has since been drained, so keep waiting until something
        // genuinely new has happened.
        loop {
            if self.shared.e_search.wait().is_err() {
                self.poisoned = true;
                return None;
            }
            let outcome = {
                let mut search = match self.shared.search.lock() {
                    Ok(guard) => guard,
                    Err(_) => {
                        self.poisoned = true;
                        return None;
                    }
                };
                if let Some(solution) = search.solutions.pop_front() {
                    Some(Some(solution))
                } else if search.n_busy == 0 || search.has_stopped {
                    Some(None)
                } else {
                    None
                }
            };
            if let Some(result) = outcome {
                // Park the workers again before handing control back.
                if self.shared.gate.block().is_err() {
                    self.poisoned = true;
                }
                return result;
            }
        }
    }

    /// Accumulated statistics over all workers.
    ///
    /// Reads are lock-free and best-effort while the search is running; see
    /// [`Statistics`].
    pub fn statistics(&self) -> Statistics {
        let mut total = Statistics::default();
        for worker in &self.shared.workers {
            total.merge(&worker.statistics());
        }
        total
    }

    /// Per-worker statistics snapshots, indexed by worker.
    pub fn worker_statistics(&self) -> Vec<Statistics> {
        self.shared.workers.iter().map(Worker::statistics).collect()
    }

    /// Whether the search was stopped early, by a stop policy or a fault.
    pub fn stopped(&self) -> bool {
        if self.poisoned {
            return true;
        }
        match self.shared.search.lock() {
            Ok(search) => search.has_stopped,
            Err(_) => true,
        }
    }
}

impl<S: Space> Drop for DfsEngine<S> {
    fn drop(&mut self) {
        let _ = self.shared.gate.release(Cmd::Terminate);
        self.shared.await_termination();
        // Threads are joined before the shared state (and with it the
        // workers) goes away with the engine's Arc.
        for handle in self.threads.drain(..) {
            let _ = handle.join();
        }
        debug!("search engine terminated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{BranchDesc, Space, SpaceStatus};

    #[derive(Debug, Clone)]
    struct Unit;

    #[derive(Debug)]
    struct NoChoice;

    impl BranchDesc for NoChoice {
        fn alternatives(&self) -> u32 {
            1
        }
    }

    impl Space for Unit {
        type Branch = NoChoice;

        fn status(&mut self, _stats: &mut Statistics) -> SpaceStatus {
            SpaceStatus::Solved
        }

        fn description(&mut self) -> NoChoice {
            NoChoice
        }

        fn clone_space(&self, _share: bool) -> Self {
            Unit
        }

        fn commit(&mut self, _desc: &NoChoice, _alt: u32) {}
    }

    #[test]
    fn rejects_zero_workers() {
        assert!(DfsEngine::new(Unit, Options::default().with_workers(0)).is_err());
    }

    #[test]
    fn rejects_zero_commit_distance() {
        assert!(DfsEngine::new(Unit, Options::default().with_commit_distance(0)).is_err());
    }

    #[test]
    fn rejects_zero_adapt_distance() {
        assert!(DfsEngine::new(Unit, Options::default().with_adapt_distance(0)).is_err());
    }

    #[test]
    fn solved_root_is_delivered_exactly_once() {
        let mut engine = DfsEngine::new(Unit, Options::default()).unwrap();
        assert!(engine.next().is_some());
        assert!(engine.next().is_none());
        assert!(engine.next().is_none());
        assert!(!engine.stopped());
    }
}
